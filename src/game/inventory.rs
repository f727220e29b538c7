//! # Inventory
//!
//! The player's gem bag: an ordered multiset keyed by gem power, stored as an
//! unbalanced binary search tree with one node per distinct power.
//!
//! Power values come from a small fixed table, so the tree stays shallow in
//! practice and no rebalancing is performed. Every operation on an empty tree
//! degrades to a no-op or an absent result.

use crate::game::gems::gem_name;
use std::fmt;

/// A node of the inventory tree: one gem power and how many of it are held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemNode {
    power: i32,
    quantity: u32,
    left: Option<Box<GemNode>>,
    right: Option<Box<GemNode>>,
}

impl GemNode {
    fn new(power: i32, quantity: u32) -> Self {
        Self {
            power,
            quantity,
            left: None,
            right: None,
        }
    }

    /// Gem power (the node key).
    pub fn power(&self) -> i32 {
        self.power
    }

    /// Number of gems of this power held. Always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Display name of this node's gem.
    pub fn name(&self) -> String {
        gem_name(self.power)
    }

    /// Left child (smaller powers).
    pub fn left(&self) -> Option<&GemNode> {
        self.left.as_deref()
    }

    /// Right child (larger powers).
    pub fn right(&self) -> Option<&GemNode> {
        self.right.as_deref()
    }
}

impl fmt::Display for GemNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Power: {}, Quantity: {})",
            self.name(),
            self.power,
            self.quantity
        )
    }
}

/// Anything gems can be paid from and deposited into.
///
/// Chests, portals, and events talk to the inventory only through this trait.
pub trait GemStore {
    /// How many gems of `power` are held (0 when absent).
    fn quantity_of(&self, power: i32) -> u32;

    /// Deposits `quantity` gems of `power`.
    fn add_gems(&mut self, power: i32, quantity: u32);

    /// Withdraws up to `quantity` gems of `power`. Absent powers are ignored.
    fn remove_gems(&mut self, power: i32, quantity: u32);
}

/// Binary search tree of gems keyed by power.
///
/// # Examples
///
/// ```
/// use thicket::Inventory;
///
/// let mut inventory = Inventory::new();
/// inventory.insert(10, 3);
/// inventory.insert(5, 1);
/// inventory.insert(10, 2);
///
/// assert_eq!(inventory.search(10).map(|n| n.quantity()), Some(5));
/// assert_eq!(inventory.min_value().map(|n| n.power()), Some(5));
/// assert_eq!(inventory.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    root: Option<Box<GemNode>>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Root node of the tree, if any.
    pub fn root(&self) -> Option<&GemNode> {
        self.root.as_deref()
    }

    /// Adds `quantity` gems of `power`, accumulating into an existing node.
    ///
    /// A zero quantity leaves the tree untouched. Totals saturate at `u32::MAX`.
    pub fn insert(&mut self, power: i32, quantity: u32) {
        if quantity == 0 {
            return;
        }
        Self::insert_node(&mut self.root, power, quantity);
        self.debug_check_invariants();
    }

    fn insert_node(slot: &mut Option<Box<GemNode>>, power: i32, quantity: u32) {
        match slot {
            None => *slot = Some(Box::new(GemNode::new(power, quantity))),
            Some(node) => {
                if power < node.power {
                    Self::insert_node(&mut node.left, power, quantity);
                } else if power > node.power {
                    Self::insert_node(&mut node.right, power, quantity);
                } else {
                    node.quantity = node.quantity.saturating_add(quantity);
                }
            }
        }
    }

    /// Finds the node holding `power`.
    pub fn search(&self, power: i32) -> Option<&GemNode> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if power == node.power {
                return Some(node);
            }
            current = if power < node.power {
                node.left.as_deref()
            } else {
                node.right.as_deref()
            };
        }
        None
    }

    /// Removes `quantity` gems of `power`.
    ///
    /// If the node holds more than requested it is decremented in place;
    /// otherwise the whole node is removed. Deleting an absent power is a no-op.
    pub fn delete(&mut self, power: i32, quantity: u32) {
        self.root = Self::delete_node(self.root.take(), power, quantity);
        self.debug_check_invariants();
    }

    fn delete_node(
        slot: Option<Box<GemNode>>,
        power: i32,
        quantity: u32,
    ) -> Option<Box<GemNode>> {
        let mut node = slot?;

        if power < node.power {
            node.left = Self::delete_node(node.left.take(), power, quantity);
            return Some(node);
        }
        if power > node.power {
            node.right = Self::delete_node(node.right.take(), power, quantity);
            return Some(node);
        }

        if node.quantity > quantity {
            node.quantity -= quantity;
            return Some(node);
        }

        match (node.left.take(), node.right.take()) {
            (None, None) => None,
            (Some(left), None) => Some(left),
            (None, Some(right)) => Some(right),
            (Some(left), Some(right)) => {
                let (successor_power, successor_quantity) = {
                    let successor = Self::leftmost(&right);
                    (successor.power, successor.quantity)
                };
                node.power = successor_power;
                node.quantity = successor_quantity;
                node.left = Some(left);
                node.right = Self::delete_node(Some(right), successor_power, successor_quantity);
                Some(node)
            }
        }
    }

    fn leftmost(node: &GemNode) -> &GemNode {
        let mut current = node;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        current
    }

    fn rightmost(node: &GemNode) -> &GemNode {
        let mut current = node;
        while let Some(right) = current.right.as_deref() {
            current = right;
        }
        current
    }

    /// Nodes in ascending power order.
    pub fn inorder(&self) -> Vec<&GemNode> {
        let mut nodes = Vec::new();
        Self::inorder_collect(self.root.as_deref(), &mut nodes);
        nodes
    }

    fn inorder_collect<'a>(node: Option<&'a GemNode>, nodes: &mut Vec<&'a GemNode>) {
        if let Some(node) = node {
            Self::inorder_collect(node.left.as_deref(), nodes);
            nodes.push(node);
            Self::inorder_collect(node.right.as_deref(), nodes);
        }
    }

    /// `"power;quantity"` records in pre-order (parent, left, right).
    ///
    /// This is the persisted form of the inventory.
    pub fn preorder(&self) -> Vec<String> {
        let mut records = Vec::new();
        Self::preorder_collect(self.root.as_deref(), &mut records);
        records
    }

    fn preorder_collect(node: Option<&GemNode>, records: &mut Vec<String>) {
        if let Some(node) = node {
            records.push(format!("{};{}", node.power, node.quantity));
            Self::preorder_collect(node.left.as_deref(), records);
            Self::preorder_collect(node.right.as_deref(), records);
        }
    }

    /// Node with the smallest power.
    pub fn min_value(&self) -> Option<&GemNode> {
        self.root.as_deref().map(Self::leftmost)
    }

    /// Node with the largest power.
    pub fn max_value(&self) -> Option<&GemNode> {
        self.root.as_deref().map(Self::rightmost)
    }

    /// Node with the smallest power strictly greater than `power`.
    pub fn successor(&self, power: i32) -> Option<&GemNode> {
        let mut best = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if power < node.power {
                best = Some(node);
                current = node.left.as_deref();
            } else {
                current = node.right.as_deref();
            }
        }
        best
    }

    /// Node with the largest power strictly smaller than `power`.
    pub fn predecessor(&self, power: i32) -> Option<&GemNode> {
        let mut best = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if power > node.power {
                best = Some(node);
                current = node.right.as_deref();
            } else {
                current = node.left.as_deref();
            }
        }
        best
    }

    /// `(power, quantity)` pairs in ascending power order.
    pub fn entries(&self) -> Vec<(i32, u32)> {
        self.inorder()
            .into_iter()
            .map(|node| (node.power, node.quantity))
            .collect()
    }

    /// Number of distinct powers held.
    pub fn len(&self) -> usize {
        self.inorder().len()
    }

    /// Whether no gems are held.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of gems across all powers.
    pub fn total_quantity(&self) -> u64 {
        self.inorder()
            .into_iter()
            .map(|node| u64::from(node.quantity))
            .sum()
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Human readable listing, one `"<Name> × <qty>"` line per power.
    pub fn summary(&self) -> String {
        let nodes = self.inorder();
        if nodes.is_empty() {
            return "Empty inventory".to_string();
        }
        nodes
            .iter()
            .map(|node| format!("{} × {}", node.name(), node.quantity))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Checks ordering and positive quantities across the whole tree.
    pub fn is_valid(&self) -> bool {
        fn check(node: Option<&GemNode>, low: Option<i32>, high: Option<i32>) -> bool {
            match node {
                None => true,
                Some(node) => {
                    node.quantity > 0
                        && low.map_or(true, |low| node.power > low)
                        && high.map_or(true, |high| node.power < high)
                        && check(node.left.as_deref(), low, Some(node.power))
                        && check(node.right.as_deref(), Some(node.power), high)
                }
            }
        }
        check(self.root.as_deref(), None, None)
    }

    fn debug_check_invariants(&self) {
        debug_assert!(self.is_valid(), "inventory tree invariant violated");
    }
}

impl GemStore for Inventory {
    fn quantity_of(&self, power: i32) -> u32 {
        self.search(power).map(GemNode::quantity).unwrap_or(0)
    }

    fn add_gems(&mut self, power: i32, quantity: u32) {
        self.insert(power, quantity);
    }

    fn remove_gems(&mut self, power: i32, quantity: u32) {
        self.delete(power, quantity);
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
