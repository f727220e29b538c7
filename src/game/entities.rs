//! # Entities
//!
//! Interactive objects layered on top of the tile grid (chests and portals)
//! and the player who pays for them.

use crate::game::gems::{gem_name, OBSIDIAN_POWER};
use crate::game::inventory::{GemStore, Inventory};
use crate::game::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gems demanded by a chest or portal: power → quantity.
pub type GemCost = BTreeMap<i32, u32>;

/// One stack of gems inside a chest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootEntry {
    pub power: i32,
    pub name: String,
    pub quantity: u32,
}

impl LootEntry {
    /// Creates a loot entry, naming it from the tier table.
    pub fn new(power: i32, quantity: u32) -> Self {
        Self {
            power,
            name: gem_name(power),
            quantity,
        }
    }
}

fn covers(store: &dyn GemStore, cost: &GemCost) -> bool {
    cost.iter()
        .all(|(&power, &quantity)| store.quantity_of(power) >= quantity)
}

/// Pays `cost` out of `store`. Callers check affordability first.
pub(crate) fn pay_cost(store: &mut dyn GemStore, cost: &GemCost) {
    for (&power, &quantity) in cost {
        store.remove_gems(power, quantity);
    }
}

/// The surface interaction code needs from a chest.
pub trait ChestLike {
    fn is_opened(&self) -> bool;
    fn open_cost(&self) -> &GemCost;
    fn mimic_cost(&self) -> &GemCost;
    fn is_mimic(&self) -> bool;
    fn is_large(&self) -> bool;
    fn contents(&self) -> &[LootEntry];
    fn mark_opened(&mut self);

    /// Whether a mimic's open cost has been paid and its decision is pending.
    fn is_mimic_revealed(&self) -> bool;
    fn mark_mimic_revealed(&mut self);

    /// Whether `store` can pay the open cost, or the mimic toll when
    /// `mimic_phase` is set on a mimic.
    fn can_open(&self, store: &dyn GemStore, mimic_phase: bool) -> bool {
        let cost = if mimic_phase && self.is_mimic() {
            self.mimic_cost()
        } else {
            self.open_cost()
        };
        covers(store, cost)
    }
}

/// A chest sitting on a clearing tile.
///
/// Chests are never removed from the map; once opened they stay in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chest {
    opened: bool,
    contents: Vec<LootEntry>,
    open_cost: GemCost,
    mimic_cost: GemCost,
    is_mimic: bool,
    is_large: bool,
    mimic_revealed: bool,
}

impl Chest {
    /// Creates an unopened chest. `mimic_cost` is ignored for non-mimics.
    pub fn new(
        contents: Vec<LootEntry>,
        open_cost: GemCost,
        mimic_cost: GemCost,
        is_mimic: bool,
        is_large: bool,
    ) -> Self {
        Self {
            opened: false,
            contents,
            open_cost,
            mimic_cost: if is_mimic { mimic_cost } else { GemCost::new() },
            is_mimic,
            is_large,
            mimic_revealed: false,
        }
    }
}

impl ChestLike for Chest {
    fn is_opened(&self) -> bool {
        self.opened
    }

    fn open_cost(&self) -> &GemCost {
        &self.open_cost
    }

    fn mimic_cost(&self) -> &GemCost {
        &self.mimic_cost
    }

    fn is_mimic(&self) -> bool {
        self.is_mimic
    }

    fn is_large(&self) -> bool {
        self.is_large
    }

    fn contents(&self) -> &[LootEntry] {
        &self.contents
    }

    fn mark_opened(&mut self) {
        self.opened = true;
    }

    fn is_mimic_revealed(&self) -> bool {
        self.mimic_revealed
    }

    fn mark_mimic_revealed(&mut self) {
        if self.is_mimic {
            self.mimic_revealed = true;
        }
    }
}

/// The exit portal. Activating one finishes the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    activated: bool,
    activation_cost: GemCost,
}

impl Portal {
    /// Creates a portal asking for `required` Obsidian gems.
    pub fn new(required: u32) -> Self {
        Self {
            activated: false,
            activation_cost: GemCost::from([(OBSIDIAN_POWER, required)]),
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn activation_cost(&self) -> &GemCost {
        &self.activation_cost
    }

    /// Whether `store` holds enough Obsidian.
    pub fn can_activate(&self, store: &dyn GemStore) -> bool {
        covers(store, &self.activation_cost)
    }

    /// Pays the cost and activates. Returns `false`, touching nothing, when
    /// the store can't pay or the portal is already active.
    pub fn activate(&mut self, store: &mut dyn GemStore) -> bool {
        if self.activated || !self.can_activate(store) {
            return false;
        }
        pay_cost(store, &self.activation_cost);
        self.activated = true;
        true
    }
}

/// The explorer. Owns its inventory exclusively.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Position,
    alive: bool,
    pub inventory: Inventory,
}

impl Player {
    /// Creates a living player with an empty inventory.
    pub fn new(position: Position) -> Self {
        Self::with_inventory(position, Inventory::new())
    }

    /// Creates a living player carrying `inventory`.
    pub fn with_inventory(position: Position, inventory: Inventory) -> Self {
        Self {
            position,
            alive: true,
            inventory,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Kills the player. Irreversible.
    pub fn die(&mut self) {
        self.alive = false;
    }
}
