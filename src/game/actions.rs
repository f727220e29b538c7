//! # Player Actions
//!
//! Movement, gem pickup, and the chest and portal protocols.
//!
//! Every action reports back through a plain value ([`MoveOutcome`] or
//! [`ActionOutcome`]); running out of gems or bumping into a tree is normal
//! gameplay, not an error.

use crate::game::entities::pay_cost;
use crate::game::gems::gem_name;
use crate::game::{ChestLike, GemCost, LootEntry, Player, Portal, Position, TileMap, WorldMap};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the player deals with a revealed mimic. An unanswered decision pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MimicChoice {
    Fight,
    #[default]
    Pay,
}

/// Result class of a chest or portal interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    Success,
    Failure,
    /// A mimic showed itself; call the mimic resolution next
    MimicDecisionPending,
    PlayerDied,
}

/// What happened, a message for the player, and any gems handed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub status: ActionStatus,
    pub message: String,
    pub items: Vec<LootEntry>,
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>, items: Vec<LootEntry>) -> Self {
        Self {
            status: ActionStatus::Success,
            message: message.into(),
            items,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::with_status(ActionStatus::Failure, message)
    }

    pub fn mimic_pending(message: impl Into<String>) -> Self {
        Self::with_status(ActionStatus::MimicDecisionPending, message)
    }

    pub fn died(message: impl Into<String>) -> Self {
        Self::with_status(ActionStatus::PlayerDied, message)
    }

    fn with_status(status: ActionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            items: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }

    pub fn is_failure(&self) -> bool {
        self.status == ActionStatus::Failure
    }
}

/// Result of a movement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(Position),
    Blocked,
    PlayerDead,
}

/// Moves the player by `(dx, dy)` unless the destination is blocked.
///
/// After a successful step the 3×3 chunk block around the new position is
/// generated so the surroundings are ready before they come into view.
pub fn move_player<M: TileMap + ?Sized>(map: &mut M, player: &mut Player, dx: i32, dy: i32) -> MoveOutcome {
    if !player.is_alive() {
        return MoveOutcome::PlayerDead;
    }

    let target = player.position + Position::new(dx, dy);
    if map.is_blocked(target.x, target.y) {
        return MoveOutcome::Blocked;
    }

    player.position = target;
    map.ensure_area(target.x, target.y);
    MoveOutcome::Moved(target)
}

/// Picks up the gem under the player, if any. Returns its power.
pub fn collect_gem<M: TileMap + ?Sized>(map: &mut M, player: &mut Player) -> Option<i32> {
    if !player.is_alive() {
        return None;
    }
    let power = map.collect_gem(player.position.x, player.position.y)?;
    player.inventory.insert(power, 1);
    debug!("Picked up {} at ({}, {})", gem_name(power), player.position.x, player.position.y);
    Some(power)
}

fn transfer_loot(chest: &mut dyn ChestLike, player: &mut Player) -> Vec<LootEntry> {
    let items = chest.contents().to_vec();
    for item in &items {
        player.inventory.insert(item.power, item.quantity);
    }
    chest.mark_opened();
    items
}

fn describe_cost(cost: &GemCost) -> String {
    cost.iter()
        .map(|(&power, quantity)| format!("{} {}", quantity, gem_name(power)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// First step of opening a chest.
///
/// Pays the open cost and hands over the loot, or reveals a mimic and leaves
/// the decision to [`resolve_mimic`]. A mimic that was already revealed
/// reports the pending decision again without charging twice.
pub fn open_chest(chest: &mut dyn ChestLike, player: &mut Player) -> ActionOutcome {
    if chest.is_opened() {
        return ActionOutcome::failure("Chest already opened");
    }
    if chest.is_mimic_revealed() {
        return ActionOutcome::mimic_pending("The mimic is still waiting for your decision");
    }
    if !chest.can_open(&player.inventory, false) {
        return ActionOutcome::failure("Not enough gems to open");
    }

    let cost = chest.open_cost().clone();
    pay_cost(&mut player.inventory, &cost);

    if chest.is_mimic() {
        chest.mark_mimic_revealed();
        return ActionOutcome::mimic_pending(format!(
            "It's a mimic! Fight it, or pay {} to escape",
            describe_cost(chest.mimic_cost())
        ));
    }

    let items = transfer_loot(chest, player);
    ActionOutcome::success(format!("Obtained {} gem types", items.len()), items)
}

/// Settles a revealed mimic.
///
/// Fighting kills the player with probability `death_chance`; otherwise the
/// loot is taken. Paying hands over the mimic toll and takes the loot, or
/// kills the player who cannot afford it. The chest ends opened either way.
pub fn resolve_mimic<R: Rng + ?Sized>(
    chest: &mut dyn ChestLike,
    player: &mut Player,
    choice: MimicChoice,
    death_chance: f64,
    rng: &mut R,
) -> ActionOutcome {
    if chest.is_opened() {
        return ActionOutcome::failure("Chest already opened");
    }
    if !chest.is_mimic_revealed() {
        return ActionOutcome::failure("No mimic is waiting for a decision");
    }

    match choice {
        MimicChoice::Fight => {
            if rng.gen::<f64>() < death_chance {
                chest.mark_opened();
                player.die();
                ActionOutcome::died("You fought the mimic and were devoured!")
            } else {
                let items = transfer_loot(chest, player);
                ActionOutcome::success(
                    format!("You fought the mimic and obtained {} gem types!", items.len()),
                    items,
                )
            }
        }
        MimicChoice::Pay => {
            if chest.can_open(&player.inventory, true) {
                let toll = chest.mimic_cost().clone();
                pay_cost(&mut player.inventory, &toll);
                let items = transfer_loot(chest, player);
                ActionOutcome::success(
                    format!("You paid {} to the mimic and survived!", describe_cost(&toll)),
                    items,
                )
            } else {
                chest.mark_opened();
                player.die();
                ActionOutcome::died("Mimic attacked! You died.")
            }
        }
    }
}

/// Tries to activate a portal with the player's Obsidian.
pub fn activate_portal(portal: &mut Portal, player: &mut Player) -> ActionOutcome {
    if portal.is_activated() {
        return ActionOutcome::failure("The portal is already activated.");
    }
    if !portal.activate(&mut player.inventory) {
        return ActionOutcome::failure("You don't have enough obsidian gems to activate the portal.");
    }
    ActionOutcome::success("Portal activated successfully!", Vec::new())
}

/// Opens the first chest found in the 3×3 block around the player.
///
/// Returns the chest's position alongside the outcome so a pending mimic can
/// be resolved through [`WorldMap::resolve_mimic`].
pub fn interact_with_chest(map: &mut WorldMap, player: &mut Player) -> Option<(Position, ActionOutcome)> {
    if !player.is_alive() {
        return None;
    }
    let at = player.position.neighborhood().into_iter().find(|cell| map.get_chest(cell.x, cell.y).is_some())?;
    let outcome = map.open_chest(at.x, at.y, player)?;
    debug!("Chest at ({}, {}): {:?}", at.x, at.y, outcome.status);
    Some((at, outcome))
}

/// Activates the first portal found in the 3×3 block around the player.
pub fn interact_with_portal(map: &mut WorldMap, player: &mut Player) -> ActionOutcome {
    if !player.is_alive() {
        return ActionOutcome::failure("Player is not active");
    }
    let found = player.position.neighborhood().into_iter().find(|cell| map.get_portal(cell.x, cell.y).is_some());
    match found.and_then(|at| map.activate_portal(at.x, at.y, player)) {
        Some(outcome) => outcome,
        None => ActionOutcome::failure("No portal here"),
    }
}
