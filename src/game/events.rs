//! # Random Events
//!
//! Thieves and traps that take gems from the player.

use crate::game::gems::{gem_name, GEM_TIERS};
use crate::game::{Inventory, LootEntry, Player};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Largest stack a thief asks for.
const THIEF_MAX_DEMAND: u32 = 3;

/// The player's answer to a thief. An unanswered demand counts as paying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThiefChoice {
    Fight,
    #[default]
    Pay,
}

/// Gems a thief asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThiefDemand {
    pub power: i32,
    pub quantity: u32,
}

impl ThiefDemand {
    /// A random tier and a quantity in `1..=3`.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let power = GEM_TIERS.choose(rng).map_or(GEM_TIERS[0].power, |tier| tier.power);
        Self {
            power,
            quantity: rng.gen_range(1..=THIEF_MAX_DEMAND),
        }
    }

    pub fn describe(&self) -> String {
        format!("A thief appears! He asks for {} of {}.", self.quantity, gem_name(self.power))
    }
}

/// How a thief encounter ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThiefOutcome {
    /// The player handed over these gems
    Paid(LootEntry),
    FightWon,
    Killed,
}

/// Settles a thief encounter.
///
/// Paying gives up `min(demand, held)` of the demanded power. Without that
/// power the thief settles for a random amount of the nearest lower power,
/// then of the nearest higher one. A player with nothing to give has to
/// fight, and a fight is lost with probability `death_chance`.
pub fn resolve_thief<R: Rng + ?Sized>(
    demand: ThiefDemand,
    player: &mut Player,
    choice: ThiefChoice,
    death_chance: f64,
    rng: &mut R,
) -> ThiefOutcome {
    if choice == ThiefChoice::Pay {
        if let Some(paid) = pay_thief(demand, &mut player.inventory, rng) {
            debug!("Thief took {} × {}", paid.name, paid.quantity);
            return ThiefOutcome::Paid(paid);
        }
    }

    if rng.gen::<f64>() < death_chance {
        player.die();
        ThiefOutcome::Killed
    } else {
        ThiefOutcome::FightWon
    }
}

fn pay_thief<R: Rng + ?Sized>(demand: ThiefDemand, inventory: &mut Inventory, rng: &mut R) -> Option<LootEntry> {
    let (power, quantity) = if let Some(node) = inventory.search(demand.power) {
        (node.power(), demand.quantity.min(node.quantity()))
    } else {
        let fallback = inventory
            .predecessor(demand.power)
            .or_else(|| inventory.successor(demand.power))?;
        (fallback.power(), rng.gen_range(1..=fallback.quantity()))
    };

    inventory.delete(power, quantity);
    Some(LootEntry::new(power, quantity))
}

/// Springs a trap: a random held power loses `1..=held` gems.
///
/// Returns what was lost, or `None` when the inventory is empty.
pub fn trigger_trap<R: Rng + ?Sized>(inventory: &mut Inventory, rng: &mut R) -> Option<LootEntry> {
    let (power, held) = {
        let node = inventory.inorder().choose(rng).copied()?;
        (node.power(), node.quantity())
    };
    let lost = rng.gen_range(1..=held);
    inventory.delete(power, lost);
    debug!("Trap took {} × {}", gem_name(power), lost);
    Some(LootEntry::new(power, lost))
}
