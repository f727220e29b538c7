//! # Item Generation
//!
//! Chest loot, chest costs, and portal generation.
//!
//! Loot rolls over the full gem tier table with drop chances and stack sizes
//! that shrink as gem power grows. Chest costs are derived from the chest's
//! own loot so a chest never asks for wildly more than it holds.

use crate::config;
use crate::game::gems::{lowest_tier_power, GEM_TIERS};
use crate::game::{Chest, GemCost, LootEntry, Portal};
use crate::utils::math::{scaled_cost, tier_drop_chance, tier_max_quantity};
use crate::{GenerationConfig, Generator, ThicketError, ThicketResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Power and quantity used for the open cost of an empty chest.
const EMPTY_CHEST_OPEN_COST: (i32, u32) = (1, 1);
/// Power and quantity used for the mimic toll of an empty chest.
const EMPTY_CHEST_MIMIC_COST: (i32, u32) = (1, 2);

/// Rolls the gem stacks found inside a chest.
#[derive(Debug, Clone)]
pub struct LootGenerator {
    /// Drop chance of the lowest tier; higher tiers scale down from it
    pub drop_probability: f64,
}

impl LootGenerator {
    pub fn new(drop_probability: f64) -> Self {
        Self { drop_probability }
    }

    /// Rolls every tier independently; falls back to one random gem when
    /// nothing dropped, so the result is never empty.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> Vec<LootEntry> {
        let lowest = lowest_tier_power();
        let mut loot: Vec<LootEntry> = GEM_TIERS
            .iter()
            .filter_map(|tier| {
                let chance = tier_drop_chance(self.drop_probability, lowest, tier.power);
                if rng.gen::<f64>() < chance {
                    let max_quantity = tier_max_quantity(lowest, tier.power);
                    Some(LootEntry::new(tier.power, rng.gen_range(1..=max_quantity)))
                } else {
                    None
                }
            })
            .collect();

        if loot.is_empty() {
            if let Some(tier) = GEM_TIERS.choose(rng) {
                loot.push(LootEntry::new(tier.power, 1));
            }
        }
        loot
    }
}

impl Generator<Vec<LootEntry>> for LootGenerator {
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> ThicketResult<Vec<LootEntry>> {
        Ok(self.roll(rng))
    }

    fn validate(&self, loot: &Vec<LootEntry>, _config: &GenerationConfig) -> ThicketResult<()> {
        if loot.is_empty() {
            return Err(ThicketError::GenerationFailed("Chest loot is empty".to_string()));
        }
        if let Some(entry) = loot.iter().find(|entry| entry.quantity == 0) {
            return Err(ThicketError::GenerationFailed(format!(
                "Loot entry {} has zero quantity",
                entry.name
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "LootGenerator"
    }
}

/// Builds chests: loot, size, mimic status, and both costs.
#[derive(Debug, Clone)]
pub struct ChestFactory {
    pub loot: LootGenerator,
    pub large_chest_probability: f64,
    pub mimic_probability: f64,
}

impl ChestFactory {
    pub fn new(loot: LootGenerator, large_chest_probability: f64, mimic_probability: f64) -> Self {
        Self {
            loot,
            large_chest_probability,
            mimic_probability,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(
            LootGenerator::new(config.drop_probability),
            config.large_chest_probability,
            config.mimic_probability,
        )
    }

    /// Creates a chest, rolling mimic status unless `is_mimic` forces it.
    pub fn create_chest<R: Rng>(&self, is_mimic: Option<bool>, rng: &mut R) -> Chest {
        let is_mimic = is_mimic.unwrap_or_else(|| rng.gen::<f64>() < self.mimic_probability);
        let contents = self.loot.roll(rng);
        let is_large = rng.gen::<f64>() < self.large_chest_probability;
        Self::build_chest(contents, is_mimic, is_large, rng)
    }

    /// Prices a chest around the given contents.
    ///
    /// The open cost picks one loot entry and scales its quantity by
    /// `0.8..1.5` for large chests or `0.5..1.0` for small ones. A mimic's toll
    /// scales another pick by `1.5..2.5`.
    pub fn build_chest<R: Rng>(contents: Vec<LootEntry>, is_mimic: bool, is_large: bool, rng: &mut R) -> Chest {
        let open_factor = if is_large {
            rng.gen_range(0.8..1.5)
        } else {
            rng.gen_range(0.5..1.0)
        };
        let open_cost = Self::cost_from(&contents, open_factor, EMPTY_CHEST_OPEN_COST, rng);

        let mimic_cost = if is_mimic {
            let factor = rng.gen_range(1.5..2.5);
            Self::cost_from(&contents, factor, EMPTY_CHEST_MIMIC_COST, rng)
        } else {
            GemCost::new()
        };

        Chest::new(contents, open_cost, mimic_cost, is_mimic, is_large)
    }

    fn cost_from<R: Rng>(contents: &[LootEntry], factor: f64, fallback: (i32, u32), rng: &mut R) -> GemCost {
        match contents.choose(rng) {
            Some(entry) => GemCost::from([(entry.power, scaled_cost(entry.quantity, factor))]),
            None => GemCost::from([fallback]),
        }
    }
}

impl Generator<Chest> for ChestFactory {
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> ThicketResult<Chest> {
        Ok(self.create_chest(None, rng))
    }

    fn validate(&self, chest: &Chest, config: &GenerationConfig) -> ThicketResult<()> {
        use crate::game::ChestLike;

        if chest.open_cost().is_empty() || chest.open_cost().values().any(|&q| q == 0) {
            return Err(ThicketError::GenerationFailed(
                "Chest open cost must ask for at least one gem".to_string(),
            ));
        }
        if chest.is_mimic() == chest.mimic_cost().is_empty() {
            return Err(ThicketError::GenerationFailed(
                "Mimic toll must exist exactly for mimics".to_string(),
            ));
        }
        self.loot.validate(&chest.contents().to_vec(), config)
    }

    fn generator_type(&self) -> &'static str {
        "ChestFactory"
    }
}

/// Builds portals with a random Obsidian requirement.
#[derive(Debug, Clone)]
pub struct PortalFactory {
    /// Inclusive range of Obsidian gems demanded
    pub cost_range: (u32, u32),
}

impl PortalFactory {
    pub fn new(cost_range: (u32, u32)) -> Self {
        Self { cost_range }
    }

    pub fn create_portal<R: Rng>(&self, rng: &mut R) -> Portal {
        let (low, high) = self.cost_range;
        Portal::new(rng.gen_range(low..=high.max(low)))
    }
}

impl Default for PortalFactory {
    fn default() -> Self {
        Self::new(config::PORTAL_COST_RANGE)
    }
}

impl Generator<Portal> for PortalFactory {
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> ThicketResult<Portal> {
        Ok(self.create_portal(rng))
    }

    fn validate(&self, portal: &Portal, _config: &GenerationConfig) -> ThicketResult<()> {
        let (low, high) = self.cost_range;
        let in_range = portal
            .activation_cost()
            .values()
            .all(|quantity| (low..=high).contains(quantity));
        if portal.activation_cost().len() != 1 || !in_range {
            return Err(ThicketError::GenerationFailed(format!(
                "Portal cost {:?} outside {}..={}",
                portal.activation_cost(),
                low,
                high
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "PortalFactory"
    }
}
