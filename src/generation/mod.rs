//! # Generation Module
//!
//! Procedural content generation for the endless forest: maze and clearing
//! chunks, chest loot, portals, and the managers that scatter entities over
//! freshly generated chunks.
//!
//! Every generator takes an explicit [`StdRng`] so that a seeded map produces
//! the same world for the same sequence of chunk requests.

pub mod chunks;
pub mod items;
pub mod maze;
pub mod placement;

pub use chunks::*;
pub use items::*;
pub use maze::*;
pub use placement::*;

use crate::config;
use crate::{ThicketError, ThicketResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for procedural generation.
///
/// Controls chunk geometry, archetype mix, entity densities, and the odds
/// used by chest, mimic, and thief encounters. Fields missing from a JSON
/// document fall back to [`GenerationConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Requested chunk side length; even values are bumped to the next odd
    pub chunk_size: usize,
    /// Inclusive range of corridor widths
    pub path_width_range: (u32, u32),
    /// Number of tree sprite variants
    pub num_tree_variants: u8,
    /// Probability that a chunk is a clearing rather than a maze (0.0 to 1.0)
    pub clearing_probability: f64,
    /// Per grass cell probability of a gem (0.0 to 1.0)
    pub gem_probability: f64,
    /// Per clear cell probability of a chest (0.0 to 1.0)
    pub chest_probability: f64,
    /// Whether chests need a fully clear 3×3 neighbourhood
    pub require_clear_neighborhood: bool,
    /// Base drop probability of a gem tier inside a chest (0.0 to 1.0)
    pub drop_probability: f64,
    /// Probability that a chest is large (0.0 to 1.0)
    pub large_chest_probability: f64,
    /// Probability that a chest is a mimic (0.0 to 1.0)
    pub mimic_probability: f64,
    /// Probability that a chunk receives a portal (0.0 to 1.0)
    pub portal_probability: f64,
    /// Random attempts of the maze braiding pass
    pub extra_path_attempts: u32,
    /// Chance of dying when fighting a mimic (0.0 to 1.0)
    pub mimic_fight_death_chance: f64,
    /// Chance of dying when fighting a thief (0.0 to 1.0)
    pub thief_fight_death_chance: f64,
}

impl GenerationConfig {
    /// Creates the standard configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use thicket::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!(config.seed, 12345);
    /// assert_eq!(config.effective_chunk_size(), 21);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            chunk_size: config::DEFAULT_CHUNK_SIZE,
            path_width_range: config::DEFAULT_PATH_WIDTH_RANGE,
            num_tree_variants: config::DEFAULT_TREE_VARIANTS,
            clearing_probability: 0.3,
            gem_probability: 0.005,
            chest_probability: 0.005,
            require_clear_neighborhood: false,
            drop_probability: 0.5,
            large_chest_probability: 0.05,
            // Balance parameter: most chests are mimics in the current ruleset.
            mimic_probability: 0.9,
            portal_probability: 1.0,
            extra_path_attempts: config::EXTRA_PATH_ATTEMPTS,
            mimic_fight_death_chance: 0.9,
            thief_fight_death_chance: 0.5,
        }
    }

    /// Creates the older ruleset: fewer clearings, rare chests that need a
    /// clear 3×3 area, fewer mimics, and no portals.
    pub fn legacy(seed: u64) -> Self {
        Self {
            clearing_probability: 0.2,
            chest_probability: 0.0005,
            require_clear_neighborhood: true,
            mimic_probability: 0.4,
            portal_probability: 0.0,
            ..Self::new(seed)
        }
    }

    /// Creates a configuration for testing with small chunks and dense entities.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            chunk_size: 11,
            gem_probability: 0.05,
            chest_probability: 0.05,
            ..Self::new(seed)
        }
    }

    /// Loads a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> ThicketResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ThicketResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Chunk side length actually used: `chunk_size` rounded up to odd.
    pub fn effective_chunk_size(&self) -> usize {
        if self.chunk_size % 2 == 0 {
            self.chunk_size + 1
        } else {
            self.chunk_size
        }
    }

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Checks that every value is usable by the generators.
    pub fn validate(&self) -> ThicketResult<()> {
        if self.chunk_size < config::MIN_CHUNK_SIZE {
            return Err(ThicketError::InvalidConfig(format!(
                "chunk_size must be at least {}, got {}",
                config::MIN_CHUNK_SIZE,
                self.chunk_size
            )));
        }

        let (min_width, max_width) = self.path_width_range;
        if min_width == 0 || min_width > max_width {
            return Err(ThicketError::InvalidConfig(format!(
                "path_width_range must be a non-empty range of positive widths, got ({}, {})",
                min_width, max_width
            )));
        }

        if self.num_tree_variants == 0 {
            return Err(ThicketError::InvalidConfig(
                "num_tree_variants must be at least 1".to_string(),
            ));
        }

        let probabilities = [
            ("clearing_probability", self.clearing_probability),
            ("gem_probability", self.gem_probability),
            ("chest_probability", self.chest_probability),
            ("drop_probability", self.drop_probability),
            ("large_chest_probability", self.large_chest_probability),
            ("mimic_probability", self.mimic_probability),
            ("portal_probability", self.portal_probability),
            ("mimic_fight_death_chance", self.mimic_fight_death_chance),
            ("thief_fight_death_chance", self.thief_fight_death_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ThicketError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// Item-level generators (loot, chests, portals, standalone maze chunks)
/// implement this trait so they share one calling convention.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> ThicketResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> ThicketResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.clearing_probability, 0.3);
        assert_eq!(config.mimic_probability, 0.9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        let legacy = GenerationConfig::legacy(1);
        assert!(legacy.validate().is_ok());
        assert!(legacy.require_clear_neighborhood);
        assert_eq!(legacy.chest_probability, 0.0005);

        let testing = GenerationConfig::for_testing(1);
        assert!(testing.validate().is_ok());
        assert_eq!(testing.effective_chunk_size(), 11);
    }

    #[test]
    fn test_even_chunk_size_is_bumped() {
        let config = GenerationConfig {
            chunk_size: 20,
            ..GenerationConfig::default()
        };
        assert_eq!(config.effective_chunk_size(), 21);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let small = GenerationConfig {
            chunk_size: 4,
            ..GenerationConfig::default()
        };
        assert!(matches!(small.validate(), Err(ThicketError::InvalidConfig(_))));

        let bad_probability = GenerationConfig {
            gem_probability: 1.5,
            ..GenerationConfig::default()
        };
        assert!(bad_probability.validate().is_err());

        let empty_range = GenerationConfig {
            path_width_range: (3, 2),
            ..GenerationConfig::default()
        };
        assert!(empty_range.validate().is_err());

        let zero_width = GenerationConfig {
            path_width_range: (0, 2),
            ..GenerationConfig::default()
        };
        assert!(zero_width.validate().is_err());
    }

    #[test]
    fn test_json_partial_document_uses_defaults() {
        let config = GenerationConfig::from_json_str(r#"{"seed": 7, "chunk_size": 15}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.chunk_size, 15);
        assert_eq!(config.portal_probability, 1.0);

        let invalid = GenerationConfig::from_json_str(r#"{"mimic_probability": -0.1}"#);
        assert!(matches!(invalid, Err(ThicketError::InvalidConfig(_))));

        let garbage = GenerationConfig::from_json_str("not json");
        assert!(matches!(garbage, Err(ThicketError::Serde(_))));
    }

    #[test]
    fn test_rng_is_seeded() {
        let config = GenerationConfig::new(99);
        let a: u64 = config.create_rng().gen();
        let b: u64 = config.create_rng().gen();
        assert_eq!(a, b);
    }
}
