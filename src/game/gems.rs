//! # Gem Tiers
//!
//! The fixed table of gem kinds. A gem is identified everywhere by its integer
//! power; names and colours are presentation data looked up from here.

use serde::Serialize;

/// A single row of the gem tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GemTier {
    /// Power value, also the inventory key
    pub power: i32,
    /// Display name
    pub name: &'static str,
    /// Display colour as RGB
    pub color: (u8, u8, u8),
}

/// Power of the Obsidian tier, the currency portals ask for.
pub const OBSIDIAN_POWER: i32 = 50;

/// Every known tier, ascending by power.
pub const GEM_TIERS: [GemTier; 6] = [
    GemTier { power: 5, name: "Aquamarine", color: (0, 255, 255) },
    GemTier { power: 10, name: "Emerald", color: (0, 255, 0) },
    GemTier { power: 15, name: "Topaz", color: (255, 255, 0) },
    GemTier { power: 20, name: "Amber", color: (255, 165, 0) },
    GemTier { power: 30, name: "Ruby", color: (255, 0, 0) },
    GemTier { power: OBSIDIAN_POWER, name: "Obsidian", color: (80, 40, 120) },
];

/// Powers that can be found lying on grass. Obsidian only comes from chests.
pub const GROUND_GEM_POWERS: [i32; 5] = [5, 10, 15, 20, 30];

const UNKNOWN_GEM_COLOR: (u8, u8, u8) = (255, 255, 255);

/// Looks up the tier for a power.
pub fn gem_tier(power: i32) -> Option<&'static GemTier> {
    GEM_TIERS.iter().find(|tier| tier.power == power)
}

/// Display name for a power, falling back to `"Gem <power>"`.
///
/// # Examples
///
/// ```
/// use thicket::gem_name;
///
/// assert_eq!(gem_name(50), "Obsidian");
/// assert_eq!(gem_name(7), "Gem 7");
/// ```
pub fn gem_name(power: i32) -> String {
    gem_tier(power)
        .map(|tier| tier.name.to_string())
        .unwrap_or_else(|| format!("Gem {}", power))
}

/// Display colour for a power; unknown powers are white.
pub fn gem_color(power: i32) -> (u8, u8, u8) {
    gem_tier(power)
        .map(|tier| tier.color)
        .unwrap_or(UNKNOWN_GEM_COLOR)
}

/// Lowest power in the tier table.
pub fn lowest_tier_power() -> i32 {
    GEM_TIERS[0].power
}
