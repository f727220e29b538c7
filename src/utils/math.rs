//! # Game Mathematics
//!
//! Small numeric rules shared by loot and cost generation.

/// Scales a gem quantity by `factor`, rounding to nearest and never going below 1.
///
/// # Examples
///
/// ```
/// use thicket::scaled_cost;
///
/// assert_eq!(scaled_cost(4, 0.5), 2);
/// assert_eq!(scaled_cost(3, 0.5), 2); // 1.5 rounds away from zero
/// assert_eq!(scaled_cost(1, 0.1), 1);
/// ```
pub fn scaled_cost(quantity: u32, factor: f64) -> u32 {
    let scaled = (f64::from(quantity) * factor).round();
    if scaled < 1.0 {
        1
    } else {
        scaled as u32
    }
}

/// Chance that a tier drops into a chest: rarer (higher power) tiers drop
/// proportionally less often.
pub fn tier_drop_chance(drop_probability: f64, lowest_power: i32, power: i32) -> f64 {
    if power <= 0 {
        return 0.0;
    }
    (drop_probability * f64::from(lowest_power) / f64::from(power)).clamp(0.0, 1.0)
}

/// Largest stack a tier can drop in: `max(1, 5 * lowest / power)`.
pub fn tier_max_quantity(lowest_power: i32, power: i32) -> u32 {
    if power <= 0 {
        return 1;
    }
    (5 * lowest_power / power).max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_cost_rounding() {
        assert_eq!(scaled_cost(10, 0.8), 8);
        assert_eq!(scaled_cost(5, 1.5), 8);
        assert_eq!(scaled_cost(5, 0.05), 1);
        assert_eq!(scaled_cost(0, 2.0), 1);
    }

    #[test]
    fn test_drop_chance_scales_with_power() {
        assert_eq!(tier_drop_chance(0.5, 5, 5), 0.5);
        assert_eq!(tier_drop_chance(0.5, 5, 10), 0.25);
        assert!(tier_drop_chance(0.5, 5, 50) < tier_drop_chance(0.5, 5, 30));
        assert_eq!(tier_drop_chance(0.5, 5, 0), 0.0);
    }

    #[test]
    fn test_max_quantity_table() {
        let maxima: Vec<u32> = [5, 10, 15, 20, 30, 50]
            .iter()
            .map(|&power| tier_max_quantity(5, power))
            .collect();
        assert_eq!(maxima, vec![5, 2, 1, 1, 1, 1]);
    }
}
