//! Difficulty curve
//!
//! Pure mapping from level to spawn/lifetime/size parameters. The active
//! parameters are cached in [`super::GameState`] and only refreshed on
//! session start and level-up, so bubbles already on screen keep the values
//! they were spawned with.

use serde::{Deserialize, Serialize};

/// Spawn interval never drops below this (seconds)
pub const MIN_SPAWN_INTERVAL: f32 = 0.7;
/// Bubble lifetime never drops below this (seconds)
pub const MIN_LIFETIME: f32 = 2.5;
/// Hard cap on concurrently visible bubbles
pub const MAX_CONCURRENT_CAP: usize = 8;
/// Smallest bubble radius at any level
pub const MIN_RADIUS_FLOOR: f32 = 25.0;
/// Spread between the smallest and largest bubble of a level
pub const RADIUS_SPREAD: f32 = 20.0;

/// Parameters derived from the current level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Minimum seconds between spawns
    pub spawn_interval: f32,
    /// Spawning stops while this many bubbles are alive
    pub max_concurrent: usize,
    /// Seconds a bubble stays alive before it counts as missed
    pub lifetime: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl DifficultyParams {
    /// Parameters for `level` (levels below 1 are treated as 1)
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let steps = (level - 1) as f32;

        let min_radius = (45.0 - steps).max(MIN_RADIUS_FLOOR);

        Self {
            spawn_interval: (2.0 - steps * 0.12).max(MIN_SPAWN_INTERVAL),
            max_concurrent: (2 + (level / 2) as usize).min(MAX_CONCURRENT_CAP),
            lifetime: (5.5 - steps * 0.18).max(MIN_LIFETIME),
            min_radius,
            max_radius: min_radius + RADIUS_SPREAD,
        }
    }
}

impl Default for DifficultyParams {
    fn default() -> Self {
        Self::for_level(1)
    }
}

/// Shorthand for [`DifficultyParams::for_level`]
#[inline]
pub fn parameters_for(level: u32) -> DifficultyParams {
    DifficultyParams::for_level(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_one() {
        let p = parameters_for(1);
        assert!((p.spawn_interval - 2.0).abs() < 1e-6);
        assert_eq!(p.max_concurrent, 2);
        assert!((p.lifetime - 5.5).abs() < 1e-6);
        assert!((p.min_radius - 45.0).abs() < 1e-6);
        assert!((p.max_radius - 65.0).abs() < 1e-6);
    }

    #[test]
    fn test_level_zero_clamps_to_one() {
        assert_eq!(parameters_for(0), parameters_for(1));
    }

    #[test]
    fn test_floors_and_ceilings() {
        let p = parameters_for(100);
        assert!((p.spawn_interval - MIN_SPAWN_INTERVAL).abs() < 1e-6);
        assert!((p.lifetime - MIN_LIFETIME).abs() < 1e-6);
        assert_eq!(p.max_concurrent, MAX_CONCURRENT_CAP);
        assert!((p.min_radius - MIN_RADIUS_FLOOR).abs() < 1e-6);
        assert!((p.max_radius - 45.0).abs() < 1e-6);
    }

    #[test]
    fn test_capacity_steps_every_other_level() {
        let caps: Vec<usize> = (1..=5).map(|l| parameters_for(l).max_concurrent).collect();
        assert_eq!(caps, vec![2, 3, 3, 4, 4]);
    }

    proptest! {
        #[test]
        fn prop_bounds_hold(level in 1u32..10_000) {
            let p = parameters_for(level);
            prop_assert!(p.spawn_interval >= MIN_SPAWN_INTERVAL);
            prop_assert!(p.lifetime >= MIN_LIFETIME);
            prop_assert!(p.max_concurrent <= MAX_CONCURRENT_CAP);
            prop_assert!(p.min_radius >= MIN_RADIUS_FLOOR);
            prop_assert!((p.max_radius - p.min_radius - RADIUS_SPREAD).abs() < 1e-4);
        }

        #[test]
        fn prop_monotonic(level in 1u32..10_000) {
            let a = parameters_for(level);
            let b = parameters_for(level + 1);
            prop_assert!(b.spawn_interval <= a.spawn_interval);
            prop_assert!(b.lifetime <= a.lifetime);
            prop_assert!(b.min_radius <= a.min_radius);
            prop_assert!(b.max_radius <= a.max_radius);
            prop_assert!(b.max_concurrent >= a.max_concurrent);
        }
    }
}
