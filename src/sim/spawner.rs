//! Rate-limited bubble creation
//!
//! A spawn happens when the interval has elapsed *and* the field has room.
//! Capacity failures are dropped, not queued, and the interval timer only
//! resets on a successful spawn, so a full field spawns again as soon as a
//! slot frees up.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::DifficultyParams;
use super::target::Target;

/// Owns the seeded RNG and the interval timer
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Seed the RNG was created from (for replay)
    pub seed: u64,
    rng: Pcg32,
    /// Session time of the last successful spawn; `None` spawns immediately
    last_spawn_time: Option<f64>,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            last_spawn_time: None,
        }
    }

    /// Forget the interval timer (session start)
    pub fn reset(&mut self) {
        self.last_spawn_time = None;
    }

    pub fn last_spawn_time(&self) -> Option<f64> {
        self.last_spawn_time
    }

    /// Whether the spawn interval has elapsed at `now`
    pub fn interval_elapsed(&self, params: &DifficultyParams, now: f64) -> bool {
        match self.last_spawn_time {
            None => true,
            Some(last) => now - last > params.spawn_interval as f64,
        }
    }

    /// Spawn at most one bubble. Returns the new bubble, or `None` when the
    /// interval has not elapsed or `live` already holds `max_concurrent`.
    pub fn try_spawn(
        &mut self,
        id: u32,
        params: &DifficultyParams,
        live: usize,
        field: Vec2,
        now: f64,
    ) -> Option<Target> {
        if !self.interval_elapsed(params, now) || live >= params.max_concurrent {
            return None;
        }
        self.last_spawn_time = Some(now);
        Some(Target::spawn(id, params, field, now, &mut self.rng))
    }
}
