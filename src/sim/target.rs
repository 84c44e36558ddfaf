//! Bubble targets
//!
//! A bubble is a pure predicate surface: it knows whether it is expired and
//! whether a gesture hits it, but never changes its own state. Marking a
//! bubble popped is the resolver's job.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyParams;
use crate::consts::EDGE_MARGIN;
use crate::distance;

/// Which hand a bubble (or a gesture) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Stable index for per-hand arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(Hand::Left),
            "right" | "r" => Some(Hand::Right),
            _ => None,
        }
    }
}

/// Bubble lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetState {
    Alive,
    /// Terminal - removed from the live set in the same tick
    Popped,
}

/// A bubble entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Spawn-ordered id
    pub id: u32,
    required_hand: Hand,
    pub pos: Vec2,
    pub radius: f32,
    /// Session clock time of creation (seconds)
    pub created_at: f64,
    /// Seconds until expiry
    pub lifetime: f32,
    pub state: TargetState,
}

impl Target {
    pub fn new(
        id: u32,
        hand: Hand,
        pos: Vec2,
        radius: f32,
        created_at: f64,
        lifetime: f32,
    ) -> Self {
        Self {
            id,
            required_hand: hand,
            pos,
            radius,
            created_at,
            lifetime,
            state: TargetState::Alive,
        }
    }

    /// Create a randomized bubble inside `field` using the given parameters.
    ///
    /// The required hand is a coin flip. Left bubbles land in the left half of
    /// the field, right bubbles in the right half, both kept clear of the
    /// edges by at least [`EDGE_MARGIN`] (or the radius, if larger).
    pub fn spawn<R: Rng + ?Sized>(
        id: u32,
        params: &DifficultyParams,
        field: Vec2,
        now: f64,
        rng: &mut R,
    ) -> Self {
        let hand = if rng.random_bool(0.5) {
            Hand::Left
        } else {
            Hand::Right
        };
        let radius = sample(rng, params.min_radius, params.max_radius);

        let margin = EDGE_MARGIN.max(radius);
        let mid = field.x / 2.0;
        let x = match hand {
            Hand::Left => sample(rng, margin, mid),
            Hand::Right => sample(rng, mid, field.x - margin),
        };
        let y = sample(rng, margin, field.y - margin);

        Self::new(id, hand, Vec2::new(x, y), radius, now, params.lifetime)
    }

    #[inline]
    pub fn required_hand(&self) -> Hand {
        self.required_hand
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == TargetState::Alive
    }

    /// Session time at which the bubble expires
    #[inline]
    pub fn expires_at(&self) -> f64 {
        self.created_at + self.lifetime as f64
    }

    /// Expiry only applies while the bubble is alive
    pub fn is_expired(&self, now: f64) -> bool {
        self.is_alive() && now >= self.expires_at()
    }

    /// True iff alive, the hand matches, and the gesture lies strictly inside
    pub fn check_hit(&self, gesture_pos: Vec2, gesture_hand: Hand) -> bool {
        self.is_alive()
            && gesture_hand == self.required_hand
            && distance(gesture_pos, self.pos) < self.radius
    }

    /// Fraction of lifetime left, in [0, 1]
    pub fn remaining_fraction(&self, now: f64) -> f32 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        let left = (self.expires_at() - now) as f32 / self.lifetime;
        left.clamp(0.0, 1.0)
    }
}

/// Uniform sample in [lo, hi), collapsing to the midpoint when the range is empty
fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}
