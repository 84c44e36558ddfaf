//! Gesture / bubble collision resolution
//!
//! Takes and returns plain data only, so every rule here can be tested
//! without a renderer or an input device.
//!
//! Rules:
//! - Each hand report with an active gesture pops at most one bubble per tick.
//! - When several bubbles qualify, the one nearest the fingertip wins; equal
//!   distances fall back to spawn order (lowest id).
//! - The sweep removes popped bubbles unconditionally and expired live
//!   bubbles as misses. A bubble popped this tick is never also a miss.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::target::{Hand, Target, TargetState};

/// One detected hand for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandReport {
    /// Fingertip position in screen space
    pub pos: Vec2,
    pub hand: Hand,
    /// Squeeze gesture held this tick
    pub gesture_active: bool,
}

impl HandReport {
    pub fn new(pos: Vec2, hand: Hand, gesture_active: bool) -> Self {
        Self {
            pos,
            hand,
            gesture_active,
        }
    }
}

/// A bubble popped by a gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pop {
    pub target_id: u32,
    pub hand: Hand,
    pub pos: Vec2,
    /// Seconds between spawn and pop
    pub reaction_time: f64,
}

/// A bubble that expired while alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miss {
    pub target_id: u32,
    pub hand: Hand,
}

/// Match active gestures against live bubbles and mark the winners popped.
///
/// Bubbles are only marked, not removed; [`sweep`] does the removal.
pub fn resolve_gestures(targets: &mut [Target], hands: &[HandReport], now: f64) -> Vec<Pop> {
    let mut pops = Vec::new();

    for report in hands.iter().filter(|h| h.gesture_active) {
        let winner = targets
            .iter_mut()
            .filter(|t| t.check_hit(report.pos, report.hand))
            .min_by(|a, b| {
                let da = a.pos.distance_squared(report.pos);
                let db = b.pos.distance_squared(report.pos);
                da.partial_cmp(&db)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.id.cmp(&b.id))
            });

        if let Some(target) = winner {
            target.state = TargetState::Popped;
            pops.push(Pop {
                target_id: target.id,
                hand: target.required_hand(),
                pos: target.pos,
                reaction_time: now - target.created_at,
            });
        }
    }

    pops
}

/// Remove popped bubbles and expired live bubbles, returning the misses.
///
/// Calling this again on an already swept set is a no-op.
pub fn sweep(targets: &mut Vec<Target>, now: f64) -> Vec<Miss> {
    let mut misses = Vec::new();

    targets.retain(|t| match t.state {
        TargetState::Popped => false,
        TargetState::Alive if t.is_expired(now) => {
            misses.push(Miss {
                target_id: t.id,
                hand: t.required_hand(),
            });
            false
        }
        TargetState::Alive => true,
    });

    misses
}
