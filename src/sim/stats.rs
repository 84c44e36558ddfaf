//! Per-session counters
//!
//! Everything the end-of-session summary needs, accumulated while playing.
//! A fresh session starts from `SessionStats::default()`.

use serde::{Deserialize, Serialize};

use super::target::Hand;
use crate::consts::POINTS_PER_POP;

/// Successes and misses split by hand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCoordination {
    pub left_success: u32,
    pub right_success: u32,
    pub left_miss: u32,
    pub right_miss: u32,
}

/// Counters and sequences for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u64,
    pub popped: u32,
    pub missed: u32,
    /// Gesture activations (rising edges)
    pub squeezes: u32,
    /// Seconds from spawn to pop, in pop order
    pub reaction_times: Vec<f64>,
    pub coordination: HandCoordination,
}

impl SessionStats {
    pub fn record_pop(&mut self, hand: Hand, reaction_time: f64) {
        self.popped += 1;
        self.score += POINTS_PER_POP;
        self.reaction_times.push(reaction_time);
        match hand {
            Hand::Left => self.coordination.left_success += 1,
            Hand::Right => self.coordination.right_success += 1,
        }
    }

    pub fn record_miss(&mut self, hand: Hand) {
        self.missed += 1;
        match hand {
            Hand::Left => self.coordination.left_miss += 1,
            Hand::Right => self.coordination.right_miss += 1,
        }
    }

    pub fn record_squeeze(&mut self) {
        self.squeezes += 1;
    }

    /// Bubbles that left the field, popped or not
    pub fn total_attempts(&self) -> u32 {
        self.popped + self.missed
    }

    pub fn pops_for(&self, hand: Hand) -> u32 {
        match hand {
            Hand::Left => self.coordination.left_success,
            Hand::Right => self.coordination.right_success,
        }
    }

    /// Successful share of attempts as a percentage; 0 with no attempts
    pub fn accuracy_percentage(&self) -> f64 {
        self.popped as f64 / self.total_attempts().max(1) as f64 * 100.0
    }

    pub fn average_reaction_time(&self) -> Option<f64> {
        if self.reaction_times.is_empty() {
            None
        } else {
            Some(self.reaction_times.iter().sum::<f64>() / self.reaction_times.len() as f64)
        }
    }
}
