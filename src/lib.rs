//! Bubble Pop - a gesture-driven bubble popping game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, bubbles, spawning, collisions, phases)
//! - `telemetry`: End-of-session summary record and delivery
//! - `input`: Hand-tracking provider seam and frame mailbox
//! - `output`: Draw commands and sound triggers
//! - `render`: Per-frame draw list construction
//! - `game`: Fixed-rate frame orchestrator

pub mod error;
pub mod game;
pub mod input;
pub mod output;
pub mod render;
pub mod settings;
pub mod sim;
pub mod telemetry;

pub use error::{GameError, OutputError, TelemetryError};
pub use game::Game;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Gameplay tick rate (ticks per second)
    pub const TICK_RATE: u32 = 30;
    /// Tick rate while sitting in the menu or summary screens
    pub const IDLE_TICK_RATE: u32 = 10;

    /// Default play-field dimensions (screen space, origin top-left)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Bubbles keep at least this far from the field edges
    pub const EDGE_MARGIN: f32 = 50.0;

    /// Points awarded per popped bubble
    pub const POINTS_PER_POP: u64 = 10;
    /// Successful pops needed per level
    pub const POPS_PER_LEVEL: u32 = 12;

    /// Identifier reported in the session summary
    pub const GAME_NAME: &str = "bubble_pop";
}

/// Euclidean distance between two screen-space points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Exponential smoothing toward `raw` with weight `alpha` in (0, 1]
#[inline]
pub fn smooth_toward(prev: Vec2, raw: Vec2, alpha: f32) -> Vec2 {
    prev.lerp(raw, alpha)
}
