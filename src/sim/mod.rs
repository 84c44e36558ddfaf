//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is passed in explicitly (session seconds), never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (bubbles kept in spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod spawner;
pub mod state;
pub mod stats;
pub mod target;
pub mod tick;

pub use collision::{HandReport, Miss, Pop, resolve_gestures, sweep};
pub use difficulty::{DifficultyParams, parameters_for};
pub use spawner::Spawner;
pub use state::{Command, GameEvent, GamePhase, GameState};
pub use stats::{HandCoordination, SessionStats};
pub use target::{Hand, Target, TargetState};
pub use tick::{TickInput, level_for_pops, tick};
