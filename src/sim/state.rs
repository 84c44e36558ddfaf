//! Game state and phase machine
//!
//! The whole session lives in one explicit `GameState` value that the
//! orchestrator passes through each tick. Starting a session replaces the
//! per-session parts with fresh values instead of patching counters in place.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyParams;
use super::spawner::Spawner;
use super::stats::SessionStats;
use super::target::{Hand, Target};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Results screen after a stopped session
    Summary,
    /// Quit requested; the loop exits after flushing telemetry
    Terminated,
}

impl GamePhase {
    /// Only `Playing` runs spawning, collisions and expiry
    pub fn is_gameplay(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// User-facing control commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Start (from the menu) or restart (from the summary)
    Start,
    /// End the session and show the summary
    Stop,
    /// Leave the game from any phase
    Quit,
}

impl Command {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" | "restart" => Some(Command::Start),
            "stop" | "stop-to-summary" | "summary" => Some(Command::Stop),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Gameplay events, consumed by the orchestrator for audio and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    SessionStarted,
    /// A session ended; `quit` is true when it ended by quitting mid-play
    SessionEnded { quit: bool },
    TargetSpawned { id: u32, hand: Hand },
    TargetPopped { id: u32, hand: Hand, pos: Vec2, reaction_time: f64 },
    TargetMissed { id: u32, hand: Hand },
    LevelUp { level: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Difficulty level, starts at 1 and never decreases within a session
    pub level: u32,
    /// Cached parameters for `level`
    pub params: DifficultyParams,
    /// Live bubbles in spawn order
    pub targets: Vec<Target>,
    pub stats: SessionStats,
    /// Session clock time the current session started
    pub session_start: f64,
    /// Session clock time the current session ended (Summary/Terminated)
    pub session_end: Option<f64>,
    /// Number of sessions started since launch
    pub sessions_started: u32,
    /// Play-field dimensions
    pub field: Vec2,
    pub spawner: Spawner,
    /// Per-hand gesture state from the previous tick (for squeeze edges)
    pub(crate) gesture_held: [bool; 2],
    next_id: u32,
}

impl GameState {
    /// New state in the menu, with the default field size
    pub fn new(seed: u64) -> Self {
        Self::with_field(seed, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT))
    }

    pub fn with_field(seed: u64, field: Vec2) -> Self {
        Self {
            phase: GamePhase::Menu,
            level: 1,
            params: DifficultyParams::for_level(1),
            targets: Vec::new(),
            stats: SessionStats::default(),
            session_start: 0.0,
            session_end: None,
            sessions_started: 0,
            field,
            spawner: Spawner::new(seed),
            gesture_held: [false; 2],
            next_id: 1,
        }
    }

    /// ID the next allocation will return
    pub fn peek_entity_id(&self) -> u32 {
        self.next_id
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds since the session started (frozen once it ends)
    pub fn session_duration(&self, now: f64) -> f64 {
        let end = self.session_end.unwrap_or(now);
        (end - self.session_start).max(0.0)
    }

    /// Apply a control command, returning the events it produced.
    ///
    /// Commands that make no sense in the current phase are ignored.
    pub fn apply_command(&mut self, command: Command, now: f64) -> Vec<GameEvent> {
        match (command, self.phase) {
            (Command::Start, GamePhase::Menu | GamePhase::Summary) => {
                self.begin_session(now);
                vec![GameEvent::SessionStarted]
            }
            (Command::Stop, GamePhase::Playing) => {
                self.end_session(now);
                self.phase = GamePhase::Summary;
                vec![GameEvent::SessionEnded { quit: false }]
            }
            (Command::Quit, GamePhase::Playing) => {
                self.end_session(now);
                self.phase = GamePhase::Terminated;
                vec![GameEvent::SessionEnded { quit: true }]
            }
            (Command::Quit, GamePhase::Menu | GamePhase::Summary) => {
                self.phase = GamePhase::Terminated;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Fresh session: counters zeroed, level 1, empty field
    fn begin_session(&mut self, now: f64) {
        self.phase = GamePhase::Playing;
        self.level = 1;
        self.params = DifficultyParams::for_level(1);
        self.targets = Vec::new();
        self.stats = SessionStats::default();
        self.session_start = now;
        self.session_end = None;
        self.sessions_started += 1;
        self.gesture_held = [false; 2];
        self.spawner.reset();
    }

    /// Freeze the session clock; counters stay as they are
    fn end_session(&mut self, now: f64) {
        self.session_end = Some(now);
        self.gesture_held = [false; 2];
    }
}
