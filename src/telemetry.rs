//! End-of-session telemetry
//!
//! One immutable [`SessionSummary`] is produced per session and handed to a
//! [`TelemetrySink`] exactly once. Delivery is best-effort: failures are
//! logged, never retried, and never block the phase transition or exit path.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TelemetryError;
use crate::sim::{GameState, Hand, HandCoordination};

/// Summary record for one session (wire schema)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub game_name: String,
    pub user_id: u64,
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Seconds from start to end of the session
    pub session_duration: f64,
    pub total_attempts: u32,
    pub successful_attempts: u32,
    /// Pops made with the left hand
    pub left_hand_count: u32,
    /// Pops made with the right hand
    pub right_hand_count: u32,
    /// Seconds from spawn to pop, in pop order
    pub reaction_times: Vec<f64>,
    pub hand_coordination: HandCoordination,
    pub squeeze_count: u32,
    pub accuracy_percentage: f64,
    /// Completion time (RFC 3339, UTC)
    pub timestamp: DateTime<Utc>,
}

impl SessionSummary {
    /// Assemble the summary for the session held in `state`
    pub fn from_state(
        state: &GameState,
        game_name: &str,
        user_id: u64,
        now: f64,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let stats = &state.stats;
        Self {
            game_name: game_name.to_string(),
            user_id,
            score: stats.score,
            level: state.level,
            session_duration: state.session_duration(now),
            total_attempts: stats.total_attempts(),
            successful_attempts: stats.popped,
            left_hand_count: stats.pops_for(Hand::Left),
            right_hand_count: stats.pops_for(Hand::Right),
            reaction_times: stats.reaction_times.clone(),
            hand_coordination: stats.coordination,
            squeeze_count: stats.squeezes,
            accuracy_percentage: stats.accuracy_percentage(),
            timestamp: completed_at,
        }
    }
}

/// Destination for session summaries
pub trait TelemetrySink: Send {
    fn send(&mut self, summary: &SessionSummary) -> Result<(), TelemetryError>;
}

/// Appends one JSON object per line to a file
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TelemetrySink for JsonLinesSink {
    fn send(&mut self, summary: &SessionSummary) -> Result<(), TelemetryError> {
        let line = serde_json::to_string(summary)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// Writes the summary JSON to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn send(&mut self, summary: &SessionSummary) -> Result<(), TelemetryError> {
        log::info!("Session summary: {}", serde_json::to_string(summary)?);
        Ok(())
    }
}

/// Keeps summaries in memory; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<SessionSummary>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SessionSummary> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl TelemetrySink for MemorySink {
    fn send(&mut self, summary: &SessionSummary) -> Result<(), TelemetryError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| TelemetryError::Rejected("memory sink poisoned".to_string()))?;
        records.push(summary.clone());
        Ok(())
    }
}

/// Builds and delivers at most one summary per session
pub struct TelemetryReporter {
    sink: Box<dyn TelemetrySink>,
    game_name: String,
    user_id: u64,
    /// `GameState::sessions_started` value of the last reported session
    reported_session: u32,
}

impl TelemetryReporter {
    pub fn new(sink: Box<dyn TelemetrySink>, game_name: impl Into<String>, user_id: u64) -> Self {
        Self {
            sink,
            game_name: game_name.into(),
            user_id,
            reported_session: 0,
        }
    }

    /// Whether the current session still needs a summary
    pub fn pending(&self, state: &GameState) -> bool {
        state.sessions_started > self.reported_session
    }

    /// Emit the summary for the current session if it hasn't been emitted.
    ///
    /// Returns the summary that was produced, whether or not delivery worked.
    pub fn flush(&mut self, state: &GameState, now: f64) -> Option<SessionSummary> {
        if !self.pending(state) {
            return None;
        }
        self.reported_session = state.sessions_started;

        let summary =
            SessionSummary::from_state(state, &self.game_name, self.user_id, now, Utc::now());
        match self.sink.send(&summary) {
            Ok(()) => log::info!(
                "Session summary sent (score {}, level {}, accuracy {:.1}%)",
                summary.score,
                summary.level,
                summary.accuracy_percentage
            ),
            Err(e) => log::error!("Failed to send session summary: {e}"),
        }
        Some(summary)
    }
}
