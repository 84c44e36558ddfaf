//! Hand-tracking input
//!
//! The tracking model is a black box behind [`HandTracker`]: it yields, per
//! frame, fingertip positions with a handedness label and a squeeze flag,
//! plus any control commands the surrounding shell bound to input events.
//!
//! Frame acquisition may be slow, so [`spawn_tracker`] runs the tracker on
//! its own thread and publishes into a single-slot [`FrameMailbox`]. The game
//! loop takes whatever is newest without waiting.

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::sim::{Command, Hand, HandReport};
use crate::smooth_toward;

/// One frame from the tracker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    /// Hands visible this frame (empty when none are detected)
    pub hands: Vec<HandReport>,
    /// Control commands raised since the previous frame
    pub commands: Vec<Command>,
}

impl InputFrame {
    pub fn hands(hands: Vec<HandReport>) -> Self {
        Self {
            hands,
            commands: Vec::new(),
        }
    }

    pub fn command(command: Command) -> Self {
        Self {
            hands: Vec::new(),
            commands: vec![command],
        }
    }
}

/// Source of hand-tracking frames
pub trait HandTracker: Send {
    /// Block until the next frame. `None` means the source has closed.
    fn next_frame(&mut self) -> Option<InputFrame>;
}

/// Replays a fixed list of frames, then closes
#[derive(Debug, Clone, Default)]
pub struct ScriptedTracker {
    frames: VecDeque<InputFrame>,
}

impl ScriptedTracker {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl HandTracker for ScriptedTracker {
    fn next_frame(&mut self) -> Option<InputFrame> {
        self.frames.pop_front()
    }
}

// ============================================================================
// JSON-LINES TRACKER
// ============================================================================

/// Wire form of one hand
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireHand {
    x: f32,
    y: f32,
    /// `left`/`right` in any case, or `l`/`r`
    hand: String,
    #[serde(default)]
    gesture: bool,
}

/// Wire form of one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireFrame {
    hands: Vec<WireHand>,
    commands: Vec<String>,
}

/// Parse one JSON-lines frame.
///
/// Unknown commands are skipped with a warning. Blank lines are empty frames.
pub fn parse_frame(line: &str) -> Result<InputFrame, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(InputFrame::default());
    }
    let wire: WireFrame = serde_json::from_str(line)?;

    let hands = wire
        .hands
        .into_iter()
        .filter(|h| h.x.is_finite() && h.y.is_finite())
        .filter_map(|h| match Hand::from_str(&h.hand) {
            Some(hand) => Some(HandReport::new(Vec2::new(h.x, h.y), hand, h.gesture)),
            None => {
                log::warn!("Ignoring hand with unknown label {:?}", h.hand);
                None
            }
        })
        .collect();
    let commands = wire
        .commands
        .iter()
        .filter_map(|c| {
            let parsed = Command::from_str(c);
            if parsed.is_none() {
                log::warn!("Ignoring unknown command {c:?}");
            }
            parsed
        })
        .collect();

    Ok(InputFrame { hands, commands })
}

/// Reads one JSON object per line from a file or stdin:
/// `{"hands":[{"x":..,"y":..,"hand":"left","gesture":true}],"commands":["start"]}`
///
/// A live pipe delivers lines at its own pace. A recording would be read at
/// disk speed, so paced trackers hand out at most one line per period.
pub struct JsonLinesTracker<R> {
    reader: R,
    line: String,
    line_no: usize,
    pace: Option<Duration>,
    next_due: Option<Instant>,
}

impl<R: BufRead + Send> JsonLinesTracker<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
            pace: None,
            next_due: None,
        }
    }

    /// Release at most one line per `period`
    pub fn with_pacing(mut self, period: Duration) -> Self {
        self.pace = Some(period);
        self
    }

    fn wait_for_slot(&mut self) {
        let Some(period) = self.pace else { return };
        let now = Instant::now();
        let due = match self.next_due {
            Some(due) if due > now => {
                thread::sleep(due - now);
                due
            }
            _ => now,
        };
        self.next_due = Some(due + period);
    }
}

impl JsonLinesTracker<BufReader<File>> {
    /// Open a recorded tracking stream, replayed at `frame_rate` lines per
    /// second. Failure here is fatal to startup.
    pub fn open(path: impl AsRef<Path>, frame_rate: u32) -> Result<Self, GameError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GameError::CaptureUnavailable {
            reason: format!("cannot open tracking stream {}", path.display()),
            source: Some(source),
        })?;
        let period = Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64);
        Ok(Self::new(BufReader::new(file)).with_pacing(period))
    }
}

impl<R: BufRead + Send> HandTracker for JsonLinesTracker<R> {
    fn next_frame(&mut self) -> Option<InputFrame> {
        self.wait_for_slot();
        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                match parse_frame(&self.line) {
                    Ok(frame) => Some(frame),
                    Err(e) => {
                        log::warn!("Malformed tracking frame on line {}: {e}", self.line_no);
                        Some(InputFrame::default())
                    }
                }
            }
            Err(e) => {
                log::error!("Tracking stream read failed: {e}");
                None
            }
        }
    }
}

// ============================================================================
// FRAME MAILBOX
// ============================================================================

#[derive(Debug, Default)]
struct Slot {
    frame: Option<InputFrame>,
    closed: bool,
}

/// Single-slot handoff between the tracker thread and the game loop.
///
/// Publishing replaces any pending hand list but keeps pending commands, so
/// a slow consumer sees the newest hands without losing a start or quit.
#[derive(Debug, Clone, Default)]
pub struct FrameMailbox {
    inner: Arc<Mutex<Slot>>,
}

impl FrameMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a frame, merging commands still waiting in the slot
    pub fn publish(&self, mut frame: InputFrame) {
        let Ok(mut slot) = self.inner.lock() else { return };
        if let Some(pending) = slot.frame.take() {
            let mut commands = pending.commands;
            commands.append(&mut frame.commands);
            frame.commands = commands;
        }
        slot.frame = Some(frame);
    }

    /// Mark the source as closed
    pub fn close(&self) {
        if let Ok(mut slot) = self.inner.lock() {
            slot.closed = true;
        }
    }

    /// Take the pending frame without blocking
    pub fn take(&self) -> Option<InputFrame> {
        self.inner.lock().ok().and_then(|mut slot| slot.frame.take())
    }

    /// True once the source closed and the last frame was taken
    pub fn is_drained(&self) -> bool {
        self.inner
            .lock()
            .map(|slot| slot.closed && slot.frame.is_none())
            .unwrap_or(true)
    }
}

/// Run `tracker` on its own thread, publishing every frame into `mailbox`.
///
/// The mailbox is closed when the tracker ends.
pub fn spawn_tracker(
    mut tracker: Box<dyn HandTracker>,
    mailbox: FrameMailbox,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("hand-tracker".to_string())
        .spawn(move || {
            while let Some(frame) = tracker.next_frame() {
                mailbox.publish(frame);
            }
            log::info!("Hand tracker closed");
            mailbox.close();
        })
}

// ============================================================================
// CURSOR SMOOTHING
// ============================================================================

/// Per-hand exponential smoothing of fingertip positions
#[derive(Debug, Clone)]
pub struct CursorSmoother {
    alpha: f32,
    last: HashMap<Hand, Vec2>,
}

impl CursorSmoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(f32::EPSILON, 1.0),
            last: HashMap::new(),
        }
    }

    /// Smooth each report in place; hands that vanished start fresh next time
    pub fn apply(&mut self, hands: &mut [HandReport]) {
        let mut seen = HashMap::with_capacity(hands.len());
        for report in hands.iter_mut() {
            let pos = match self.last.get(&report.hand) {
                Some(prev) => smooth_toward(*prev, report.pos, self.alpha),
                None => report.pos,
            };
            report.pos = pos;
            seen.insert(report.hand, pos);
        }
        self.last = seen;
    }

    pub fn reset(&mut self) {
        self.last.clear();
    }
}
