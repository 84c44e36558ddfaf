//! Frame orchestrator
//!
//! Ties the simulation, input, output and telemetry together. Each step:
//! apply commands, run the gameplay tick (only while playing), turn events
//! into sounds and effects, flush telemetry when a session ends, then draw.
//!
//! [`Game::step`] takes time as an argument so the whole loop can be driven
//! headlessly; [`Game::run`] wraps it in a real-time, fixed-rate loop.

use std::thread;
use std::time::{Duration, Instant};

use crate::error::{GameError, OutputError};
use crate::input::{CursorSmoother, FrameMailbox, HandTracker, InputFrame, spawn_tracker};
use crate::output::{OutputSink, SoundEffect};
use crate::render::{PopFlash, build_frame};
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GamePhase, GameState, HandReport, TickInput, tick};
use crate::telemetry::{SessionSummary, TelemetryReporter, TelemetrySink};

/// Hands older than this are treated as gone (seconds)
pub const STALE_HANDS_SECS: f64 = 0.5;

/// The running game
pub struct Game {
    state: GameState,
    settings: Settings,
    output: Box<dyn OutputSink>,
    telemetry: TelemetryReporter,
    smoother: CursorSmoother,
    /// Latest (smoothed) hands and when they arrived
    hands: Vec<HandReport>,
    hands_at: f64,
    flashes: Vec<PopFlash>,
    events: Vec<GameEvent>,
    /// Summaries produced so far (newest last)
    summaries: Vec<SessionSummary>,
    draw_enabled: bool,
    audio_enabled: bool,
}

impl Game {
    pub fn new(
        settings: Settings,
        output: Box<dyn OutputSink>,
        sink: Box<dyn TelemetrySink>,
    ) -> Self {
        let settings = settings.validated();
        let seed = settings.resolve_seed();
        log::info!("Game initialized with seed: {}", seed);

        let field = glam::Vec2::new(settings.field_width, settings.field_height);
        let telemetry = TelemetryReporter::new(sink, settings.game_name.clone(), settings.user_id);

        Self {
            state: GameState::with_field(seed, field),
            smoother: CursorSmoother::new(settings.cursor_smoothing),
            audio_enabled: settings.sound_enabled,
            draw_enabled: true,
            settings,
            output,
            telemetry,
            hands: Vec::new(),
            hands_at: 0.0,
            flashes: Vec::new(),
            events: Vec::new(),
            summaries: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Summaries produced so far, one per finished session
    pub fn summaries(&self) -> &[SessionSummary] {
        &self.summaries
    }

    /// Apply a control command immediately
    pub fn command(&mut self, command: Command, now: f64) {
        if self.state.phase == GamePhase::Terminated {
            return;
        }
        let events = self.state.apply_command(command, now);
        if command == Command::Start && events.contains(&GameEvent::SessionStarted) {
            self.smoother.reset();
            self.flashes.clear();
            log::info!("Session {} started", self.state.sessions_started);
        }
        // Flush before any later command can start a new session
        let ended = events
            .iter()
            .any(|e| matches!(e, GameEvent::SessionEnded { .. }));
        self.events.extend(events);
        if self.state.phase == GamePhase::Terminated {
            log::info!("Quit requested");
        }
        if ended || self.state.phase == GamePhase::Terminated {
            self.flush_telemetry(now);
        }
    }

    /// Advance one frame at session time `now` (seconds).
    ///
    /// `frame` is `None` when the tracker has nothing new; the previous hands
    /// are reused until they go stale.
    pub fn step(&mut self, frame: Option<InputFrame>, now: f64) -> GamePhase {
        if let Some(mut frame) = frame {
            for command in frame.commands.drain(..) {
                self.command(command, now);
            }
            self.smoother.apply(&mut frame.hands);
            self.hands = frame.hands;
            self.hands_at = now;
        } else if now - self.hands_at > STALE_HANDS_SECS {
            self.hands.clear();
        }

        if self.state.phase.is_gameplay() {
            let input = TickInput {
                hands: self.hands.clone(),
            };
            tick(&mut self.state, &input, now, &mut self.events);
        }

        self.handle_events(now);
        self.flashes.retain(|f| !f.is_finished(now));

        if self.state.phase != GamePhase::Terminated {
            self.render(now);
        }
        self.state.phase
    }

    /// Run the real-time loop until quit or until the tracker closes.
    ///
    /// Frame acquisition happens on a worker thread, so a slow tracker never
    /// stalls the loop. Closing the tracker acts as a quit command.
    pub fn run(&mut self, tracker: Box<dyn HandTracker>) -> Result<(), GameError> {
        let mailbox = FrameMailbox::new();
        spawn_tracker(tracker, mailbox.clone()).map_err(|source| {
            GameError::CaptureUnavailable {
                reason: "failed to start tracking thread".to_string(),
                source: Some(source),
            }
        })?;

        let clock = Instant::now();
        log::info!("Bubble Pop running!");

        loop {
            let frame_start = Instant::now();
            let now = clock.elapsed().as_secs_f64();

            let frame = mailbox.take();
            let closed = frame.is_none() && mailbox.is_drained();
            self.step(frame, now);
            if closed {
                log::info!("Tracking source closed");
                self.command(Command::Quit, now);
            }
            if self.state.phase == GamePhase::Terminated {
                break;
            }

            let rate = if self.state.phase.is_gameplay() {
                self.settings.tick_rate
            } else {
                self.settings.idle_tick_rate
            };
            let period = Duration::from_secs_f64(1.0 / rate as f64);
            if let Some(rest) = period.checked_sub(frame_start.elapsed()) {
                thread::sleep(rest);
            }
        }

        log::info!("Game over after {} session(s)", self.state.sessions_started);
        Ok(())
    }

    fn handle_events(&mut self, now: f64) {
        let events = std::mem::take(&mut self.events);
        for event in events {
            match event {
                GameEvent::SessionStarted => {
                    self.play(SoundEffect::Start);
                    self.play(SoundEffect::MusicStart);
                }
                GameEvent::SessionEnded { quit } => {
                    log::info!(
                        "Session ended (score {}, level {}){}",
                        self.state.stats.score,
                        self.state.level,
                        if quit { " by quit" } else { "" }
                    );
                    self.play(SoundEffect::MusicStop);
                    self.play(SoundEffect::Complete);
                }
                GameEvent::TargetSpawned { .. } => {}
                GameEvent::TargetPopped { pos, .. } => {
                    self.flashes.push(PopFlash { pos, started: now });
                    self.play(SoundEffect::Pop);
                }
                GameEvent::TargetMissed { .. } => self.play(SoundEffect::Miss),
                GameEvent::LevelUp { .. } => self.play(SoundEffect::LevelUp),
            }
        }
    }

    /// Emit the session summary if the current session hasn't had one
    fn flush_telemetry(&mut self, now: f64) {
        if let Some(summary) = self.telemetry.flush(&self.state, now) {
            self.summaries.push(summary);
        }
    }

    fn play(&mut self, effect: SoundEffect) {
        if !self.audio_enabled {
            return;
        }
        if let Err(e) = self.output.play(effect) {
            self.disable(e);
        }
    }

    fn render(&mut self, now: f64) {
        if !self.draw_enabled {
            return;
        }
        let frame = build_frame(&self.state, &self.hands, &self.flashes, now);
        if let Err(e) = self.output.draw(&frame) {
            self.disable(e);
        }
    }

    /// Turn off the failing modality; gameplay carries on without it
    fn disable(&mut self, error: OutputError) {
        if matches!(error, OutputError::Audio(_)) {
            log::warn!("{error} - audio disabled");
            self.audio_enabled = false;
        } else {
            log::warn!("{error} - rendering disabled");
            self.draw_enabled = false;
        }
    }
}
