//! Headless end-to-end sessions through the frame orchestrator

use std::sync::{Arc, Mutex};

use bubble_pop::error::OutputError;
use bubble_pop::input::{InputFrame, JsonLinesTracker, ScriptedTracker};
use bubble_pop::output::{DrawCommand, OutputSink, SoundEffect};
use bubble_pop::sim::{Command, DifficultyParams, GamePhase, Hand, HandReport, Spawner};
use bubble_pop::telemetry::MemorySink;
use bubble_pop::{Game, Settings};
use glam::Vec2;

/// Records everything sent to it; clones share the log
#[derive(Clone, Default)]
struct RecordingOutput {
    frames: Arc<Mutex<Vec<Vec<DrawCommand>>>>,
    sounds: Arc<Mutex<Vec<SoundEffect>>>,
    fail_audio: bool,
    fail_draw: bool,
}

impl RecordingOutput {
    fn sounds(&self) -> Vec<SoundEffect> {
        self.sounds.lock().unwrap().clone()
    }

    fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

impl OutputSink for RecordingOutput {
    fn draw(&mut self, frame: &[DrawCommand]) -> Result<(), OutputError> {
        if self.fail_draw {
            return Err(OutputError::Render("no display".to_string()));
        }
        self.frames.lock().unwrap().push(frame.to_vec());
        Ok(())
    }

    fn play(&mut self, effect: SoundEffect) -> Result<(), OutputError> {
        if self.fail_audio {
            return Err(OutputError::Audio("no device".to_string()));
        }
        self.sounds.lock().unwrap().push(effect);
        Ok(())
    }
}

fn settings() -> Settings {
    Settings {
        user_id: 42,
        seed: Some(2024),
        cursor_smoothing: 1.0,
        ..Default::default()
    }
}

fn new_game(output: RecordingOutput) -> (Game, MemorySink) {
    let sink = MemorySink::new();
    let game = Game::new(settings(), Box::new(output), Box::new(sink.clone()));
    (game, sink)
}

#[test]
fn test_pop_scenario_reports_reaction_time() {
    let output = RecordingOutput::default();
    let (mut game, sink) = new_game(output.clone());

    game.step(Some(InputFrame::command(Command::Start)), 0.0);
    assert_eq!(game.phase(), GamePhase::Playing);
    let target = game.state().targets[0].clone();

    let squeeze = HandReport::new(target.pos, target.required_hand(), true);
    game.step(Some(InputFrame::hands(vec![squeeze])), 2.0);

    let state = game.state();
    assert_eq!(state.stats.score, 10);
    assert_eq!(state.stats.popped, 1);
    assert_eq!(state.stats.reaction_times, vec![2.0]);
    assert!(state.targets.iter().all(|t| t.id != target.id));

    game.step(Some(InputFrame::command(Command::Stop)), 3.0);
    assert_eq!(game.phase(), GamePhase::Summary);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    let summary = &records[0];
    assert_eq!(summary.user_id, 42);
    assert_eq!(summary.game_name, "bubble_pop");
    assert_eq!(summary.score, 10);
    assert_eq!(summary.successful_attempts, 1);
    assert_eq!(summary.total_attempts, 1);
    assert_eq!(summary.reaction_times, vec![2.0]);
    assert_eq!(summary.squeeze_count, 1);
    assert_eq!(summary.accuracy_percentage, 100.0);
    assert_eq!(summary.session_duration, 3.0);

    assert_eq!(
        output.sounds(),
        vec![
            SoundEffect::Start,
            SoundEffect::MusicStart,
            SoundEffect::Pop,
            SoundEffect::MusicStop,
            SoundEffect::Complete,
        ]
    );
}

#[test]
fn test_miss_scenario_counts_per_hand() {
    let (mut game, sink) = new_game(RecordingOutput::default());

    game.step(Some(InputFrame::command(Command::Start)), 0.0);
    let target = game.state().targets[0].clone();

    // Nobody squeezes until the first bubble has expired
    let mut now = 0.0;
    while now < 5.5 {
        now += 1.0 / 30.0;
        game.step(Some(InputFrame::default()), now);
    }

    let stats = &game.state().stats;
    assert!(stats.missed >= 1);
    assert_eq!(stats.score, 0);
    assert!(game.state().targets.iter().all(|t| t.id != target.id));

    game.step(Some(InputFrame::command(Command::Stop)), now);
    let summary = &sink.records()[0];
    let coordination = summary.hand_coordination;
    assert_eq!(coordination.left_miss + coordination.right_miss, summary.total_attempts);
    assert_eq!(summary.accuracy_percentage, 0.0);
}

#[test]
fn test_restart_produces_separate_summaries() {
    let (mut game, sink) = new_game(RecordingOutput::default());

    game.step(Some(InputFrame::command(Command::Start)), 0.0);
    game.step(Some(InputFrame::command(Command::Stop)), 10.0);
    game.step(Some(InputFrame::command(Command::Start)), 20.0);
    assert_eq!(game.state().stats.total_attempts(), 0);
    assert_eq!(game.state().level, 1);
    game.step(Some(InputFrame::command(Command::Quit)), 25.0);

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].session_duration, 10.0);
    assert_eq!(records[1].session_duration, 5.0);
    assert_eq!(game.phase(), GamePhase::Terminated);
}

#[test]
fn test_quit_from_summary_does_not_resend() {
    let (mut game, sink) = new_game(RecordingOutput::default());
    game.step(Some(InputFrame::command(Command::Start)), 0.0);
    game.step(Some(InputFrame::command(Command::Stop)), 1.0);
    game.step(Some(InputFrame::command(Command::Quit)), 2.0);
    assert_eq!(sink.records().len(), 1);
}

#[test]
fn test_output_failures_do_not_stop_gameplay() {
    let output = RecordingOutput {
        fail_audio: true,
        fail_draw: true,
        ..Default::default()
    };
    let (mut game, sink) = new_game(output.clone());

    game.step(Some(InputFrame::command(Command::Start)), 0.0);
    let target = game.state().targets[0].clone();
    let squeeze = HandReport::new(target.pos, target.required_hand(), true);
    game.step(Some(InputFrame::hands(vec![squeeze])), 1.0);
    game.step(Some(InputFrame::command(Command::Stop)), 2.0);

    assert_eq!(game.state().stats.popped, 1);
    assert_eq!(sink.records().len(), 1);
    assert_eq!(output.frame_count(), 0);
    assert!(output.sounds().is_empty());
}

#[test]
fn test_frames_are_drawn_while_playing_and_idle() {
    let output = RecordingOutput::default();
    let (mut game, _) = new_game(output.clone());

    game.step(None, 0.0);
    game.step(Some(InputFrame::command(Command::Start)), 0.1);
    game.step(None, 0.2);
    assert_eq!(output.frame_count(), 3);

    game.step(Some(InputFrame::command(Command::Quit)), 0.3);
    // Nothing is drawn after termination
    assert_eq!(output.frame_count(), 3);
}

#[test]
fn test_run_loop_quits_when_tracker_closes() {
    let frames = vec![
        InputFrame::command(Command::Start),
        InputFrame::default(),
        InputFrame::default(),
    ];
    let (mut game, sink) = new_game(RecordingOutput::default());

    game.run(Box::new(ScriptedTracker::new(frames))).unwrap();

    assert_eq!(game.phase(), GamePhase::Terminated);
    assert_eq!(game.state().sessions_started, 1);
    assert_eq!(sink.records().len(), 1);
    assert_eq!(sink.records()[0].user_id, 42);
}

#[test]
fn test_quit_mid_session_stops_music() {
    let output = RecordingOutput::default();
    let (mut game, _) = new_game(output.clone());
    game.step(Some(InputFrame::command(Command::Start)), 0.0);
    game.step(Some(InputFrame::command(Command::Quit)), 1.0);
    assert_eq!(
        output.sounds(),
        vec![
            SoundEffect::Start,
            SoundEffect::MusicStart,
            SoundEffect::MusicStop,
            SoundEffect::Complete,
        ]
    );
}

#[test]
fn test_sound_disabled_silences_music_too() {
    let output = RecordingOutput::default();
    let sink = MemorySink::new();
    let settings = Settings {
        sound_enabled: false,
        ..settings()
    };
    let mut game = Game::new(settings, Box::new(output.clone()), Box::new(sink));
    game.step(Some(InputFrame::command(Command::Start)), 0.0);
    game.step(Some(InputFrame::command(Command::Stop)), 1.0);
    assert!(output.sounds().is_empty());
    assert!(output.frame_count() > 0);
}

#[test]
fn test_run_replays_recording_in_real_time() {
    // The first bubble of a session depends only on the seed
    let field = Vec2::new(800.0, 600.0);
    let first = Spawner::new(2024)
        .try_spawn(1, &DifficultyParams::for_level(1), 0, field, 0.0)
        .unwrap();
    let label = match first.required_hand() {
        Hand::Left => "left",
        Hand::Right => "right",
    };
    let squeeze = format!(
        r#"{{"hands":[{{"x":{},"y":{},"hand":"{}","gesture":true}}]}}"#,
        first.pos.x, first.pos.y, label
    );

    let mut lines = vec![r#"{"commands":["start"]}"#.to_string()];
    lines.extend(std::iter::repeat_n(squeeze, 45));
    lines.push(r#"{"commands":["stop"]}"#.to_string());
    lines.push(r#"{"commands":["quit"]}"#.to_string());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recording.jsonl");
    std::fs::write(&path, lines.join("\n")).unwrap();

    let (mut game, sink) = new_game(RecordingOutput::default());
    let tracker = JsonLinesTracker::open(&path, 30).unwrap();
    game.run(Box::new(tracker)).unwrap();

    assert_eq!(game.phase(), GamePhase::Terminated);
    let records = sink.records();
    assert_eq!(records.len(), 1);
    // 46 lines at 30 per second separate start from stop
    assert!(records[0].session_duration > 1.0);
    assert!(records[0].successful_attempts >= 1);
    assert!(records[0].reaction_times.iter().all(|&t| t >= 0.0));
}
