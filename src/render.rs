//! Draw list construction
//!
//! Turns game state into a flat list of [`DrawCommand`]s for the output sink.
//! Reads state only; nothing here affects gameplay.

use glam::Vec2;

use crate::output::{Align, Color, DrawCommand, palette};
use crate::sim::{GamePhase, GameState, Hand, HandReport};

/// Seconds a pop ring stays on screen
pub const POP_EFFECT_DURATION: f64 = 0.35;

const TITLE_SIZE: f32 = 32.0;
const BODY_SIZE: f32 = 24.0;
const HUD_LINE: f32 = 30.0;

/// A short-lived pop ring (visual only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopFlash {
    pub pos: Vec2,
    pub started: f64,
}

impl PopFlash {
    /// 0 at the pop, 1 when the ring is gone
    pub fn progress(&self, now: f64) -> f32 {
        (((now - self.started) / POP_EFFECT_DURATION) as f32).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now - self.started >= POP_EFFECT_DURATION
    }
}

/// Build the frame for the current phase
pub fn build_frame(
    state: &GameState,
    hands: &[HandReport],
    flashes: &[PopFlash],
    now: f64,
) -> Vec<DrawCommand> {
    let mut frame = vec![DrawCommand::Clear {
        color: palette::BACKGROUND,
    }];
    match state.phase {
        GamePhase::Menu => menu(state, &mut frame),
        GamePhase::Playing => playing(state, hands, flashes, now, &mut frame),
        GamePhase::Summary | GamePhase::Terminated => summary(state, now, &mut frame),
    }
    frame
}

/// Text, y, size, color
type TextLine = (String, f32, f32, Color);

fn centered(frame: &mut Vec<DrawCommand>, state: &GameState, lines: Vec<TextLine>) {
    for (text, y, size, color) in lines {
        frame.push(DrawCommand::Text {
            text,
            pos: Vec2::new(state.field.x / 2.0, y),
            size,
            color,
            align: Align::Center,
        });
    }
}

fn menu(state: &GameState, frame: &mut Vec<DrawCommand>) {
    let lines: [(&str, f32, f32, Color); 6] = [
        ("Bubble Pop", 150.0, TITLE_SIZE, palette::TITLE),
        ("Show both hands to the camera", 230.0, BODY_SIZE, palette::TEXT),
        (
            "Blue bubbles: left hand. Orange bubbles: right hand",
            270.0,
            BODY_SIZE,
            palette::TEXT,
        ),
        ("Squeeze your hand on a bubble to pop it", 310.0, BODY_SIZE, palette::TEXT),
        ("Start to play", 360.0, BODY_SIZE, palette::PROMPT),
        ("Quit to go back", 395.0, BODY_SIZE, palette::PROMPT),
    ];
    let lines = lines
        .into_iter()
        .map(|(text, y, size, color)| (text.to_string(), y, size, color))
        .collect();
    centered(frame, state, lines);
}

fn playing(
    state: &GameState,
    hands: &[HandReport],
    flashes: &[PopFlash],
    now: f64,
    frame: &mut Vec<DrawCommand>,
) {
    for target in &state.targets {
        let hand = target.required_hand();
        frame.push(DrawCommand::Bubble {
            pos: target.pos,
            radius: target.radius,
            hand,
            color: hand_color(hand),
            fill: target.remaining_fraction(now),
        });
    }

    for flash in flashes.iter().filter(|f| !f.is_finished(now)) {
        frame.push(DrawCommand::PopEffect {
            pos: flash.pos,
            progress: flash.progress(now),
        });
    }

    for report in hands {
        frame.push(DrawCommand::Cursor {
            pos: report.pos,
            hand: report.hand,
            squeezing: report.gesture_active,
        });
    }
    if hands.is_empty() {
        let prompt = "Show your hands to the camera".to_string();
        centered(frame, state, vec![(prompt, state.field.y - 40.0, BODY_SIZE, palette::TEXT)]);
    }

    let stats = &state.stats;
    let hud = [
        format!("Score: {}", stats.score),
        format!("Level: {}", state.level),
        format!("Popped: {}  Missed: {}", stats.popped, stats.missed),
        format!(
            "Hands  L:{}  R:{}",
            stats.pops_for(Hand::Left),
            stats.pops_for(Hand::Right)
        ),
    ];
    for (i, line) in hud.into_iter().enumerate() {
        frame.push(DrawCommand::Text {
            text: line,
            pos: Vec2::new(10.0, 10.0 + i as f32 * HUD_LINE),
            size: BODY_SIZE,
            color: palette::TEXT,
            align: Align::Left,
        });
    }
}

fn summary(state: &GameState, now: f64, frame: &mut Vec<DrawCommand>) {
    let stats = &state.stats;
    let reaction = match stats.average_reaction_time() {
        Some(secs) => format!("Average Reaction: {secs:.2}s"),
        None => "Average Reaction: -".to_string(),
    };

    let lines: Vec<TextLine> = vec![
        ("Great job!".to_string(), 120.0, TITLE_SIZE, palette::SUCCESS),
        (format!("Final Score: {}", stats.score), 190.0, BODY_SIZE, palette::TEXT),
        (format!("Level Reached: {}", state.level), 225.0, BODY_SIZE, palette::TEXT),
        (format!("Bubbles Popped: {}", stats.popped), 260.0, BODY_SIZE, palette::TEXT),
        (
            format!("Accuracy: {:.0}%", stats.accuracy_percentage()),
            295.0,
            BODY_SIZE,
            palette::TEXT,
        ),
        (reaction, 330.0, BODY_SIZE, palette::TEXT),
        (
            format!("Time Played: {:.0}s", state.session_duration(now)),
            365.0,
            BODY_SIZE,
            palette::TEXT,
        ),
        ("Start to play again".to_string(), 420.0, BODY_SIZE, palette::PROMPT),
        ("Quit to go back".to_string(), 455.0, BODY_SIZE, palette::PROMPT),
    ];
    centered(frame, state, lines);
}

fn hand_color(hand: Hand) -> Color {
    match hand {
        Hand::Left => palette::LEFT_BUBBLE,
        Hand::Right => palette::RIGHT_BUBBLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Command, Target};

    fn texts(frame: &[DrawCommand]) -> Vec<String> {
        frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_menu_has_no_bubbles() {
        let state = GameState::new(1);
        let frame = build_frame(&state, &[], &[], 0.0);
        assert!(matches!(frame[0], DrawCommand::Clear { .. }));
        assert!(texts(&frame).iter().any(|t| t == "Bubble Pop"));
        assert!(!frame.iter().any(|c| matches!(c, DrawCommand::Bubble { .. })));
    }

    #[test]
    fn test_playing_draws_bubbles_cursors_and_hud() {
        let mut state = GameState::new(1);
        state.apply_command(Command::Start, 0.0);
        state
            .targets
            .push(Target::new(1, Hand::Left, Vec2::new(100.0, 100.0), 40.0, 0.0, 4.0));
        let hands = [HandReport::new(Vec2::new(50.0, 50.0), Hand::Left, true)];

        let frame = build_frame(&state, &hands, &[], 1.0);
        let bubble = frame.iter().find_map(|c| match c {
            DrawCommand::Bubble { fill, .. } => Some(*fill),
            _ => None,
        });
        assert_eq!(bubble, Some(0.75));
        assert!(frame.iter().any(|c| matches!(
            c,
            DrawCommand::Cursor {
                squeezing: true,
                ..
            }
        )));
        let text = texts(&frame);
        assert!(text.contains(&"Score: 0".to_string()));
        assert!(text.contains(&"Level: 1".to_string()));
        assert!(!text.contains(&"Show your hands to the camera".to_string()));
    }

    #[test]
    fn test_idle_prompt_without_hands() {
        let mut state = GameState::new(1);
        state.apply_command(Command::Start, 0.0);
        let frame = build_frame(&state, &[], &[], 0.0);
        assert!(texts(&frame).contains(&"Show your hands to the camera".to_string()));
    }

    #[test]
    fn test_finished_flashes_are_dropped() {
        let mut state = GameState::new(1);
        state.apply_command(Command::Start, 0.0);
        let flashes = [
            PopFlash {
                pos: Vec2::ZERO,
                started: 0.0,
            },
            PopFlash {
                pos: Vec2::ONE,
                started: 0.9,
            },
        ];
        let frame = build_frame(&state, &[], &flashes, 1.0);
        let rings = frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::PopEffect { .. }))
            .count();
        assert_eq!(rings, 1);
    }

    #[test]
    fn test_summary_screen() {
        let mut state = GameState::new(1);
        state.apply_command(Command::Start, 0.0);
        state.stats.record_pop(Hand::Right, 0.5);
        state.apply_command(Command::Stop, 12.0);
        let text = texts(&build_frame(&state, &[], &[], 20.0));
        assert!(text.contains(&"Final Score: 10".to_string()));
        assert!(text.contains(&"Accuracy: 100%".to_string()));
        assert!(text.contains(&"Average Reaction: 0.50s".to_string()));
        assert!(text.contains(&"Time Played: 12s".to_string()));
    }
}
