//! Rendering / audio output seam
//!
//! The core only emits draw commands and discrete sound triggers. Nothing it
//! does depends on what the sink returns beyond success or failure, and a
//! failing sink only costs that modality.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::OutputError;
use crate::sim::Hand;

/// RGBA color, components in [0, 1]
pub type Color = [f32; 4];

/// Palette (gentle, low-contrast colors)
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = [0.96, 0.96, 0.96, 1.0];
    pub const TEXT: Color = [0.2, 0.2, 0.2, 1.0];
    pub const TITLE: Color = [0.42, 0.55, 0.71, 1.0];
    pub const PROMPT: Color = [0.67, 0.57, 0.75, 1.0];
    pub const SUCCESS: Color = [0.49, 0.70, 0.51, 1.0];
    pub const LEFT_BUBBLE: Color = [0.42, 0.55, 0.71, 1.0];
    pub const RIGHT_BUBBLE: Color = [0.96, 0.76, 0.48, 1.0];
    pub const CURSOR: Color = [0.67, 0.57, 0.75, 1.0];
}

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
}

/// One draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Fill the whole field
    Clear { color: Color },
    /// A bubble; `fill` fades as its lifetime runs out
    Bubble {
        pos: Vec2,
        radius: f32,
        hand: Hand,
        color: Color,
        fill: f32,
    },
    /// Fingertip cursor for one tracked hand
    Cursor { pos: Vec2, hand: Hand, squeezing: bool },
    /// Expanding ring where a bubble popped
    PopEffect { pos: Vec2, progress: f32 },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        align: Align,
    },
}

/// Sound effect triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Session started
    Start,
    /// Bubble popped
    Pop,
    /// Bubble expired unpopped
    Miss,
    /// Level increased
    LevelUp,
    /// Session finished
    Complete,
    /// Begin looping background music
    MusicStart,
    /// Fade the background music out
    MusicStop,
}

/// Rendering and audio destination
pub trait OutputSink {
    /// Present one frame of draw commands
    fn draw(&mut self, frame: &[DrawCommand]) -> Result<(), OutputError>;

    /// Trigger a sound effect
    fn play(&mut self, effect: SoundEffect) -> Result<(), OutputError>;
}

/// Discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

impl OutputSink for NullOutput {
    fn draw(&mut self, _frame: &[DrawCommand]) -> Result<(), OutputError> {
        Ok(())
    }

    fn play(&mut self, _effect: SoundEffect) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Logs HUD text changes and sound triggers instead of drawing
#[derive(Debug, Default, Clone)]
pub struct LogOutput {
    last_text: Vec<String>,
}

impl OutputSink for LogOutput {
    fn draw(&mut self, frame: &[DrawCommand]) -> Result<(), OutputError> {
        let text: Vec<String> = frame
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        if text != self.last_text {
            log::info!("{}", text.join(" | "));
            self.last_text = text;
        }
        Ok(())
    }

    fn play(&mut self, effect: SoundEffect) -> Result<(), OutputError> {
        log::debug!("Sound: {effect:?}");
        Ok(())
    }
}
