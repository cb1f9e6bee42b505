//! Display Sink
//!
//! Text surfaces the run state machine writes to: the score counter, the
//! start prompt and the end-of-run message. Hosts render them however they
//! like; `TextDisplay` just remembers what is on screen.

use serde::{Serialize, Deserialize};

use crate::game::state::Tint;

/// Prompt shown while waiting for the first start press.
pub const PROMPT_TEXT: &str = "Press space bar to start";

/// Score counter text.
pub fn score_text(score: u32) -> String {
    format!("Score: {}", score)
}

/// End-of-run message.
pub fn game_over_text(final_score: u32) -> String {
    format!("Game Over! Final Score: {}\nPress Enter to Restart", final_score)
}

/// How a centred message is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStyle {
    /// Font size (px)
    pub font_size: u16,
    /// Text colour
    pub color: Tint,
    /// Backdrop behind the text
    pub background: Option<Tint>,
}

impl MessageStyle {
    /// Start prompt: small white text on black.
    pub const fn prompt() -> Self {
        Self {
            font_size: 20,
            color: Tint(0xFFFFFF),
            background: Some(Tint(0x000000)),
        }
    }

    /// End-of-run banner: large white text on black.
    pub const fn banner() -> Self {
        Self {
            font_size: 40,
            color: Tint(0xFFFFFF),
            background: Some(Tint(0x000000)),
        }
    }
}

/// Text output surface.
pub trait DisplaySink {
    /// Replace the score counter.
    fn set_score_text(&mut self, score: u32);

    /// Show the centred message.
    fn show_message(&mut self, text: &str, style: MessageStyle);

    /// Hide the centred message.
    fn hide_message(&mut self);

    /// Show the end-of-run message.
    fn show_game_over(&mut self, text: &str);

    /// Remove the end-of-run message.
    fn hide_game_over(&mut self);
}

/// In-memory display.
///
/// `revision` increases on every visible change so hosts can redraw lazily.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDisplay {
    /// Current score text
    pub score: String,
    /// Centred message and its style, if shown
    pub message: Option<(String, MessageStyle)>,
    /// End-of-run message, if shown
    pub game_over: Option<String>,
    /// Change counter
    pub revision: u64,
}

impl TextDisplay {
    /// Empty display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the centred message, if shown.
    pub fn message_text(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl DisplaySink for TextDisplay {
    fn set_score_text(&mut self, score: u32) {
        let text = score_text(score);
        if self.score != text {
            self.score = text;
            self.touch();
        }
    }

    fn show_message(&mut self, text: &str, style: MessageStyle) {
        self.message = Some((text.to_string(), style));
        self.touch();
    }

    fn hide_message(&mut self) {
        if self.message.take().is_some() {
            self.touch();
        }
    }

    fn show_game_over(&mut self, text: &str) {
        self.game_over = Some(text.to_string());
        self.touch();
    }

    fn hide_game_over(&mut self) {
        if self.game_over.take().is_some() {
            self.touch();
        }
    }
}
