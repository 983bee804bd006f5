// Configuration model for the sticky note
// Stored as YAML frontmatter in the settings file next to the note

use serde::{Deserialize, Serialize};

use crate::chrome::clampFontSize;

pub const DEFAULT_WIDTH: u32 = 284;
pub const DEFAULT_HEIGHT: u32 = 461;
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Window and editor settings
/// Every field falls back to its default on its own, so older or hand-edited
/// files with missing keys still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub fontSize: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    pub opacity: f64,
    pub alwaysOnTop: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fontSize: DEFAULT_FONT_SIZE,
            x: None,
            y: None,
            opacity: 1.0,
            alwaysOnTop: true,
        }
    }
}

impl Settings {
    /// Repair values a hand-edited file can carry but the window cannot use
    pub fn sanitized(mut self) -> Self {
        self.fontSize = if self.fontSize.is_finite() {
            clampFontSize(self.fontSize)
        } else {
            DEFAULT_FONT_SIZE
        };
        if !(self.opacity > 0.0 && self.opacity <= 1.0) {
            self.opacity = 1.0;
        }
        if self.width == 0 {
            self.width = DEFAULT_WIDTH;
        }
        if self.height == 0 {
            self.height = DEFAULT_HEIGHT;
        }
        self
    }
}
