// Window chrome state: opacity cycle, font size bounds, title-bar drag, shortcuts

pub const OPACITY_LEVELS: [f64; 4] = [1.0, 0.75, 0.5, 0.25];
pub const MIN_FONT_SIZE: f64 = 6.0;
pub const MAX_FONT_SIZE: f64 = 72.0;

/// Next opacity in the cycle, wrapping back to fully opaque.
/// A value outside the cycle restarts it at 1.0.
pub fn nextOpacity(current: f64) -> f64 {
    let next = OPACITY_LEVELS
        .iter()
        .position(|level| *level == current)
        .map(|i| (i + 1) % OPACITY_LEVELS.len())
        .unwrap_or(0);
    OPACITY_LEVELS[next]
}

pub fn clampFontSize(size: f64) -> f64 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Pointer tracking for dragging the window by its title bar
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DragState {
    last: Option<(f64, f64)>,
}

impl DragState {
    pub fn begin(&mut self, x: f64, y: f64) {
        self.last = Some((x, y));
    }

    /// Offset the window should move by since the previous pointer sample.
    /// None while no drag is in progress.
    pub fn moveTo(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lastX, lastY) = self.last?;
        self.last = Some((x, y));
        Some((x - lastX, y - lastY))
    }

    pub fn end(&mut self) {
        self.last = None;
    }

    #[cfg(test)]
    pub fn isDragging(&self) -> bool {
        self.last.is_some()
    }
}

/// Keyboard shortcuts handled by the note window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    CycleTransparency,
    IncreaseFont,
    DecreaseFont,
}

impl Shortcut {
    /// Decode a key press. `key` is the DOM `KeyboardEvent.key` value.
    pub fn fromKey(ctrl: bool, key: &str) -> Option<Self> {
        if !ctrl {
            return None;
        }
        match key.to_lowercase().as_str() {
            "z" => Some(Self::Undo),
            "y" => Some(Self::Redo),
            "t" => Some(Self::CycleTransparency),
            "+" | "=" => Some(Self::IncreaseFont),
            "-" => Some(Self::DecreaseFont),
            _ => None,
        }
    }
}
