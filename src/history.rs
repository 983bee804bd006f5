// Linear undo/redo history of full-text snapshots

use std::ops::{Deref, DerefMut};

/// Undo and redo stacks plus the last committed text.
///
/// The bottom of the undo stack is the text the note was opened with and is
/// never popped, so `current()` is always defined.
#[derive(Debug)]
pub struct EditHistory {
    undoStack: Vec<String>,
    redoStack: Vec<String>,
    lastCommitted: String,
    programmaticChange: bool,
}

impl EditHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        Self {
            undoStack: vec![initial.clone()],
            redoStack: Vec::new(),
            lastCommitted: initial,
            programmaticChange: false,
        }
    }

    /// Record `newText` as an edit when it differs from the last committed text.
    /// Returns true when a snapshot was pushed and the caller should persist.
    pub fn recordIfChanged(&mut self, newText: &str) -> bool {
        if self.programmaticChange || newText == self.lastCommitted {
            return false;
        }
        self.undoStack.push(newText.to_string());
        self.redoStack.clear();
        self.lastCommitted = newText.to_string();
        true
    }

    /// Step back one snapshot. Returns the text to display, or None at the
    /// initial state.
    pub fn undo(&mut self) -> Option<&str> {
        if self.undoStack.len() <= 1 {
            return None;
        }
        let current = self.undoStack.pop()?;
        self.redoStack.push(current);
        let previous = self.undoStack.last()?;
        self.lastCommitted.clone_from(previous);
        Some(previous.as_str())
    }

    /// Re-apply the most recently undone snapshot. Returns the text to display,
    /// or None when nothing was undone since the last edit.
    pub fn redo(&mut self) -> Option<&str> {
        let next = self.redoStack.pop()?;
        self.lastCommitted.clone_from(&next);
        self.undoStack.push(next);
        self.undoStack.last().map(String::as_str)
    }

    /// Suppress recording until the returned guard is dropped.
    pub fn programmatic(&mut self) -> ProgrammaticChange<'_> {
        let previous = std::mem::replace(&mut self.programmaticChange, true);
        ProgrammaticChange { history: self, previous }
    }

    pub fn isProgrammaticChange(&self) -> bool {
        self.programmaticChange
    }

    pub fn current(&self) -> &str {
        &self.lastCommitted
    }

    pub fn canUndo(&self) -> bool {
        self.undoStack.len() > 1
    }

    pub fn canRedo(&self) -> bool {
        !self.redoStack.is_empty()
    }

    pub fn undoDepth(&self) -> usize {
        self.undoStack.len()
    }

    #[cfg(test)]
    pub fn redoDepth(&self) -> usize {
        self.redoStack.len()
    }
}

/// Scoped suppression of history recording.
/// Restores the previous flag on drop, unwinding included.
pub struct ProgrammaticChange<'a> {
    history: &'a mut EditHistory,
    previous: bool,
}

impl Deref for ProgrammaticChange<'_> {
    type Target = EditHistory;

    fn deref(&self) -> &EditHistory {
        self.history
    }
}

impl DerefMut for ProgrammaticChange<'_> {
    fn deref_mut(&mut self) -> &mut EditHistory {
        self.history
    }
}

impl Drop for ProgrammaticChange<'_> {
    fn drop(&mut self) {
        self.history.programmaticChange = self.previous;
    }
}
