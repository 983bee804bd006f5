// Snapshot of the note handed to the front end after every operation

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteView {
    pub text: String,
    pub fontSize: f64,
    pub opacity: f64,
    pub alwaysOnTop: bool,
    pub canUndo: bool,
    pub canRedo: bool,
}
