// Note commands - text edits and history

use tauri::State;

use crate::models::NoteView;
use super::common::SessionState;

#[tauri::command]
pub fn getNoteState(session: State<'_, SessionState>) -> NoteView {
    session.lock().view()
}

/// Text-changed notification from the textarea
#[tauri::command]
pub fn recordEdit(session: State<'_, SessionState>, text: String) -> NoteView {
    let mut session = session.lock();
    if session.textChanged(&text) {
        tracing::debug!("[recordEdit] Committed edit ({} bytes)", text.len());
    }
    session.view()
}

#[tauri::command]
pub fn undo(session: State<'_, SessionState>) -> NoteView {
    let mut session = session.lock();
    session.undo();
    session.view()
}

#[tauri::command]
pub fn redo(session: State<'_, SessionState>) -> NoteView {
    let mut session = session.lock();
    session.redo();
    session.view()
}
