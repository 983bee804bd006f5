// Window commands - shortcuts, transparency, font size, pin, drag, close

use tauri::{State, WebviewWindow};

use crate::chrome::Shortcut;
use crate::models::NoteView;
use super::common::SessionState;

#[tauri::command]
pub fn handleShortcut(session: State<'_, SessionState>, ctrl: bool, key: String) -> NoteView {
    let mut session = session.lock();
    match Shortcut::fromKey(ctrl, &key) {
        Some(shortcut) => {
            let changed = session.handleShortcut(shortcut);
            tracing::debug!("[handleShortcut] {:?} (changed: {})", shortcut, changed);
        }
        None => tracing::debug!("[handleShortcut] Ignoring key {:?}", key),
    }
    session.view()
}

#[tauri::command]
pub fn cycleTransparency(session: State<'_, SessionState>) -> NoteView {
    let mut session = session.lock();
    session.cycleTransparency();
    session.view()
}

#[tauri::command]
pub fn changeFontSize(session: State<'_, SessionState>, delta: f64) -> NoteView {
    let mut session = session.lock();
    session.changeFontSize(delta);
    session.view()
}

#[tauri::command]
pub fn togglePin(window: WebviewWindow, session: State<'_, SessionState>) -> Result<NoteView, String> {
    let mut session = session.lock();
    let pinned = session.togglePin();
    window.set_always_on_top(pinned).map_err(|e| {
        tracing::warn!("[togglePin] ERROR updating window: {}", e);
        e.to_string()
    })?;
    Ok(session.view())
}

#[tauri::command]
pub fn beginDrag(session: State<'_, SessionState>, x: f64, y: f64) {
    session.lock().beginDrag(x, y);
}

#[tauri::command]
pub fn dragTo(window: WebviewWindow, session: State<'_, SessionState>, x: f64, y: f64) -> Result<(), String> {
    let Some((dx, dy)) = session.lock().dragTo(x, y) else {
        return Ok(());
    };

    let scale = window.scale_factor().map_err(|e| e.to_string())?;
    let position = window.outer_position().map_err(|e| e.to_string())?.to_logical::<f64>(scale);
    window
        .set_position(tauri::Position::Logical(tauri::LogicalPosition::new(position.x + dx, position.y + dy)))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn endDrag(session: State<'_, SessionState>) {
    session.lock().endDrag();
}

/// Close button; the flush happens in the close-requested handler
#[tauri::command]
pub fn closeNote(window: WebviewWindow) -> Result<(), String> {
    tracing::info!("[closeNote] Closing note window");
    window.close().map_err(|e| e.to_string())
}
