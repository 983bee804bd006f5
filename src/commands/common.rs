// Shared state and window plumbing for the note commands

use std::sync::Arc;
use parking_lot::Mutex;
use tauri::{Emitter, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::models::Settings;
use crate::session::{NoteSession, NoteSurface, WindowGeometry};
use crate::storage::FileStore;

pub const MAIN_WINDOW: &str = "main";
pub const NOTE_TEXT_EVENT: &str = "note-text";

/// Textarea in the note webview
pub struct WebviewSurface {
    window: WebviewWindow,
}

impl WebviewSurface {
    pub fn new(window: WebviewWindow) -> Self {
        Self { window }
    }
}

impl NoteSurface for WebviewSurface {
    fn showText(&mut self, text: &str) -> Option<String> {
        // The front end assigns the value itself, which raises no input event
        if let Err(e) = self.window.emit(NOTE_TEXT_EVENT, text.to_string()) {
            tracing::warn!("[WebviewSurface::showText] Failed to emit text: {}", e);
        }
        None
    }
}

pub type DesktopSession = NoteSession<WebviewSurface, FileStore>;
pub type SessionState = Arc<Mutex<DesktopSession>>;

/// Build the borderless note window from stored settings
pub fn buildNoteWindow(app: &tauri::App, settings: &Settings) -> tauri::Result<WebviewWindow> {
    tracing::info!("[buildNoteWindow] size: {}x{}, position: {:?}, {:?}", settings.width, settings.height, settings.x, settings.y);

    let mut builder = WebviewWindowBuilder::new(app, MAIN_WINDOW, WebviewUrl::App("index.html".into()))
        .title("Sticky Note")
        .inner_size(settings.width as f64, settings.height as f64)
        .decorations(false)
        .transparent(true)
        .always_on_top(settings.alwaysOnTop)
        .shadow(false)
        .visible(true);

    if let (Some(x), Some(y)) = (settings.x, settings.y) {
        builder = builder.position(x as f64, y as f64);
    }

    builder.build()
}

/// Record the window geometry and flush the note before the window is destroyed
pub fn flushOnClose(window: &tauri::Window) {
    let Some(state) = window.try_state::<SessionState>() else {
        tracing::warn!("[flushOnClose] No note session to flush");
        return;
    };
    state.lock().closeWithGeometry(windowGeometry(window));
}

/// Current logical geometry, None when it cannot be trusted
fn windowGeometry(window: &tauri::Window) -> Option<WindowGeometry> {
    // A minimized window reports an off-screen position (-32000 on Windows)
    if window.is_minimized().unwrap_or(false) {
        tracing::debug!("[windowGeometry] Window minimized, keeping stored geometry");
        return None;
    }

    let geometry = window.scale_factor().and_then(|scale| {
        let size = window.inner_size()?.to_logical::<u32>(scale);
        let position = window.outer_position()?.to_logical::<i32>(scale);
        Ok(WindowGeometry { width: size.width, height: size.height, x: position.x, y: position.y })
    });
    geometry
        .map_err(|e| tracing::warn!("[windowGeometry] Could not read window geometry: {}", e))
        .ok()
}
