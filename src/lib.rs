// Allow non-snake_case names for JSON serialization compatibility with the front end
#![allow(non_snake_case)]

pub mod chrome;
pub mod history;
pub mod models;
pub mod session;
pub mod storage;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;
    use parking_lot::Mutex;
    use tauri::Manager;

    use commands::common::{SessionState, WebviewSurface};
    use session::NoteSession;
    use storage::{FileStore, NoteStore, StickyPaths};

    tracing_subscriber::fmt().with_target(false).init();

    tauri::Builder::default()
        .setup(|app| {
            let store = FileStore::new(StickyPaths::defaultLocation()?);
            tracing::info!("[setup] Note file: {:?}", store.paths().noteFile);
            tracing::info!("[setup] Settings file: {:?}", store.paths().settingsFile);

            let settings = store.loadSettings();
            let text = store.loadNote();

            let window = commands::common::buildNoteWindow(app, &settings)?;
            let session = NoteSession::new(store, WebviewSurface::new(window), settings, text);
            let state: SessionState = Arc::new(Mutex::new(session));
            app.manage(state);

            Ok(())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::CloseRequested { .. } = event {
                commands::common::flushOnClose(window);
            }
        })
        .invoke_handler(tauri::generate_handler![
            // Note
            commands::note::getNoteState,
            commands::note::recordEdit,
            commands::note::undo,
            commands::note::redo,
            // Window
            commands::window::handleShortcut,
            commands::window::cycleTransparency,
            commands::window::changeFontSize,
            commands::window::togglePin,
            commands::window::beginDrag,
            commands::window::dragTo,
            commands::window::endDrag,
            commands::window::closeNote,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
