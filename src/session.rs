// Note session - the single owner of one open sticky note
// Every handler goes through here: history first, then persistence

use crate::chrome::{clampFontSize, nextOpacity, DragState, Shortcut};
use crate::history::EditHistory;
use crate::models::{NoteView, Settings};
use crate::storage::NoteStore;

/// Where the note text is displayed.
pub trait NoteSurface {
    /// Replace the displayed text. Hosts that raise their text-changed
    /// notification while the assignment is in progress return the text it carried.
    fn showText(&mut self, text: &str) -> Option<String>;
}

/// Logical window size and outer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

pub struct NoteSession<S, P> {
    history: EditHistory,
    settings: Settings,
    drag: DragState,
    surface: S,
    store: P,
}

impl<S: NoteSurface, P: NoteStore> NoteSession<S, P> {
    /// Load the note and settings from `store` and show the text.
    pub fn open(store: P, surface: S) -> Self {
        let settings = store.loadSettings();
        let text = store.loadNote();
        Self::new(store, surface, settings, text)
    }

    pub fn new(store: P, surface: S, settings: Settings, text: String) -> Self {
        tracing::info!(
            "[NoteSession::new] Opening note ({} bytes, font {}pt)",
            text.len(),
            settings.fontSize
        );
        let mut session = Self {
            history: EditHistory::new(text),
            settings: settings.sanitized(),
            drag: DragState::default(),
            surface,
            store,
        };
        let initial = session.history.current().to_string();
        session.display(&initial);
        session
    }

    // ============================================
    // EDIT HISTORY
    // ============================================

    /// Text-changed notification from the surface.
    /// Returns true when the text was a real edit.
    pub fn textChanged(&mut self, text: &str) -> bool {
        if !self.history.recordIfChanged(text) {
            return false;
        }
        self.persistNote();
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo().map(str::to_string) else {
            tracing::debug!("[undo] Already at the oldest state");
            return false;
        };
        self.display(&previous);
        self.persistNote();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo().map(str::to_string) else {
            tracing::debug!("[redo] Nothing to redo");
            return false;
        };
        self.display(&next);
        self.persistNote();
        true
    }

    /// Show `text` without it entering the history
    fn display(&mut self, text: &str) {
        let mut history = self.history.programmatic();
        if let Some(echo) = self.surface.showText(text) {
            history.recordIfChanged(&echo);
        }
    }

    // ============================================
    // WINDOW CHROME
    // ============================================

    pub fn cycleTransparency(&mut self) -> f64 {
        self.settings.opacity = nextOpacity(self.settings.opacity);
        tracing::debug!("[cycleTransparency] Opacity now {}", self.settings.opacity);
        self.settings.opacity
    }

    pub fn changeFontSize(&mut self, delta: f64) -> f64 {
        let size = clampFontSize(self.settings.fontSize + delta);
        if size != self.settings.fontSize {
            self.settings.fontSize = size;
            tracing::debug!("[changeFontSize] Font size now {}pt", size);
            self.persistSettings();
        }
        self.settings.fontSize
    }

    pub fn togglePin(&mut self) -> bool {
        self.settings.alwaysOnTop = !self.settings.alwaysOnTop;
        tracing::debug!("[togglePin] Always on top: {}", self.settings.alwaysOnTop);
        self.settings.alwaysOnTop
    }

    pub fn beginDrag(&mut self, x: f64, y: f64) {
        self.drag.begin(x, y);
    }

    /// Offset to move the window by, None when no drag is active
    pub fn dragTo(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.drag.moveTo(x, y)
    }

    pub fn endDrag(&mut self) {
        self.drag.end();
    }

    /// Run the action bound to `shortcut`. Returns whether anything changed.
    pub fn handleShortcut(&mut self, shortcut: Shortcut) -> bool {
        match shortcut {
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
            Shortcut::CycleTransparency => {
                self.cycleTransparency();
                true
            }
            Shortcut::IncreaseFont | Shortcut::DecreaseFont => {
                let before = self.settings.fontSize;
                let delta = if shortcut == Shortcut::IncreaseFont { 1.0 } else { -1.0 };
                self.changeFontSize(delta) != before
            }
        }
    }

    pub fn updateGeometry(&mut self, geometry: WindowGeometry) {
        self.settings.width = geometry.width;
        self.settings.height = geometry.height;
        self.settings.x = Some(geometry.x);
        self.settings.y = Some(geometry.y);
    }

    // ============================================
    // LIFECYCLE
    // ============================================

    /// Flush note and settings before the window goes away
    pub fn close(&mut self) {
        tracing::info!("[close] Flushing note and settings");
        self.persistNote();
        self.persistSettings();
    }

    /// Close from the window: geometry is None when the window could not
    /// report a usable one (minimized), and the stored geometry is kept
    pub fn closeWithGeometry(&mut self, geometry: Option<WindowGeometry>) {
        if let Some(geometry) = geometry {
            self.updateGeometry(geometry);
        }
        self.close();
    }

    pub fn view(&self) -> NoteView {
        NoteView {
            text: self.history.current().to_string(),
            fontSize: self.settings.fontSize,
            opacity: self.settings.opacity,
            alwaysOnTop: self.settings.alwaysOnTop,
            canUndo: self.history.canUndo(),
            canRedo: self.history.canRedo(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    // Write failures are logged and otherwise ignored; history is never rolled back
    fn persistNote(&self) {
        if let Err(e) = self.store.saveNote(self.history.current()) {
            tracing::warn!("[persistNote] Failed to save note: {}", e);
        }
    }

    fn persistSettings(&self) {
        if let Err(e) = self.store.saveSettings(&self.settings) {
            tracing::warn!("[persistSettings] Failed to save settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, StickyPaths};
    use std::cell::{Cell, RefCell};

    /// Surface that raises a change notification on every assignment,
    /// like a native text box does
    #[derive(Default)]
    struct EchoSurface {
        shown: String,
        assignments: usize,
    }

    impl NoteSurface for EchoSurface {
        fn showText(&mut self, text: &str) -> Option<String> {
            self.shown = text.to_string();
            self.assignments += 1;
            Some(self.shown.clone())
        }
    }

    /// In-memory store counting writes
    #[derive(Default)]
    struct MemoryStore {
        note: RefCell<Option<String>>,
        settings: RefCell<Option<Settings>>,
        noteSaves: Cell<usize>,
        settingsSaves: Cell<usize>,
        failWrites: bool,
    }

    impl NoteStore for MemoryStore {
        fn loadNote(&self) -> String {
            self.note.borrow().clone().unwrap_or_default()
        }

        fn saveNote(&self, text: &str) -> Result<(), String> {
            self.noteSaves.set(self.noteSaves.get() + 1);
            if self.failWrites {
                return Err("disk full".to_string());
            }
            *self.note.borrow_mut() = Some(text.to_string());
            Ok(())
        }

        fn loadSettings(&self) -> Settings {
            self.settings.borrow().clone().unwrap_or_default()
        }

        fn saveSettings(&self, settings: &Settings) -> Result<(), String> {
            self.settingsSaves.set(self.settingsSaves.get() + 1);
            if self.failWrites {
                return Err("disk full".to_string());
            }
            *self.settings.borrow_mut() = Some(settings.clone());
            Ok(())
        }
    }

    fn memorySession() -> NoteSession<EchoSurface, MemoryStore> {
        NoteSession::open(MemoryStore::default(), EchoSurface::default())
    }

    fn typeText<P: NoteStore>(session: &mut NoteSession<EchoSurface, P>, text: &str) {
        let mut typed = session.history().current().to_string();
        for c in text.chars() {
            typed.push(c);
            assert!(session.textChanged(&typed));
        }
    }

    #[test]
    fn test_open_shows_loaded_text_as_sentinel() {
        let store = MemoryStore::default();
        *store.note.borrow_mut() = Some("remember milk".to_string());
        let mut session = NoteSession::open(store, EchoSurface::default());

        assert_eq!(session.surface().shown, "remember milk");
        assert_eq!(session.history().undoDepth(), 1);
        assert!(!session.undo());
        assert_eq!(session.store().noteSaves.get(), 0);
    }

    #[test]
    fn test_each_edit_saves_note() {
        let mut session = memorySession();
        typeText(&mut session, "Hi");
        assert_eq!(session.store().noteSaves.get(), 2);
        assert_eq!(session.store().loadNote(), "Hi");
    }

    #[test]
    fn test_unchanged_text_never_saves() {
        let mut session = memorySession();
        typeText(&mut session, "abc");
        let saves = session.store().noteSaves.get();

        assert!(!session.textChanged("abc"));
        assert!(!session.textChanged("abc"));
        assert_eq!(session.history().undoDepth(), 4);
        assert_eq!(session.store().noteSaves.get(), saves);
    }

    #[test]
    fn test_undo_everything_then_noop() {
        let mut session = memorySession();
        typeText(&mut session, "Hello");

        for _ in 0..5 {
            assert!(session.undo());
        }
        assert_eq!(session.surface().shown, "");
        assert_eq!(session.store().loadNote(), "");

        let saves = session.store().noteSaves.get();
        assert!(!session.undo());
        assert_eq!(session.store().noteSaves.get(), saves);
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut session = memorySession();
        typeText(&mut session, "ab");
        let before = session.view();

        assert!(session.undo());
        assert_eq!(session.surface().shown, "a");
        assert!(session.redo());
        assert_eq!(session.surface().shown, "ab");
        assert_eq!(session.history().current(), "ab");
        assert_eq!(session.view(), before);
        assert_eq!(session.store().loadNote(), "ab");
    }

    #[test]
    fn test_new_edit_discards_redo() {
        let mut session = memorySession();
        assert!(session.textChanged("x"));
        assert!(session.undo());
        assert!(session.textChanged("y"));

        assert!(!session.redo());
        assert_eq!(session.surface().shown, "");
        assert_eq!(session.history().current(), "y");
        assert_eq!(session.store().loadNote(), "y");
    }

    #[test]
    fn test_surface_echo_during_undo_not_recorded() {
        let mut session = memorySession();
        typeText(&mut session, "ab");
        let assignments = session.surface().assignments;

        session.undo();
        session.redo();
        assert_eq!(session.surface().assignments, assignments + 2);
        assert_eq!(session.history().undoDepth(), 3);
        assert!(!session.history().isProgrammaticChange());
    }

    #[test]
    fn test_font_size_clamps_and_saves() {
        let mut session = memorySession();
        for _ in 0..100 {
            session.changeFontSize(1.0);
        }
        assert_eq!(session.settings().fontSize, 72.0);

        for _ in 0..100 {
            session.changeFontSize(-1.0);
        }
        assert_eq!(session.settings().fontSize, 6.0);
        // 10 -> 72 and back down to 6, one save per actual change
        assert_eq!(session.store().settingsSaves.get(), 62 + 66);
        assert_eq!(session.store().loadSettings().fontSize, 6.0);
    }

    #[test]
    fn test_transparency_cycle_returns_to_opaque() {
        let mut session = memorySession();
        let levels: Vec<f64> = (0..4).map(|_| session.cycleTransparency()).collect();
        assert_eq!(levels, vec![0.75, 0.5, 0.25, 1.0]);
    }

    #[test]
    fn test_shortcuts_dispatch() {
        let mut session = memorySession();
        session.textChanged("note");

        assert!(session.handleShortcut(Shortcut::Undo));
        assert_eq!(session.surface().shown, "");
        assert!(session.handleShortcut(Shortcut::Redo));
        assert_eq!(session.surface().shown, "note");
        assert!(session.handleShortcut(Shortcut::IncreaseFont));
        assert_eq!(session.view().fontSize, 11.0);
        assert!(session.handleShortcut(Shortcut::DecreaseFont));
        assert!(session.handleShortcut(Shortcut::CycleTransparency));
        assert_eq!(session.view().opacity, 0.75);
    }

    #[test]
    fn test_font_shortcut_at_limit_reports_no_change() {
        let settings = Settings { fontSize: 72.0, ..Settings::default() };
        let mut session =
            NoteSession::new(MemoryStore::default(), EchoSurface::default(), settings, String::new());
        assert!(!session.handleShortcut(Shortcut::IncreaseFont));
    }

    #[test]
    fn test_nan_font_size_recovers() {
        let settings = Settings { fontSize: f64::NAN, ..Settings::default() };
        let mut session =
            NoteSession::new(MemoryStore::default(), EchoSurface::default(), settings, String::new());
        assert_eq!(session.settings().fontSize, 10.0);
        assert_eq!(session.changeFontSize(1.0), 11.0);
        assert_eq!(session.changeFontSize(-1.0), 10.0);
        assert_eq!(session.store().settingsSaves.get(), 2);
    }

    #[test]
    fn test_non_utf8_note_survives_open_and_close() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = StickyPaths::inDir(dir.path());
        std::fs::write(&paths.noteFile, b"groceries: caf\xe9, milk").unwrap();

        let mut session = NoteSession::open(FileStore::new(paths.clone()), EchoSurface::default());
        assert_eq!(session.surface().shown, "groceries: caf\u{FFFD}, milk");
        session.close();

        let saved = std::fs::read_to_string(&paths.noteFile).unwrap();
        assert_eq!(saved, "groceries: caf\u{FFFD}, milk");
    }

    #[test]
    fn test_pin_toggles() {
        let mut session = memorySession();
        assert!(!session.togglePin());
        assert!(session.togglePin());
    }

    #[test]
    fn test_drag_moves_by_delta() {
        let mut session = memorySession();
        assert_eq!(session.dragTo(5.0, 5.0), None);
        session.beginDrag(10.0, 20.0);
        assert_eq!(session.dragTo(13.0, 18.0), Some((3.0, -2.0)));
        session.endDrag();
        assert_eq!(session.dragTo(30.0, 30.0), None);
    }

    #[test]
    fn test_close_flushes_note_and_settings() {
        let mut session = memorySession();
        session.textChanged("bye");
        session.closeWithGeometry(Some(WindowGeometry { width: 300, height: 500, x: 12, y: 34 }));

        let store = session.store();
        assert_eq!(store.noteSaves.get(), 2);
        assert_eq!(store.settingsSaves.get(), 1);
        let saved = store.loadSettings();
        assert_eq!((saved.width, saved.height, saved.x, saved.y), (300, 500, Some(12), Some(34)));
    }

    #[test]
    fn test_close_without_geometry_keeps_stored_position() {
        let settings = Settings { x: Some(40), y: Some(60), ..Settings::default() };
        let mut session =
            NoteSession::new(MemoryStore::default(), EchoSurface::default(), settings, String::new());
        session.closeWithGeometry(None);

        let saved = session.store().loadSettings();
        assert_eq!((saved.x, saved.y), (Some(40), Some(60)));
        assert_eq!(session.store().settingsSaves.get(), 1);
        assert_eq!(session.store().noteSaves.get(), 1);
    }

    #[test]
    fn test_write_failure_keeps_history() {
        let store = MemoryStore { failWrites: true, ..MemoryStore::default() };
        let mut session = NoteSession::open(store, EchoSurface::default());

        assert!(session.textChanged("unsaved"));
        assert_eq!(session.history().current(), "unsaved");
        assert!(session.undo());
        assert_eq!(session.history().current(), "");
        session.close();
    }

    #[test]
    fn test_hello_survives_relaunch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = StickyPaths::inDir(dir.path());

        let mut session = NoteSession::open(FileStore::new(paths.clone()), EchoSurface::default());
        assert_eq!(session.view().text, "");
        typeText(&mut session, "Hello");
        assert_eq!(std::fs::read_to_string(&paths.noteFile).unwrap(), "Hello");
        session.close();
        drop(session);

        let reopened = NoteSession::open(FileStore::new(paths), EchoSurface::default());
        assert_eq!(reopened.view().text, "Hello");
        assert_eq!(reopened.surface().shown, "Hello");
    }

    #[test]
    fn test_font_size_survives_relaunch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = StickyPaths::inDir(dir.path());

        let mut session = NoteSession::open(FileStore::new(paths.clone()), EchoSurface::default());
        let settings = session.settings().clone();
        assert_eq!((settings.width, settings.height, settings.fontSize), (284, 461, 10.0));

        session.changeFontSize(2.0);
        assert_eq!(FileStore::new(paths.clone()).loadSettings().fontSize, 12.0);
        drop(session);

        let reopened = NoteSession::open(FileStore::new(paths), EchoSurface::default());
        assert_eq!(reopened.settings().fontSize, 12.0);
    }
}
