// Filesystem storage for the sticky note
// Plain text note file + settings as Markdown with YAML frontmatter

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::models::Settings;

// ============================================
// PATH HELPERS
// ============================================

pub const NOTE_FILE_NAME: &str = "sticky_note.txt";
pub const SETTINGS_FILE_NAME: &str = "sticky_note_settings.md";

/// Directory holding the note and its settings (the user's documents folder)
pub fn documentsDir() -> Result<PathBuf, String> {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| "Failed to locate documents or home directory".to_string())
}

/// Locations of the two files owned by one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickyPaths {
    pub noteFile: PathBuf,
    pub settingsFile: PathBuf,
}

impl StickyPaths {
    pub fn inDir(dir: &Path) -> Self {
        Self {
            noteFile: dir.join(NOTE_FILE_NAME),
            settingsFile: dir.join(SETTINGS_FILE_NAME),
        }
    }

    pub fn defaultLocation() -> Result<Self, String> {
        Ok(Self::inDir(&documentsDir()?))
    }
}

// ============================================
// FRONTMATTER PARSING
// ============================================

/// Parse YAML frontmatter from markdown content
pub fn parseFrontmatter<T: serde::de::DeserializeOwned>(content: &str) -> Result<(T, String), String> {
    let content = content.trim();
    let rest = content
        .strip_prefix("---")
        .ok_or("Missing frontmatter opening delimiter")?;
    let end = rest.find("\n---").ok_or("Missing frontmatter closing delimiter")?;
    let yaml = rest[..end].trim();
    let body = rest[end + 4..].trim().to_string();

    let frontmatter: T = serde_yaml::from_str(yaml).map_err(|e| format!("YAML error: {}", e))?;
    Ok((frontmatter, body))
}

/// Serialize frontmatter + body to markdown
pub fn toMarkdown<T: serde::Serialize>(frontmatter: &T, body: &str) -> Result<String, String> {
    let yaml = serde_yaml::to_string(frontmatter)
        .map_err(|e| format!("YAML error: {}", e))?;
    Ok(format!("---\n{}---\n\n{}", yaml, body))
}

const SETTINGS_BODY: &str = "# Sticky Note\n\n\
| shortcut | action |\n\
|----------|--------|\n\
| Ctrl+Z | undo |\n\
| Ctrl+Y | redo |\n\
| Ctrl+T | cycle transparency |\n\
| Ctrl+Plus | larger text |\n\
| Ctrl+Minus | smaller text |\n";

// ============================================
// NOTE STORE
// ============================================

/// Durable storage for the note text and its settings.
/// Loads never fail: absent or unreadable data yields empty text or defaults.
pub trait NoteStore {
    fn loadNote(&self) -> String;
    fn saveNote(&self, text: &str) -> Result<(), String>;
    fn loadSettings(&self) -> Settings;
    fn saveSettings(&self, settings: &Settings) -> Result<(), String>;
}

/// Store backed by the note and settings files
#[derive(Debug, Clone)]
pub struct FileStore {
    paths: StickyPaths,
}

impl FileStore {
    pub fn new(paths: StickyPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StickyPaths {
        &self.paths
    }
}

fn writeFile(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(path, contents).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

impl NoteStore for FileStore {
    fn loadNote(&self) -> String {
        let path = &self.paths.noteFile;
        match fs::read(path) {
            Ok(bytes) => {
                tracing::debug!("[loadNote] Loaded {} bytes from {:?}", bytes.len(), path);
                match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(e) => {
                        // Invalid sequences become U+FFFD; the rest of the note is kept
                        tracing::warn!("[loadNote] {:?} is not valid UTF-8, decoding lossily", path);
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("[loadNote] No note at {:?}, starting empty", path);
                String::new()
            }
            Err(e) => {
                tracing::warn!("[loadNote] Could not read {:?}, starting empty: {}", path, e);
                String::new()
            }
        }
    }

    fn saveNote(&self, text: &str) -> Result<(), String> {
        writeFile(&self.paths.noteFile, text)
    }

    fn loadSettings(&self) -> Settings {
        let path = &self.paths.settingsFile;
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("[loadSettings] No settings at {:?}, using defaults", path);
                return Settings::default();
            }
            Err(e) => {
                tracing::warn!("[loadSettings] Could not read {:?}, using defaults: {}", path, e);
                return Settings::default();
            }
        };

        match parseFrontmatter::<Settings>(&content) {
            Ok((settings, _)) => settings.sanitized(),
            Err(e) => {
                tracing::warn!("[loadSettings] Malformed settings in {:?}, using defaults: {}", path, e);
                Settings::default()
            }
        }
    }

    fn saveSettings(&self, settings: &Settings) -> Result<(), String> {
        let content = toMarkdown(settings, SETTINGS_BODY)?;
        writeFile(&self.paths.settingsFile, &content)
    }
}
