// Models module for the sticky note
// All fields use camelCase to match the front end

pub mod config;
pub mod view;

pub use config::Settings;
pub use view::NoteView;
