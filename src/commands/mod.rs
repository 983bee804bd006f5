// Commands module - exports all command handlers
// Submodules must be public for Tauri's generate_handler! macro

pub mod common;
pub mod note;
pub mod window;
