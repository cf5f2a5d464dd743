//! Collaborator services module
//!
//! This module contains the clipboard history the engine trims at turn end
//! and the file store that persists session state.

pub mod clipboard;
pub mod store;

// Re-export main types
pub use clipboard::{ClipboardHistory, SharedClipboardHistory};
pub use store::StateStore;
