//! External service module
//!
//! This module contains the durable preference store the timer is
//! snapshotted into across suspension.

pub mod preferences;

// Re-export main types
pub use preferences::{JsonFileStore, MemoryStore, PreferenceStore, Preferences};
