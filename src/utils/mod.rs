//! Utility functions module
//!
//! Process-level helpers for the mob-timer daemon.

pub mod signals;

pub use signals::shutdown_signal;
