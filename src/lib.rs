//! mob-timer - Turn rotation and countdown engine for mob programming
//!
//! This library provides the turn engine that decides whose turn it is,
//! counts the turn down and raises alerts once it ends, along with the
//! HTTP daemon that hosts it.

pub mod api;
pub mod config;
pub mod engine;
pub mod roster;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{TurnEngine, TurnEvent, TurnPhase};
pub use roster::{Mobber, Mobbers, Roster};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
