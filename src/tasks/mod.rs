//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod event_listener;
pub mod turn_ticker;

// Re-export main functions
pub use event_listener::event_listener_task;
pub use turn_ticker::turn_ticker_task;
