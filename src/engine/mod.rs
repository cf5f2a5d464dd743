//! Turn engine module
//!
//! This module contains the turn/timer state machine, the clocks it drives,
//! the events it emits and the snapshot it persists.

pub mod clock;
pub mod events;
pub mod format;
pub mod snapshot;
pub mod turn_engine;


// Re-export main types
pub use clock::{Clock, ClockPair, CountDirection, TickClock};
pub use events::{EventCallback, TurnEvent};
pub use format::get_time_remaining;
pub use snapshot::{Settings, StateSnapshot, DEFAULT_CLIPBOARD_HISTORY_ITEMS};
pub use turn_engine::{TurnEngine, TurnPhase};
