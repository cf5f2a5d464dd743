//! Outbound events emitted by the turn engine

use serde::{Deserialize, Serialize};

use crate::roster::Mobber;

use super::snapshot::StateSnapshot;

/// Every observable state change, in emission order.
///
/// Serializes as `{"event": "<name>", "payload": {...}}`; unit events carry
/// no payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum TurnEvent {
    #[serde(rename_all = "camelCase")]
    TimerChange {
        seconds_remaining: i64,
        time_remaining: String,
        seconds_per_turn: i64,
    },
    TurnEnded,
    Alert {
        seconds: i64,
    },
    StopAlerts,
    Started,
    Paused,
    #[serde(rename_all = "camelCase")]
    Rotated {
        current: Option<Mobber>,
        next: Option<Mobber>,
        time_remaining: String,
    },
    ConfigUpdated(StateSnapshot),
    #[serde(rename_all = "camelCase")]
    Initialized {
        current: Option<Mobber>,
        next: Option<Mobber>,
        time_remaining: String,
        is_timer_running: bool,
        is_time_remaining: bool,
    },
}

impl TurnEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            TurnEvent::TimerChange { .. } => "timerChange",
            TurnEvent::TurnEnded => "turnEnded",
            TurnEvent::Alert { .. } => "alert",
            TurnEvent::StopAlerts => "stopAlerts",
            TurnEvent::Started => "started",
            TurnEvent::Paused => "paused",
            TurnEvent::Rotated { .. } => "rotated",
            TurnEvent::ConfigUpdated(_) => "configUpdated",
            TurnEvent::Initialized { .. } => "initialized",
        }
    }
}

/// Receives engine events synchronously, in order
pub type EventCallback = Box<dyn FnMut(TurnEvent) + Send>;
