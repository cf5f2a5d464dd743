//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    engine::{TurnEngine, TurnPhase},
    roster::Mobber,
};

/// Where the turn stands and who is up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub phase: TurnPhase,
    pub seconds_remaining: i64,
    pub seconds_per_turn: i64,
    pub time_remaining: String,
    pub current: Option<Mobber>,
    pub next: Option<Mobber>,
}

impl TimerStatus {
    pub fn from_engine(engine: &TurnEngine) -> Self {
        let pair = engine.current_and_next();
        Self {
            phase: engine.phase(),
            seconds_remaining: engine.seconds_remaining(),
            seconds_per_turn: engine.settings().seconds_per_turn,
            time_remaining: engine.time_remaining(),
            current: pair.current,
            next: pair.next,
        }
    }
}

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerStatus,
}

impl ApiResponse {
    /// Create an ok response
    pub fn ok(message: String, timer: TimerStatus) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Status response with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerStatus,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Partial settings update; each present field is applied through its setter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub seconds_per_turn: Option<i64>,
    pub seconds_until_fullscreen: Option<i64>,
    pub snap_threshold: Option<i64>,
    /// An empty string clears the alert sound
    pub alert_sound: Option<String>,
    pub alert_sound_times: Option<Vec<i64>>,
    pub timer_always_on_top: Option<bool>,
    pub shuffle_mobbers_on_startup: Option<bool>,
    pub clear_clipboard_history_on_turn_end: Option<bool>,
    pub number_of_items_clipboard_history_stores: Option<i64>,
}

impl SettingsUpdate {
    /// Apply every present field, returning how many were applied
    pub fn apply(self, engine: &mut TurnEngine) -> usize {
        let mut applied = 0;

        if let Some(value) = self.seconds_until_fullscreen {
            engine.set_seconds_until_fullscreen(value);
            applied += 1;
        }
        if let Some(value) = self.snap_threshold {
            engine.set_snap_threshold(value);
            applied += 1;
        }
        if let Some(sound) = self.alert_sound {
            engine.set_alert_sound(Some(sound).filter(|s| !s.is_empty()));
            applied += 1;
        }
        if let Some(times) = self.alert_sound_times {
            engine.set_alert_sound_times(times);
            applied += 1;
        }
        if let Some(value) = self.timer_always_on_top {
            engine.set_timer_always_on_top(value);
            applied += 1;
        }
        if let Some(value) = self.shuffle_mobbers_on_startup {
            engine.set_shuffle_mobbers_on_startup(value);
            applied += 1;
        }
        if let Some(value) = self.clear_clipboard_history_on_turn_end {
            engine.set_clear_clipboard_history_on_turn_end(value);
            applied += 1;
        }
        if let Some(value) = self.number_of_items_clipboard_history_stores {
            engine.set_number_of_items_clipboard_history_stores(value);
            applied += 1;
        }
        // Last, since it resets the turn
        if let Some(value) = self.seconds_per_turn {
            engine.set_seconds_per_turn(value);
            applied += 1;
        }

        applied
    }
}

/// Request body for adding a mobber
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMobber {
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
}

/// Partial mobber update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobberUpdate {
    pub name: Option<String>,
    pub disabled: Option<bool>,
}

/// Request body for recording a clipboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub text: String,
}

/// Retained clipboard entries, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardResponse {
    pub entries: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
