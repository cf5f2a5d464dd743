//! Session settings and the persisted state snapshot

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::roster::Mobber;

pub const DEFAULT_SECONDS_PER_TURN: i64 = 600;
pub const DEFAULT_SECONDS_UNTIL_FULLSCREEN: i64 = 30;
pub const DEFAULT_SNAP_THRESHOLD: i64 = 25;
pub const DEFAULT_CLIPBOARD_HISTORY_ITEMS: u32 = 25;

/// Alert offsets used when none are configured
pub fn default_alert_sound_times() -> Vec<i64> {
    vec![0]
}

/// Every configurable session setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub seconds_per_turn: i64,
    pub seconds_until_fullscreen: i64,
    pub snap_threshold: i64,
    pub alert_sound: Option<String>,
    pub alert_sound_times: Vec<i64>,
    pub timer_always_on_top: bool,
    pub shuffle_mobbers_on_startup: bool,
    pub clear_clipboard_history_on_turn_end: bool,
    pub number_of_items_clipboard_history_stores: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seconds_per_turn: DEFAULT_SECONDS_PER_TURN,
            seconds_until_fullscreen: DEFAULT_SECONDS_UNTIL_FULLSCREEN,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            alert_sound: None,
            alert_sound_times: default_alert_sound_times(),
            timer_always_on_top: true,
            shuffle_mobbers_on_startup: false,
            clear_clipboard_history_on_turn_end: false,
            number_of_items_clipboard_history_stores: DEFAULT_CLIPBOARD_HISTORY_ITEMS,
        }
    }
}

impl Settings {
    /// Apply the settings found in a persisted record.
    ///
    /// Numeric fields and `timerAlwaysOnTop` are only taken when present with
    /// the right type. The alert and opt-in fields fall back to their
    /// defaults when missing or malformed.
    pub fn restore_from(&mut self, state: &Value) {
        if let Some(seconds) = integer_field(state, "secondsPerTurn") {
            self.seconds_per_turn = seconds.max(1);
        }
        if let Some(seconds) = integer_field(state, "secondsUntilFullscreen") {
            self.seconds_until_fullscreen = seconds;
        }
        if let Some(threshold) = integer_field(state, "snapThreshold") {
            self.snap_threshold = threshold;
        }

        self.alert_sound = state
            .get("alertSound")
            .and_then(Value::as_str)
            .filter(|sound| !sound.is_empty())
            .map(str::to_string);
        self.alert_sound_times = state
            .get("alertSoundTimes")
            .and_then(Value::as_array)
            .map(|times| times.iter().filter_map(as_integer).collect())
            .unwrap_or_else(default_alert_sound_times);

        if let Some(on_top) = state.get("timerAlwaysOnTop").and_then(Value::as_bool) {
            self.timer_always_on_top = on_top;
        }
        self.shuffle_mobbers_on_startup = bool_field(state, "shuffleMobbersOnStartup");
        self.clear_clipboard_history_on_turn_end =
            bool_field(state, "clearClipboardHistoryOnTurnEnd");
        self.number_of_items_clipboard_history_stores = state
            .get("numberOfItemsClipboardHistoryStores")
            .map(clipboard_history_items)
            .unwrap_or(1);
    }
}

/// Flat record of every setting plus the turn position, used for persistence
/// and for `configUpdated` events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub mobbers: Vec<Mobber>,
    #[serde(flatten)]
    pub settings: Settings,
    pub current_mobber: usize,
    pub seconds_remaining: i64,
}

/// Mobber records from a persisted state, skipping malformed entries
pub fn restore_mobbers(state: &Value) -> Vec<Mobber> {
    let Some(records) = state.get("mobbers").and_then(Value::as_array) else {
        return Vec::new();
    };
    records
        .iter()
        .filter_map(|record| match serde_json::from_value::<Mobber>(record.clone()) {
            Ok(mobber) => Some(mobber),
            Err(e) => {
                warn!("Skipping malformed mobber record {}: {}", record, e);
                None
            }
        })
        .collect()
}

/// Current-turn pointer from a persisted state, if it is a valid index value
pub fn restore_current_mobber(state: &Value) -> Option<usize> {
    state
        .get("currentMobber")
        .and_then(Value::as_u64)
        .and_then(|index| usize::try_from(index).ok())
}

/// Coerce a clipboard history size to a positive integer
pub fn clipboard_history_items(value: &Value) -> u32 {
    match value.as_f64().filter(|n| n.is_finite()).map(f64::floor) {
        Some(items) if items >= 1.0 => items.min(f64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

fn integer_field(state: &Value, key: &str) -> Option<i64> {
    state.get(key).and_then(as_integer)
}

fn bool_field(state: &Value, key: &str) -> bool {
    state.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite())
            .map(|n| n.floor() as i64)
    })
}
