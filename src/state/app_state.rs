//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{
    engine::{StateSnapshot, TurnEngine, TurnEvent},
    services::{SharedClipboardHistory, StateStore},
};

/// Capacity of the engine event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Main application state shared by the API handlers and background tasks
#[derive(Debug)]
pub struct AppState {
    /// The turn engine; every command and tick holds this lock to completion
    pub engine: Arc<Mutex<TurnEngine>>,
    /// Clipboard history the engine trims when a turn ends
    pub clipboard: SharedClipboardHistory,
    /// Where the session snapshot is persisted
    pub store: StateStore,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Engine events, in emission order
    pub event_tx: broadcast::Sender<TurnEvent>,
}

impl AppState {
    /// Create a new AppState with a default engine wired to the event channel
    pub fn new(port: u16, host: String, store: StateStore) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let clipboard = SharedClipboardHistory::new();

        let mut engine = TurnEngine::new();
        let tx = event_tx.clone();
        engine.set_callback(move |event: TurnEvent| {
            let name = event.name();
            if tx.send(event).is_err() {
                debug!("No listeners for {} event", name);
            }
        });
        engine.set_clipboard(clipboard.clone());

        Self {
            engine: Arc::new(Mutex::new(engine)),
            clipboard,
            store,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
        }
    }

    /// Restore a persisted session, shuffling the roster if configured to
    pub fn restore(&self, state: &Value) -> Result<(), String> {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock turn engine: {}", e))?;

        engine.load_state(state);
        if engine.settings().shuffle_mobbers_on_startup {
            info!("Shuffling mobbers on startup");
            engine.shuffle_mobbers();
        }
        let capacity = engine.settings().number_of_items_clipboard_history_stores;
        drop(engine);

        self.clipboard.set_capacity(capacity as usize)
    }

    /// Record a clipboard entry, bounded by the configured history size
    pub fn record_clipboard(&self, text: String) -> Result<usize, String> {
        let capacity = self.read_engine(|engine| {
            engine.settings().number_of_items_clipboard_history_stores
        })?;
        self.clipboard.set_capacity(capacity as usize)?;
        self.clipboard.record(text)
    }

    /// Run a command against the engine and record it as the last action
    pub fn update_engine<F, T>(&self, action: &str, command: F) -> Result<T, String>
    where
        F: FnOnce(&mut TurnEngine) -> T,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock turn engine: {}", e))?;

        let result = command(&mut engine);
        drop(engine); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        debug!("Applied engine command: {}", action);
        Ok(result)
    }

    /// Read from the engine without recording an action
    pub fn read_engine<F, T>(&self, reader: F) -> Result<T, String>
    where
        F: FnOnce(&TurnEngine) -> T,
    {
        self.engine.lock()
            .map(|engine| reader(&engine))
            .map_err(|e| format!("Failed to lock turn engine: {}", e))
    }

    /// Advance the engine clocks by one second
    pub fn tick(&self) -> Result<(), String> {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock turn engine: {}", e))?;
        engine.tick();
        Ok(())
    }

    /// Current persisted-state snapshot
    pub fn snapshot(&self) -> Result<StateSnapshot, String> {
        self.read_engine(|engine| engine.get_state())
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<TurnEvent> {
        self.event_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
