//! Engine event listener background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::{
    engine::{Settings, TurnEvent},
    state::AppState,
};

/// The alert sound to play `seconds` into alerting, if one is scheduled then
pub fn alert_sound_due(settings: &Settings, seconds: i64) -> Option<&str> {
    let sound = settings.alert_sound.as_deref()?;
    settings.alert_sound_times.contains(&seconds).then_some(sound)
}

/// Background task that logs engine events, reports due alert sounds and
/// persists the snapshot whenever the configuration changes
pub async fn event_listener_task(state: Arc<AppState>) {
    info!("Starting event listener task");

    let mut event_rx = state.subscribe();
    let mut settings = match state.read_engine(|engine| engine.settings().clone()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to read engine settings: {}", e);
            Settings::default()
        }
    };

    loop {
        match event_rx.recv().await {
            Ok(TurnEvent::ConfigUpdated(snapshot)) => {
                settings = snapshot.settings.clone();
                let capacity = settings.number_of_items_clipboard_history_stores as usize;
                if let Err(e) = state.clipboard.set_capacity(capacity) {
                    error!("Failed to resize clipboard history: {}", e);
                }
                if let Err(e) = state.store.save(&snapshot).await {
                    error!("Failed to persist state: {}", e);
                }
            }
            Ok(TurnEvent::Alert { seconds }) => match alert_sound_due(&settings, seconds) {
                Some(sound) => info!("Alert {}s after turn end, playing {}", seconds, sound),
                None => debug!("Alert {}s after turn end", seconds),
            },
            Ok(TurnEvent::TurnEnded) => info!("Turn ended"),
            Ok(TurnEvent::Rotated { current, next, .. }) => {
                info!(
                    "Now up: {} (next: {})",
                    current.as_ref().map_or("nobody", |m| m.name.as_str()),
                    next.as_ref().map_or("nobody", |m| m.name.as_str()),
                );
            }
            Ok(TurnEvent::TimerChange { time_remaining, .. }) => {
                debug!("Time remaining: {}", time_remaining);
            }
            Ok(event) => debug!("Engine event: {}", event.name()),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Event listener lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping event listener");
                break;
            }
        }
    }
}
