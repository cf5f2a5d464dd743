//! Turn ticker background task

use std::{sync::Arc, time::Duration};
use tracing::{error, info};

use crate::state::AppState;

/// Background task that advances the engine clocks once per tick interval
pub async fn turn_ticker_task(state: Arc<AppState>, tick_interval: Duration) {
    info!("Starting turn ticker task ({}ms per tick)", tick_interval.as_millis());

    let mut interval = tokio::time::interval(tick_interval);
    // The first tick completes immediately; skip it so a second passes first
    interval.tick().await;

    loop {
        interval.tick().await;

        if let Err(e) = state.tick() {
            error!("Failed to tick turn engine: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::StateStore;

    #[tokio::test(start_paused = true)]
    async fn ticker_counts_down_running_turn() {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), StateStore::new("unused.json")));
        state.update_engine("start", |engine| engine.start()).unwrap();

        let ticker = tokio::spawn(turn_ticker_task(Arc::clone(&state), Duration::from_secs(1)));
        tokio::time::sleep(Duration::from_millis(3500)).await;
        ticker.abort();

        assert_eq!(state.snapshot().unwrap().seconds_remaining, 597);
    }
}
