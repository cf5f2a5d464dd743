//! mob-timer - A turn-rotation and countdown timer for mob programming
//!
//! This is the main entry point for the mob-timer daemon.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use mob_timer::{
    api::create_router,
    config::Config,
    services::StateStore,
    state::AppState,
    tasks::{event_listener_task, turn_ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("mob_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting mob-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, state_file={}, tick={}ms",
          config.host, config.port, config.state_file.display(), config.tick_millis);

    let store = StateStore::new(config.state_file.clone());
    let state = Arc::new(AppState::new(config.port, config.host.clone(), store.clone()));

    // Restore the previous session, falling back to defaults
    match store.load().await {
        Ok(Some(saved)) => {
            if let Err(e) = state.restore(&saved) {
                warn!("Failed to restore saved state: {}", e);
            }
        }
        Ok(None) => {}
        Err(e) => warn!("Ignoring unreadable state file: {}", e),
    }

    let listener_state = Arc::clone(&state);
    let listener_task = tokio::spawn(async move {
        event_listener_task(listener_state).await;
    });

    let ticker_state = Arc::clone(&state);
    let tick_interval = config.tick_interval();
    let ticker_task = tokio::spawn(async move {
        turn_ticker_task(ticker_state, tick_interval).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timer/start            - Start or resume the turn");
    info!("  POST   /timer/start-remaining  - Resume a turn already under way");
    info!("  POST   /timer/pause            - Pause the turn");
    info!("  POST   /timer/reset            - Reset the turn to full length");
    info!("  POST   /timer/rotate           - Hand over to the next mobber");
    info!("  GET    /timer                  - Timer status");
    info!("  GET    /state                  - Session snapshot");
    info!("  PUT    /settings               - Update settings");
    info!("  POST   /mobbers                - Add a mobber");
    info!("  PUT    /mobbers/:id            - Update a mobber");
    info!("  DELETE /mobbers/:id            - Remove a mobber");
    info!("  POST   /mobbers/shuffle        - Shuffle the roster");
    info!("  GET    /clipboard              - Clipboard history");
    info!("  POST   /clipboard              - Record a clipboard entry");
    info!("  GET    /health                 - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Stop the background tasks so no autosave lands after the final save
    ticker_task.abort();
    listener_task.abort();
    let _ = ticker_task.await;
    let _ = listener_task.await;

    // Persist the final session state
    match state.snapshot() {
        Ok(snapshot) => {
            if let Err(e) = store.save(&snapshot).await {
                error!("Failed to save state on shutdown: {}", e);
            }
        }
        Err(e) => error!("Failed to read state on shutdown: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
