//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    engine::{StateSnapshot, TurnEngine},
    roster::{Mobber, Roster},
    state::AppState,
};
use super::responses::{
    ApiResponse, ClipboardEntry, ClipboardResponse, HealthResponse, MobberUpdate, NewMobber,
    SettingsUpdate, StatusResponse, TimerStatus,
};

/// Run a timer command and report the resulting timer status
fn timer_command<F>(
    state: &AppState,
    action: &str,
    message: &str,
    command: F,
) -> Result<Json<ApiResponse>, StatusCode>
where
    F: FnOnce(&mut TurnEngine),
{
    match state.update_engine(action, |engine| {
        command(engine);
        TimerStatus::from_engine(engine)
    }) {
        Ok(timer) => {
            info!("{} endpoint called - {}", action, message);
            Ok(Json(ApiResponse::ok(message.to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to run {} command: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn snapshot_response(state: &AppState) -> Result<Json<StateSnapshot>, StatusCode> {
    state.snapshot().map(Json).map_err(|e| {
        error!("Failed to read state snapshot: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle POST /timer/start - Start or resume the turn
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_command(&state, "start", "Turn started", |engine| engine.start())
}

/// Handle POST /timer/start-remaining - Resume the turn only if it is under way
pub async fn start_remaining_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_command(&state, "start-remaining", "Resumed remaining turn time", |engine| {
        engine.start_remaining()
    })
}

/// Handle POST /timer/pause - Pause the turn
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_command(&state, "pause", "Turn paused", |engine| engine.pause())
}

/// Handle POST /timer/reset - Return the turn to full duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_command(&state, "reset", "Turn reset", |engine| engine.reset(false))
}

/// Handle POST /timer/rotate - Hand over to the next mobber
pub async fn rotate_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_command(&state, "rotate", "Rotated to next mobber", |engine| engine.rotate())
}

/// Handle GET /timer - Return the current timer status
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.read_engine(TimerStatus::from_engine) {
        Ok(timer) => timer,
        Err(e) => {
            error!("Failed to read timer status: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /state - Return the persisted-state snapshot
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Result<Json<StateSnapshot>, StatusCode> {
    snapshot_response(&state)
}

/// Handle PUT /settings - Apply a partial settings update
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<StateSnapshot>, StatusCode> {
    match state.update_engine("settings", |engine| update.apply(engine)) {
        Ok(applied) => info!("Settings endpoint called - {} settings applied", applied),
        Err(e) => {
            error!("Failed to apply settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
    snapshot_response(&state)
}

/// Handle POST /mobbers - Add a mobber
pub async fn add_mobber_handler(
    State(state): State<Arc<AppState>>,
    Json(new_mobber): Json<NewMobber>,
) -> Result<Json<StateSnapshot>, StatusCode> {
    let name = new_mobber.name.trim().to_string();
    if name.is_empty() {
        warn!("Rejected mobber with an empty name");
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let mobber = Mobber {
        id: String::new(),
        name,
        disabled: new_mobber.disabled,
    };
    if let Err(e) = state.update_engine("add-mobber", |engine| engine.add_mobber(mobber)) {
        error!("Failed to add mobber: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    snapshot_response(&state)
}

/// Handle PUT /mobbers/:id - Rename or enable/disable a mobber
pub async fn update_mobber_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<MobberUpdate>,
) -> Result<Json<StateSnapshot>, StatusCode> {
    let updated = state.update_engine("update-mobber", |engine| {
        let Some(existing) = engine.roster().all().iter().find(|m| m.id == id).cloned() else {
            return false;
        };
        engine.update_mobber(Mobber {
            name: update.name.unwrap_or(existing.name),
            disabled: update.disabled.unwrap_or(existing.disabled),
            id: existing.id,
        })
    });

    match updated {
        Ok(true) => snapshot_response(&state),
        Ok(false) => {
            warn!("Update requested for unknown mobber {}", id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            error!("Failed to update mobber: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /mobbers/:id - Remove a mobber
pub async fn remove_mobber_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StateSnapshot>, StatusCode> {
    match state.update_engine("remove-mobber", |engine| engine.remove_mobber(&id)) {
        Ok(true) => snapshot_response(&state),
        Ok(false) => {
            warn!("Removal requested for unknown mobber {}", id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            error!("Failed to remove mobber: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /mobbers/shuffle - Shuffle the roster order
pub async fn shuffle_mobbers_handler(State(state): State<Arc<AppState>>) -> Result<Json<StateSnapshot>, StatusCode> {
    if let Err(e) = state.update_engine("shuffle", |engine| engine.shuffle_mobbers()) {
        error!("Failed to shuffle mobbers: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    snapshot_response(&state)
}

/// Handle POST /clipboard - Record a copied entry
pub async fn record_clipboard_handler(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<ClipboardEntry>,
) -> Result<Json<ClipboardResponse>, StatusCode> {
    if let Err(e) = state.record_clipboard(entry.text) {
        error!("Failed to record clipboard entry: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    clipboard_handler(State(state)).await
}

/// Handle GET /clipboard - List retained clipboard entries
pub async fn clipboard_handler(State(state): State<Arc<AppState>>) -> Result<Json<ClipboardResponse>, StatusCode> {
    match state.clipboard.entries() {
        Ok(entries) => Ok(Json(ClipboardResponse { entries })),
        Err(e) => {
            error!("Failed to read clipboard history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
