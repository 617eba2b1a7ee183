// HTTP request handlers
use crate::application::monitor::Monitor;
use crate::application::poller::PollOutcome;
use crate::application::reducers::body_assembly::BODY_ASSEMBLY_MONITOR;
use crate::domain::summary::MainDashboard;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;

#[derive(Serialize)]
pub struct RefreshResponse {
    pub outcome: PollOutcome,
    pub state: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfidenceSetting {
    pub conf: f64,
}

fn find_monitor(state: &AppState, name: &str) -> Result<Arc<dyn Monitor>, StatusCode> {
    state.monitors.get(name).ok_or(StatusCode::NOT_FOUND)
}

fn render(monitor: &dyn Monitor) -> Result<Value, StatusCode> {
    monitor.current().map_err(|e| {
        tracing::error!("Failed to render monitor {}: {}", monitor.name(), e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Names of all configured monitors
pub async fn list_monitors(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.monitors.names())
}

/// Current state of one monitor
pub async fn get_monitor(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, StatusCode> {
    let monitor = find_monitor(&state, &name)?;
    Ok(Json(render(monitor.as_ref())?))
}

/// Server-sent events: the current state, then one frame per change
pub async fn monitor_events(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let monitor = find_monitor(&state, &name)?;

    let stream = monitor.watch().filter_map(move |frame| {
        let name = name.clone();
        async move {
            match frame {
                Ok(value) => Some(Ok(Event::default().data(value.to_string()))),
                Err(e) => {
                    tracing::error!("Failed to render monitor {}: {}", name, e);
                    None
                }
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Poll right now, outside the timer (skipped if a request is in flight)
pub async fn refresh_monitor(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, StatusCode> {
    let monitor = find_monitor(&state, &name)?;
    let outcome = monitor.refresh_now().await;
    tracing::info!("Manual refresh of {}: {:?}", name, outcome);

    Ok(Json(RefreshResponse {
        outcome,
        state: render(monitor.as_ref())?,
    }))
}

/// Clear snapshot, histories, accumulators and logs
pub async fn reset_monitor(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, StatusCode> {
    let monitor = find_monitor(&state, &name)?;
    monitor.reset();
    tracing::info!("Reset monitor {}", name);
    Ok(Json(render(monitor.as_ref())?))
}

/// Current `conf` threshold sent with body-assembly batch requests
pub async fn get_body_confidence(State(state): State<Arc<AppState>>) -> Json<ConfidenceSetting> {
    Json(ConfidenceSetting {
        conf: state.body_confidence.get(),
    })
}

/// Change the threshold and poll once right away with the new value
pub async fn set_body_confidence(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfidenceSetting>,
) -> Result<Json<ConfidenceSetting>, (StatusCode, String)> {
    let previous = state
        .body_confidence
        .set(update.conf)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    tracing::info!("Body assembly confidence changed {} -> {}", previous, update.conf);

    if let Some(monitor) = state.monitors.get(BODY_ASSEMBLY_MONITOR) {
        let outcome = monitor.refresh_now().await;
        tracing::debug!("Refresh after confidence change: {:?}", outcome);
    }

    Ok(Json(ConfidenceSetting {
        conf: state.body_confidence.get(),
    }))
}

/// Plant-wide aggregate numbers for the landing view
pub async fn main_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MainDashboard>, StatusCode> {
    match state.summary_service.main_dashboard().await {
        Ok(dashboard) => Ok(Json(dashboard)),
        Err(e) => {
            tracing::warn!("Error fetching main dashboard: {:#}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
