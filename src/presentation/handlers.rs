// HTTP request handlers
use crate::application::sensor_service::SensorSnapshot;
use crate::domain::sensor::{CalibrationAction, CalibrationStatus, SensorCommand};
use crate::domain::series::FeedSnapshot;
use crate::domain::system::{ResourceSample, SystemStatus};
use crate::presentation::app_state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub file: String,
}

#[derive(Debug, Serialize)]
pub struct SelectionView {
    pub file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KnownWeightRequest {
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct DatasetList {
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SystemView {
    pub latest: Option<SystemStatus>,
    pub history: Vec<ResourceSample>,
}

#[derive(Debug, Serialize)]
pub struct RecordingView {
    pub runtime: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the selectable data files
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<DatasetList> {
    match state.dataset_service.list_datasets().await {
        Ok(files) => Json(DatasetList { files }),
        Err(e) => {
            tracing::error!("Error fetching datasets: {:#}", e);
            // Return empty list on error
            Json(DatasetList { files: Vec::new() })
        }
    }
}

/// Switch the chart to another dataset; the load runs in the background
pub async fn select_dataset(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> StatusCode {
    match state.feed.select(&request.file).await {
        Some(_) => StatusCode::ACCEPTED,
        None => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

pub async fn current_selection(State(state): State<Arc<AppState>>) -> Json<SelectionView> {
    Json(SelectionView {
        file: state.feed.selected().await,
    })
}

pub async fn get_series(State(state): State<Arc<AppState>>) -> Json<FeedSnapshot> {
    Json(state.feed.snapshot().await)
}

pub async fn reload_series(State(state): State<Arc<AppState>>) -> Json<FeedSnapshot> {
    let outcome = state.feed.reload().await;
    tracing::debug!("Reload finished: {:?}", outcome);
    Json(state.feed.snapshot().await)
}

pub async fn system_history(State(state): State<Arc<AppState>>) -> Json<SystemView> {
    Json(SystemView {
        latest: state.monitor.latest().await,
        history: state.monitor.history().await,
    })
}

pub async fn recording_runtime(State(state): State<Arc<AppState>>) -> Json<RecordingView> {
    Json(RecordingView {
        runtime: state.recording.runtime(Local::now()).await,
    })
}

pub async fn sensor_state(State(state): State<Arc<AppState>>) -> Json<SensorSnapshot> {
    Json(state.sensor.snapshot().await)
}

pub async fn start_sensor(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SensorCommand>) {
    sensor_reply(state.sensor.start().await, "Error starting sensor loop")
}

pub async fn stop_sensor(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SensorCommand>) {
    sensor_reply(state.sensor.stop().await, "Error stopping sensor loop")
}

pub async fn calibrate_start(State(state): State<Arc<AppState>>) -> Json<CalibrationStatus> {
    Json(state.sensor.calibrate(CalibrationAction::Start).await)
}

pub async fn calibrate_read_weight(State(state): State<Arc<AppState>>) -> Json<CalibrationStatus> {
    Json(state.sensor.calibrate(CalibrationAction::ReadWeight).await)
}

pub async fn calibrate_known_weight(
    State(state): State<Arc<AppState>>,
    Json(request): Json<KnownWeightRequest>,
) -> Json<CalibrationStatus> {
    Json(
        state
            .sensor
            .calibrate(CalibrationAction::SetKnownWeight(request.weight))
            .await,
    )
}

fn sensor_reply(
    result: anyhow::Result<SensorCommand>,
    failure: &str,
) -> (StatusCode, Json<SensorCommand>) {
    match result {
        Ok(reply) => (StatusCode::OK, Json(reply)),
        Err(e) => {
            tracing::error!("{}: {:#}", failure, e);
            let reply = SensorCommand {
                message: failure.to_string(),
                filename: None,
            };
            (StatusCode::BAD_GATEWAY, Json(reply))
        }
    }
}
