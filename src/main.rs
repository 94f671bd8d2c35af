// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

use crate::application::dataset_service::DatasetService;
use crate::application::feed_service::TimeSeriesFeed;
use crate::application::monitor_service::SystemMonitorService;
use crate::application::recording_service::RecordingSupervisor;
use crate::application::sensor_service::SensorMonitor;
use crate::domain::dataset::DatasetFilter;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_repository::HttpRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    calibrate_known_weight, calibrate_read_weight, calibrate_start, current_selection,
    get_series, health_check, list_datasets, recording_runtime, reload_series, select_dataset,
    sensor_state, start_sensor, stop_sensor, system_history,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (RUST_LOG)
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpRepository::new(
        config.backend.base_url.clone(),
        config.backend.timeout(),
    )?);

    // Create services (application layer)
    let filter = DatasetFilter::new(config.feed.dataset_suffix.clone());
    let dataset_service = DatasetService::new(repository.clone(), filter.clone());
    let feed = TimeSeriesFeed::new(repository.clone(), filter, config.feed.window_size);
    let monitor = SystemMonitorService::new(repository.clone(), config.monitor.history_len);
    let recording =
        RecordingSupervisor::new(repository.clone(), config.recording.rollover_delay());
    let sensor = SensorMonitor::new(repository);

    let sensor_status = sensor.refresh_status().await;
    tracing::info!("Sensor loop running: {}", sensor_status.running);

    // Background pollers
    let _monitor_task = monitor.spawn(config.monitor.poll_interval());
    let _recording_task = recording.spawn(config.recording.tick_interval());
    let _sensor_task = sensor.spawn(config.sensor.poll_interval());

    // Create application state
    let state = Arc::new(AppState {
        dataset_service,
        feed,
        monitor,
        recording,
        sensor,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/datasets", get(list_datasets))
        .route("/selection", get(current_selection).put(select_dataset))
        .route("/series", get(get_series))
        .route("/series/reload", post(reload_series))
        .route("/system", get(system_history))
        .route("/recording", get(recording_runtime))
        .route("/sensor", get(sensor_state))
        .route("/sensor/start", post(start_sensor))
        .route("/sensor/stop", post(stop_sensor))
        .route("/sensor/calibrate/start", post(calibrate_start))
        .route("/sensor/calibrate/read_weight", post(calibrate_read_weight))
        .route("/sensor/calibrate/set_known_weight", post(calibrate_known_weight))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting scale-dashboard on {} (backend {})",
        addr,
        config.backend.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
