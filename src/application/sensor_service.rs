// Sensor monitor - Live weight readings, logging loop control and calibration
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::sensor::{
    CalibrationAction, CalibrationStatus, CalibrationStep, LiveReading, SensorCommand,
    SensorStatus, valid_known_weight,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub running: bool,
    pub last_calibration: Option<f64>,
    /// Only present while the logging loop runs.
    pub reading: Option<LiveReading>,
    pub calibration: Option<CalibrationStatus>,
}

#[derive(Clone)]
pub struct SensorMonitor {
    repository: Arc<dyn DashboardRepository>,
    state: Arc<RwLock<SensorSnapshot>>,
}

impl SensorMonitor {
    pub fn new(repository: Arc<dyn DashboardRepository>) -> Self {
        Self {
            repository,
            state: Arc::new(RwLock::new(SensorSnapshot::default())),
        }
    }

    /// Ask the backend whether the logging loop runs. An unreachable backend
    /// counts as stopped with no calibration.
    pub async fn refresh_status(&self) -> SensorStatus {
        let status = match self.repository.sensor_status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!("Sensor status unavailable: {:#}", e);
                SensorStatus::default()
            }
        };

        let mut state = self.state.write().await;
        state.running = status.running;
        state.last_calibration = status.last_calibration;
        if !status.running {
            state.reading = None;
        }
        status
    }

    /// Fetch one live reading while the loop runs.
    pub async fn poll_once(&self) {
        if !self.state.read().await.running {
            return;
        }

        let reading = match self.repository.sensor_value().await {
            Ok(Some(raw)) => LiveReading::from_raw(raw),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Sensor value poll failed: {:#}", e);
                None
            }
        };

        let mut state = self.state.write().await;
        // The loop may have been stopped while the request was out
        if state.running {
            state.reading = reading;
        }
    }

    /// Poll on a fixed interval until the returned handle is aborted.
    pub fn spawn(&self, interval: Duration) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                monitor.poll_once().await;
            }
        })
    }

    pub async fn start(&self) -> anyhow::Result<SensorCommand> {
        let reply = self.repository.start_sensor().await?;
        tracing::info!("Sensor loop started: {}", reply.message);

        let mut state = self.state.write().await;
        state.running = true;
        Ok(reply)
    }

    /// Stop the logging loop; the reply names the data file that was written.
    pub async fn stop(&self) -> anyhow::Result<SensorCommand> {
        let reply = self.repository.stop_sensor().await?;
        tracing::info!("Sensor loop stopped, data in {:?}", reply.filename);

        let mut state = self.state.write().await;
        state.running = false;
        state.reading = None;
        Ok(reply)
    }

    /// Run one calibration step. Failures come back as an `error` step.
    pub async fn calibrate(&self, action: CalibrationAction) -> CalibrationStatus {
        let status = match action {
            CalibrationAction::SetKnownWeight(grams) if !valid_known_weight(grams) => {
                CalibrationStatus {
                    step: CalibrationStep::EnterWeight,
                    message: "Please enter a valid number for known weight.".to_string(),
                }
            }
            _ => match self.repository.calibrate(action).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!("Calibration step {} failed: {:#}", action.path(), e);
                    CalibrationStatus::error(action.failure_message())
                }
            },
        };

        if status.is_done() {
            tracing::info!("{}", status.message);
            self.refresh_status().await;
        }

        self.state.write().await.calibration = Some(status.clone());
        status
    }

    pub async fn snapshot(&self) -> SensorSnapshot {
        self.state.read().await.clone()
    }
}
