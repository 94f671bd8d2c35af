// Scale backend repository over REST/JSON
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::recording::{RECORD_MODE, VideoStatus};
use crate::domain::sensor::{
    CalibrationAction, CalibrationStatus, CalibrationStep, SensorCommand, SensorStatus,
};
use crate::domain::series::DataPoint;
use crate::domain::system::SystemStatus;
use crate::infrastructure::error::BackendError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpRepository {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    #[serde(default)]
    data: Vec<WirePoint>,
}

/// Field names are capitalized on the wire. Both fields are read loosely so
/// one malformed sample cannot fail the whole response.
#[derive(Debug, Deserialize)]
struct WirePoint {
    #[serde(rename = "Timestamp", default)]
    timestamp: serde_json::Value,
    #[serde(rename = "Value", default)]
    value: serde_json::Value,
}

impl WirePoint {
    fn into_point(self) -> DataPoint {
        let timestamp = self.timestamp.as_str().unwrap_or_default().to_string();
        let value = self.value.as_f64().unwrap_or(f64::NAN);
        DataPoint::new(timestamp, value)
    }
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SystemStatusResponse {
    #[serde(default)]
    cpu_percent: f64,
    #[serde(default)]
    ram_percent: f64,
    #[serde(default)]
    ram_used: u64,
    #[serde(default)]
    ram_total: u64,
    #[serde(default)]
    timestamp: f64,
}

impl From<SystemStatusResponse> for SystemStatus {
    fn from(r: SystemStatusResponse) -> Self {
        SystemStatus {
            cpu_percent: r.cpu_percent,
            ram_percent: r.ram_percent,
            ram_used: r.ram_used,
            ram_total: r.ram_total,
            timestamp: r.timestamp,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideoStatusResponse {
    #[serde(default)]
    running: bool,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl From<VideoStatusResponse> for VideoStatus {
    fn from(r: VideoStatusResponse) -> Self {
        VideoStatus {
            running: r.running,
            mode: r.mode,
            filename: r.filename,
            error: r.error,
        }
    }
}

#[derive(Debug, Serialize)]
struct StartVideoRequest<'a> {
    mode: &'a str,
    filename: &'a str,
}

#[derive(Debug, Deserialize)]
struct SensorStatusResponse {
    #[serde(default)]
    running: bool,
    #[serde(default)]
    last_calibration: Option<f64>,
}

impl From<SensorStatusResponse> for SensorStatus {
    fn from(r: SensorStatusResponse) -> Self {
        SensorStatus {
            running: r.running,
            last_calibration: r.last_calibration,
        }
    }
}

/// The reading may be absent or a placeholder string before the first sample.
#[derive(Debug, Deserialize)]
struct SensorValueResponse {
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SensorCommandResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    filename: Option<String>,
}

impl From<SensorCommandResponse> for SensorCommand {
    fn from(r: SensorCommandResponse) -> Self {
        SensorCommand {
            message: r.message,
            filename: r.filename,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CalibrationResponse {
    #[serde(default)]
    step: String,
    #[serde(default)]
    message: String,
}

impl From<CalibrationResponse> for CalibrationStatus {
    fn from(r: CalibrationResponse) -> Self {
        CalibrationStatus {
            step: CalibrationStep::from_wire(&r.step),
            message: r.message,
        }
    }
}

#[derive(Debug, Serialize)]
struct KnownWeightRequest {
    weight: f64,
}

impl HttpRepository {
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn dataset_url(&self, dataset_id: &str) -> String {
        format!(
            "{}/dashboard?file={}",
            self.base_url,
            urlencoding::encode(dataset_id)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| BackendError::request(url, e))?;

        Self::decode(url, response).await
    }

    async fn post<B: Serialize>(
        &self,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, BackendError> {
        let response = self.send_post(url, body).await?;
        Self::check_status(url, response).await
    }

    async fn send_post<B: Serialize>(
        &self,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, BackendError> {
        let mut request = self.client.post(url).header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| BackendError::request(url, e))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<&B>,
    ) -> Result<T, BackendError> {
        let response = self.send_post(url, body).await?;
        Self::decode(url, response).await
    }

    async fn check_status(
        url: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            url: url.to_string(),
            status,
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        Self::check_status(url, response)
            .await?
            .json::<T>()
            .await
            .map_err(|source| BackendError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl DashboardRepository for HttpRepository {
    async fn fetch_dataset(&self, dataset_id: &str) -> Result<Vec<DataPoint>> {
        let url = self.dataset_url(dataset_id);
        tracing::debug!("Fetching dataset from {}", url);

        let response: DashboardResponse = self.get_json(&url).await?;
        Ok(response
            .data
            .into_iter()
            .map(WirePoint::into_point)
            .collect())
    }

    async fn list_datasets(&self) -> Result<Vec<String>> {
        let response: FileListResponse = self.get_json(&self.endpoint("list-csv")).await?;
        Ok(response.files)
    }

    async fn system_status(&self) -> Result<SystemStatus> {
        let url = self.endpoint("system-status");
        let response: SystemStatusResponse = self.get_json(&url).await?;
        Ok(response.into())
    }

    async fn video_status(&self) -> Result<VideoStatus> {
        let url = self.endpoint("video/status");
        let response: VideoStatusResponse = self.get_json(&url).await?;
        Ok(response.into())
    }

    async fn stop_video(&self) -> Result<()> {
        self.post::<()>(&self.endpoint("video/stop"), None).await?;
        Ok(())
    }

    async fn start_video(&self, filename: &str) -> Result<VideoStatus> {
        let url = self.endpoint("video/start");
        let body = StartVideoRequest {
            mode: RECORD_MODE,
            filename,
        };

        let status: VideoStatusResponse = self.post_json(&url, Some(&body)).await?;
        Ok(status.into())
    }

    async fn sensor_status(&self) -> Result<SensorStatus> {
        let url = self.endpoint("sensor/status");
        let response: SensorStatusResponse = self.get_json(&url).await?;
        Ok(response.into())
    }

    async fn sensor_value(&self) -> Result<Option<f64>> {
        let url = self.endpoint("sensor/value");
        let response: SensorValueResponse = self.get_json(&url).await?;
        Ok(response.value.as_f64())
    }

    async fn start_sensor(&self) -> Result<SensorCommand> {
        let url = self.endpoint("sensor/start");
        let response: SensorCommandResponse = self.post_json::<(), _>(&url, None).await?;
        Ok(response.into())
    }

    async fn stop_sensor(&self) -> Result<SensorCommand> {
        let url = self.endpoint("sensor/stop");
        let response: SensorCommandResponse = self.post_json::<(), _>(&url, None).await?;
        Ok(response.into())
    }

    async fn calibrate(&self, action: CalibrationAction) -> Result<CalibrationStatus> {
        let url = self.endpoint(action.path());
        let response = match action {
            CalibrationAction::SetKnownWeight(weight) => {
                self.send_post(&url, Some(&KnownWeightRequest { weight })).await?
            }
            _ => self.send_post::<()>(&url, None).await?,
        };

        // A rejected step still carries the calibration state and its message
        if response.status().is_client_error() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<CalibrationResponse>(&body) {
                Ok(reply) if !reply.message.is_empty() => Ok(CalibrationStatus {
                    step: CalibrationStep::Error,
                    message: reply.message,
                }),
                _ => Err(BackendError::Status { url, status, body }.into()),
            };
        }

        let reply: CalibrationResponse = Self::decode(&url, response).await?;
        Ok(reply.into())
    }
}
