// Repository trait for scale backend access
use crate::domain::recording::VideoStatus;
use crate::domain::sensor::{CalibrationAction, CalibrationStatus, SensorCommand, SensorStatus};
use crate::domain::series::DataPoint;
use crate::domain::system::SystemStatus;
use async_trait::async_trait;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Fetch the raw samples of one dataset file, in backend order
    async fn fetch_dataset(&self, dataset_id: &str) -> anyhow::Result<Vec<DataPoint>>;

    /// List the data files the backend has captured
    async fn list_datasets(&self) -> anyhow::Result<Vec<String>>;

    /// Current host resource usage
    async fn system_status(&self) -> anyhow::Result<SystemStatus>;

    async fn video_status(&self) -> anyhow::Result<VideoStatus>;

    async fn stop_video(&self) -> anyhow::Result<()>;

    /// Start a recording under `filename`
    async fn start_video(&self, filename: &str) -> anyhow::Result<VideoStatus>;

    async fn sensor_status(&self) -> anyhow::Result<SensorStatus>;

    /// Latest weight; `None` when the backend has no numeric reading
    async fn sensor_value(&self) -> anyhow::Result<Option<f64>>;

    async fn start_sensor(&self) -> anyhow::Result<SensorCommand>;

    async fn stop_sensor(&self) -> anyhow::Result<SensorCommand>;

    /// Advance the calibration flow by one step
    async fn calibrate(&self, action: CalibrationAction) -> anyhow::Result<CalibrationStatus>;
}
