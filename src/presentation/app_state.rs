// Application state for HTTP handlers
use crate::application::dataset_service::DatasetService;
use crate::application::feed_service::TimeSeriesFeed;
use crate::application::monitor_service::SystemMonitorService;
use crate::application::recording_service::RecordingSupervisor;
use crate::application::sensor_service::SensorMonitor;

#[derive(Clone)]
pub struct AppState {
    pub dataset_service: DatasetService,
    pub feed: TimeSeriesFeed,
    pub monitor: SystemMonitorService,
    pub recording: RecordingSupervisor,
    pub sensor: SensorMonitor,
}
