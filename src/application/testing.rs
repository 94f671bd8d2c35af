// In-memory repository for service tests
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::recording::VideoStatus;
use crate::domain::sensor::{CalibrationAction, CalibrationStatus, SensorCommand, SensorStatus};
use crate::domain::series::DataPoint;
use crate::domain::system::SystemStatus;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Default)]
pub struct FakeRepository {
    datasets: Mutex<HashMap<String, Result<Vec<DataPoint>, String>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    requests: Mutex<Vec<String>>,
    files: Mutex<Option<Vec<String>>>,
    statuses: Mutex<VecDeque<Result<SystemStatus, String>>>,
    video_statuses: Mutex<VecDeque<Result<VideoStatus, String>>>,
    video_calls: Mutex<Vec<String>>,
    video_stop_gate: Mutex<Option<oneshot::Receiver<()>>>,
    fail_video_start: Mutex<bool>,
    sensor_statuses: Mutex<VecDeque<Result<SensorStatus, String>>>,
    sensor_values: Mutex<VecDeque<Result<Option<f64>, String>>>,
    sensor_calls: Mutex<Vec<String>>,
    fail_sensor_commands: Mutex<bool>,
    calibration_replies: Mutex<VecDeque<Result<CalibrationStatus, String>>>,
}

impl FakeRepository {
    pub fn set_dataset(&self, dataset_id: &str, points: Vec<DataPoint>) {
        self.datasets
            .lock()
            .unwrap()
            .insert(dataset_id.to_string(), Ok(points));
    }

    pub fn fail_dataset(&self, dataset_id: &str) {
        self.datasets
            .lock()
            .unwrap()
            .insert(dataset_id.to_string(), Err("connection refused".to_string()));
    }

    /// Hold back the response for `dataset_id` until the sender fires.
    pub fn gate(&self, dataset_id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(dataset_id.to_string(), rx);
        tx
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn set_files(&self, files: Vec<String>) {
        *self.files.lock().unwrap() = Some(files);
    }

    pub fn fail_listing(&self) {
        *self.files.lock().unwrap() = None;
    }

    pub fn push_status(&self, status: Result<SystemStatus, String>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn push_video_status(&self, status: Result<VideoStatus, String>) {
        self.video_statuses.lock().unwrap().push_back(status);
    }

    /// Hold back `stop_video` until the sender fires.
    pub fn gate_video_stop(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.video_stop_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn fail_video_start(&self) {
        *self.fail_video_start.lock().unwrap() = true;
    }

    pub fn video_calls(&self) -> Vec<String> {
        self.video_calls.lock().unwrap().clone()
    }

    pub fn push_sensor_status(&self, status: Result<SensorStatus, String>) {
        self.sensor_statuses.lock().unwrap().push_back(status);
    }

    pub fn push_sensor_value(&self, value: Result<Option<f64>, String>) {
        self.sensor_values.lock().unwrap().push_back(value);
    }

    pub fn push_calibration_reply(&self, reply: Result<CalibrationStatus, String>) {
        self.calibration_replies.lock().unwrap().push_back(reply);
    }

    pub fn fail_sensor_commands(&self) {
        *self.fail_sensor_commands.lock().unwrap() = true;
    }

    pub fn sensor_calls(&self) -> Vec<String> {
        self.sensor_calls.lock().unwrap().clone()
    }

    fn sensor_command(&self, name: &str) -> anyhow::Result<SensorCommand> {
        self.sensor_calls.lock().unwrap().push(name.to_string());
        if *self.fail_sensor_commands.lock().unwrap() {
            anyhow::bail!("sensor unavailable");
        }
        Ok(SensorCommand {
            message: format!("Sensor {}", name),
            filename: (name == "stop").then(|| "sensor_data.csv".to_string()),
        })
    }
}

#[async_trait]
impl DashboardRepository for FakeRepository {
    async fn fetch_dataset(&self, dataset_id: &str) -> anyhow::Result<Vec<DataPoint>> {
        self.requests.lock().unwrap().push(dataset_id.to_string());

        let gate = self.gates.lock().unwrap().remove(dataset_id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let entry = self.datasets.lock().unwrap().get(dataset_id).cloned();
        match entry {
            Some(Ok(points)) => Ok(points),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("dataset {} not found", dataset_id),
        }
    }

    async fn list_datasets(&self) -> anyhow::Result<Vec<String>> {
        match self.files.lock().unwrap().clone() {
            Some(files) => Ok(files),
            None => anyhow::bail!("listing failed"),
        }
    }

    async fn system_status(&self) -> anyhow::Result<SystemStatus> {
        match self.statuses.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("no status queued"),
        }
    }

    async fn video_status(&self) -> anyhow::Result<VideoStatus> {
        match self.video_statuses.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("no video status queued"),
        }
    }

    async fn stop_video(&self) -> anyhow::Result<()> {
        self.video_calls.lock().unwrap().push("stop".to_string());
        let gate = self.video_stop_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(())
    }

    async fn start_video(&self, filename: &str) -> anyhow::Result<VideoStatus> {
        self.video_calls
            .lock()
            .unwrap()
            .push(format!("start {}", filename));
        if *self.fail_video_start.lock().unwrap() {
            anyhow::bail!("camera busy");
        }
        Ok(VideoStatus {
            running: true,
            mode: Some("record".to_string()),
            filename: Some(filename.to_string()),
            error: None,
        })
    }

    async fn sensor_status(&self) -> anyhow::Result<SensorStatus> {
        match self.sensor_statuses.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("no sensor status queued"),
        }
    }

    async fn sensor_value(&self) -> anyhow::Result<Option<f64>> {
        match self.sensor_values.lock().unwrap().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("no sensor value queued"),
        }
    }

    async fn start_sensor(&self) -> anyhow::Result<SensorCommand> {
        self.sensor_command("start")
    }

    async fn stop_sensor(&self) -> anyhow::Result<SensorCommand> {
        self.sensor_command("stop")
    }

    async fn calibrate(&self, action: CalibrationAction) -> anyhow::Result<CalibrationStatus> {
        self.sensor_calls
            .lock()
            .unwrap()
            .push(action.path().to_string());
        match self.calibration_replies.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("no calibration reply queued"),
        }
    }
}
