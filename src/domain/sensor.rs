// Load-cell sensor: live readings and the calibration flow
use serde::Serialize;

pub const DEFAULT_SENSOR_POLL_MS: u64 = 500;

/// Logging loop state as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorStatus {
    pub running: bool,
    /// Ratio stored by the last completed calibration.
    pub last_calibration: Option<f64>,
}

/// Reply to a start/stop of the logging loop. Stopping names the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorCommand {
    pub message: String,
    pub filename: Option<String>,
}

/// Latest weight, rounded for the live display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveReading {
    pub value: f64,
    pub display: String,
}

impl LiveReading {
    pub fn from_raw(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        let value = (raw * 100.0).round() / 100.0;
        Some(Self {
            value,
            display: format!("{:.2}", value),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStep {
    Tare,
    PlaceWeight,
    EnterWeight,
    Done,
    Error,
}

impl CalibrationStep {
    /// Unknown step names are treated as errors.
    pub fn from_wire(step: &str) -> Self {
        match step {
            "tare" => CalibrationStep::Tare,
            "place_weight" => CalibrationStep::PlaceWeight,
            "enter_weight" => CalibrationStep::EnterWeight,
            "done" => CalibrationStep::Done,
            _ => CalibrationStep::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationStatus {
    pub step: CalibrationStep,
    pub message: String,
}

impl CalibrationStatus {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            step: CalibrationStep::Error,
            message: message.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.step == CalibrationStep::Done
    }
}

/// One step of the three-step calibration: tare, read the loaded cell, then
/// divide by the known weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationAction {
    Start,
    ReadWeight,
    SetKnownWeight(f64),
}

impl CalibrationAction {
    pub fn path(&self) -> &'static str {
        match self {
            CalibrationAction::Start => "sensor/calibrate/start",
            CalibrationAction::ReadWeight => "sensor/calibrate/read_weight",
            CalibrationAction::SetKnownWeight(_) => "sensor/calibrate/set_known_weight",
        }
    }

    /// Fallback message when the backend gives no reason for a failure.
    pub fn failure_message(&self) -> &'static str {
        match self {
            CalibrationAction::Start => "Error starting calibration",
            CalibrationAction::ReadWeight => "Error reading weight",
            CalibrationAction::SetKnownWeight(_) => "Error setting known weight",
        }
    }
}

/// The known weight divides the raw reading, so it must be a positive number.
pub fn valid_known_weight(grams: f64) -> bool {
    grams.is_finite() && grams > 0.0
}
