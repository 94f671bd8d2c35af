// Recording runtime clock
use chrono::{DateTime, TimeDelta, TimeZone};
use serde::Serialize;

pub const RECORD_MODE: &str = "record";

/// Video recorder state as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoStatus {
    pub running: bool,
    pub mode: Option<String>,
    pub filename: Option<String>,
    pub error: Option<String>,
}

impl VideoStatus {
    pub fn is_recording(&self) -> bool {
        self.running && self.mode.as_deref() == Some(RECORD_MODE)
    }
}

/// Tracks when the current recording started, in the operator's time zone.
#[derive(Debug, Clone)]
pub struct RecordingClock<Tz: TimeZone> {
    started_at: DateTime<Tz>,
}

impl<Tz: TimeZone> RecordingClock<Tz> {
    pub fn start(started_at: DateTime<Tz>) -> Self {
        Self { started_at }
    }

    pub fn started_at(&self) -> &DateTime<Tz> {
        &self.started_at
    }

    /// Elapsed time since the start, clamped at zero.
    pub fn runtime(&self, now: &DateTime<Tz>) -> TimeDelta {
        let elapsed = now.clone() - self.started_at.clone();
        elapsed.max(TimeDelta::zero())
    }

    /// True once the local calendar date differs from the start date.
    pub fn crossed_midnight(&self, now: &DateTime<Tz>) -> bool {
        self.started_at.date_naive() != now.date_naive()
    }
}

/// Format a runtime as `HH:MM:SS`. Hours keep counting past 24.
pub fn format_runtime(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Name for a recording started at `now`, e.g. `output_2024-01-01_08-05-09.mp4`.
pub fn recording_filename<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("output_%Y-%m-%d_%H-%M-%S.mp4").to_string()
}
