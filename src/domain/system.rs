// System resource domain models
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LEN: usize = 60;

/// Host resource usage as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemStatus {
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub ram_used: u64,
    pub ram_total: u64,
    /// Unix time in seconds.
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSample {
    pub time: DateTime<Utc>,
    pub cpu: f64,
    pub ram: f64,
}

impl ResourceSample {
    pub fn from_status(status: &SystemStatus) -> Option<Self> {
        if !status.timestamp.is_finite() {
            return None;
        }
        let millis = (status.timestamp * 1000.0).round() as i64;
        let time = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(Self {
            time,
            cpu: status.cpu_percent,
            ram: status.ram_percent,
        })
    }
}

/// Rolling window of the most recent resource samples, oldest first.
#[derive(Debug, Clone)]
pub struct ResourceHistory {
    samples: VecDeque<ResourceSample>,
    capacity: usize,
}

impl ResourceHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, sample: ResourceSample) {
        if self.capacity == 0 {
            return;
        }
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn samples(&self) -> Vec<ResourceSample> {
        self.samples.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

impl Default for ResourceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}
