// System monitor service - Polls host resource usage for the graphs
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::system::{ResourceHistory, ResourceSample, SystemStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct SystemMonitorService {
    repository: Arc<dyn DashboardRepository>,
    latest: Arc<RwLock<Option<SystemStatus>>>,
    history: Arc<RwLock<ResourceHistory>>,
}

impl SystemMonitorService {
    pub fn new(repository: Arc<dyn DashboardRepository>, history_len: usize) -> Self {
        Self {
            repository,
            latest: Arc::new(RwLock::new(None)),
            history: Arc::new(RwLock::new(ResourceHistory::new(history_len))),
        }
    }

    /// Fetch one status reading. Failed polls leave the history untouched.
    pub async fn poll_once(&self) {
        let status = match self.repository.system_status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!("System status poll failed: {:#}", e);
                return;
            }
        };

        match ResourceSample::from_status(&status) {
            Some(sample) => {
                let mut history = self.history.write().await;
                history.record(sample);
                tracing::trace!("Recorded resource sample, {} held", history.len());
            }
            None => tracing::debug!("Skipping status with invalid timestamp {}", status.timestamp),
        }
        *self.latest.write().await = Some(status);
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

    pub async fn latest(&self) -> Option<SystemStatus> {
        self.latest.read().await.clone()
    }

    pub async fn history(&self) -> Vec<ResourceSample> {
        self.history.read().await.samples()
    }
}
