// Recording supervisor - Runtime clock and midnight rollover for video capture
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::recording::{RecordingClock, format_runtime, recording_filename};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The backend is not recording.
    Idle,
    /// Recording; carries the `HH:MM:SS` runtime.
    Running(String),
    /// The date changed and a new recording was started under this name.
    RolledOver(String),
    /// The recorder reported an error or could not be reached.
    Interrupted(String),
    /// Supervision stopped after an interruption; waiting for a new recording.
    Halted,
}

/// What the supervisor knows about the backend recording.
#[derive(Debug, Clone, Default)]
enum Supervision {
    #[default]
    Idle,
    Timing {
        clock: RecordingClock<Local>,
        filename: Option<String>,
    },
    /// The recording named here was interrupted and is no longer timed.
    Halted { filename: Option<String> },
}

impl Supervision {
    fn filename(&self) -> Option<String> {
        match self {
            Supervision::Idle => None,
            Supervision::Timing { filename, .. } | Supervision::Halted { filename } => {
                filename.clone()
            }
        }
    }
}

#[derive(Clone)]
pub struct RecordingSupervisor {
    repository: Arc<dyn DashboardRepository>,
    rollover_delay: Duration,
    state: Arc<RwLock<Supervision>>,
}

impl RecordingSupervisor {
    pub fn new(repository: Arc<dyn DashboardRepository>, rollover_delay: Duration) -> Self {
        Self {
            repository,
            rollover_delay,
            state: Arc::new(RwLock::new(Supervision::Idle)),
        }
    }

    pub async fn tick(&self, now: DateTime<Local>) -> TickOutcome {
        let status = match self.repository.video_status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!("Video status unavailable: {:#}", e);
                self.halt(None).await;
                return TickOutcome::Interrupted(format!("{:#}", e));
            }
        };

        if let Some(error) = status.error.clone() {
            tracing::warn!("Video recorder reported an error: {}", error);
            self.halt(status.filename.clone()).await;
            return TickOutcome::Interrupted(error);
        }

        let (started_at, previous) = {
            let mut state = self.state.write().await;
            if !status.is_recording() {
                *state = Supervision::Idle;
                return TickOutcome::Idle;
            }

            if let Supervision::Halted { filename } = &*state {
                if *filename == status.filename {
                    return TickOutcome::Halted;
                }
                tracing::info!("New recording {:?} seen, resuming", status.filename);
                *state = Supervision::Idle;
            }

            if matches!(*state, Supervision::Idle) {
                *state = Supervision::Timing {
                    clock: RecordingClock::start(now),
                    filename: status.filename.clone(),
                };
            }

            let Supervision::Timing { clock, filename } = &*state else {
                return TickOutcome::Idle;
            };
            if !clock.crossed_midnight(&now) {
                return TickOutcome::Running(format_runtime(clock.runtime(&now)));
            }
            (*clock.started_at(), filename.clone())
        };

        let filename = recording_filename(&now);
        tracing::info!(
            "Recording started {} crossed midnight, rolling over to {}",
            started_at,
            filename
        );

        // The lock is not held while the recorder restarts
        let rolled = self.roll_over(&filename).await;

        let mut state = self.state.write().await;
        match rolled {
            Ok(()) => {
                *state = Supervision::Timing {
                    clock: RecordingClock::start(now),
                    filename: Some(filename.clone()),
                };
                TickOutcome::RolledOver(filename)
            }
            Err(e) => {
                tracing::warn!("Failed to roll over recording at midnight: {:#}", e);
                *state = Supervision::Halted { filename: previous };
                TickOutcome::Interrupted(format!("{:#}", e))
            }
        }
    }

    /// Tick on a fixed interval until the returned handle is aborted.
    pub fn spawn(&self, interval: Duration) -> JoinHandle<()> {
        let supervisor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                supervisor.tick(Local::now()).await;
            }
        })
    }

    /// Current runtime as `HH:MM:SS`, `00:00:00` when not timing a recording.
    pub async fn runtime(&self, now: DateTime<Local>) -> String {
        match &*self.state.read().await {
            Supervision::Timing { clock, .. } => format_runtime(clock.runtime(&now)),
            _ => format_runtime(chrono::TimeDelta::zero()),
        }
    }

    /// Stop timing until a recording other than the current one shows up.
    async fn halt(&self, reported: Option<String>) {
        let mut state = self.state.write().await;
        let filename = reported.or_else(|| state.filename());
        *state = Supervision::Halted { filename };
    }

    async fn roll_over(&self, filename: &str) -> anyhow::Result<()> {
        self.repository.stop_video().await?;
        // Give the recorder time to release the camera
        tokio::time::sleep(self.rollover_delay).await;
        self.repository.start_video(filename).await?;
        Ok(())
    }
}
