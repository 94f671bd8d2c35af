// Time series feed - Loads the selected dataset and keeps the chart state
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::dataset::DatasetFilter;
use crate::domain::series::{FeedSnapshot, Series};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::{AbortHandle, JoinHandle};

/// What happened to a single `load` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The snapshot was replaced with the fetched series.
    Applied { points: usize, dropped: usize },
    /// The request failed and the snapshot was reset to empty.
    Failed,
    /// A newer selection was dispatched while this one was in flight.
    Stale,
    /// The identifier is not a loadable dataset; nothing was requested.
    Ignored,
}

#[derive(Debug, Default)]
struct FeedState {
    snapshot: FeedSnapshot,
    selected: Option<String>,
    /// Token of the most recently dispatched request; only it may write.
    current_token: u64,
    /// Background load started by the last `select`.
    in_flight: Option<AbortHandle>,
}

impl FeedState {
    fn dispatch(&mut self, dataset_id: &str) -> u64 {
        self.current_token += 1;
        self.selected = Some(dataset_id.to_string());
        self.current_token
    }
}

#[derive(Clone)]
pub struct TimeSeriesFeed {
    repository: Arc<dyn DashboardRepository>,
    filter: DatasetFilter,
    window_size: usize,
    state: Arc<RwLock<FeedState>>,
}

impl TimeSeriesFeed {
    pub fn new(
        repository: Arc<dyn DashboardRepository>,
        filter: DatasetFilter,
        window_size: usize,
    ) -> Self {
        Self {
            repository,
            filter,
            window_size,
            state: Arc::new(RwLock::new(FeedState::default())),
        }
    }

    pub async fn load(&self, dataset_id: &str) -> LoadOutcome {
        if !self.accepts(dataset_id) {
            return LoadOutcome::Ignored;
        }

        let token = self.state.write().await.dispatch(dataset_id);
        self.complete(dataset_id, token).await
    }

    /// Load `dataset_id` in the background, aborting the previous background
    /// load if it is still running.
    ///
    /// The request token is taken before the task is spawned, so tokens follow
    /// the order of `select` calls.
    pub async fn select(&self, dataset_id: &str) -> Option<JoinHandle<LoadOutcome>> {
        if !self.accepts(dataset_id) {
            return None;
        }

        let mut state = self.state.write().await;
        let token = state.dispatch(dataset_id);

        let feed = self.clone();
        let id = dataset_id.to_string();
        let handle = tokio::spawn(async move { feed.complete(&id, token).await });

        if let Some(previous) = state.in_flight.replace(handle.abort_handle()) {
            previous.abort();
        }

        Some(handle)
    }

    /// Fetch the current selection again.
    pub async fn reload(&self) -> LoadOutcome {
        // Read the selection and take the token in one critical section
        let dispatched = {
            let mut state = self.state.write().await;
            state
                .selected
                .clone()
                .map(|dataset_id| {
                    let token = state.dispatch(&dataset_id);
                    (dataset_id, token)
                })
        };

        match dispatched {
            Some((dataset_id, token)) => self.complete(&dataset_id, token).await,
            None => LoadOutcome::Ignored,
        }
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn selected(&self) -> Option<String> {
        self.state.read().await.selected.clone()
    }

    fn accepts(&self, dataset_id: &str) -> bool {
        let accepted = self.filter.accepts(dataset_id);
        if !accepted {
            tracing::debug!(
                "Ignoring selection {:?}: expected a {} file",
                dataset_id,
                self.filter.suffix()
            );
        }
        accepted
    }

    /// Fetch `dataset_id` and apply it if `token` is still current.
    async fn complete(&self, dataset_id: &str, token: u64) -> LoadOutcome {
        // Build the replacement before taking the write lock
        let prepared = self
            .repository
            .fetch_dataset(dataset_id)
            .await
            .map(|points| {
                let series = Series::from_points(&points);
                tracing::debug!(
                    "Parsed {} points from {} ({} dropped)",
                    series.len(),
                    dataset_id,
                    series.dropped
                );
                FeedSnapshot::from_series(dataset_id.to_string(), series, self.window_size)
            });

        let mut state = self.state.write().await;
        if state.current_token != token {
            tracing::debug!(
                "Discarding stale response for {} (request {}, current {})",
                dataset_id,
                token,
                state.current_token
            );
            return LoadOutcome::Stale;
        }

        match prepared {
            Ok(snapshot) => {
                if snapshot.is_empty() {
                    tracing::info!("Dataset {} has no plottable points", dataset_id);
                }
                let outcome = LoadOutcome::Applied {
                    points: snapshot.raw_values.len(),
                    dropped: snapshot.dropped_points,
                };
                state.snapshot = snapshot;
                outcome
            }
            Err(e) => {
                tracing::warn!("Error fetching dataset {}: {:#}", dataset_id, e);
                state.snapshot = FeedSnapshot::empty(Some(dataset_id.to_string()));
                LoadOutcome::Failed
            }
        }
    }
}
