// Dataset service - Use case for listing selectable data files
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::dataset::DatasetFilter;
use std::sync::Arc;

#[derive(Clone)]
pub struct DatasetService {
    repository: Arc<dyn DashboardRepository>,
    filter: DatasetFilter,
}

impl DatasetService {
    pub fn new(repository: Arc<dyn DashboardRepository>, filter: DatasetFilter) -> Self {
        Self { repository, filter }
    }

    pub async fn list_datasets(&self) -> anyhow::Result<Vec<String>> {
        let files = self.repository.list_datasets().await?;
        Ok(files
            .into_iter()
            .filter(|file| self.filter.accepts(file))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeRepository;

    #[tokio::test]
    async fn test_list_datasets_keeps_data_files() {
        let repository = Arc::new(FakeRepository::default());
        repository.set_files(vec![
            "b.csv".to_string(),
            "videos/output.mp4".to_string(),
            "a.csv".to_string(),
        ]);
        let service = DatasetService::new(repository, DatasetFilter::default());

        let files = service.list_datasets().await.unwrap();

        assert_eq!(files, vec!["b.csv".to_string(), "a.csv".to_string()]);
    }

    #[tokio::test]
    async fn test_list_datasets_propagates_failure() {
        let repository = Arc::new(FakeRepository::default());
        repository.fail_listing();
        let service = DatasetService::new(repository, DatasetFilter::default());

        assert!(service.list_datasets().await.is_err());
    }
}
