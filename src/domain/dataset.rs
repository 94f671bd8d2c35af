// Dataset identifiers
pub const DEFAULT_DATASET_SUFFIX: &str = ".csv";

/// Decides which file names can be loaded as a time series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFilter {
    suffix: String,
}

impl DatasetFilter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// A dataset id needs the data-file suffix and a non-empty stem.
    pub fn accepts(&self, dataset_id: &str) -> bool {
        dataset_id.len() > self.suffix.len() && dataset_id.ends_with(&self.suffix)
    }
}

impl Default for DatasetFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET_SUFFIX)
    }
}
