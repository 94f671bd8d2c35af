// Application layer - Use cases over the backend repository
pub mod dashboard_repository;
pub mod dataset_service;
pub mod feed_service;
pub mod monitor_service;
pub mod recording_service;
pub mod sensor_service;

#[cfg(test)]
pub mod testing;
