use crate::admission::{AdmissionController, AdmissionError};
use crate::config::settings::AppConfig;
use crate::services::events::EventService;

use super::error::ApiError;

pub mod events;
pub mod registrations;
pub mod seeding;

pub struct AppState {
    pub admission: AdmissionController,
    pub events: EventService,
    pub config: AppConfig,
}

/// Runs synchronous storage work off the async executor.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, AdmissionError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Worker task failed: {}", e)))?
        .map_err(ApiError::from)
}
