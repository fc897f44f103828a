//! Application state shared across handlers.

use std::sync::Arc;

use crate::service::StudyService;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Study material generation.
    service: Arc<StudyService>,
}

impl AppState {
    /// Create new application state.
    pub fn new(service: StudyService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Get a reference to the study service.
    pub fn service(&self) -> &StudyService {
        &self.service
    }
}
