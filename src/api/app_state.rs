use crate::services::student::StudentService;
use crate::storage::document::DocumentStore;
use std::sync::Arc;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Document store backing the student records
    pub store: Arc<dyn DocumentStore>,
    /// Student service for student business logic
    pub student_service: Arc<dyn StudentService>,
    /// Service version reported by the health endpoint
    pub version: String,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &"Arc<dyn DocumentStore>")
            .field("student_service", &"Arc<dyn StudentService>")
            .field("version", &self.version)
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        store: Arc<dyn DocumentStore>,
        student_service: Box<dyn StudentService>,
        version: &str,
    ) -> Self {
        Self {
            store,
            student_service: Arc::from(student_service),
            version: version.to_string(),
        }
    }
}
