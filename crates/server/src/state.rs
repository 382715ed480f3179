use std::sync::Arc;

use service::dog::{DogRepository, DogService};

/// Shared handler state. The service holds its repository behind a trait object
/// so tests can swap the sqlite-backed store for the in-memory one.
#[derive(Clone)]
pub struct ServerState {
    pub dogs: Arc<DogService<dyn DogRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn DogRepository>) -> Self {
        Self { dogs: Arc::new(DogService::new(repo)) }
    }
}
