use std::sync::Arc;

use configs::DatabaseConfig;
use service::services::{ReviewBook, ServiceCatalog};
use service::storage::DocumentStore;

/// Shared handler state. Built once at startup around the single store
/// handle; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub catalog: ServiceCatalog,
    pub reviews: ReviewBook,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, db: &DatabaseConfig) -> Self {
        Self {
            catalog: ServiceCatalog::new(Arc::clone(&store), db.services_collection.clone()),
            reviews: ReviewBook::new(store, db.reviews_collection.clone()),
        }
    }
}
