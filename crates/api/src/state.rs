use std::sync::Arc;

use setuphub_db::EngagementStore;
use setuphub_upstream::{ConfigLookup, IdentityLookup};

use crate::config::ServerConfig;
use crate::engine::{Aggregator, Catalog};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Local ratings, comments and likes.
    pub engagement: Arc<dyn EngagementStore>,
    /// Read-side engine over the configuration store.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Wire the engine from its collaborators.
    pub fn new(
        config: ServerConfig,
        engagement: Arc<dyn EngagementStore>,
        configs: Arc<dyn ConfigLookup>,
        identities: Arc<dyn IdentityLookup>,
    ) -> Self {
        let concurrency = config.enrich_concurrency;
        let aggregator = Aggregator::new(Arc::clone(&engagement), identities, concurrency);
        let catalog = Catalog::new(configs, aggregator, concurrency);
        Self {
            config: Arc::new(config),
            engagement,
            catalog: Arc::new(catalog),
        }
    }
}
