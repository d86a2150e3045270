//! Application state for the web layer.

use std::sync::Arc;

use tracing::info;

use crate::cache::{CacheConfig, RouteCache};
use crate::network::{NetworkSnapshot, SnapshotStore};
use crate::planner::RouteConfig;
use crate::repository::{FlightSource, RepositoryError};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Current network snapshot
    pub snapshots: SnapshotStore,

    /// Where flight records are fetched from on refresh
    pub source: Arc<FlightSource>,

    /// Default route search parameters
    pub config: Arc<RouteConfig>,

    /// Route result cache
    pub cache: RouteCache,
}

impl AppState {
    /// Create a new app state with no snapshot published yet.
    pub fn new(source: FlightSource, config: RouteConfig, cache_config: &CacheConfig) -> Self {
        Self {
            snapshots: SnapshotStore::new(),
            source: Arc::new(source),
            config: Arc::new(config),
            cache: RouteCache::new(cache_config),
        }
    }

    /// Rebuild the network from the flight source and drop cached results.
    ///
    /// On failure the previous snapshot keeps serving.
    pub async fn refresh(&self) -> Result<Arc<NetworkSnapshot>, RepositoryError> {
        let snapshot = self.snapshots.refresh(self.source.as_ref()).await?;
        self.cache.invalidate_all();
        info!(
            generation = snapshot.generation(),
            source = %self.source.describe(),
            "Route cache cleared after refresh"
        );
        Ok(snapshot)
    }
}
