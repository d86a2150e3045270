//! Published network snapshots.
//!
//! A rebuild assembles a complete new graph off to the side and then swaps
//! the shared pointer. Readers clone the `Arc` under a short read lock and
//! search without holding it, so a query keeps the snapshot it started with
//! and a rebuild never blocks on a running search.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{FlightRecord, Timestamp};
use crate::repository::{FlightRepository, RepositoryError};

use super::builder::{BuildReport, build_graph};
use super::graph::NetworkGraph;

/// One immutable, point-in-time materialization of the network.
#[derive(Debug)]
pub struct NetworkSnapshot {
    graph: NetworkGraph,
    report: BuildReport,
    generation: u64,
    built_at: Timestamp,
}

impl NetworkSnapshot {
    /// Returns the graph.
    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    /// Returns the report of the build that produced this snapshot.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Returns the generation; each publish increments it by one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns when the snapshot was published.
    pub fn built_at(&self) -> Timestamp {
        self.built_at
    }
}

/// Holder of the current snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    current: Arc<RwLock<Option<Arc<NetworkSnapshot>>>>,
}

impl SnapshotStore {
    /// Create an empty store. Queries see no snapshot until the first publish.
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot queries should run against, if one has been built.
    pub async fn current(&self) -> Option<Arc<NetworkSnapshot>> {
        self.current.read().await.clone()
    }

    /// Build a graph from `records` and make it current.
    pub async fn publish(&self, records: &[FlightRecord]) -> Arc<NetworkSnapshot> {
        let (graph, report) = build_graph(records);

        let mut guard = self.current.write().await;
        let generation = guard.as_ref().map_or(1, |s| s.generation + 1);
        let snapshot = Arc::new(NetworkSnapshot {
            graph,
            report,
            generation,
            built_at: Utc::now(),
        });
        *guard = Some(snapshot.clone());

        snapshot
    }

    /// Fetch the flight list from `repository`, rebuild, and swap.
    ///
    /// On failure the current snapshot, if any, stays in place and the error
    /// is returned.
    pub async fn refresh<R: FlightRepository>(
        &self,
        repository: &R,
    ) -> Result<Arc<NetworkSnapshot>, RepositoryError> {
        let records = match repository.list_all_flights().await {
            Ok(records) => records,
            Err(e) => {
                let serving = self.current().await.map(|s| s.generation);
                warn!(error = %e, ?serving, "Flight repository unavailable, keeping current snapshot");
                return Err(e);
            }
        };

        let snapshot = self.publish(&records).await;
        info!(
            generation = snapshot.generation,
            edges = snapshot.report.edges,
            skipped = snapshot.report.skipped_total(),
            "Published network snapshot"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryFlightRepository;
    use chrono::TimeZone;

    fn at(h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 15, h, 0, 0).unwrap()
    }

    fn flights() -> Vec<FlightRecord> {
        vec![
            FlightRecord::scheduled("BA", "1", "EGLL", "LFPG", at(8), at(10)),
            FlightRecord::scheduled("AF", "2", "LFPG", "KJFK", at(12), at(20)),
        ]
    }

    struct Unavailable;

    impl FlightRepository for Unavailable {
        async fn list_all_flights(&self) -> Result<Vec<FlightRecord>, RepositoryError> {
            Err(RepositoryError::Api {
                status: 503,
                message: "down".into(),
            })
        }
    }

    #[tokio::test]
    async fn empty_until_first_publish() {
        let store = SnapshotStore::new();
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn refresh_publishes_and_increments_generation() {
        let store = SnapshotStore::new();
        let repo = InMemoryFlightRepository::new(flights());

        let first = store.refresh(&repo).await.unwrap();
        assert_eq!(first.generation(), 1);
        assert_eq!(first.graph().edge_count(), 2);

        let second = store.refresh(&repo).await.unwrap();
        assert_eq!(second.generation(), 2);
        assert_eq!(store.current().await.unwrap().generation(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_prior_snapshot() {
        let store = SnapshotStore::new();
        store
            .refresh(&InMemoryFlightRepository::new(flights()))
            .await
            .unwrap();

        let result = store.refresh(&Unavailable).await;
        assert!(result.is_err());

        let current = store.current().await.unwrap();
        assert_eq!(current.generation(), 1);
        assert_eq!(current.graph().edge_count(), 2);
    }

    #[tokio::test]
    async fn failed_first_refresh_leaves_store_empty() {
        let store = SnapshotStore::new();
        assert!(store.refresh(&Unavailable).await.is_err());
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn readers_keep_their_snapshot_across_swaps() {
        let store = SnapshotStore::new();
        let repo = InMemoryFlightRepository::new(flights());
        store.refresh(&repo).await.unwrap();

        let held = store.current().await.unwrap();

        repo.replace(vec![]).await;
        store.refresh(&repo).await.unwrap();

        assert_eq!(held.graph().edge_count(), 2);
        assert!(store.current().await.unwrap().graph().is_empty());
    }

    #[tokio::test]
    async fn concurrent_readers_see_complete_snapshots() {
        let store = SnapshotStore::new();
        let repo = InMemoryFlightRepository::new(flights());
        store.refresh(&repo).await.unwrap();

        let readers = (0..8).map(|_| {
            let store = store.clone();
            async move {
                let snapshot = store.current().await.unwrap();
                (snapshot.generation(), snapshot.graph().edge_count())
            }
        });
        let refresh = store.refresh(&repo);

        let (seen, refreshed) = tokio::join!(futures::future::join_all(readers), refresh);
        refreshed.unwrap();

        for (generation, edges) in seen {
            assert!(generation == 1 || generation == 2);
            assert_eq!(edges, 2);
        }
    }
}
