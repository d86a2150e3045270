//! In-memory flight repository.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::FlightRecord;

/// Thread-safe in-memory flight list.
///
/// Cloning shares the underlying list, so a test can hold one handle and
/// replace the flights while the service holds another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlightRepository {
    flights: Arc<RwLock<Vec<FlightRecord>>>,
}

impl InMemoryFlightRepository {
    /// Create a repository holding `flights`.
    pub fn new(flights: Vec<FlightRecord>) -> Self {
        Self {
            flights: Arc::new(RwLock::new(flights)),
        }
    }

    /// Replace the whole flight list.
    pub async fn replace(&self, flights: Vec<FlightRecord>) {
        let mut guard = self.flights.write().await;
        *guard = flights;
    }

    /// Append one record.
    pub async fn push(&self, flight: FlightRecord) {
        self.flights.write().await.push(flight);
    }

    /// Copy of the current list.
    pub async fn snapshot(&self) -> Vec<FlightRecord> {
        self.flights.read().await.clone()
    }
}
