//! Flight repository collaborator.
//!
//! The route engine never stores flights itself. It asks a
//! [`FlightRepository`] for the full current flight list whenever the
//! network is rebuilt. Three adapters are provided: the CRUD service over
//! HTTP, a JSON file, and an in-memory list.

mod client;
mod error;
mod file;
mod memory;

use std::future::Future;

use serde::Deserialize;

use crate::domain::FlightRecord;

pub use client::{HttpFlightConfig, HttpFlightRepository};
pub use error::RepositoryError;
pub use file::JsonFileFlightRepository;
pub use memory::InMemoryFlightRepository;

/// Source of the full current flight set.
pub trait FlightRepository {
    /// Return every flight record currently known.
    fn list_all_flights(
        &self,
    ) -> impl Future<Output = Result<Vec<FlightRecord>, RepositoryError>> + Send;
}

impl FlightRepository for HttpFlightRepository {
    async fn list_all_flights(&self) -> Result<Vec<FlightRecord>, RepositoryError> {
        self.fetch_all().await
    }
}

impl FlightRepository for JsonFileFlightRepository {
    async fn list_all_flights(&self) -> Result<Vec<FlightRecord>, RepositoryError> {
        self.load().await
    }
}

impl FlightRepository for InMemoryFlightRepository {
    async fn list_all_flights(&self) -> Result<Vec<FlightRecord>, RepositoryError> {
        Ok(self.snapshot().await)
    }
}

/// The repository a running service reads from, chosen by configuration.
#[derive(Debug, Clone)]
pub enum FlightSource {
    Http(HttpFlightRepository),
    File(JsonFileFlightRepository),
    Memory(InMemoryFlightRepository),
}

impl FlightSource {
    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            FlightSource::Http(repo) => repo.flights_url(),
            FlightSource::File(repo) => repo.path().display().to_string(),
            FlightSource::Memory(_) => "memory".to_string(),
        }
    }
}

impl FlightRepository for FlightSource {
    async fn list_all_flights(&self) -> Result<Vec<FlightRecord>, RepositoryError> {
        match self {
            FlightSource::Http(repo) => repo.list_all_flights().await,
            FlightSource::File(repo) => repo.list_all_flights().await,
            FlightSource::Memory(repo) => repo.list_all_flights().await,
        }
    }
}

/// Wire shape of a flight list: a bare array or `{ "flights": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FlightsPayload {
    List(Vec<FlightRecord>),
    Wrapped { flights: Vec<FlightRecord> },
}

impl FlightsPayload {
    pub(crate) fn into_records(self) -> Vec<FlightRecord> {
        match self {
            FlightsPayload::List(records) | FlightsPayload::Wrapped { flights: records } => records,
        }
    }
}
