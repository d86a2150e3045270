//! Domain error types.
//!
//! These errors represent itineraries that break the chaining rules. They
//! are distinct from malformed source data, which is reported per record by
//! [`super::EdgeError`].

use chrono::Duration;

use super::AirportCode;

/// Domain-level errors for itinerary construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Itinerary has no flights
    #[error("itinerary must have at least one flight")]
    EmptyItinerary,

    /// Consecutive flights don't share an airport
    #[error("flight arriving at {0} does not connect to flight departing {1}")]
    AirportsNotConnected(AirportCode, AirportCode),

    /// Connecting flight leaves before the minimum connection time has passed
    #[error("connection at {airport} is {gap_mins} minutes, minimum is {min_mins}")]
    ConnectionTooShort {
        airport: AirportCode,
        gap_mins: i64,
        min_mins: i64,
    },
}

impl DomainError {
    pub(crate) fn connection_too_short(
        airport: AirportCode,
        gap: Duration,
        min_connection: Duration,
    ) -> Self {
        DomainError::ConnectionTooShort {
            airport,
            gap_mins: gap.num_minutes(),
            min_mins: min_connection.num_minutes(),
        }
    }
}
