//! Route search errors.
//!
//! Only rejected requests are errors. A search that finds nothing returns
//! a [`super::SearchResult`] without an itinerary.

use crate::domain::{AirportCode, DomainError, FlightIdentity};

/// Error from route search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// Origin and destination are the same airport
    #[error("departure and arrival are both {0}")]
    SameAirport(AirportCode),

    /// Hop bound of zero
    #[error("max_hops must be at least 1")]
    ZeroHops,

    /// Hop bound above the supported maximum
    #[error("max_hops must be at most {limit}, got {requested}")]
    HopsAboveLimit { requested: usize, limit: usize },

    /// Minimum connection time not positive
    #[error("minimum connection time must be positive, got {0} minutes")]
    NonPositiveConnection(i64),

    /// Minimum connection time too long to add to an arrival
    #[error("minimum connection time must be at most {limit} minutes, got {requested}")]
    ConnectionAboveLimit { requested: i64, limit: i64 },

    /// Result count of zero or above the supported maximum
    #[error("max_results must be between 1 and {limit}, got {requested}")]
    ResultsOutOfRange { requested: usize, limit: usize },

    /// Weight function returned a negative or non-finite value
    #[error("weight {weight} for flight {flight} is not a non-negative number")]
    InvalidWeight { flight: FlightIdentity, weight: f64 },

    /// Reconstructed itinerary broke the chaining rules
    #[error("search produced an invalid itinerary: {0}")]
    InvalidItinerary(#[from] DomainError),
}

impl RouteError {
    /// True when the caller sent a bad request, as opposed to an internal fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RouteError::InvalidItinerary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let egll = AirportCode::parse("EGLL").unwrap();
        assert_eq!(
            RouteError::SameAirport(egll).to_string(),
            "departure and arrival are both EGLL"
        );
        assert_eq!(
            RouteError::NonPositiveConnection(0).to_string(),
            "minimum connection time must be positive, got 0 minutes"
        );

        let err = RouteError::InvalidWeight {
            flight: FlightIdentity::Surrogate { id: 4 },
            weight: -2.0,
        };
        assert_eq!(
            err.to_string(),
            "weight -2 for flight #4 is not a non-negative number"
        );
    }

    #[test]
    fn client_errors() {
        assert!(RouteError::ZeroHops.is_client_error());
        assert!(
            RouteError::ConnectionAboveLimit {
                requested: i64::MAX,
                limit: 10_080
            }
            .is_client_error()
        );
        assert!(!RouteError::InvalidItinerary(DomainError::EmptyItinerary).is_client_error());
    }
}
