//! Search configuration for the route planner.

use chrono::Duration;

use super::error::RouteError;

/// Default minimum connection time (minutes).
pub const DEFAULT_MIN_CONNECTION_MINS: i64 = 45;

/// Default maximum number of flights in an itinerary.
pub const DEFAULT_MAX_HOPS: usize = 3;

/// Default number of itineraries returned by enumeration.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Largest hop bound a search accepts.
pub const MAX_HOPS_LIMIT: usize = 6;

/// Largest minimum connection time a search accepts (one week).
pub const MAX_MIN_CONNECTION_MINS: i64 = 7 * 24 * 60;

/// Largest result count an enumeration accepts.
pub const MAX_RESULTS_LIMIT: usize = 100;

/// Configuration parameters for route search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Maximum number of flights in an itinerary.
    pub max_hops: usize,

    /// Minimum time between landing and the next departure (minutes).
    /// Connections tighter than this are rejected. Must be positive and
    /// at most [`MAX_MIN_CONNECTION_MINS`].
    pub min_connection_mins: i64,

    /// Maximum number of itineraries returned when enumerating routes.
    pub max_results: usize,
}

impl RouteConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_hops: usize, min_connection_mins: i64, max_results: usize) -> Self {
        Self {
            max_hops,
            min_connection_mins,
            max_results,
        }
    }

    /// Returns the minimum connection time as a Duration.
    ///
    /// Saturates for values [`validate`](Self::validate) would reject.
    pub fn min_connection(&self) -> Duration {
        Duration::try_minutes(self.min_connection_mins).unwrap_or(Duration::MAX)
    }

    /// Copy with a different hop bound.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Copy with a different minimum connection time.
    pub fn with_min_connection_mins(mut self, mins: i64) -> Self {
        self.min_connection_mins = mins;
        self
    }

    /// Check the parameters can drive a search.
    ///
    /// A zero-minute connection is never physically valid, and an itinerary
    /// needs at least one flight.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.max_hops == 0 {
            return Err(RouteError::ZeroHops);
        }
        if self.max_hops > MAX_HOPS_LIMIT {
            return Err(RouteError::HopsAboveLimit {
                requested: self.max_hops,
                limit: MAX_HOPS_LIMIT,
            });
        }
        if self.min_connection_mins <= 0 {
            return Err(RouteError::NonPositiveConnection(self.min_connection_mins));
        }
        if self.min_connection_mins > MAX_MIN_CONNECTION_MINS {
            return Err(RouteError::ConnectionAboveLimit {
                requested: self.min_connection_mins,
                limit: MAX_MIN_CONNECTION_MINS,
            });
        }
        if self.max_results == 0 || self.max_results > MAX_RESULTS_LIMIT {
            return Err(RouteError::ResultsOutOfRange {
                requested: self.max_results,
                limit: MAX_RESULTS_LIMIT,
            });
        }
        Ok(())
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            min_connection_mins: DEFAULT_MIN_CONNECTION_MINS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}
