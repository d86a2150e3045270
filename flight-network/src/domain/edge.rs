//! Flight edge type.
//!
//! A `FlightEdge` is one scheduled flight viewed as a directed, time-bounded
//! edge of the flight network. Edges are validated at construction, so the
//! graph and the searches never see a self-loop or a flight that lands
//! before it takes off.

use std::fmt;

use chrono::Duration;
use serde::Serialize;

use super::{AirportCode, FlightIdentity, FlightRecord, Timestamp};

/// Why a flight record could not become an edge.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EdgeError {
    /// Departure or arrival airport is missing or blank
    #[error("missing {0} airport")]
    MissingAirport(&'static str),

    /// Airport code present but malformed
    #[error("invalid {field} airport {value:?}")]
    InvalidAirport { field: &'static str, value: String },

    /// Origin and destination are the same airport
    #[error("flight departs and arrives at {0}")]
    SelfLoop(AirportCode),

    /// Departure or arrival time is missing
    #[error("missing {0} time")]
    MissingTime(&'static str),

    /// Arrival is not after departure
    #[error("non-positive duration: departs {departure}, arrives {arrival}")]
    NonPositiveDuration {
        departure: Timestamp,
        arrival: Timestamp,
    },

    /// Neither airline + flight number nor a surrogate id
    #[error("record has no identity")]
    MissingIdentity,

    /// Cost is negative, NaN or infinite
    #[error("invalid weight {0}")]
    InvalidWeight(f64),
}

/// Coarse classification of [`EdgeError`], used for build statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingAirport,
    InvalidAirport,
    SelfLoop,
    MissingTime,
    NonPositiveDuration,
    MissingIdentity,
    InvalidWeight,
}

impl EdgeError {
    /// Returns the skip reason for this error.
    pub fn reason(&self) -> SkipReason {
        match self {
            EdgeError::MissingAirport(_) => SkipReason::MissingAirport,
            EdgeError::InvalidAirport { .. } => SkipReason::InvalidAirport,
            EdgeError::SelfLoop(_) => SkipReason::SelfLoop,
            EdgeError::MissingTime(_) => SkipReason::MissingTime,
            EdgeError::NonPositiveDuration { .. } => SkipReason::NonPositiveDuration,
            EdgeError::MissingIdentity => SkipReason::MissingIdentity,
            EdgeError::InvalidWeight(_) => SkipReason::InvalidWeight,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::MissingAirport => "missing_airport",
            SkipReason::InvalidAirport => "invalid_airport",
            SkipReason::SelfLoop => "self_loop",
            SkipReason::MissingTime => "missing_time",
            SkipReason::NonPositiveDuration => "non_positive_duration",
            SkipReason::MissingIdentity => "missing_identity",
            SkipReason::InvalidWeight => "invalid_weight",
        };
        f.write_str(s)
    }
}

/// Weight used when a record has no cost field.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One scheduled flight as a directed graph edge.
///
/// # Invariants
///
/// - `origin != destination`
/// - `arrival > departure`
/// - `weight` is finite and non-negative
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightEdge {
    origin: AirportCode,
    destination: AirportCode,
    departure: Timestamp,
    arrival: Timestamp,
    identity: FlightIdentity,
    weight: f64,
}

impl FlightEdge {
    /// Construct an edge, validating the edge invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use flight_network::domain::{AirportCode, FlightEdge, FlightIdentity};
    ///
    /// let egll = AirportCode::parse("EGLL").unwrap();
    /// let lfpg = AirportCode::parse("LFPG").unwrap();
    /// let dep = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
    /// let arr = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    /// let id = FlightIdentity::Surrogate { id: 1 };
    ///
    /// let edge = FlightEdge::new(egll, lfpg, dep, arr, id.clone(), 1.0).unwrap();
    /// assert_eq!(edge.duration().num_minutes(), 120);
    ///
    /// // A self-loop is rejected
    /// assert!(FlightEdge::new(egll, egll, dep, arr, id, 1.0).is_err());
    /// ```
    pub fn new(
        origin: AirportCode,
        destination: AirportCode,
        departure: Timestamp,
        arrival: Timestamp,
        identity: FlightIdentity,
        weight: f64,
    ) -> Result<Self, EdgeError> {
        if origin == destination {
            return Err(EdgeError::SelfLoop(origin));
        }
        if arrival <= departure {
            return Err(EdgeError::NonPositiveDuration { departure, arrival });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(EdgeError::InvalidWeight(weight));
        }

        Ok(Self {
            origin,
            destination,
            departure,
            arrival,
            identity,
            weight,
        })
    }

    /// Normalize a raw flight record into an edge.
    ///
    /// Airport codes are trimmed and uppercased before validation. A missing
    /// cost field yields [`DEFAULT_WEIGHT`].
    pub fn from_record(record: &FlightRecord) -> Result<Self, EdgeError> {
        let origin = parse_airport("departure", record.departure_airport.as_deref())?;
        let destination = parse_airport("arrival", record.arrival_airport.as_deref())?;
        let departure = record
            .departure_time
            .ok_or(EdgeError::MissingTime("departure"))?;
        let arrival = record.arrival_time.ok_or(EdgeError::MissingTime("arrival"))?;
        let identity = FlightIdentity::of(record).ok_or(EdgeError::MissingIdentity)?;
        let weight = record.cost.unwrap_or(DEFAULT_WEIGHT);

        Self::new(origin, destination, departure, arrival, identity, weight)
    }

    /// Returns the departure airport.
    pub fn origin(&self) -> AirportCode {
        self.origin
    }

    /// Returns the arrival airport.
    pub fn destination(&self) -> AirportCode {
        self.destination
    }

    /// Returns the scheduled departure time.
    pub fn departure(&self) -> Timestamp {
        self.departure
    }

    /// Returns the scheduled arrival time.
    pub fn arrival(&self) -> Timestamp {
        self.arrival
    }

    /// Returns the reference back to the source record.
    pub fn identity(&self) -> &FlightIdentity {
        &self.identity
    }

    /// Returns the cost-field weight (1 when the record had none).
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the flight duration (always positive).
    pub fn duration(&self) -> Duration {
        self.arrival.signed_duration_since(self.departure)
    }

    /// Earliest time a connecting flight may depart after this one lands.
    ///
    /// `None` when that time is past the end of the calendar, so nothing
    /// can connect.
    pub fn ready_at(&self, min_connection: Duration) -> Option<Timestamp> {
        self.arrival.checked_add_signed(min_connection)
    }
}

fn parse_airport(field: &'static str, value: Option<&str>) -> Result<AirportCode, EdgeError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(EdgeError::MissingAirport(field))?;

    AirportCode::parse_normalized(value).map_err(|_| EdgeError::InvalidAirport {
        field,
        value: value.to_string(),
    })
}
