//! Raw flight records and flight identity.
//!
//! A `FlightRecord` is what the flight repository hands us: every field is
//! optional because the upstream data is not trusted. Normalizing a record
//! into a graph edge happens in [`super::edge`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time used throughout the network. All schedules are UTC.
pub type Timestamp = DateTime<Utc>;

/// A flight record as stored by the surrounding CRUD service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Surrogate key of the record, if any.
    #[serde(default)]
    pub id: Option<i64>,

    /// Operating airline code (e.g. "BA").
    #[serde(default)]
    pub airline_code: Option<String>,

    /// Flight number within the airline (e.g. "117").
    #[serde(default)]
    pub flight_number: Option<String>,

    /// Departure airport code.
    #[serde(default)]
    pub departure_airport: Option<String>,

    /// Arrival airport code.
    #[serde(default)]
    pub arrival_airport: Option<String>,

    /// Scheduled departure time.
    #[serde(default)]
    pub departure_time: Option<Timestamp>,

    /// Scheduled arrival time.
    #[serde(default)]
    pub arrival_time: Option<Timestamp>,

    /// Optional cost field used as the edge weight.
    #[serde(default)]
    pub cost: Option<f64>,
}

impl FlightRecord {
    /// Convenience constructor for a record with all routing fields set.
    pub fn scheduled(
        airline_code: &str,
        flight_number: &str,
        departure_airport: &str,
        arrival_airport: &str,
        departure_time: Timestamp,
        arrival_time: Timestamp,
    ) -> Self {
        Self {
            id: None,
            airline_code: Some(airline_code.to_string()),
            flight_number: Some(flight_number.to_string()),
            departure_airport: Some(departure_airport.to_string()),
            arrival_airport: Some(arrival_airport.to_string()),
            departure_time: Some(departure_time),
            arrival_time: Some(arrival_time),
            cost: None,
        }
    }

    /// Set the cost field.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Set the surrogate id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Opaque reference from an edge back to its source flight record.
///
/// Carried through the search unchanged so callers can resolve itineraries
/// back to full records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlightIdentity {
    /// Airline code plus flight number.
    Scheduled { airline: String, number: String },
    /// Surrogate id of the record.
    Surrogate { id: i64 },
}

impl FlightIdentity {
    /// Derive the identity of a record.
    ///
    /// Prefers airline + flight number, falling back to the surrogate id.
    /// Returns `None` when the record carries neither.
    pub fn of(record: &FlightRecord) -> Option<Self> {
        let airline = non_blank(record.airline_code.as_deref());
        let number = non_blank(record.flight_number.as_deref());

        match (airline, number, record.id) {
            (Some(airline), Some(number), _) => Some(FlightIdentity::Scheduled {
                airline: airline.to_ascii_uppercase(),
                number: number.to_string(),
            }),
            (_, _, Some(id)) => Some(FlightIdentity::Surrogate { id }),
            _ => None,
        }
    }
}

impl fmt::Display for FlightIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightIdentity::Scheduled { airline, number } => write!(f, "{airline}{number}"),
            FlightIdentity::Surrogate { id } => write!(f, "#{id}"),
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_prefers_flight_number() {
        let record = FlightRecord {
            id: Some(7),
            airline_code: Some("ba".into()),
            flight_number: Some("117".into()),
            ..FlightRecord::default()
        };

        let identity = FlightIdentity::of(&record).unwrap();
        assert_eq!(
            identity,
            FlightIdentity::Scheduled {
                airline: "BA".into(),
                number: "117".into()
            }
        );
        assert_eq!(identity.to_string(), "BA117");
    }

    #[test]
    fn identity_falls_back_to_surrogate() {
        let record = FlightRecord {
            id: Some(42),
            airline_code: Some("AF".into()),
            flight_number: Some("  ".into()),
            ..FlightRecord::default()
        };

        let identity = FlightIdentity::of(&record).unwrap();
        assert_eq!(identity, FlightIdentity::Surrogate { id: 42 });
        assert_eq!(identity.to_string(), "#42");
    }

    #[test]
    fn identity_missing() {
        assert!(FlightIdentity::of(&FlightRecord::default()).is_none());
    }

    #[test]
    fn record_deserializes_with_missing_fields() {
        let json = r#"{
            "id": 3,
            "departure_airport": "EGLL",
            "departure_time": "2024-03-15T10:00:00Z"
        }"#;

        let record: FlightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, Some(3));
        assert_eq!(record.departure_airport.as_deref(), Some("EGLL"));
        assert!(record.arrival_airport.is_none());
        assert!(record.arrival_time.is_none());
        assert!(record.cost.is_none());
    }

    #[test]
    fn identity_serializes_tagged() {
        let identity = FlightIdentity::Surrogate { id: 5 };
        assert_eq!(
            serde_json::to_string(&identity).unwrap(),
            r#"{"kind":"surrogate","id":5}"#
        );
    }
}
