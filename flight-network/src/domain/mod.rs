//! Domain types for the flight network.
//!
//! This module contains the validated value types the graph and the route
//! searches operate on. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod airport;
mod edge;
mod error;
mod flight;
mod itinerary;

pub use airport::{AirportCode, InvalidAirportCode};
pub use edge::{DEFAULT_WEIGHT, EdgeError, FlightEdge, SkipReason};
pub use error::DomainError;
pub use flight::{FlightIdentity, FlightRecord, Timestamp};
pub use itinerary::Itinerary;
