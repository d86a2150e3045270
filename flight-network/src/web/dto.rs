//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{AirportCode, FlightEdge, FlightIdentity, Itinerary, Timestamp};
use crate::network::{BuildReport, NetworkSnapshot};
use crate::planner::CostFunction;

/// Query string shared by the route endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    /// Origin airport code
    pub departure: Option<String>,

    /// Destination airport code
    pub arrival: Option<String>,

    /// Overrides the configured hop bound
    pub max_hops: Option<usize>,

    /// Overrides the configured minimum connection time
    pub min_connection_mins: Option<i64>,

    /// Overrides the configured result limit (enumeration only)
    pub max_results: Option<usize>,

    /// Cost function name (minimum-cost search only)
    pub cost: Option<String>,
}

/// Query string for the timetable page.
#[derive(Debug, Deserialize)]
pub struct TimetableQuery {
    pub airport: Option<String>,
}

/// One flight of an itinerary or departure list.
#[derive(Debug, Serialize)]
pub struct FlightView {
    /// Display form of the identity, e.g. "BA117"
    pub flight: String,
    pub identity: FlightIdentity,
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub departure: Timestamp,
    pub arrival: Timestamp,
    pub duration_mins: i64,
    pub weight: f64,
}

impl FlightView {
    pub fn from_edge(edge: &FlightEdge) -> Self {
        Self {
            flight: edge.identity().to_string(),
            identity: edge.identity().clone(),
            origin: edge.origin(),
            destination: edge.destination(),
            departure: edge.departure(),
            arrival: edge.arrival(),
            duration_mins: edge.duration().num_minutes(),
            weight: edge.weight(),
        }
    }
}

/// An itinerary in a response.
#[derive(Debug, Serialize)]
pub struct ItineraryView {
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub departure: Timestamp,
    pub arrival: Timestamp,
    pub hops: usize,
    pub total_duration_mins: i64,

    /// Layover at each connecting airport, in order
    pub connections_mins: Vec<i64>,

    pub flights: Vec<FlightView>,
}

impl ItineraryView {
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            origin: itinerary.origin(),
            destination: itinerary.destination(),
            departure: itinerary.departure_time(),
            arrival: itinerary.arrival_time(),
            hops: itinerary.hop_count(),
            total_duration_mins: itinerary.total_duration().num_minutes(),
            connections_mins: itinerary
                .connection_times()
                .iter()
                .map(|d| d.num_minutes())
                .collect(),
            flights: itinerary.flights().iter().map(FlightView::from_edge).collect(),
        }
    }
}

/// Response for the fewest-flights search.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Snapshot generation the answer was computed against
    pub generation: u64,
    pub itinerary: ItineraryView,
}

/// Response for the minimum-cost search.
#[derive(Debug, Serialize)]
pub struct MinimumCostResponse {
    pub generation: u64,
    pub cost_function: CostFunction,
    pub total_cost: f64,
    pub itinerary: ItineraryView,
}

/// Response for route enumeration.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub generation: u64,
    pub itineraries: Vec<ItineraryView>,
}

/// Snapshot metadata.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub generation: u64,
    pub built_at: Timestamp,
    pub airports: usize,
    pub edges: usize,
    pub report: BuildReport,
}

impl SnapshotResponse {
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> Self {
        Self {
            generation: snapshot.generation(),
            built_at: snapshot.built_at(),
            airports: snapshot.graph().airports().len(),
            edges: snapshot.graph().edge_count(),
            report: snapshot.report().clone(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
