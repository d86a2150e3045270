//! Read-only projections of the network graph.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{AirportCode, FlightEdge};

use super::graph::NetworkGraph;

/// For every airport with departures, the distinct airports one flight away.
///
/// Several flights to the same destination collapse into one entry.
pub fn direct_reachability(graph: &NetworkGraph) -> BTreeMap<AirportCode, BTreeSet<AirportCode>> {
    graph
        .origins()
        .map(|origin| {
            let destinations = graph
                .departures_from(origin)
                .iter()
                .map(FlightEdge::destination)
                .collect();
            (origin, destinations)
        })
        .collect()
}

/// For every airport with departures, its outbound flights ordered by
/// departure time.
pub fn flights_by_origin(graph: &NetworkGraph) -> BTreeMap<AirportCode, &[FlightEdge]> {
    graph
        .origins()
        .map(|origin| (origin, graph.departures_from(origin)))
        .collect()
}
