//! The queryable flight network.
//!
//! All edges live in one arena, sorted by origin airport and then by
//! departure time. Each origin maps to a contiguous range of that arena, so
//! "departures from X no earlier than T" is a binary search inside one
//! slice, and an edge can be named by its arena position ([`EdgeId`]).

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use crate::domain::{AirportCode, FlightEdge, FlightRecord, Timestamp};

/// Position of an edge within a [`NetworkGraph`].
///
/// Only meaningful for the graph that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Immutable snapshot of the flight network.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    /// Edges sorted by (origin, departure, arrival, identity).
    edges: Vec<FlightEdge>,

    /// Origin airport -> its range in `edges`.
    index: HashMap<AirportCode, Range<usize>>,

    /// Every airport that appears as an origin or a destination.
    airports: BTreeSet<AirportCode>,
}

impl NetworkGraph {
    /// Build a graph from raw records, discarding the build report.
    ///
    /// See [`super::build_graph`] for the variant that reports skipped records.
    pub fn build(records: &[FlightRecord]) -> Self {
        super::build_graph(records).0
    }

    /// Assemble a graph from already-validated edges.
    pub fn from_edges(mut edges: Vec<FlightEdge>) -> Self {
        edges.sort_by(|a, b| {
            a.origin()
                .cmp(&b.origin())
                .then_with(|| a.departure().cmp(&b.departure()))
                .then_with(|| a.arrival().cmp(&b.arrival()))
                .then_with(|| a.identity().cmp(b.identity()))
        });

        let mut index: HashMap<AirportCode, Range<usize>> = HashMap::new();
        let mut airports = BTreeSet::new();

        for (i, edge) in edges.iter().enumerate() {
            airports.insert(edge.origin());
            airports.insert(edge.destination());
            index
                .entry(edge.origin())
                .and_modify(|range| range.end = i + 1)
                .or_insert(i..i + 1);
        }

        Self {
            edges,
            index,
            airports,
        }
    }

    /// Returns all flights departing `airport`, earliest first.
    pub fn departures_from(&self, airport: AirportCode) -> &[FlightEdge] {
        match self.index.get(&airport) {
            Some(range) => &self.edges[range.clone()],
            None => &[],
        }
    }

    /// Returns flights departing `airport` no earlier than `not_before`,
    /// earliest first, paired with their ids.
    ///
    /// `None` means no lower bound.
    pub fn departures(
        &self,
        airport: AirportCode,
        not_before: Option<Timestamp>,
    ) -> impl Iterator<Item = (EdgeId, &FlightEdge)> + '_ {
        let range = self.index.get(&airport).cloned().unwrap_or(0..0);
        let skip = match not_before {
            Some(bound) => self.edges[range.clone()].partition_point(|e| e.departure() < bound),
            None => 0,
        };

        (range.start + skip..range.end).map(move |i| (EdgeId(i), &self.edges[i]))
    }

    /// Returns the edge with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this graph.
    pub fn edge(&self, id: EdgeId) -> &FlightEdge {
        &self.edges[id.0]
    }

    /// Returns every edge, grouped by origin and sorted by departure.
    pub fn edges(&self) -> &[FlightEdge] {
        &self.edges
    }

    /// Returns airports with at least one departure, in code order.
    pub fn origins(&self) -> impl Iterator<Item = AirportCode> + '_ {
        self.airports
            .iter()
            .copied()
            .filter(|airport| self.index.contains_key(airport))
    }

    /// Returns every airport seen as an origin or destination.
    pub fn airports(&self) -> &BTreeSet<AirportCode> {
        &self.airports
    }

    /// Returns true if `airport` appears anywhere in the network.
    pub fn contains_airport(&self, airport: AirportCode) -> bool {
        self.airports.contains(&airport)
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of airports with departures.
    pub fn origin_count(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
