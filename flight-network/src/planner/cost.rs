//! Minimum-cost route search.
//!
//! Dijkstra over edges rather than airports: a label is "arrived via this
//! flight, having used this many flights, at this accumulated cost". The
//! same airport reached at different times is a different label, so the
//! connection-time constraint is never violated by a cheaper but later
//! arrival shadowing an earlier one.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{AirportCode, FlightEdge, Timestamp};
use crate::network::{EdgeId, NetworkGraph};

use super::config::RouteConfig;
use super::error::RouteError;
use super::search::{Planner, RouteRequest, SearchResult, Trail};

/// Cost of taking one flight.
///
/// Must return a finite, non-negative number. Any closure
/// `Fn(&FlightEdge) -> f64` is an `EdgeWeight`.
pub trait EdgeWeight {
    fn weight(&self, edge: &FlightEdge) -> f64;
}

impl<F> EdgeWeight for F
where
    F: Fn(&FlightEdge) -> f64,
{
    fn weight(&self, edge: &FlightEdge) -> f64 {
        self(edge)
    }
}

/// Built-in cost functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostFunction {
    /// Every flight costs 1.
    #[default]
    Hops,
    /// Minutes spent in the air.
    Duration,
    /// The flight's own weight, taken from the record's cost.
    Weight,
}

impl CostFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostFunction::Hops => "hops",
            CostFunction::Duration => "duration",
            CostFunction::Weight => "weight",
        }
    }
}

impl EdgeWeight for CostFunction {
    fn weight(&self, edge: &FlightEdge) -> f64 {
        match self {
            CostFunction::Hops => 1.0,
            CostFunction::Duration => edge.duration().num_minutes() as f64,
            CostFunction::Weight => edge.weight(),
        }
    }
}

impl fmt::Display for CostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown cost function name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cost function '{0}', expected hops, duration or weight")]
pub struct UnknownCostFunction(String);

impl FromStr for CostFunction {
    type Err = UnknownCostFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hops" => Ok(CostFunction::Hops),
            "duration" => Ok(CostFunction::Duration),
            "weight" => Ok(CostFunction::Weight),
            _ => Err(UnknownCostFunction(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    cost: FloatOrd,
    hops: usize,
    arrival: Timestamp,
    step: usize,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the cheapest, then fewest flights,
        // then earliest arrival.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.hops.cmp(&self.hops))
            .then_with(|| other.arrival.cmp(&self.arrival))
            .then_with(|| other.step.cmp(&self.step))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn checked_weight<W: EdgeWeight + ?Sized>(weight: &W, edge: &FlightEdge) -> Result<f64, RouteError> {
    let w = weight.weight(edge);
    if w.is_finite() && w >= 0.0 {
        Ok(w)
    } else {
        Err(RouteError::InvalidWeight {
            flight: edge.identity().clone(),
            weight: w,
        })
    }
}

impl Planner<'_> {
    /// Find the itinerary with the lowest total weight.
    ///
    /// Ties are broken by fewer flights, then by earliest final arrival.
    /// With [`CostFunction::Hops`] this answers the same question as
    /// [`Planner::find_route`].
    pub fn find_minimum_cost_route<W: EdgeWeight + ?Sized>(
        &self,
        request: &RouteRequest,
        weight: &W,
    ) -> Result<SearchResult, RouteError> {
        self.check(request)?;

        let min_connection = self.config.min_connection();
        let max_hops = self.config.max_hops;

        let mut trail = Trail::default();
        let mut heap = BinaryHeap::new();
        // Edge -> fewest flights it has been settled with.
        let mut settled: HashMap<EdgeId, usize> = HashMap::new();
        let mut states_expanded = 0;

        for (id, edge) in self.graph.departures(request.origin, None) {
            let cost = checked_weight(weight, edge)?;
            heap.push(QueueEntry {
                cost: FloatOrd(cost),
                hops: 1,
                arrival: edge.arrival(),
                step: trail.push(id, None),
            });
        }

        while let Some(entry) = heap.pop() {
            let id = trail.edge(entry.step);
            if settled.get(&id).is_some_and(|&hops| hops <= entry.hops) {
                continue;
            }
            settled.insert(id, entry.hops);
            states_expanded += 1;

            let edge = self.graph.edge(id);
            if edge.destination() == request.destination {
                let itinerary = trail.itinerary(self.graph, entry.step, min_connection)?;
                debug!(
                    origin = %request.origin,
                    destination = %request.destination,
                    cost = entry.cost.0,
                    hops = entry.hops,
                    states_expanded,
                    "Minimum-cost route found"
                );
                return Ok(SearchResult::found(itinerary, states_expanded));
            }

            if entry.hops >= max_hops {
                continue;
            }

            let Some(ready) = edge.ready_at(min_connection) else {
                continue;
            };
            let next_hops = entry.hops + 1;
            for (next_id, next) in self.graph.departures(edge.destination(), Some(ready)) {
                if settled.get(&next_id).is_some_and(|&hops| hops <= next_hops) {
                    continue;
                }
                let cost = entry.cost.0 + checked_weight(weight, next)?;
                heap.push(QueueEntry {
                    cost: FloatOrd(cost),
                    hops: next_hops,
                    arrival: next.arrival(),
                    step: trail.push(next_id, Some(entry.step)),
                });
            }
        }

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            states_expanded,
            "No minimum-cost route"
        );
        Ok(SearchResult::not_found(states_expanded))
    }
}

/// Lowest-cost route from `origin` to `destination` under `weight`.
///
/// Convenience wrapper around [`Planner::find_minimum_cost_route`].
pub fn find_minimum_cost_route<W: EdgeWeight + ?Sized>(
    graph: &NetworkGraph,
    origin: AirportCode,
    destination: AirportCode,
    config: &RouteConfig,
    weight: &W,
) -> Result<SearchResult, RouteError> {
    Planner::new(graph, config)
        .find_minimum_cost_route(&RouteRequest::new(origin, destination), weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlightRecord;
    use chrono::{TimeZone, Utc};

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 15, h, m, 0).unwrap()
    }

    fn code(s: &str) -> AirportCode {
        AirportCode::parse(s).unwrap()
    }

    #[test]
    fn cost_function_parsing() {
        assert_eq!("hops".parse::<CostFunction>(), Ok(CostFunction::Hops));
        assert_eq!(" Duration ".parse::<CostFunction>(), Ok(CostFunction::Duration));
        assert_eq!("WEIGHT".parse::<CostFunction>(), Ok(CostFunction::Weight));
        assert!("price".parse::<CostFunction>().is_err());
        assert_eq!(CostFunction::default(), CostFunction::Hops);
        assert_eq!(CostFunction::Duration.to_string(), "duration");
    }

    #[test]
    fn cost_function_weights() {
        let edge = FlightEdge::from_record(
            &FlightRecord::scheduled("BA", "1", "EGLL", "LFPG", at(8, 0), at(9, 15))
                .with_cost(120.0),
        )
        .unwrap();

        assert_eq!(CostFunction::Hops.weight(&edge), 1.0);
        assert_eq!(CostFunction::Duration.weight(&edge), 75.0);
        assert_eq!(CostFunction::Weight.weight(&edge), 120.0);
    }

    #[test]
    fn closures_are_weights() {
        let edge = FlightEdge::from_record(&FlightRecord::scheduled(
            "BA", "1", "EGLL", "LFPG", at(8, 0), at(9, 0),
        ))
        .unwrap();
        let doubled = |e: &FlightEdge| e.weight() * 2.0;
        assert_eq!(doubled.weight(&edge), 2.0);
    }

    #[test]
    fn queue_pops_cheapest_then_fewest_hops_then_earliest() {
        let mut heap = BinaryHeap::new();
        let entry = |cost, hops, arrival, step| QueueEntry {
            cost: FloatOrd(cost),
            hops,
            arrival,
            step,
        };
        heap.push(entry(2.0, 1, at(9, 0), 0));
        heap.push(entry(1.0, 2, at(10, 0), 1));
        heap.push(entry(1.0, 2, at(9, 30), 2));
        heap.push(entry(1.0, 1, at(11, 0), 3));

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.step)).collect();
        assert_eq!(order, vec![3, 2, 1, 0]);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let graph = NetworkGraph::build(&[FlightRecord::scheduled(
            "BA", "1", "EGLL", "LFPG", at(8, 0), at(9, 0),
        )]);
        let negative = |_: &FlightEdge| -1.0;

        let err = find_minimum_cost_route(
            &graph,
            code("EGLL"),
            code("LFPG"),
            &RouteConfig::default(),
            &negative,
        )
        .unwrap_err();
        assert!(matches!(err, RouteError::InvalidWeight { weight, .. } if weight == -1.0));
    }

    #[test]
    fn nan_weight_is_rejected() {
        let graph = NetworkGraph::build(&[FlightRecord::scheduled(
            "BA", "1", "EGLL", "LFPG", at(8, 0), at(9, 0),
        )]);

        let err = find_minimum_cost_route(
            &graph,
            code("EGLL"),
            code("LFPG"),
            &RouteConfig::default(),
            &|_: &FlightEdge| f64::NAN,
        )
        .unwrap_err();
        assert!(matches!(err, RouteError::InvalidWeight { .. }));
    }
}
