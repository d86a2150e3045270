//! Breadth-first route search over the time-expanded network.
//!
//! A search state is "at airport X, able to board anything departing at or
//! after T". From a state, every departure from X no earlier than T is a
//! successor; landing at Y at time A yields the state (Y, A + minimum
//! connection). Levels of the search are hop counts, so the first level
//! that reaches the destination gives the fewest-flights answer.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{AirportCode, Itinerary, Timestamp};
use crate::network::{EdgeId, NetworkGraph};

use super::config::RouteConfig;
use super::error::RouteError;
use super::rank::{deduplicate, rank_itineraries, remove_dominated};

/// Upper bound on edges examined while enumerating routes.
const MAX_ROUTES_EXPLORED: usize = 10_000;

/// An origin/destination pair to route between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteRequest {
    pub origin: AirportCode,
    pub destination: AirportCode,
}

impl RouteRequest {
    /// Create a new route request.
    pub fn new(origin: AirportCode, destination: AirportCode) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Validate the route request.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.origin == self.destination {
            return Err(RouteError::SameAirport(self.origin));
        }
        Ok(())
    }
}

/// Result of a single-answer route search.
///
/// No itinerary means no route satisfies the constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub itinerary: Option<Itinerary>,

    /// Number of search states expanded.
    pub states_expanded: usize,
}

impl SearchResult {
    pub(super) fn found(itinerary: Itinerary, states_expanded: usize) -> Self {
        Self {
            itinerary: Some(itinerary),
            states_expanded,
        }
    }

    pub(super) fn not_found(states_expanded: usize) -> Self {
        Self {
            itinerary: None,
            states_expanded,
        }
    }

    /// True if a route was found.
    pub fn is_found(&self) -> bool {
        self.itinerary.is_some()
    }
}

/// Result of route enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOptions {
    /// Itineraries, ranked best-first.
    pub itineraries: Vec<Itinerary>,

    /// Number of edges examined.
    pub routes_explored: usize,

    /// True when enumeration stopped at the exploration cap, so other
    /// itineraries may exist.
    pub truncated: bool,
}

/// Parent-pointer arena shared by the searches.
///
/// Each step records the edge taken and the step it extended, so partial
/// itineraries are never copied while searching.
#[derive(Debug, Default)]
pub(super) struct Trail {
    steps: Vec<(EdgeId, Option<usize>)>,
}

impl Trail {
    pub(super) fn push(&mut self, edge: EdgeId, parent: Option<usize>) -> usize {
        self.steps.push((edge, parent));
        self.steps.len() - 1
    }

    pub(super) fn edge(&self, step: usize) -> EdgeId {
        self.steps[step].0
    }

    /// Walk parent pointers back from `last` and assemble the itinerary.
    pub(super) fn itinerary(
        &self,
        graph: &NetworkGraph,
        last: usize,
        min_connection: chrono::Duration,
    ) -> Result<Itinerary, RouteError> {
        let mut flights = Vec::new();
        let mut cursor = Some(last);
        while let Some(step) = cursor {
            let (edge, parent) = self.steps[step];
            flights.push(graph.edge(edge).clone());
            cursor = parent;
        }
        flights.reverse();

        Ok(Itinerary::new(flights, min_connection)?)
    }
}

/// A BFS frontier entry.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    airport: AirportCode,
    /// Earliest departure that may be boarded; `None` at the origin.
    ready: Option<Timestamp>,
    step: Option<usize>,
}

/// Route planner over one network graph.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    pub(super) graph: &'a NetworkGraph,
    pub(super) config: &'a RouteConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(graph: &'a NetworkGraph, config: &'a RouteConfig) -> Self {
        Self { graph, config }
    }

    pub(super) fn check(&self, request: &RouteRequest) -> Result<(), RouteError> {
        request.validate()?;
        self.config.validate()
    }

    /// Find an itinerary with the fewest flights, breaking ties by earliest
    /// final arrival.
    ///
    /// States at an airport are pruned when an earlier level, or an earlier
    /// entry in the same level, could already board everything they could.
    /// Any continuation of a pruned state is available to the state that
    /// beat it with no more flights and the same arrival.
    pub fn find_route(&self, request: &RouteRequest) -> Result<SearchResult, RouteError> {
        self.check(request)?;

        let min_connection = self.config.min_connection();
        let destination = request.destination;

        let mut trail = Trail::default();
        let mut best_ready: HashMap<AirportCode, Option<Timestamp>> =
            HashMap::from([(request.origin, None)]);
        let mut frontier = vec![Frontier {
            airport: request.origin,
            ready: None,
            step: None,
        }];
        let mut states_expanded = 0;

        for hops in 1..=self.config.max_hops {
            let last_level = hops == self.config.max_hops;
            let mut arrived: Option<(Timestamp, EdgeId, Option<usize>)> = None;
            let mut next: HashMap<AirportCode, (Timestamp, EdgeId, Option<usize>)> =
                HashMap::new();

            for state in &frontier {
                states_expanded += 1;

                for (id, edge) in self.graph.departures(state.airport, state.ready) {
                    let to = edge.destination();

                    if to == destination {
                        if arrived.is_none_or(|(best, ..)| edge.arrival() < best) {
                            arrived = Some((edge.arrival(), id, state.step));
                        }
                        continue;
                    }
                    if last_level {
                        continue;
                    }

                    let Some(ready) = edge.ready_at(min_connection) else {
                        continue;
                    };
                    if best_ready.get(&to).is_some_and(|&seen| seen <= Some(ready)) {
                        continue;
                    }
                    if next.get(&to).is_none_or(|&(pending, ..)| ready < pending) {
                        next.insert(to, (ready, id, state.step));
                    }
                }
            }

            if let Some((arrival, id, parent)) = arrived {
                let last = trail.push(id, parent);
                let itinerary = trail.itinerary(self.graph, last, min_connection)?;
                debug!(
                    origin = %request.origin,
                    destination = %destination,
                    hops,
                    %arrival,
                    states_expanded,
                    "Route found"
                );
                return Ok(SearchResult::found(itinerary, states_expanded));
            }

            if next.is_empty() {
                break;
            }

            let mut level: Vec<_> = next.into_iter().collect();
            level.sort_by_key(|(airport, _)| *airport);
            frontier = level
                .into_iter()
                .map(|(airport, (ready, id, parent))| {
                    best_ready.insert(airport, Some(ready));
                    Frontier {
                        airport,
                        ready: Some(ready),
                        step: Some(trail.push(id, parent)),
                    }
                })
                .collect();
        }

        debug!(
            origin = %request.origin,
            destination = %destination,
            states_expanded,
            "No route"
        );
        Ok(SearchResult::not_found(states_expanded))
    }

    /// Enumerate itineraries that never revisit an airport, then rank them.
    ///
    /// Dominated and duplicate itineraries are dropped and at most
    /// `max_results` are returned.
    pub fn find_routes(&self, request: &RouteRequest) -> Result<RouteOptions, RouteError> {
        self.enumerate(request, MAX_ROUTES_EXPLORED)
    }

    fn enumerate(&self, request: &RouteRequest, limit: usize) -> Result<RouteOptions, RouteError> {
        self.check(request)?;

        let mut walk = RouteWalk {
            graph: self.graph,
            destination: request.destination,
            max_hops: self.config.max_hops,
            min_connection: self.config.min_connection(),
            path: Vec::new(),
            visited: HashSet::from([request.origin]),
            found: Vec::new(),
            explored: 0,
            limit,
            truncated: false,
        };
        walk.extend(request.origin, None)?;

        if walk.truncated {
            debug!(
                origin = %request.origin,
                destination = %request.destination,
                limit,
                "Route enumeration hit the exploration cap"
            );
        }

        let found = walk.found.len();
        let itineraries = remove_dominated(walk.found);
        let itineraries = deduplicate(itineraries);
        let mut itineraries = rank_itineraries(itineraries);
        itineraries.truncate(self.config.max_results);

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            found,
            returned = itineraries.len(),
            explored = walk.explored,
            truncated = walk.truncated,
            "Routes enumerated"
        );

        Ok(RouteOptions {
            itineraries,
            routes_explored: walk.explored,
            truncated: walk.truncated,
        })
    }
}

/// Depth-first enumeration state.
struct RouteWalk<'a> {
    graph: &'a NetworkGraph,
    destination: AirportCode,
    max_hops: usize,
    min_connection: chrono::Duration,
    path: Vec<EdgeId>,
    visited: HashSet<AirportCode>,
    found: Vec<Itinerary>,
    explored: usize,
    limit: usize,
    truncated: bool,
}

impl RouteWalk<'_> {
    fn extend(&mut self, airport: AirportCode, ready: Option<Timestamp>) -> Result<(), RouteError> {
        let graph = self.graph;

        for (id, edge) in graph.departures(airport, ready) {
            if self.explored >= self.limit {
                self.truncated = true;
                return Ok(());
            }
            self.explored += 1;

            let to = edge.destination();
            if to == self.destination {
                self.path.push(id);
                let flights = self.path.iter().map(|&e| graph.edge(e).clone()).collect();
                self.path.pop();
                self.found.push(Itinerary::new(flights, self.min_connection)?);
                continue;
            }

            if self.path.len() + 1 >= self.max_hops || self.visited.contains(&to) {
                continue;
            }
            let Some(ready) = edge.ready_at(self.min_connection) else {
                continue;
            };

            self.path.push(id);
            self.visited.insert(to);
            self.extend(to, Some(ready))?;
            self.visited.remove(&to);
            self.path.pop();
        }

        Ok(())
    }
}

/// Fewest-flights route from `origin` to `destination`.
///
/// Convenience wrapper around [`Planner::find_route`].
pub fn find_route(
    graph: &NetworkGraph,
    origin: AirportCode,
    destination: AirportCode,
    config: &RouteConfig,
) -> Result<SearchResult, RouteError> {
    Planner::new(graph, config).find_route(&RouteRequest::new(origin, destination))
}

/// Ranked itineraries from `origin` to `destination`.
pub fn find_routes(
    graph: &NetworkGraph,
    origin: AirportCode,
    destination: AirportCode,
    config: &RouteConfig,
) -> Result<RouteOptions, RouteError> {
    Planner::new(graph, config).find_routes(&RouteRequest::new(origin, destination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlightRecord;
    use chrono::{TimeZone, Utc};

    fn code(s: &str) -> AirportCode {
        AirportCode::parse(s).unwrap()
    }

    #[test]
    fn request_rejects_same_airport() {
        let request = RouteRequest::new(code("EGLL"), code("EGLL"));
        assert_eq!(
            request.validate(),
            Err(RouteError::SameAirport(code("EGLL")))
        );
    }

    #[test]
    fn request_accepts_distinct_airports() {
        assert!(RouteRequest::new(code("EGLL"), code("KJFK"))
            .validate()
            .is_ok());
    }

    #[test]
    fn empty_graph_is_not_found() {
        let graph = NetworkGraph::default();
        let config = RouteConfig::default();

        let result = find_route(&graph, code("EGLL"), code("KJFK"), &config).unwrap();
        assert!(!result.is_found());

        let options = find_routes(&graph, code("EGLL"), code("KJFK"), &config).unwrap();
        assert!(options.itineraries.is_empty());
    }

    #[test]
    fn enumeration_reports_exploration_cap() {
        let t = |h| Utc.with_ymd_and_hms(2024, 3, 15, h, 0, 0).unwrap();
        let records: Vec<_> = (0..6)
            .map(|h| FlightRecord::scheduled("XX", &h.to_string(), "EGLL", "KJFK", t(h), t(h + 8)))
            .collect();
        let graph = NetworkGraph::build(&records);
        let config = RouteConfig::default();
        let planner = Planner::new(&graph, &config);
        let request = RouteRequest::new(code("EGLL"), code("KJFK"));

        let complete = planner.find_routes(&request).unwrap();
        assert!(!complete.truncated);
        assert_eq!(complete.routes_explored, 6);

        let capped = planner.enumerate(&request, 2).unwrap();
        assert!(capped.truncated);
        assert_eq!(capped.routes_explored, 2);
        assert!(capped.itineraries.len() <= 2);
    }

    #[test]
    fn invalid_config_rejected_before_search() {
        let graph = NetworkGraph::default();
        let config = RouteConfig::default().with_max_hops(0);

        let err = find_route(&graph, code("EGLL"), code("KJFK"), &config).unwrap_err();
        assert_eq!(err, RouteError::ZeroHops);
    }
}
