//! Route planner over the flight network.
//!
//! Three questions are answered against one immutable [`NetworkGraph`]:
//!
//! - fewest flights ([`Planner::find_route`], breadth-first),
//! - lowest total cost under a pluggable weight
//!   ([`Planner::find_minimum_cost_route`], Dijkstra),
//! - a ranked list of alternatives ([`Planner::find_routes`]).
//!
//! Every itinerary returned respects the minimum connection time and the
//! hop bound of the [`RouteConfig`].
//!
//! [`NetworkGraph`]: crate::network::NetworkGraph

mod config;
mod cost;
mod error;
mod rank;
mod search;


pub use config::{
    DEFAULT_MAX_HOPS, DEFAULT_MAX_RESULTS, DEFAULT_MIN_CONNECTION_MINS, MAX_HOPS_LIMIT,
    MAX_MIN_CONNECTION_MINS, MAX_RESULTS_LIMIT, RouteConfig,
};
pub use cost::{CostFunction, EdgeWeight, UnknownCostFunction, find_minimum_cost_route};
pub use error::RouteError;
pub use rank::{deduplicate, rank_itineraries, remove_dominated};
pub use search::{
    Planner, RouteOptions, RouteRequest, SearchResult, find_route, find_routes,
};
