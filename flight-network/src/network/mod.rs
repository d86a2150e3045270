//! The flight network graph.
//!
//! Flight records are turned into a [`NetworkGraph`] by [`build_graph`];
//! the [`SnapshotStore`] publishes each new graph as an immutable snapshot
//! that any number of route queries can read concurrently.

mod builder;
mod graph;
mod reachability;
mod snapshot;

pub use builder::{BuildReport, build_graph};
pub use graph::{EdgeId, NetworkGraph};
pub use reachability::{direct_reachability, flights_by_origin};
pub use snapshot::{NetworkSnapshot, SnapshotStore};
