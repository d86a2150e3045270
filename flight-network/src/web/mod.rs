//! HTTP boundary for the flight network.
//!
//! Exposes reachability projections, the three route searches, a departures
//! board and snapshot management as axum handlers.

mod dto;
mod routes;
mod state;
mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::{DepartureRow, TimetableTemplate};
