//! HTTP route handlers.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::cache::{QueryKind, RouteKey};
use crate::domain::AirportCode;
use crate::network::{NetworkSnapshot, direct_reachability, flights_by_origin};
use crate::planner::{CostFunction, EdgeWeight, Planner, RouteConfig, RouteError, RouteRequest};
use crate::repository::RepositoryError;

use super::dto::*;
use super::state::AppState;
use super::templates::TimetableTemplate;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/airport-to-airports", get(airport_to_airports))
        .route("/airports-to-flights", get(airports_to_flights))
        .route("/route", get(route))
        .route("/route-minimum-cost", get(route_minimum_cost))
        .route("/routes", get(routes))
        .route("/timetable", get(timetable))
        .route("/snapshot", get(snapshot))
        .route("/refresh", post(refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The snapshot to answer from, or 503 before the first build.
async fn current_snapshot(state: &AppState) -> Result<Arc<NetworkSnapshot>, AppError> {
    state
        .snapshots
        .current()
        .await
        .ok_or_else(|| AppError::Unavailable {
            message: "Flight network has not been built yet".to_string(),
        })
}

/// Origin -> airports reachable by one direct flight.
async fn airport_to_airports(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<AirportCode, BTreeSet<AirportCode>>>, AppError> {
    let snapshot = current_snapshot(&state).await?;
    Ok(Json(direct_reachability(snapshot.graph())))
}

/// Origin -> its departures, earliest first.
async fn airports_to_flights(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<AirportCode, Vec<FlightView>>>, AppError> {
    let snapshot = current_snapshot(&state).await?;

    let flights = flights_by_origin(snapshot.graph())
        .into_iter()
        .map(|(origin, edges)| (origin, edges.iter().map(FlightView::from_edge).collect()))
        .collect();

    Ok(Json(flights))
}

fn parse_airport(field: &str, value: Option<&str>) -> Result<AirportCode, AppError> {
    let raw = value.ok_or_else(|| AppError::BadRequest {
        message: format!("Missing {field} airport"),
    })?;
    AirportCode::parse_normalized(raw).map_err(|e| AppError::BadRequest {
        message: format!("Invalid {field} airport: {e}"),
    })
}

impl RouteQuery {
    /// Resolve the request and the effective search parameters.
    fn resolve(&self, defaults: &RouteConfig) -> Result<(RouteRequest, RouteConfig), AppError> {
        let origin = parse_airport("departure", self.departure.as_deref())?;
        let destination = parse_airport("arrival", self.arrival.as_deref())?;
        let request = RouteRequest::new(origin, destination);
        request.validate()?;

        let config = RouteConfig::new(
            self.max_hops.unwrap_or(defaults.max_hops),
            self.min_connection_mins
                .unwrap_or(defaults.min_connection_mins),
            self.max_results.unwrap_or(defaults.max_results),
        );
        config.validate()?;

        Ok((request, config))
    }

    fn cost_function(&self) -> Result<CostFunction, AppError> {
        match self.cost.as_deref() {
            None => Ok(CostFunction::default()),
            Some(name) => name.parse().map_err(|e: crate::planner::UnknownCostFunction| {
                AppError::BadRequest {
                    message: e.to_string(),
                }
            }),
        }
    }
}

fn no_route(request: &RouteRequest) -> AppError {
    AppError::NotFound {
        message: format!(
            "No route from {} to {}",
            request.origin, request.destination
        ),
    }
}

/// Fewest-flights route.
async fn route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    let (request, config) = query.resolve(&state.config)?;
    let snapshot = current_snapshot(&state).await?;

    let key = RouteKey::new(
        snapshot.generation(),
        QueryKind::Route,
        request.origin,
        request.destination,
        &config,
    );
    let found = state
        .cache
        .get_or_search(key, || {
            let result = Planner::new(snapshot.graph(), &config).find_route(&request)?;
            Ok(result.itinerary.into_iter().collect())
        })
        .await?;

    let itinerary = found.first().ok_or_else(|| no_route(&request))?;

    Ok(Json(RouteResponse {
        generation: snapshot.generation(),
        itinerary: ItineraryView::from_itinerary(itinerary),
    }))
}

/// Lowest-cost route under a built-in cost function.
async fn route_minimum_cost(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<MinimumCostResponse>, AppError> {
    let (request, config) = query.resolve(&state.config)?;
    let cost = query.cost_function()?;
    let snapshot = current_snapshot(&state).await?;

    let key = RouteKey::new(
        snapshot.generation(),
        QueryKind::MinimumCost(cost),
        request.origin,
        request.destination,
        &config,
    );
    let found = state
        .cache
        .get_or_search(key, || {
            let result = Planner::new(snapshot.graph(), &config)
                .find_minimum_cost_route(&request, &cost)?;
            Ok(result.itinerary.into_iter().collect())
        })
        .await?;

    let itinerary = found.first().ok_or_else(|| no_route(&request))?;

    Ok(Json(MinimumCostResponse {
        generation: snapshot.generation(),
        cost_function: cost,
        total_cost: itinerary.total_weight(|edge| cost.weight(edge)),
        itinerary: ItineraryView::from_itinerary(itinerary),
    }))
}

/// Ranked alternatives. An empty list is a 404 like the single searches.
async fn routes(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RoutesResponse>, AppError> {
    let (request, config) = query.resolve(&state.config)?;
    let snapshot = current_snapshot(&state).await?;

    let key = RouteKey::new(
        snapshot.generation(),
        QueryKind::Routes,
        request.origin,
        request.destination,
        &config,
    );
    let found = state
        .cache
        .get_or_search(key, || {
            Ok(Planner::new(snapshot.graph(), &config)
                .find_routes(&request)?
                .itineraries)
        })
        .await?;

    if found.is_empty() {
        return Err(no_route(&request));
    }

    Ok(Json(RoutesResponse {
        generation: snapshot.generation(),
        itineraries: found.iter().map(ItineraryView::from_itinerary).collect(),
    }))
}

/// HTML departures board for one airport.
async fn timetable(
    State(state): State<AppState>,
    Query(query): Query<TimetableQuery>,
) -> Result<Html<String>, AppError> {
    let airport = parse_airport("timetable", query.airport.as_deref())?;
    let snapshot = current_snapshot(&state).await?;

    let template = TimetableTemplate::new(
        airport,
        snapshot.generation(),
        snapshot.graph().departures_from(airport),
    );
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })?;

    Ok(Html(html))
}

/// Metadata of the snapshot currently serving.
async fn snapshot(State(state): State<AppState>) -> Result<Json<SnapshotResponse>, AppError> {
    let snapshot = current_snapshot(&state).await?;
    Ok(Json(SnapshotResponse::from_snapshot(&snapshot)))
}

/// Rebuild the network now.
async fn refresh(State(state): State<AppState>) -> Result<Json<SnapshotResponse>, AppError> {
    let snapshot = state.refresh().await?;
    Ok(Json(SnapshotResponse::from_snapshot(&snapshot)))
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        if e.is_client_error() {
            AppError::BadRequest {
                message: e.to_string(),
            }
        } else {
            AppError::Internal {
                message: e.to_string(),
            }
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Unavailable {
            message: format!("Flight source unavailable: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else if status != StatusCode::NOT_FOUND {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
