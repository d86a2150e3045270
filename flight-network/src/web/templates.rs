//! Askama templates for the HTML views.

use askama::Template;

use crate::domain::{AirportCode, FlightEdge};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Departures board for one airport.
#[derive(Template)]
#[template(path = "timetable.html")]
pub struct TimetableTemplate {
    pub airport: String,
    pub generation: u64,
    pub rows: Vec<DepartureRow>,
}

impl TimetableTemplate {
    pub fn new(airport: AirportCode, generation: u64, departures: &[FlightEdge]) -> Self {
        Self {
            airport: airport.to_string(),
            generation,
            rows: departures.iter().map(DepartureRow::from_edge).collect(),
        }
    }
}

/// One row of the departures board.
#[derive(Debug, Clone)]
pub struct DepartureRow {
    pub flight: String,
    pub destination: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
}

impl DepartureRow {
    pub fn from_edge(edge: &FlightEdge) -> Self {
        let mins = edge.duration().num_minutes();
        Self {
            flight: edge.identity().to_string(),
            destination: edge.destination().to_string(),
            departure: edge.departure().format(TIME_FORMAT).to_string(),
            arrival: edge.arrival().format(TIME_FORMAT).to_string(),
            duration: format!("{}h{:02}", mins / 60, mins % 60),
        }
    }
}
