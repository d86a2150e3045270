//! Itinerary type.
//!
//! An `Itinerary` is the result of a route search: one or more flights
//! where each flight departs from the airport the previous one landed at,
//! no earlier than the minimum connection time after it landed.

use chrono::Duration;

use super::{AirportCode, DomainError, FlightEdge, FlightIdentity, Timestamp};

/// A chronologically and topologically valid sequence of flights.
///
/// # Invariants
///
/// - At least one flight
/// - `flights[i].destination == flights[i + 1].origin`
/// - `flights[i + 1].departure >= flights[i].arrival + min_connection`
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    flights: Vec<FlightEdge>,
}

impl Itinerary {
    /// Constructs an itinerary, validating chaining against `min_connection`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `flights` is empty
    /// - Consecutive flights don't share an airport
    /// - A connection is shorter than `min_connection`
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use flight_network::domain::{FlightEdge, FlightRecord, Itinerary};
    ///
    /// let t = |h| Utc.with_ymd_and_hms(2024, 3, 15, h, 0, 0).unwrap();
    /// let first = FlightEdge::from_record(&FlightRecord::scheduled(
    ///     "BA", "304", "EGLL", "LFPG", t(8), t(10),
    /// ))
    /// .unwrap();
    /// let second = FlightEdge::from_record(&FlightRecord::scheduled(
    ///     "AF", "6", "LFPG", "KJFK", t(12), t(21),
    /// ))
    /// .unwrap();
    ///
    /// let itinerary = Itinerary::new(vec![first, second], Duration::minutes(45)).unwrap();
    /// assert_eq!(itinerary.hop_count(), 2);
    /// assert_eq!(itinerary.destination().as_str(), "KJFK");
    /// ```
    pub fn new(flights: Vec<FlightEdge>, min_connection: Duration) -> Result<Self, DomainError> {
        if flights.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for pair in flights.windows(2) {
            let (inbound, outbound) = (&pair[0], &pair[1]);
            if inbound.destination() != outbound.origin() {
                return Err(DomainError::AirportsNotConnected(
                    inbound.destination(),
                    outbound.origin(),
                ));
            }

            let gap = outbound.departure().signed_duration_since(inbound.arrival());
            if gap < min_connection {
                return Err(DomainError::connection_too_short(
                    inbound.destination(),
                    gap,
                    min_connection,
                ));
            }
        }

        Ok(Itinerary { flights })
    }

    /// Returns all flights in order.
    pub fn flights(&self) -> &[FlightEdge] {
        &self.flights
    }

    /// Returns the number of flights.
    pub fn hop_count(&self) -> usize {
        self.flights.len()
    }

    /// Returns true if this is a single flight.
    pub fn is_direct(&self) -> bool {
        self.flights.len() == 1
    }

    /// Returns the identities of the flights, in order.
    pub fn identities(&self) -> impl Iterator<Item = &FlightIdentity> {
        self.flights.iter().map(FlightEdge::identity)
    }

    /// Returns the overall origin.
    pub fn origin(&self) -> AirportCode {
        self.first().origin()
    }

    /// Returns the overall destination.
    pub fn destination(&self) -> AirportCode {
        self.last().destination()
    }

    /// Returns the departure time of the first flight.
    pub fn departure_time(&self) -> Timestamp {
        self.first().departure()
    }

    /// Returns the arrival time of the last flight.
    pub fn arrival_time(&self) -> Timestamp {
        self.last().arrival()
    }

    /// Returns the time from first departure to last arrival.
    pub fn total_duration(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    /// Returns the ground time at each connecting airport.
    pub fn connection_times(&self) -> Vec<Duration> {
        self.flights
            .windows(2)
            .map(|pair| pair[1].departure().signed_duration_since(pair[0].arrival()))
            .collect()
    }

    /// Returns the sum of `weight` over all flights.
    pub fn total_weight<F>(&self, weight: F) -> f64
    where
        F: Fn(&FlightEdge) -> f64,
    {
        self.flights.iter().map(weight).sum()
    }

    /// Returns the airports visited, origin first.
    pub fn airports(&self) -> Vec<AirportCode> {
        std::iter::once(self.origin())
            .chain(self.flights.iter().map(FlightEdge::destination))
            .collect()
    }

    fn first(&self) -> &FlightEdge {
        // Non-empty by construction
        &self.flights[0]
    }

    fn last(&self) -> &FlightEdge {
        &self.flights[self.flights.len() - 1]
    }
}
