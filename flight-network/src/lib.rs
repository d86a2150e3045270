//! Flight network route computation.
//!
//! Builds a directed, time-stamped graph of scheduled flights and answers
//! routing questions over it: which airports are one flight apart, the
//! fewest-flights itinerary between two airports, and the lowest-cost
//! itinerary under a pluggable cost function. Every itinerary respects a
//! minimum connection time at each intermediate airport.

pub mod cache;
pub mod config;
pub mod domain;
pub mod network;
pub mod planner;
pub mod repository;
pub mod web;
