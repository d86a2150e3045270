//! Graph construction from raw flight records.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{FlightEdge, FlightRecord, SkipReason};

use super::graph::NetworkGraph;

/// Summary of one graph build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Records received from the repository.
    pub records: usize,

    /// Records that became edges.
    pub edges: usize,

    /// Records excluded, by reason.
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl BuildReport {
    /// Total records excluded.
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    /// Records excluded for one reason.
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }
}

/// Build the network graph from the full current set of flight records.
///
/// Records that fail the edge invariants are counted and left out; they never
/// fail the build. An empty input gives an empty graph. The input is not
/// modified.
pub fn build_graph(records: &[FlightRecord]) -> (NetworkGraph, BuildReport) {
    let mut report = BuildReport {
        records: records.len(),
        ..BuildReport::default()
    };
    let mut edges = Vec::with_capacity(records.len());

    for record in records {
        match FlightEdge::from_record(record) {
            Ok(edge) => edges.push(edge),
            Err(e) => {
                debug!(
                    id = ?record.id,
                    airline = ?record.airline_code,
                    number = ?record.flight_number,
                    error = %e,
                    "Skipping flight record"
                );
                *report.skipped.entry(e.reason()).or_default() += 1;
            }
        }
    }

    report.edges = edges.len();
    let graph = NetworkGraph::from_edges(edges);

    info!(
        records = report.records,
        edges = report.edges,
        skipped = report.skipped_total(),
        origins = graph.origin_count(),
        "Built flight network"
    );

    (graph, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AirportCode, Timestamp};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 15, h, m, 0).unwrap()
    }

    fn record(number: &str, from: &str, to: &str, dep: Timestamp, arr: Timestamp) -> FlightRecord {
        FlightRecord::scheduled("XX", number, from, to, dep, arr)
    }

    fn records() -> Vec<FlightRecord> {
        vec![
            record("1", "EGLL", "LFPG", at(8, 0), at(10, 0)),
            record("2", "LFPG", "KJFK", at(12, 0), at(21, 0)),
            record("3", "EGLL", "EGLL", at(9, 0), at(10, 0)), // self-loop
            record("4", "EGLL", "KJFK", at(12, 0), at(11, 0)), // lands before takeoff
            record("5", "", "KJFK", at(12, 0), at(20, 0)),      // blank origin
            record("6", "EGLL", "KJFK", at(7, 0), at(15, 0)),
        ]
    }

    #[test]
    fn skips_invalid_records() {
        let (graph, report) = build_graph(&records());

        assert_eq!(report.records, 6);
        assert_eq!(report.edges, 3);
        assert_eq!(report.skipped_total(), 3);
        assert_eq!(report.skipped_for(SkipReason::SelfLoop), 1);
        assert_eq!(report.skipped_for(SkipReason::NonPositiveDuration), 1);
        assert_eq!(report.skipped_for(SkipReason::MissingAirport), 1);
        assert_eq!(report.skipped_for(SkipReason::InvalidWeight), 0);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn groups_and_sorts_by_origin() {
        let (graph, _) = build_graph(&records());
        let egll = AirportCode::parse("EGLL").unwrap();

        let deps: Vec<_> = graph
            .departures_from(egll)
            .iter()
            .map(|e| e.identity().to_string())
            .collect();
        assert_eq!(deps, vec!["XX6", "XX1"]);
    }

    #[test]
    fn empty_input_gives_empty_graph() {
        let (graph, report) = build_graph(&[]);
        assert!(graph.is_empty());
        assert_eq!(report, BuildReport::default());
    }

    #[test]
    fn input_is_untouched() {
        let input = records();
        let before = input.clone();
        let _ = build_graph(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut shuffled = records();
        shuffled.reverse();

        let (a, _) = build_graph(&records());
        let (b, _) = build_graph(&shuffled);

        for origin in a.origins() {
            let left: BTreeSet<String> = a
                .departures_from(origin)
                .iter()
                .map(|e| e.identity().to_string())
                .collect();
            let right: BTreeSet<String> = b
                .departures_from(origin)
                .iter()
                .map(|e| e.identity().to_string())
                .collect();
            assert_eq!(left, right);
        }
        assert_eq!(a.edges(), b.edges());
    }

    #[test]
    fn report_serializes_reason_keys() {
        let (_, report) = build_graph(&records());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["skipped"]["self_loop"], 1);
        assert_eq!(json["edges"], 3);
    }
}
