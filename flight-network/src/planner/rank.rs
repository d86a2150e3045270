//! Itinerary ranking for enumerated routes.
//!
//! Ranks itineraries so the most useful options come first.

use std::cmp::Ordering;

use crate::domain::Itinerary;

fn preference(a: &Itinerary, b: &Itinerary) -> Ordering {
    a.arrival_time()
        .cmp(&b.arrival_time())
        .then_with(|| a.hop_count().cmp(&b.hop_count()))
        .then_with(|| a.total_duration().cmp(&b.total_duration()))
        .then_with(|| a.departure_time().cmp(&b.departure_time()))
        .then_with(|| a.identities().cmp(b.identities()))
}

/// True if `a` is at least as good as `b` everywhere and better somewhere.
fn dominates(a: &Itinerary, b: &Itinerary) -> bool {
    a.arrival_time() <= b.arrival_time()
        && a.hop_count() <= b.hop_count()
        && a.total_duration() <= b.total_duration()
        && (a.arrival_time() < b.arrival_time()
            || a.hop_count() < b.hop_count()
            || a.total_duration() < b.total_duration())
}

/// Rank itineraries by preference.
///
/// Itineraries are ranked by:
/// 1. Arrival time (earlier is better)
/// 2. Number of flights (fewer is better)
/// 3. Total duration (shorter is better)
///
/// Remaining ties fall back to departure time and flight identities so the
/// order is deterministic.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by(preference);
    itineraries
}

/// Remove dominated itineraries.
///
/// An itinerary is dominated if another one arrives no later, uses no more
/// flights, and takes no longer, while being strictly better in at least one
/// of those.
pub fn remove_dominated(itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    if itineraries.len() <= 1 {
        return itineraries;
    }

    let mut result: Vec<Itinerary> = Vec::with_capacity(itineraries.len());

    for itinerary in itineraries {
        if result.iter().any(|existing| dominates(existing, &itinerary)) {
            continue;
        }
        result.retain(|existing| !dominates(&itinerary, existing));
        result.push(itinerary);
    }

    result
}

/// Collapse itineraries that look identical to a traveller.
///
/// Two itineraries are duplicates if they depart and arrive at the same
/// times with the same number of flights. The first in preference order
/// is kept.
pub fn deduplicate(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    if itineraries.len() <= 1 {
        return itineraries;
    }

    itineraries.sort_by(preference);

    let mut result = Vec::with_capacity(itineraries.len());
    let mut last_key = None;

    for itinerary in itineraries {
        let key = (
            itinerary.arrival_time(),
            itinerary.departure_time(),
            itinerary.hop_count(),
        );

        if last_key != Some(key) {
            result.push(itinerary);
            last_key = Some(key);
        }
    }

    result
}
