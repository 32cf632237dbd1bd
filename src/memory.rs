use std::collections::HashMap;

use itertools::Itertools;

use crate::model::condition::Score;
use crate::model::entity::Name;
use crate::model::seating::{pair_key, PairKey, SeatingEvent, Table, TableConstraints};

/// Weights for the most recent, second most recent and third most recent
/// event in the window. Older slots carry no weight.
pub const RECENCY_WEIGHTS: [Score; 3] = [1.0, 0.6, 0.3];

/// Who sat with whom over a window of past events.
///
/// Each known pair maps to one 0/1 slot per event, oldest first. Pairs that
/// never shared a table inside the window are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairingMemory {
    pairs: HashMap<PairKey, Vec<u8>>,
    n_events: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatPair {
    pub names: (Name, Name),
    pub events_ago: Vec<usize>,
}

impl PairingMemory {
    /// `window` must be in chronological order.
    pub fn build(window: &[SeatingEvent]) -> PairingMemory {
        let n_events = window.len();
        let mut pairs: HashMap<PairKey, Vec<u8>> = HashMap::new();
        for (event_index, event) in window.iter().enumerate() {
            for table in &event.tables {
                for (a, b) in table.iter().map(|seat| &seat.name).tuple_combinations() {
                    let slots = pairs.entry(pair_key(a, b)).or_insert_with(|| vec![0; n_events]);
                    if let Some(slot) = slots.get_mut(event_index) {
                        *slot = 1;
                    }
                }
            }
        }
        PairingMemory { pairs, n_events }
    }

    pub fn n_events(&self) -> usize {
        self.n_events
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get_pair(&self, a: &str, b: &str) -> Option<&[u8]> {
        self.pairs.get(&pair_key(a, b)).map(Vec::as_slice)
    }

    /// Recency-weighted count of shared tables, newest slot first.
    pub fn weighted(slots: &[u8]) -> Score {
        slots
            .iter()
            .rev()
            .zip(RECENCY_WEIGHTS)
            .map(|(hit, weight)| weight * Score::from(*hit))
            .sum()
    }

    /// Freshness of a table in `[0, 1]`; higher means fewer recent repeats.
    ///
    /// Averages the weighted history over the in-table pairs that have any,
    /// so a table with no history at all scores a full `1.0`. Tables below
    /// the minimum size score `0.0`.
    pub fn penalty(&self, table: &Table, constraints: &TableConstraints) -> Score {
        if table.len() < constraints.min_seats() {
            return 0.0;
        }
        let (total, n_pairs) = table
            .pairs()
            .filter_map(|(a, b)| self.get_pair(&a.name, &b.name))
            .fold((0.0, 0usize), |(total, n_pairs), slots| {
                (total + PairingMemory::weighted(slots), n_pairs + 1)
            });
        if n_pairs == 0 {
            return 1.0;
        }
        (1.0 - total / n_pairs as Score).max(0.0)
    }

    /// How many events ago (1 = latest in the window) the pair shared a table.
    pub fn events_ago(&self, a: &str, b: &str) -> Vec<usize> {
        self.get_pair(a, b)
            .map(|slots| {
                slots
                    .iter()
                    .rev()
                    .enumerate()
                    .filter(|(_, hit)| **hit == 1)
                    .map(|(ago, _)| ago + 1)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn repeat_pairs(&self, table: &Table) -> Vec<RepeatPair> {
        table
            .pairs()
            .filter_map(|(a, b)| {
                let events_ago = self.events_ago(&a.name, &b.name);
                (!events_ago.is_empty()).then(|| RepeatPair {
                    names: (a.name.clone(), b.name.clone()),
                    events_ago,
                })
            })
            .collect()
    }
}
