//! Data types produced by the analysis engines.

use serde::Serialize;

use crate::record::FlightRecord;

/// Price summary for one airline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub airline: String,
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub avg: f64,
}

/// Per-airline statistics, ordered by airline name (case-insensitive).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatsByAirline {
    pub(crate) entries: Vec<PriceStats>,
}

impl StatsByAirline {
    pub fn get(&self, airline: &str) -> Option<&PriceStats> {
        self.entries.iter().find(|s| s.airline == airline)
    }

    pub fn airlines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.airline.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceStats> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Average price per airline (rows) and departure slot (columns).
///
/// A `None` cell means no flight contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceMatrix {
    pub(crate) airlines: Vec<String>,
    pub(crate) slot_count: usize,
    pub(crate) cells: Vec<Vec<Option<f64>>>,
}

impl PriceMatrix {
    pub fn airlines(&self) -> &[String] {
        &self.airlines
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.cells
    }

    pub fn cell(&self, airline_index: usize, slot: usize) -> Option<f64> {
        self.cells.get(airline_index)?.get(slot).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.airlines.is_empty()
    }
}

/// A flight paired with its cost-effectiveness score (lower is better).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFlight {
    pub flight: FlightRecord,
    pub score: f64,
}
