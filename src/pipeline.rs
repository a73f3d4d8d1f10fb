//! End-to-end analysis: load → summarize → matrix → rank.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::analyzers::aggregate::{
    airlines_sorted, avg_price_matrix_by_airline_and_slot, summarize_by_airline,
};
use crate::analyzers::scoring::Scorer;
use crate::analyzers::types::{PriceMatrix, ScoredFlight, StatsByAirline};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::loader::load_records;
use crate::record::FlightRecord;

/// Everything handed to the export and chart collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub config: AnalysisConfig,
    pub record_count: usize,
    pub stats: StatsByAirline,
    pub airlines: Vec<String>,
    pub matrix: PriceMatrix,
    pub top: Vec<ScoredFlight>,
}

impl AnalysisReport {
    /// `true` when the input held no flights. This is a valid outcome, not
    /// an error.
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// Loads the export at `path` and analyzes it.
pub fn analyze(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let records = load_records(path, config.slot_count)?;
    analyze_records(&records, config)
}

/// Analyzes records that were already loaded with `config.slot_count`.
pub fn analyze_records(records: &[FlightRecord], config: &AnalysisConfig) -> Result<AnalysisReport> {
    let slot_count = config.slot_count.max(1);
    if records.is_empty() {
        warn!("No flights to analyze");
    }

    let stats = summarize_by_airline(records);
    let airlines = airlines_sorted(records);
    let matrix = avg_price_matrix_by_airline_and_slot(records, &airlines, slot_count)?;
    let top = Scorer::new(config.weights).top_n(records, config.top_n);

    info!(
        records = records.len(),
        airlines = airlines.len(),
        top = top.len(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        generated_at: Utc::now(),
        config: config.clone(),
        record_count: records.len(),
        stats,
        airlines,
        matrix,
        top,
    })
}
