//! Export formatting and persistence for analysis results.
//!
//! Produces the row sequences and tables consumed by spreadsheet exports and
//! chart renderers, and writes them as ';'-delimited UTF-8 files with a
//! byte-order mark so that spreadsheet tools pick up Turkish characters.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::{PriceMatrix, ScoredFlight, StatsByAirline};
use crate::error::RaterError;
use crate::pipeline::AnalysisReport;
use crate::record::FlightRecord;

const MINUTES_PER_DAY: usize = 24 * 60;
const BOM: &[u8] = "\u{feff}".as_bytes();

pub const FLIGHT_HEADERS: [&str; 8] = [
    "departure_time",
    "arrival_time",
    "airline",
    "price",
    "currency",
    "duration",
    "stops",
    "score",
];

pub const SUMMARY_HEADERS: [&str; 5] = ["airline", "count", "min", "avg", "max"];

/// One flight as written to an export. `score` is only set for ranked exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightExportRow {
    pub departure_time: String,
    pub arrival_time: String,
    pub airline: String,
    pub price: u64,
    pub currency: String,
    pub duration: u32,
    pub stops: u32,
    pub score: Option<f64>,
}

impl FlightExportRow {
    pub fn from_record(flight: &FlightRecord) -> Self {
        Self {
            departure_time: flight.departure_time().to_string(),
            arrival_time: flight.arrival_time().to_string(),
            airline: flight.airline().to_string(),
            price: flight.price(),
            currency: flight.currency().to_string(),
            duration: flight.duration_minutes(),
            stops: flight.stops_count(),
            score: None,
        }
    }

    pub fn from_scored(scored: &ScoredFlight) -> Self {
        Self {
            score: Some(scored.score),
            ..Self::from_record(&scored.flight)
        }
    }
}

/// One airline in the summary export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub airline: String,
    pub count: usize,
    pub min: u64,
    pub avg: String,
    pub max: u64,
}

pub fn top_flight_rows(top: &[ScoredFlight]) -> Vec<FlightExportRow> {
    top.iter().map(FlightExportRow::from_scored).collect()
}

/// Summary rows in airline order, average rounded to two decimals.
pub fn summary_rows(stats: &StatsByAirline) -> Vec<SummaryRow> {
    stats
        .iter()
        .map(|s| SummaryRow {
            airline: s.airline.clone(),
            count: s.count,
            min: s.min,
            avg: format!("{:.2}", s.avg),
            max: s.max,
        })
        .collect()
}

/// Human-readable slot ranges, e.g. `"00:00-04:00"` … `"20:00-24:00"` for 6 slots.
pub fn build_slot_labels(slot_count: usize) -> Vec<String> {
    let width = MINUTES_PER_DAY / slot_count.max(1);
    (0..slot_count)
        .map(|slot| {
            let start = (slot * width).min(MINUTES_PER_DAY);
            let end = ((slot + 1) * width).min(MINUTES_PER_DAY);
            format!("{}-{}", hh_mm(start), hh_mm(end))
        })
        .collect()
}

fn hh_mm(minutes: usize) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// A price matrix paired with its axis labels, checked for consistent shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapTable {
    pub airlines: Vec<String>,
    pub slot_labels: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl HeatmapTable {
    /// # Errors
    ///
    /// [`RaterError::ShapeMismatch`] when the label count differs from the
    /// matrix width or a row has the wrong number of cells.
    pub fn new(matrix: &PriceMatrix, slot_labels: Vec<String>) -> crate::error::Result<Self> {
        if slot_labels.len() != matrix.slot_count() {
            return Err(RaterError::shape_mismatch(
                "slot labels vs matrix columns",
                matrix.slot_count(),
                slot_labels.len(),
            ));
        }
        if matrix.rows().len() != matrix.airlines().len() {
            return Err(RaterError::shape_mismatch(
                "airlines vs matrix rows",
                matrix.airlines().len(),
                matrix.rows().len(),
            ));
        }
        if let Some(row) = matrix.rows().iter().find(|r| r.len() != slot_labels.len()) {
            return Err(RaterError::shape_mismatch(
                "matrix row width",
                slot_labels.len(),
                row.len(),
            ));
        }

        Ok(Self {
            airlines: matrix.airlines().to_vec(),
            slot_labels,
            cells: matrix.rows().to_vec(),
        })
    }
}

/// Logs an analysis report using Rust's debug pretty-print format.
pub fn print_pretty(report: &AnalysisReport) {
    debug!("{:#?}", report);
}

/// Logs an analysis report as pretty-printed JSON.
pub fn print_json(report: &AnalysisReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes `rows` under a header line, replacing any existing file.
pub fn write_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = bom_writer(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "Export written");
    Ok(())
}

/// Writes a heatmap table; cells without data are left blank.
pub fn write_heatmap(path: &Path, table: &HeatmapTable) -> Result<()> {
    let mut writer = bom_writer(path)?;

    let header = std::iter::once("airline").chain(table.slot_labels.iter().map(String::as_str));
    writer.write_record(header)?;

    for (airline, row) in table.airlines.iter().zip(&table.cells) {
        let cells = row
            .iter()
            .map(|c| c.map(|v| format!("{v:.2}")).unwrap_or_default());
        writer.write_record(std::iter::once(airline.clone()).chain(cells))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), airlines = table.airlines.len(), "Heatmap data written");
    Ok(())
}

/// Writes the full report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &AnalysisReport) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

fn bom_writer(path: &Path) -> Result<csv::Writer<File>> {
    create_parent(path)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(BOM)?;

    Ok(WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(file))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::{avg_price_matrix_by_airline_and_slot, summarize_by_airline};
    use crate::analyzers::scoring::{Scorer, ScoringWeights};

    fn flights() -> Vec<FlightRecord> {
        vec![
            FlightRecord::new("06:45", "07:55", "Pegasus", 838, "TRY", 70, 0, 1),
            FlightRecord::new("19:05", "22:30", "AJet", 1010, "TRY", 205, 1, 4),
            FlightRecord::new("07:30", "08:40", "Pegasus", 901, "TRY", 70, 0, 1),
        ]
    }

    fn weights() -> ScoringWeights {
        ScoringWeights {
            per_minute_penalty: 3,
            per_stop_penalty: 250,
            direct_bonus: 50,
        }
    }

    #[test]
    fn test_build_slot_labels() {
        let labels = build_slot_labels(6);
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], "00:00-04:00");
        assert_eq!(labels[1], "04:00-08:00");
        assert_eq!(labels[5], "20:00-24:00");

        assert_eq!(build_slot_labels(1), vec!["00:00-24:00"]);
        assert!(build_slot_labels(0).is_empty());
    }

    #[test]
    fn test_build_slot_labels_uneven() {
        let labels = build_slot_labels(7);
        assert_eq!(labels[0], "00:00-03:25");
        assert_eq!(labels[6], "20:30-23:55");
    }

    #[test]
    fn test_export_rows_carry_score_only_when_ranked() {
        let records = flights();
        let plain = FlightExportRow::from_record(&records[0]);
        assert_eq!(plain.score, None);
        assert_eq!(plain.duration, 70);

        let top = Scorer::new(weights()).top_n(&records, 2);
        let rows = top_flight_rows(&top);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].departure_time, "06:45");
        assert_eq!(rows[0].score, Some(838.0 + 210.0 - 50.0));
    }

    #[test]
    fn test_summary_rows_format_average() {
        let rows = summary_rows(&summarize_by_airline(&flights()));

        assert_eq!(rows[0].airline, "AJet");
        assert_eq!(rows[1].airline, "Pegasus");
        assert_eq!(rows[1].count, 2);
        assert_eq!(rows[1].avg, "869.50");
    }

    #[test]
    fn test_heatmap_table_rejects_label_mismatch() {
        let airlines = vec!["Pegasus".to_string()];
        let matrix = avg_price_matrix_by_airline_and_slot(&flights(), &airlines, 6).unwrap();

        let err = HeatmapTable::new(&matrix, build_slot_labels(4)).unwrap_err();
        assert!(matches!(
            err,
            RaterError::ShapeMismatch { expected: 6, found: 4, .. }
        ));
        assert!(HeatmapTable::new(&matrix, build_slot_labels(6)).is_ok());
    }

    #[test]
    fn test_write_rows_bom_delimiter_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("top.csv");
        let top = Scorer::new(weights()).top_n(&flights(), 15);

        write_rows(&path, &FLIGHT_HEADERS, &top_flight_rows(&top)).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(BOM));
        let content = String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "departure_time;arrival_time;airline;price;currency;duration;stops;score"
        );
        assert!(lines[1].starts_with("06:45;07:55;Pegasus;838;TRY;70;0;"));
    }

    #[test]
    fn test_write_rows_empty_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let rows: Vec<SummaryRow> = Vec::new();

        write_rows(&path, &SUMMARY_HEADERS, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_start_matches('\u{feff}').trim_end(), "airline;count;min;avg;max");
    }

    #[test]
    fn test_write_heatmap_blank_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.csv");
        let airlines = vec!["AJet".to_string(), "Pegasus".to_string()];
        let matrix = avg_price_matrix_by_airline_and_slot(&flights(), &airlines, 6).unwrap();
        let table = HeatmapTable::new(&matrix, build_slot_labels(6)).unwrap();

        write_heatmap(&path, &table).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(
            lines[0],
            "airline;00:00-04:00;04:00-08:00;08:00-12:00;12:00-16:00;16:00-20:00;20:00-24:00"
        );
        assert_eq!(lines[1], "AJet;;;;;1010.00;");
        assert_eq!(lines[2], "Pegasus;;869.50;;;;");
    }
}
