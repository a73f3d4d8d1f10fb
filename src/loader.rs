//! Loads a ';'-delimited flight export into [`FlightRecord`]s.
//!
//! The first row is a header. Recognized columns are matched by name,
//! case-insensitively and in any order; unknown columns are ignored and a
//! missing column reads as empty text for every row.

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{RaterError, Result};
use crate::record::{FlightRecord, RawFlightRow};

const BOM: char = '\u{feff}';

/// The columns the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    DepartureTime,
    ArrivalTime,
    Airline,
    Price,
    Currency,
    Duration,
    Stops,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::DepartureTime,
        Column::ArrivalTime,
        Column::Airline,
        Column::Price,
        Column::Currency,
        Column::Duration,
        Column::Stops,
    ];

    /// Header name as written in exports.
    pub fn name(self) -> &'static str {
        match self {
            Column::DepartureTime => "departure_time",
            Column::ArrivalTime => "arrival_time",
            Column::Airline => "airline",
            Column::Price => "price",
            Column::Currency => "currency",
            Column::Duration => "duration",
            Column::Stops => "stops",
        }
    }

    /// Matches a header cell, ignoring case and surrounding whitespace.
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(header))
    }
}

/// Positions of the recognized columns within a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: [Option<usize>; 7],
}

impl ColumnIndex {
    /// Resolves header names to positions. When a name repeats, the last
    /// occurrence wins.
    pub fn from_header(header: &StringRecord) -> Self {
        let mut index = Self::default();
        for (position, cell) in header.iter().enumerate() {
            if let Some(column) = Column::from_header(cell) {
                index.positions[column as usize] = Some(position);
            }
        }
        index
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions[column as usize]
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.position(column).is_some()
    }

    fn field(&self, record: &StringRecord, column: Column) -> String {
        self.position(column)
            .and_then(|i| record.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Extracts the raw text fields of one data row.
    pub fn raw_row(&self, record: &StringRecord) -> RawFlightRow {
        RawFlightRow {
            departure_time: self.field(record, Column::DepartureTime),
            arrival_time: self.field(record, Column::ArrivalTime),
            airline: self.field(record, Column::Airline),
            price: self.field(record, Column::Price),
            currency: self.field(record, Column::Currency),
            duration: self.field(record, Column::Duration),
            stops: self.field(record, Column::Stops),
        }
    }
}

/// Counters collected while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_seen: usize,
    pub records_parsed: usize,
    pub rows_skipped: usize,
}

/// Reads and parses the export at `path`.
///
/// # Errors
///
/// Returns [`RaterError::Io`] if the file cannot be read as UTF-8 text and
/// [`RaterError::Csv`] if the delimited reader fails.
pub fn load_records(path: impl AsRef<Path>, slot_count: usize) -> Result<Vec<FlightRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| RaterError::io(path, e))?;
    let (records, stats) = parse_records(&text, slot_count)?;

    info!(
        path = %path.display(),
        rows = stats.rows_seen,
        parsed = stats.records_parsed,
        skipped = stats.rows_skipped,
        "Flight export loaded"
    );
    Ok(records)
}

/// Parses export text that has already been read into memory. A leading
/// byte-order mark is ignored. Text without data rows yields no records.
pub fn parse_records(text: &str, slot_count: usize) -> Result<(Vec<FlightRecord>, LoadStats)> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let slot_count = slot_count.max(1);

    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = reader.records();
    let Some(header) = rows.next().transpose()? else {
        debug!("Export is empty, nothing to load");
        return Ok((Vec::new(), LoadStats::default()));
    };

    let index = ColumnIndex::from_header(&header);
    let missing: Vec<_> = Column::ALL
        .into_iter()
        .filter(|c| !index.has_column(*c))
        .map(Column::name)
        .collect();
    if !missing.is_empty() {
        debug!(?missing, "Columns absent from header, treating as empty");
    }

    let mut stats = LoadStats::default();
    let mut records = Vec::new();

    for row in rows {
        let row = row?;
        stats.rows_seen += 1;

        if row.is_empty() {
            stats.rows_skipped += 1;
            continue;
        }

        records.push(FlightRecord::from_raw(&index.raw_row(&row), slot_count));
        stats.records_parsed += 1;
    }

    Ok((records, stats))
}
