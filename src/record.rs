//! Canonical flight records built from raw export rows.

use serde::Serialize;

use crate::parser::{
    normalize_currency, parse_duration_minutes, parse_price, parse_stops, time_to_slot,
};

/// The seven raw text fields of one export row. A column missing from the
/// export is represented by an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFlightRow {
    pub departure_time: String,
    pub arrival_time: String,
    pub airline: String,
    pub price: String,
    pub currency: String,
    pub duration: String,
    pub stops: String,
}

/// One normalized flight offer. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    departure_time: String,
    arrival_time: String,
    airline: String,
    price: u64,
    currency: String,
    duration_minutes: u32,
    stops_count: u32,
    is_direct: bool,
    time_slot: usize,
}

impl FlightRecord {
    /// Builds a record from already-typed values. `is_direct` is derived
    /// from `stops_count`; `airline` is trimmed.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        departure_time: impl Into<String>,
        arrival_time: impl Into<String>,
        airline: &str,
        price: u64,
        currency: impl Into<String>,
        duration_minutes: u32,
        stops_count: u32,
        time_slot: usize,
    ) -> Self {
        Self {
            departure_time: departure_time.into(),
            arrival_time: arrival_time.into(),
            airline: airline.trim().to_string(),
            price,
            currency: currency.into(),
            duration_minutes,
            stops_count,
            is_direct: stops_count == 0,
            time_slot,
        }
    }

    /// Parses every raw field leniently; no field can fail the row.
    pub fn from_raw(raw: &RawFlightRow, slot_count: usize) -> Self {
        let departure_time = raw.departure_time.trim();
        Self::new(
            departure_time,
            raw.arrival_time.trim(),
            &raw.airline,
            parse_price(&raw.price),
            normalize_currency(&raw.currency),
            parse_duration_minutes(&raw.duration),
            parse_stops(&raw.stops),
            time_to_slot(departure_time, slot_count.max(1)),
        )
    }

    pub fn departure_time(&self) -> &str {
        &self.departure_time
    }

    pub fn arrival_time(&self) -> &str {
        &self.arrival_time
    }

    pub fn airline(&self) -> &str {
        &self.airline
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn stops_count(&self) -> u32 {
        self.stops_count
    }

    pub fn is_direct(&self) -> bool {
        self.is_direct
    }

    pub fn time_slot(&self) -> usize {
        self.time_slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(departure: &str, airline: &str, price: &str, duration: &str, stops: &str) -> RawFlightRow {
        RawFlightRow {
            departure_time: departure.to_string(),
            arrival_time: "09:10".to_string(),
            airline: airline.to_string(),
            price: price.to_string(),
            currency: "TL".to_string(),
            duration: duration.to_string(),
            stops: stops.to_string(),
        }
    }

    #[test]
    fn test_from_raw_direct_flight() {
        let record = FlightRecord::from_raw(
            &raw("06:45", "  Pegasus ", "1.010", "1sa 35dk", "Direkt Uçuş"),
            6,
        );

        assert_eq!(record.departure_time(), "06:45");
        assert_eq!(record.arrival_time(), "09:10");
        assert_eq!(record.airline(), "Pegasus");
        assert_eq!(record.price(), 1010);
        assert_eq!(record.currency(), "TRY");
        assert_eq!(record.duration_minutes(), 95);
        assert_eq!(record.stops_count(), 0);
        assert!(record.is_direct());
        assert_eq!(record.time_slot(), 1);
    }

    #[test]
    fn test_from_raw_connecting_flight() {
        let record = FlightRecord::from_raw(&raw("21:30", "AJet", "2 450", "5sa", "2 Aktarma"), 6);

        assert_eq!(record.stops_count(), 2);
        assert!(!record.is_direct());
        assert_eq!(record.time_slot(), 5);
        assert_eq!(record.duration_minutes(), 300);
    }

    #[test]
    fn test_from_raw_all_empty_uses_defaults() {
        let record = FlightRecord::from_raw(&RawFlightRow::default(), 6);

        assert_eq!(record.airline(), "");
        assert_eq!(record.price(), 0);
        assert_eq!(record.currency(), "TRY");
        assert_eq!(record.duration_minutes(), 0);
        assert_eq!(record.stops_count(), 0);
        assert!(record.is_direct());
        assert_eq!(record.time_slot(), 0);
    }

    #[test]
    fn test_from_raw_zero_slot_count_is_clamped() {
        let record = FlightRecord::from_raw(&raw("23:59", "X", "1", "", ""), 0);
        assert_eq!(record.time_slot(), 0);
    }

    #[test]
    fn test_new_derives_is_direct() {
        let direct = FlightRecord::new("", "", "X", 100, "TRY", 60, 0, 0);
        let connecting = FlightRecord::new("", "", "X", 100, "TRY", 60, 1, 0);
        assert!(direct.is_direct());
        assert!(!connecting.is_direct());
    }
}
