use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::analyzers::types::{PriceMatrix, PriceStats, StatsByAirline};
use crate::analyzers::utility::{airline_key, case_insensitive_cmp, mean};
use crate::error::{RaterError, Result};
use crate::record::FlightRecord;

/// Groups records by trimmed airline name and computes count, min, max and
/// average price for each group.
///
/// Grouping is case-sensitive: `"Pegasus"` and `"PEGASUS"` produce two
/// entries, and a blank airline forms its own `""` group. The result is
/// ordered by airline name, ignoring case.
pub fn summarize_by_airline(records: &[FlightRecord]) -> StatsByAirline {
    let mut prices: HashMap<&str, Vec<u64>> = HashMap::new();
    for record in records {
        prices
            .entry(record.airline().trim())
            .or_default()
            .push(record.price());
    }

    let mut entries: Vec<PriceStats> = prices
        .into_iter()
        .map(|(airline, series)| {
            let as_f64: Vec<f64> = series.iter().map(|p| *p as f64).collect();
            PriceStats {
                airline: airline.to_string(),
                count: series.len(),
                min: series.iter().copied().min().unwrap_or(0),
                max: series.iter().copied().max().unwrap_or(0),
                avg: mean(&as_f64),
            }
        })
        .collect();

    entries.sort_by(|a, b| case_insensitive_cmp(&a.airline, &b.airline));
    debug!(airlines = entries.len(), "Summarized prices by airline");

    StatsByAirline { entries }
}

/// Returns the distinct, non-blank airline names in case-insensitive order.
///
/// Names differing only by case collapse into one entry that keeps the
/// first spelling seen. Pass this exact list to
/// [`avg_price_matrix_by_airline_and_slot`] so matrix rows line up.
pub fn airlines_sorted(records: &[FlightRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut airlines: Vec<String> = records
        .iter()
        .map(|r| r.airline().trim())
        .filter(|a| !a.is_empty())
        .filter(|a| seen.insert(airline_key(a)))
        .map(str::to_string)
        .collect();

    airlines.sort_by(|a, b| case_insensitive_cmp(a, b));
    airlines
}

/// Builds an `airlines × slot_count` matrix of mean prices.
///
/// Records are matched to rows by airline name ignoring case; records whose
/// airline is not in `airlines` are left out. Cells without any matching
/// record are `None`.
///
/// # Errors
///
/// Rejects a zero `slot_count` and an ordering that contains a blank name or
/// lists the same airline twice.
pub fn avg_price_matrix_by_airline_and_slot(
    records: &[FlightRecord],
    airlines: &[String],
    slot_count: usize,
) -> Result<PriceMatrix> {
    if slot_count == 0 {
        return Err(RaterError::InvalidSlotCount(slot_count));
    }

    let mut row_of: HashMap<String, usize> = HashMap::with_capacity(airlines.len());
    for (index, airline) in airlines.iter().enumerate() {
        if airline.trim().is_empty() {
            return Err(RaterError::BlankAirline { index });
        }
        if row_of.insert(airline_key(airline), index).is_some() {
            return Err(RaterError::DuplicateAirline {
                airline: airline.clone(),
            });
        }
    }

    let mut sums = vec![vec![0.0f64; slot_count]; airlines.len()];
    let mut counts = vec![vec![0usize; slot_count]; airlines.len()];
    let mut excluded = 0usize;

    for record in records {
        let Some(&row) = row_of.get(&airline_key(record.airline())) else {
            excluded += 1;
            continue;
        };
        let slot = record.time_slot().min(slot_count - 1);
        sums[row][slot] += record.price() as f64;
        counts[row][slot] += 1;
    }

    if excluded > 0 {
        debug!(excluded, "Records outside the airline ordering left out of matrix");
    }

    let cells = sums
        .into_iter()
        .zip(counts)
        .map(|(sum_row, count_row)| {
            sum_row
                .into_iter()
                .zip(count_row)
                .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
                .collect()
        })
        .collect();

    Ok(PriceMatrix {
        airlines: airlines.to_vec(),
        slot_count,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(airline: &str, price: u64, slot: usize) -> FlightRecord {
        FlightRecord::new("", "", airline, price, "TRY", 60, 0, slot)
    }

    #[test]
    fn test_summarize_single_airline() {
        let records = vec![flight("X", 100, 0), flight("X", 200, 0)];
        let stats = summarize_by_airline(&records);

        assert_eq!(stats.len(), 1);
        let x = stats.get("X").unwrap();
        assert_eq!(x.count, 2);
        assert_eq!(x.min, 100);
        assert_eq!(x.max, 200);
        assert_eq!(x.avg, 150.0);
    }

    #[test]
    fn test_summarize_orders_case_insensitively() {
        let records = vec![
            flight("THY", 900, 0),
            flight("ajet", 500, 1),
            flight("Pegasus", 700, 2),
        ];
        let stats = summarize_by_airline(&records);
        let names: Vec<_> = stats.airlines().collect();

        assert_eq!(names, vec!["ajet", "Pegasus", "THY"]);
    }

    #[test]
    fn test_summarize_keeps_case_variants_and_blank_apart() {
        let records = vec![
            flight("Pegasus", 700, 0),
            flight("PEGASUS", 900, 0),
            flight("", 300, 0),
        ];
        let stats = summarize_by_airline(&records);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats.get("").unwrap().count, 1);
        assert_eq!(stats.get("Pegasus").unwrap().max, 700);
        assert_eq!(stats.get("PEGASUS").unwrap().max, 900);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize_by_airline(&[]).is_empty());
    }

    #[test]
    fn test_airlines_sorted_dedups_keeping_first_casing() {
        let records = vec![
            flight("pegasus", 700, 0),
            flight("THY", 900, 0),
            flight("Pegasus", 800, 0),
            flight("  ", 100, 0),
            flight("AJet", 400, 0),
        ];

        assert_eq!(airlines_sorted(&records), vec!["AJet", "pegasus", "THY"]);
    }

    #[test]
    fn test_airlines_match_summary_keys() {
        let records = vec![
            flight("THY", 900, 0),
            flight("AJet", 400, 3),
            flight("THY", 1000, 5),
            flight("Pegasus", 650, 2),
        ];
        let stats = summarize_by_airline(&records);
        let airlines = airlines_sorted(&records);
        let keys: Vec<_> = stats.airlines().map(str::to_string).collect();

        assert_eq!(keys, airlines);
    }

    #[test]
    fn test_matrix_averages_and_no_data_cells() {
        let records = vec![
            flight("X", 100, 0),
            flight("X", 300, 0),
            flight("Y", 500, 2),
        ];
        let airlines = airlines_sorted(&records);
        let matrix = avg_price_matrix_by_airline_and_slot(&records, &airlines, 3).unwrap();

        assert_eq!(matrix.airlines(), ["X", "Y"]);
        assert_eq!(matrix.slot_count(), 3);
        assert_eq!(matrix.cell(0, 0), Some(200.0));
        assert_eq!(matrix.cell(0, 1), None);
        assert_eq!(matrix.cell(0, 2), None);
        assert_eq!(matrix.cell(1, 2), Some(500.0));
        assert_eq!(matrix.rows()[1][0], None);
    }

    #[test]
    fn test_matrix_matches_airline_ignoring_case() {
        let records = vec![flight("Pegasus", 100, 1), flight("PEGASUS", 300, 1)];
        let airlines = airlines_sorted(&records);
        let matrix = avg_price_matrix_by_airline_and_slot(&records, &airlines, 2).unwrap();

        assert_eq!(airlines, vec!["Pegasus"]);
        assert_eq!(matrix.cell(0, 1), Some(200.0));
    }

    #[test]
    fn test_matrix_excludes_unlisted_airlines() {
        let records = vec![flight("X", 100, 0), flight("Z", 999, 0)];
        let airlines = vec!["X".to_string()];
        let matrix = avg_price_matrix_by_airline_and_slot(&records, &airlines, 1).unwrap();

        assert_eq!(matrix.rows().len(), 1);
        assert_eq!(matrix.cell(0, 0), Some(100.0));
    }

    #[test]
    fn test_matrix_clamps_out_of_range_slot() {
        let records = vec![flight("X", 100, 9)];
        let airlines = vec!["X".to_string()];
        let matrix = avg_price_matrix_by_airline_and_slot(&records, &airlines, 4).unwrap();

        assert_eq!(matrix.cell(0, 3), Some(100.0));
    }

    #[test]
    fn test_matrix_rejects_bad_preconditions() {
        let records = vec![flight("X", 100, 0)];

        let err = avg_price_matrix_by_airline_and_slot(&records, &["X".to_string()], 0);
        assert!(matches!(err, Err(RaterError::InvalidSlotCount(0))));

        let dup = vec!["X".to_string(), "x".to_string()];
        let err = avg_price_matrix_by_airline_and_slot(&records, &dup, 6);
        assert!(matches!(err, Err(RaterError::DuplicateAirline { .. })));

        let blank = vec!["X".to_string(), " ".to_string()];
        let err = avg_price_matrix_by_airline_and_slot(&records, &blank, 6);
        assert!(matches!(err, Err(RaterError::BlankAirline { index: 1 })));
    }

    #[test]
    fn test_matrix_empty_ordering() {
        let matrix = avg_price_matrix_by_airline_and_slot(&[], &[], 6).unwrap();
        assert!(matrix.is_empty());
        assert!(matrix.rows().is_empty());
    }
}
