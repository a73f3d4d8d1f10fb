//! Cost-effectiveness scoring and ranking.
//!
//! ```text
//! score = price
//!       + per_minute_penalty * duration_minutes
//!       + per_stop_penalty   * stops_count
//!       - (direct ? direct_bonus : 0)
//! ```
//!
//! Lower scores are more cost-effective.

use serde::{Deserialize, Serialize};

use crate::analyzers::types::ScoredFlight;
use crate::record::FlightRecord;

/// Weights of the linear score, in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub per_minute_penalty: i64,
    pub per_stop_penalty: i64,
    pub direct_bonus: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    pub fn score(&self, flight: &FlightRecord) -> f64 {
        let w = &self.weights;
        let bonus = if flight.is_direct() { w.direct_bonus } else { 0 };

        flight.price() as f64
            + w.per_minute_penalty as f64 * flight.duration_minutes() as f64
            + w.per_stop_penalty as f64 * flight.stops_count() as f64
            - bonus as f64
    }

    /// Scores every flight and sorts ascending. The sort is stable, so equal
    /// scores keep their input order.
    pub fn rank(&self, flights: &[FlightRecord]) -> Vec<ScoredFlight> {
        let mut scored: Vec<ScoredFlight> = flights
            .iter()
            .map(|f| ScoredFlight {
                flight: f.clone(),
                score: self.score(f),
            })
            .collect();
        scored.sort_by(|a, b| a.score.total_cmp(&b.score));
        scored
    }

    /// The `n` best-ranked flights, or all of them when fewer exist.
    pub fn top_n(&self, flights: &[FlightRecord], n: usize) -> Vec<ScoredFlight> {
        if n == 0 {
            return Vec::new();
        }
        let mut ranked = self.rank(flights);
        ranked.truncate(n);
        ranked
    }
}
