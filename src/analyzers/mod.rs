//! Price aggregation and cost-effectiveness scoring.
//!
//! Both engines work on a slice of [`FlightRecord`](crate::record::FlightRecord)s
//! and return freshly owned results; neither keeps state between calls.

pub mod aggregate;
pub mod scoring;
pub mod types;
pub mod utility;
