//! Error types for timetable-engine operations.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// A construction-time invariant that a meeting, course or criteria record violated.
///
/// Raised only while building a value; every value that exists has passed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Expected time_start={start} < time_end={end}")]
    InvertedTimes { start: NaiveTime, end: NaiveTime },

    #[error("Expected date_start={start} <= date_end={end}")]
    InvertedDates { start: NaiveDate, end: NaiveDate },

    #[error("{0} is required when occurrence_unit is set")]
    MissingOccurrenceField(&'static str),

    #[error("{0} must be empty when occurrence_unit is not set")]
    UnexpectedOccurrenceField(&'static str),

    #[error("occurrence_interval must be >= 1")]
    ZeroInterval,

    #[error("occurrence limit count must be >= 1")]
    ZeroCount,

    #[error("occurrence limit {until} falls before date_start={start}")]
    LimitBeforeStart { until: NaiveDate, start: NaiveDate },

    #[error("Invalid days_of_week bitmask: {0:#b}")]
    InvalidWeekdays(u8),

    #[error("Expected 0 <= seats_filled <= 4294967295, got {0}")]
    InvalidSeats(i64),

    #[error("Expected max_capacity >= -1 and != 0, got {0}")]
    InvalidCapacity(i64),

    #[error("Invalid hexadecimal colour code: {0:?}")]
    InvalidColour(String),

    #[error("Expected 0 <= rating <= 100, got {0}")]
    InvalidRating(i64),

    #[error("Criterion weight must be a finite value >= 0, got {0}")]
    InvalidWeight(f64),

    #[error("Time window on {weekday} must start before it ends")]
    InvertedWindow { weekday: chrono::Weekday },
}

/// Errors surfaced by the expansion and conflict algorithms.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An operation that only accepts single-occurrence meetings received a repeating one.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Expansion error: {0}")]
    Expansion(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
