//! Weighted preference scoring of courses.
//!
//! Each criterion is optional and carries its own weight. A satisfied criterion adds
//! `weight × contribution` to a running total and raises a shared multiplier by
//! [`CRITERION_BONUS`]; the score is `total × multiplier`. A course that satisfies
//! several criteria at once therefore outranks one that excels at a single criterion.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::course::Course;
use crate::error::{Result, ValidationError};
use crate::expander;
use crate::meeting::Meeting;

/// Multiplier increment per satisfied criterion.
pub const CRITERION_BONUS: f64 = 0.25;

/// Per-occurrence contribution of a matching virtual/in-person preference.
const VIRTUAL_CONTRIBUTION: f64 = 10.0;

/// Contribution of the flat (non-repeating) criteria: open seats and class size.
const FLAT_CONTRIBUTION: f64 = 100.0;

/// Non-negative, finite criterion weight. A zero weight disables the criterion.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    pub fn new(weight: f64) -> std::result::Result<Self, ValidationError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::InvalidWeight(weight));
        }
        Ok(Self(weight))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_active(self) -> bool {
        self.0 > 0.0
    }
}

impl TryFrom<f64> for Weight {
    type Error = ValidationError;

    fn try_from(weight: f64) -> std::result::Result<Self, Self::Error> {
        Weight::new(weight)
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

/// A preferred value paired with how much it matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference<T> {
    pub value: T,
    pub weight: Weight,
}

impl<T> Preference<T> {
    pub fn new(value: T, weight: Weight) -> Self {
        Self { value, weight }
    }
}

/// Unvalidated time window, e.g. `{"weekday": "Mon", "start": "09:00:00", "end": "12:00:00"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowFields {
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A span of the week the user would like classes to fall in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeWindowFields", into = "TimeWindowFields")]
pub struct TimeWindow {
    weekday: Weekday,
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> std::result::Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvertedWindow { weekday });
        }
        Ok(Self {
            weekday,
            start,
            end,
        })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// The meeting runs on this weekday and starts or ends inside the window.
    pub fn fits(&self, meeting: &Meeting) -> Result<bool> {
        let inside = |t: NaiveTime| self.start <= t && t <= self.end;
        Ok(expander::active_weekdays(meeting)?.contains(self.weekday)
            && (inside(meeting.time_start()) || inside(meeting.time_end())))
    }
}

impl TryFrom<TimeWindowFields> for TimeWindow {
    type Error = ValidationError;

    fn try_from(fields: TimeWindowFields) -> std::result::Result<Self, Self::Error> {
        TimeWindow::new(fields.weekday, fields.start, fields.end)
    }
}

impl From<TimeWindow> for TimeWindowFields {
    fn from(window: TimeWindow) -> Self {
        TimeWindowFields {
            weekday: window.weekday,
            start: window.start,
            end: window.end,
        }
    }
}

/// A user's schedule preferences. Every criterion is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerCriteria {
    /// Windows classes should start or end in.
    pub time_windows: Option<Preference<Vec<TimeWindow>>>,
    /// `true` favours virtual sections, `false` in-person ones.
    pub is_virtual: Option<Preference<bool>>,
    /// Minimum mean instructor rating, out of 100.
    pub min_instructor_rating: Option<Preference<u8>>,
    pub min_open_seats: Option<Preference<u32>>,
    /// Largest acceptable maximum enrollment.
    pub max_class_size: Option<Preference<u32>>,
}

impl OptimizerCriteria {
    pub fn total_weight(&self) -> f64 {
        [
            self.time_windows.as_ref().map(|p| p.weight),
            self.is_virtual.as_ref().map(|p| p.weight),
            self.min_instructor_rating.as_ref().map(|p| p.weight),
            self.min_open_seats.as_ref().map(|p| p.weight),
            self.max_class_size.as_ref().map(|p| p.weight),
        ]
        .into_iter()
        .flatten()
        .map(Weight::get)
        .sum()
    }
}

fn active<T>(preference: &Option<Preference<T>>) -> Option<&Preference<T>> {
    preference.as_ref().filter(|p| p.weight.is_active())
}

/// Score a course against the criteria. Higher is more favourable.
///
/// Time-window and virtual matches scale with occurrence counts, so a meeting that
/// happens more often counts for more.
pub fn score(criteria: &OptimizerCriteria, course: &Course) -> Result<f64> {
    let mut total = 0.0;
    let mut multiplier = 1.0;

    if let Some(pref) = active(&criteria.time_windows) {
        let mut matched = false;
        for window in &pref.value {
            for meeting in &course.class_time {
                if window.fits(meeting)? {
                    matched = true;
                    total += expander::num_occurrences(meeting)? as f64 * pref.weight.get();
                }
            }
        }
        if matched {
            multiplier += CRITERION_BONUS;
        }
    }

    if let Some(pref) = active(&criteria.is_virtual) {
        if pref.value == course.is_virtual {
            multiplier += CRITERION_BONUS;
            total += VIRTUAL_CONTRIBUTION * course.num_occurrences()? as f64 * pref.weight.get();
        }
    }

    if let Some(pref) = active(&criteria.min_instructor_rating) {
        if let Some(mean) = course.mean_instructor_rating() {
            if mean >= f64::from(pref.value) {
                multiplier += CRITERION_BONUS;
                total += mean * pref.weight.get();
            }
        }
    }

    if let Some(pref) = active(&criteria.min_open_seats) {
        if course.available_seats() >= pref.value {
            multiplier += CRITERION_BONUS;
            total += FLAT_CONTRIBUTION * pref.weight.get();
        }
    }

    if let Some(pref) = active(&criteria.max_class_size) {
        if course.maximum_enrollment <= pref.value {
            multiplier += CRITERION_BONUS;
            total += FLAT_CONTRIBUTION * pref.weight.get();
        }
    }

    let score = total * multiplier;
    debug!(crn = course.crn, total, multiplier, score, "scored course");
    Ok(score)
}

/// Score every course and order them best first. Ties keep their input order.
///
/// Returns `(index into courses, score)` pairs.
pub fn rank(criteria: &OptimizerCriteria, courses: &[Course]) -> Result<Vec<(usize, f64)>> {
    let mut scored = Vec::with_capacity(courses.len());
    for (index, course) in courses.iter().enumerate() {
        scored.push((index, score(criteria, course)?));
    }
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(scored)
}
