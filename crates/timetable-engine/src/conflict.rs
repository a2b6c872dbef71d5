//! Detect date/time overlaps between meetings.
//!
//! Repeating meetings are never compared directly: they are expanded into single
//! occurrences first. Time spans are half-open, so a meeting ending at 10:00 does not
//! conflict with one starting at 10:00. Date spans cover whole days, `date_start`
//! through `date_end` inclusive.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::expander::to_single_occurrences;
use crate::meeting::Meeting;

/// A detected conflict between two single occurrences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    /// Earliest moment at which both meetings are running.
    pub at: NaiveDateTime,
    pub first: Meeting,
    pub second: Meeting,
    /// Overlap within a single shared day.
    pub overlap_minutes: i64,
}

/// Compare two non-repeating meetings.
///
/// Returns the earliest shared `(date, time)` when they overlap on both the date and
/// the time axis, `None` otherwise. The result does not depend on argument order.
///
/// # Errors
/// Returns `ScheduleError::Precondition` if either meeting still repeats; expand it
/// with [`to_single_occurrences`] first.
pub fn pairwise_conflict(a: &Meeting, b: &Meeting) -> Result<Option<NaiveDateTime>> {
    for meeting in [a, b] {
        if let Some(unit) = meeting.occurrence_unit() {
            return Err(ScheduleError::Precondition(format!(
                "pairwise_conflict expects single occurrences, got a {:?} rule starting {}",
                unit, meeting.date_start
            )));
        }
    }
    Ok(overlap_start(a, b))
}

/// Find every conflicting pair in a schedule.
///
/// All meetings are flattened to single occurrences and sorted by
/// `(date_start, time_start, time_end)`. A sweep over that order keeps every earlier
/// occurrence whose days still cover the current start date and checks the current
/// occurrence against each of them, so a long meeting is still caught when shorter
/// ones sort in between.
pub fn find_conflicts(meetings: &[Meeting]) -> Result<Vec<Conflict>> {
    let mut singles = Vec::with_capacity(meetings.len());
    for meeting in meetings {
        singles.extend(to_single_occurrences(meeting)?);
    }
    if singles.len() <= 1 {
        return Ok(Vec::new());
    }

    singles.sort_by_key(|m| m.sort_key());

    let mut active: Vec<&Meeting> = Vec::new();
    let mut conflicts = Vec::new();

    for current in &singles {
        active.retain(|earlier| earlier.date_end >= current.date_start);

        for earlier in &active {
            if let Some(at) = overlap_start(earlier, current) {
                conflicts.push(Conflict {
                    at,
                    first: (*earlier).clone(),
                    second: current.clone(),
                    overlap_minutes: overlap_minutes(earlier, current),
                });
            }
        }
        active.push(current);
    }

    debug!(
        occurrences = singles.len(),
        conflicts = conflicts.len(),
        "checked schedule for conflicts"
    );
    Ok(conflicts)
}

/// The earliest conflict in a schedule, if any.
///
/// Earliest means the smallest `(date, time)` at which two occurrences are both
/// running. Works for a full schedule as well as for a schedule plus one candidate.
pub fn meetings_conflict(meetings: &[Meeting]) -> Result<Option<Conflict>> {
    Ok(find_conflicts(meetings)?
        .into_iter()
        .min_by_key(|conflict| conflict.at))
}

/// Whether any two meetings in the schedule overlap.
pub fn has_conflict(meetings: &[Meeting]) -> Result<bool> {
    Ok(meetings_conflict(meetings)?.is_some())
}

fn overlap_start(a: &Meeting, b: &Meeting) -> Option<NaiveDateTime> {
    let times_overlap = a.time_start < b.time_end && b.time_start < a.time_end;
    let dates_overlap = a.date_start <= b.date_end && b.date_start <= a.date_end;

    (times_overlap && dates_overlap).then(|| {
        NaiveDateTime::new(
            a.date_start.max(b.date_start),
            a.time_start.max(b.time_start),
        )
    })
}

fn overlap_minutes(a: &Meeting, b: &Meeting) -> i64 {
    (a.time_end.min(b.time_end) - a.time_start.max(b.time_start)).num_minutes()
}
