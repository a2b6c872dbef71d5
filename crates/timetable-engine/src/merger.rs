//! Coalesce equivalent weekly meetings into a single meeting.
//!
//! Records often store one weekly row per weekday ("Mon 08:00–10:00", "Wed 08:00–10:00").
//! Two weekly meetings with the same times, interval, location and timezone merge into one
//! whose `days_of_week` is the union of both, provided the merged rule produces exactly the
//! occurrences of the two rows together. Rows whose windows, interval phase or limits cannot
//! be expressed by one rule stay apart.

use chrono::NaiveDate;
use tracing::debug;

use crate::expander;
use crate::meeting::{Meeting, OccurrenceLimit, OccurrenceUnit, Recurrence};

/// Merge compatible weekly meetings until no further merge is possible.
///
/// Each merge removes one meeting, so the loop ends after at most `len - 1` merges.
/// Non-weekly meetings and weekly meetings without a partner are returned unchanged,
/// in their original order. Merging never adds, drops or moves an occurrence, and
/// merging an already merged list is a no-op.
pub fn merge(meetings: &[Meeting]) -> Vec<Meeting> {
    let mut merged = meetings.to_vec();

    while let Some((i, j, combined)) = find_merge(&merged) {
        merged.remove(j);
        merged[i] = combined;
        debug!(
            days_of_week = %merged[i].days_of_week(),
            remaining = merged.len(),
            "merged weekly meetings"
        );
    }

    merged
}

fn find_merge(meetings: &[Meeting]) -> Option<(usize, usize, Meeting)> {
    for (i, a) in meetings.iter().enumerate() {
        for (j, b) in meetings.iter().enumerate().skip(i + 1) {
            if let Some(combined) = combine(a, b) {
                return Some((i, j, combined));
            }
        }
    }
    None
}

/// Recurrences of two weekly meetings that share every merge key.
fn weekly_pair(a: &Meeting, b: &Meeting) -> Option<(Recurrence, Recurrence)> {
    let (ra, rb) = a.recurrence.zip(b.recurrence)?;
    let same_keys = ra.unit == OccurrenceUnit::Weekly
        && rb.unit == OccurrenceUnit::Weekly
        && ra.interval == rb.interval
        && a.time_start == b.time_start
        && a.time_end == b.time_end
        && a.location == b.location
        && a.timezone == b.timezone;
    same_keys.then_some((ra, rb))
}

/// The single meeting equivalent to `a` and `b` together, if one exists.
///
/// Count limits add up, date limits take the later date, and the window covers both
/// windows. The candidate is kept only if it expands to the same dates as the two rows.
fn combine(a: &Meeting, b: &Meeting) -> Option<Meeting> {
    let (ra, rb) = weekly_pair(a, b)?;
    let limit = match (ra.limit, rb.limit) {
        (OccurrenceLimit::Count(x), OccurrenceLimit::Count(y)) => {
            OccurrenceLimit::Count(x.checked_add(y)?)
        }
        (OccurrenceLimit::Until(x), OccurrenceLimit::Until(y)) => OccurrenceLimit::Until(x.max(y)),
        _ => return None,
    };
    let candidate = Meeting {
        date_start: a.date_start.min(b.date_start),
        date_end: a.date_end.max(b.date_end),
        recurrence: Some(Recurrence {
            days_of_week: ra.days_of_week.union(rb.days_of_week),
            limit,
            ..ra
        }),
        ..a.clone()
    };

    let mut rows = start_dates(a)?;
    rows.extend(start_dates(b)?);
    rows.sort_unstable();
    (start_dates(&candidate)? == rows).then_some(candidate)
}

fn start_dates(meeting: &Meeting) -> Option<Vec<NaiveDate>> {
    expander::all_start_dates(meeting).ok()
}
