//! Recurrence expansion -- turns a meeting's repeat rule into concrete occurrence dates.
//!
//! The rule is rendered as an RFC 5545 RRULE and expanded with the `rrule` crate.
//! Occurrences are anchored at midnight UTC: only the calendar date matters here, so
//! no DST arithmetic is involved and the meeting's own timezone is passed through.

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use rrule::RRuleSet;
use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};
use crate::meeting::{Meeting, OccurrenceLimit, OccurrenceUnit, Recurrence};
use crate::weekday::WeekdaySet;

/// Hard ceiling on the number of occurrences a single rule may expand to.
pub const MAX_OCCURRENCES: u16 = u16::MAX;

/// All occurrence start dates of `meeting`, ascending.
///
/// - non-repeating → `[date_start]`
/// - a `Count(n)` limit yields at most `n` dates, an `Until(d)` limit drops dates after `d`
/// - dates after `date_end` are never produced, whichever bound is earlier wins
///
/// # Errors
/// Returns `ScheduleError::Expansion` if the rendered rule is rejected by the parser.
pub fn all_start_dates(meeting: &Meeting) -> Result<Vec<NaiveDate>> {
    let Some(recurrence) = meeting.recurrence else {
        return Ok(vec![meeting.date_start]);
    };

    let rule_text = render_rule(meeting, &recurrence);
    let rrule_set: RRuleSet = rule_text
        .parse()
        .map_err(|e| ScheduleError::Expansion(format!("{}: {}", rule_text, e)))?;

    let max_count = match recurrence.limit {
        OccurrenceLimit::Count(count) => u16::try_from(count).unwrap_or(MAX_OCCURRENCES),
        OccurrenceLimit::Until(_) => MAX_OCCURRENCES,
    };

    let instances = rrule_set.all(max_count);
    if instances.limited && max_count == MAX_OCCURRENCES {
        warn!(
            rule = %rule_text,
            "expansion stopped at {} occurrences", MAX_OCCURRENCES
        );
    }

    let dates: Vec<NaiveDate> = instances
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .collect();

    debug!(rule = %rule_text, occurrences = dates.len(), "expanded meeting");
    Ok(dates)
}

/// Break a repeating meeting into one non-repeating meeting per occurrence.
///
/// Every occurrence keeps the meeting's times, location and timezone and spans only
/// its own day. A non-repeating meeting comes back unchanged.
///
/// Note: `date_end` of each occurrence equals its `date_start`. The record layer copied the
/// rule's `date_end - date_start` span onto every occurrence; that span is the validity
/// window here, not an occurrence length.
pub fn to_single_occurrences(meeting: &Meeting) -> Result<Vec<Meeting>> {
    if !meeting.is_repeating() {
        return Ok(vec![meeting.clone()]);
    }
    Ok(all_start_dates(meeting)?
        .into_iter()
        .map(|date| meeting.single_on(date))
        .collect())
}

/// Total number of times the meeting actually takes place.
pub fn num_occurrences(meeting: &Meeting) -> Result<usize> {
    Ok(all_start_dates(meeting)?.len())
}

/// Weekdays on which the meeting takes place.
///
/// Weekday-based rules report their `days_of_week`; every other meeting reports the
/// weekdays of the calendar days its occurrences cover.
pub fn active_weekdays(meeting: &Meeting) -> Result<WeekdaySet> {
    match meeting.recurrence {
        Some(r) if r.unit.uses_weekdays() => Ok(r.days_of_week),
        Some(_) => Ok(all_start_dates(meeting)?
            .into_iter()
            .map(|date| date.weekday())
            .collect()),
        None => Ok(meeting
            .date_start
            .iter_days()
            .take_while(|day| *day <= meeting.date_end)
            .take(7)
            .map(|day| day.weekday())
            .collect()),
    }
}

/// Render the meeting's rule as an iCalendar `DTSTART` + `RRULE` block.
///
/// `date_end` is folded into `UNTIL` together with a date limit; a count limit is
/// passed as the expansion cap, so both bounds apply at once without using `COUNT`
/// and `UNTIL` in the same rule.
fn render_rule(meeting: &Meeting, recurrence: &Recurrence) -> String {
    let mut parts = vec![
        format!("FREQ={}", frequency(recurrence.unit)),
        format!("INTERVAL={}", recurrence.interval),
    ];

    match recurrence.unit {
        OccurrenceUnit::Daily => {}
        OccurrenceUnit::Weekly => {
            let days: Vec<&str> = recurrence.days_of_week.iter().map(day_code).collect();
            parts.push("WKST=MO".to_string());
            parts.push(format!("BYDAY={}", days.join(",")));
        }
        OccurrenceUnit::MonthlyByWeekday => {
            // Ordinal of date_start's weekday within its month, e.g. 3 for the 3rd Tuesday.
            let ordinal = meeting.date_start.day0() / 7 + 1;
            let days: Vec<String> = recurrence
                .days_of_week
                .iter()
                .map(|day| format!("{}{}", ordinal, day_code(day)))
                .collect();
            parts.push(format!("BYDAY={}", days.join(",")));
        }
        OccurrenceUnit::MonthlyByDayNumber => {
            parts.push(format!("BYMONTHDAY={}", meeting.date_start.day()));
        }
        OccurrenceUnit::Yearly => {
            parts.push(format!("BYMONTH={}", meeting.date_start.month()));
            parts.push(format!("BYMONTHDAY={}", meeting.date_start.day()));
        }
    }

    let until = match recurrence.limit {
        OccurrenceLimit::Until(date) => date.min(meeting.date_end),
        OccurrenceLimit::Count(_) => meeting.date_end,
    };
    parts.push(format!("UNTIL={}T235959Z", until.format("%Y%m%d")));

    format!(
        "DTSTART;TZID=UTC:{}T000000\nRRULE:{}",
        meeting.date_start.format("%Y%m%d"),
        parts.join(";")
    )
}

fn frequency(unit: OccurrenceUnit) -> &'static str {
    match unit {
        OccurrenceUnit::Daily => "DAILY",
        OccurrenceUnit::Weekly => "WEEKLY",
        OccurrenceUnit::MonthlyByWeekday | OccurrenceUnit::MonthlyByDayNumber => "MONTHLY",
        OccurrenceUnit::Yearly => "YEARLY",
    }
}

fn day_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}
