//! Tests for recurrence expansion: every occurrence unit, both limit kinds, and the
//! `date_end` window.

use chrono::{NaiveDate, NaiveTime, Weekday};
use timetable_engine::expander::{active_weekdays, num_occurrences};
use timetable_engine::{
    all_start_dates, to_single_occurrences, Meeting, MeetingFields, OccurrenceLimit,
    OccurrenceUnit, WeekdaySet,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// 08:00–10:00 meeting repeating by `unit` between `start` and `end`.
fn repeating(
    unit: OccurrenceUnit,
    interval: u32,
    limit: OccurrenceLimit,
    days: &[Weekday],
    start: NaiveDate,
    end: NaiveDate,
) -> Meeting {
    Meeting::new(
        MeetingFields::new(time(8, 0), time(10, 0), start, end)
            .repeating(unit, interval, limit)
            .on(days.iter().copied().collect::<WeekdaySet>())
            .at("UA 1350"),
    )
    .expect("valid meeting")
}

// ---------------------------------------------------------------------------
// Non-repeating
// ---------------------------------------------------------------------------

#[test]
fn non_repeating_yields_only_date_start() {
    let meeting = Meeting::new(MeetingFields::new(
        time(9, 0),
        time(10, 0),
        date(2026, 3, 2),
        date(2026, 3, 4),
    ))
    .unwrap();

    assert_eq!(all_start_dates(&meeting).unwrap(), vec![date(2026, 3, 2)]);
}

// ---------------------------------------------------------------------------
// Weekly
// ---------------------------------------------------------------------------

#[test]
fn weekly_two_days_over_four_weeks_gives_eight_dates() {
    // Mon 2026-01-05 through Sun 2026-02-01 is exactly four weeks.
    let meeting = repeating(
        OccurrenceUnit::Weekly,
        1,
        OccurrenceLimit::Until(date(2026, 12, 31)),
        &[Weekday::Mon, Weekday::Wed],
        date(2026, 1, 5),
        date(2026, 2, 1),
    );

    let dates = all_start_dates(&meeting).unwrap();
    assert_eq!(
        dates,
        vec![
            date(2026, 1, 5),
            date(2026, 1, 7),
            date(2026, 1, 12),
            date(2026, 1, 14),
            date(2026, 1, 19),
            date(2026, 1, 21),
            date(2026, 1, 26),
            date(2026, 1, 28),
        ]
    );
}

#[test]
fn weekly_count_limit_yields_exactly_count() {
    let meeting = repeating(
        OccurrenceUnit::Weekly,
        1,
        OccurrenceLimit::Count(3),
        &[Weekday::Mon],
        date(2026, 1, 5),
        date(2026, 6, 30),
    );

    assert_eq!(
        all_start_dates(&meeting).unwrap(),
        vec![date(2026, 1, 5), date(2026, 1, 12), date(2026, 1, 19)]
    );
}

#[test]
fn biweekly_skips_alternate_weeks() {
    let meeting = repeating(
        OccurrenceUnit::Weekly,
        2,
        OccurrenceLimit::Count(4),
        &[Weekday::Tue, Weekday::Thu],
        date(2026, 1, 6),
        date(2026, 12, 31),
    );

    assert_eq!(
        all_start_dates(&meeting).unwrap(),
        vec![
            date(2026, 1, 6),
            date(2026, 1, 8),
            date(2026, 1, 20),
            date(2026, 1, 22),
        ]
    );
}

#[test]
fn until_limit_is_inclusive() {
    let meeting = repeating(
        OccurrenceUnit::Weekly,
        1,
        OccurrenceLimit::Until(date(2026, 1, 19)),
        &[Weekday::Mon],
        date(2026, 1, 5),
        date(2026, 6, 30),
    );

    assert_eq!(
        all_start_dates(&meeting).unwrap(),
        vec![date(2026, 1, 5), date(2026, 1, 12), date(2026, 1, 19)]
    );
}

#[test]
fn date_end_cuts_a_larger_count() {
    let meeting = repeating(
        OccurrenceUnit::Weekly,
        1,
        OccurrenceLimit::Count(10),
        &[Weekday::Mon],
        date(2026, 1, 5),
        date(2026, 1, 19),
    );

    assert_eq!(num_occurrences(&meeting).unwrap(), 3);
}

// ---------------------------------------------------------------------------
// Daily
// ---------------------------------------------------------------------------

#[test]
fn daily_interval_two_until_date() {
    let meeting = repeating(
        OccurrenceUnit::Daily,
        2,
        OccurrenceLimit::Until(date(2026, 3, 9)),
        &[],
        date(2026, 3, 1),
        date(2026, 12, 31),
    );

    assert_eq!(
        all_start_dates(&meeting).unwrap(),
        vec![
            date(2026, 3, 1),
            date(2026, 3, 3),
            date(2026, 3, 5),
            date(2026, 3, 7),
            date(2026, 3, 9),
        ]
    );
}

#[test]
fn daily_stops_at_the_earlier_of_date_end_and_until() {
    let meeting = repeating(
        OccurrenceUnit::Daily,
        1,
        OccurrenceLimit::Until(date(2026, 3, 31)),
        &[],
        date(2026, 3, 1),
        date(2026, 3, 4),
    );

    assert_eq!(all_start_dates(&meeting).unwrap().len(), 4);
}

// ---------------------------------------------------------------------------
// Monthly and yearly
// ---------------------------------------------------------------------------

#[test]
fn monthly_by_weekday_keeps_the_ordinal() {
    // 2026-02-17 is the 3rd Tuesday of February.
    let meeting = repeating(
        OccurrenceUnit::MonthlyByWeekday,
        1,
        OccurrenceLimit::Count(3),
        &[Weekday::Tue],
        date(2026, 2, 17),
        date(2026, 12, 31),
    );

    assert_eq!(
        all_start_dates(&meeting).unwrap(),
        vec![date(2026, 2, 17), date(2026, 3, 17), date(2026, 4, 21)]
    );
}

#[test]
fn monthly_by_day_number_skips_short_months() {
    let meeting = repeating(
        OccurrenceUnit::MonthlyByDayNumber,
        1,
        OccurrenceLimit::Count(4),
        &[],
        date(2026, 1, 31),
        date(2026, 12, 31),
    );

    assert_eq!(
        all_start_dates(&meeting).unwrap(),
        vec![
            date(2026, 1, 31),
            date(2026, 3, 31),
            date(2026, 5, 31),
            date(2026, 7, 31),
        ]
    );
}

#[test]
fn monthly_by_day_number_with_interval() {
    let meeting = repeating(
        OccurrenceUnit::MonthlyByDayNumber,
        3,
        OccurrenceLimit::Until(date(2026, 12, 31)),
        &[],
        date(2026, 1, 15),
        date(2026, 12, 31),
    );

    assert_eq!(
        all_start_dates(&meeting).unwrap(),
        vec![
            date(2026, 1, 15),
            date(2026, 4, 15),
            date(2026, 7, 15),
            date(2026, 10, 15),
        ]
    );
}

#[test]
fn yearly_leap_day_recurs_on_leap_years() {
    let meeting = repeating(
        OccurrenceUnit::Yearly,
        1,
        OccurrenceLimit::Count(3),
        &[],
        date(2024, 2, 29),
        date(2040, 12, 31),
    );

    assert_eq!(
        all_start_dates(&meeting).unwrap(),
        vec![date(2024, 2, 29), date(2028, 2, 29), date(2032, 2, 29)]
    );
}

// ---------------------------------------------------------------------------
// Single occurrences
// ---------------------------------------------------------------------------

#[test]
fn single_occurrences_are_non_repeating_day_meetings() {
    let meeting = repeating(
        OccurrenceUnit::Weekly,
        1,
        OccurrenceLimit::Count(3),
        &[Weekday::Mon],
        date(2026, 1, 5),
        date(2026, 6, 30),
    );

    let singles = to_single_occurrences(&meeting).unwrap();
    assert_eq!(singles.len(), 3);
    for (single, expected) in singles
        .iter()
        .zip([date(2026, 1, 5), date(2026, 1, 12), date(2026, 1, 19)])
    {
        assert!(!single.is_repeating());
        assert_eq!(single.occurrence_unit(), None);
        assert_eq!(single.occurrence_interval(), None);
        assert_eq!(single.occurrence_limit(), None);
        assert!(single.days_of_week().is_empty());
        assert_eq!(single.date_start(), expected);
        assert_eq!(single.date_end(), expected);
        assert_eq!(single.time_start(), time(8, 0));
        assert_eq!(single.time_end(), time(10, 0));
        assert_eq!(single.location(), Some("UA 1350"));
    }
}

#[test]
fn single_occurrences_of_a_single_meeting_is_itself() {
    let meeting = Meeting::new(MeetingFields::new(
        time(9, 0),
        time(10, 0),
        date(2026, 3, 2),
        date(2026, 3, 2),
    ))
    .unwrap();

    assert_eq!(to_single_occurrences(&meeting).unwrap(), vec![meeting]);
}

// ---------------------------------------------------------------------------
// Active weekdays
// ---------------------------------------------------------------------------

#[test]
fn active_weekdays_of_weekly_is_days_of_week() {
    let meeting = repeating(
        OccurrenceUnit::Weekly,
        1,
        OccurrenceLimit::Count(6),
        &[Weekday::Tue, Weekday::Fri],
        date(2026, 1, 6),
        date(2026, 6, 30),
    );

    let days = active_weekdays(&meeting).unwrap();
    assert_eq!(days.iter().collect::<Vec<_>>(), vec![Weekday::Tue, Weekday::Fri]);
}

#[test]
fn active_weekdays_of_monthly_by_day_number_follow_the_dates() {
    // Jan 15 2026 is a Thursday, Feb 15 a Sunday.
    let meeting = repeating(
        OccurrenceUnit::MonthlyByDayNumber,
        1,
        OccurrenceLimit::Count(2),
        &[],
        date(2026, 1, 15),
        date(2026, 12, 31),
    );

    let days = active_weekdays(&meeting).unwrap();
    assert_eq!(days.iter().collect::<Vec<_>>(), vec![Weekday::Thu, Weekday::Sun]);
}

#[test]
fn active_weekdays_of_a_multi_day_meeting_cover_its_span() {
    // Fri 2026-01-09 through Mon 2026-01-12.
    let meeting = Meeting::new(MeetingFields::new(
        time(9, 0),
        time(17, 0),
        date(2026, 1, 9),
        date(2026, 1, 12),
    ))
    .unwrap();

    let days = active_weekdays(&meeting).unwrap();
    assert_eq!(
        days.iter().collect::<Vec<_>>(),
        vec![Weekday::Mon, Weekday::Fri, Weekday::Sat, Weekday::Sun]
    );
}
