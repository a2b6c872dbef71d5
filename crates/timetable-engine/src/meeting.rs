//! The `Meeting` value type -- a possibly-repeating block of time on the calendar.
//!
//! A meeting is always valid: [`Meeting::new`] runs every invariant check once and
//! either returns the value or the first [`ValidationError`] it hit. Nothing in the
//! crate mutates a meeting afterwards; expansion and merging build new ones.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::weekday::WeekdaySet;

/// Repetition granularity of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceUnit {
    Daily,
    Weekly,
    /// Same ordinal weekday each month, e.g. the 3rd Tuesday.
    MonthlyByWeekday,
    /// Same day number each month, e.g. the 15th.
    MonthlyByDayNumber,
    Yearly,
}

impl OccurrenceUnit {
    /// Whether rules of this unit pick their days through `days_of_week`.
    pub fn uses_weekdays(self) -> bool {
        matches!(self, OccurrenceUnit::Weekly | OccurrenceUnit::MonthlyByWeekday)
    }
}

/// The bound that stops a rule from repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceLimit {
    /// Stop after this many occurrences.
    Count(u32),
    /// Stop after this date (inclusive).
    Until(NaiveDate),
}

impl OccurrenceLimit {
    /// Build a limit from the two nullable storage columns (`occurrence_repeat`,
    /// `occurrence_until`). When a row carries both, the date wins.
    pub fn from_columns(repeat: Option<u32>, until: Option<NaiveDate>) -> Option<Self> {
        match (until, repeat) {
            (Some(date), _) => Some(OccurrenceLimit::Until(date)),
            (None, Some(count)) => Some(OccurrenceLimit::Count(count)),
            (None, None) => None,
        }
    }
}

/// Repetition rule of a repeating meeting. Absent for single occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Recurrence {
    pub(crate) unit: OccurrenceUnit,
    pub(crate) interval: u32,
    pub(crate) limit: OccurrenceLimit,
    pub(crate) days_of_week: WeekdaySet,
}

/// Unvalidated meeting record, as it arrives from storage or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingFields {
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_unit: Option<OccurrenceUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_limit: Option<OccurrenceLimit>,
    /// Weekday bitmask, see [`WeekdaySet`].
    #[serde(default)]
    pub days_of_week: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// IANA identifier, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl MeetingFields {
    /// A single, non-repeating meeting over `date_start..=date_end`.
    pub fn new(
        time_start: NaiveTime,
        time_end: NaiveTime,
        date_start: NaiveDate,
        date_end: NaiveDate,
    ) -> Self {
        Self {
            time_start,
            time_end,
            date_start,
            date_end,
            occurrence_unit: None,
            occurrence_interval: None,
            occurrence_limit: None,
            days_of_week: 0,
            location: None,
            timezone: None,
        }
    }

    pub fn repeating(mut self, unit: OccurrenceUnit, interval: u32, limit: OccurrenceLimit) -> Self {
        self.occurrence_unit = Some(unit);
        self.occurrence_interval = Some(interval);
        self.occurrence_limit = Some(limit);
        self
    }

    pub fn on(mut self, days: WeekdaySet) -> Self {
        self.days_of_week = days.bits();
        self
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn in_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// A validated, immutable meeting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MeetingFields", into = "MeetingFields")]
pub struct Meeting {
    pub(crate) time_start: NaiveTime,
    pub(crate) time_end: NaiveTime,
    pub(crate) date_start: NaiveDate,
    pub(crate) date_end: NaiveDate,
    pub(crate) recurrence: Option<Recurrence>,
    pub(crate) location: Option<String>,
    pub(crate) timezone: Option<String>,
}

impl Meeting {
    /// Validate `fields` and build a meeting.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// time ordering, date ordering, occurrence-field pairing, limit bounds,
    /// then the weekday set.
    pub fn new(fields: MeetingFields) -> Result<Self, ValidationError> {
        if fields.time_start >= fields.time_end {
            return Err(ValidationError::InvertedTimes {
                start: fields.time_start,
                end: fields.time_end,
            });
        }
        if fields.date_start > fields.date_end {
            return Err(ValidationError::InvertedDates {
                start: fields.date_start,
                end: fields.date_end,
            });
        }
        let recurrence = build_recurrence(&fields)?;

        Ok(Self {
            time_start: fields.time_start,
            time_end: fields.time_end,
            date_start: fields.date_start,
            date_end: fields.date_end,
            recurrence,
            location: fields.location,
            timezone: fields.timezone,
        })
    }

    pub fn time_start(&self) -> NaiveTime {
        self.time_start
    }

    pub fn time_end(&self) -> NaiveTime {
        self.time_end
    }

    pub fn date_start(&self) -> NaiveDate {
        self.date_start
    }

    pub fn date_end(&self) -> NaiveDate {
        self.date_end
    }

    pub fn occurrence_unit(&self) -> Option<OccurrenceUnit> {
        self.recurrence.map(|r| r.unit)
    }

    pub fn occurrence_interval(&self) -> Option<u32> {
        self.recurrence.map(|r| r.interval)
    }

    pub fn occurrence_limit(&self) -> Option<OccurrenceLimit> {
        self.recurrence.map(|r| r.limit)
    }

    /// Selected weekdays. Empty unless the unit is weekday based; bits given for other
    /// meetings are checked, then dropped.
    pub fn days_of_week(&self) -> WeekdaySet {
        self.recurrence
            .map(|r| r.days_of_week)
            .unwrap_or(WeekdaySet::EMPTY)
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn is_repeating(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Length of one occurrence within its day.
    pub fn duration(&self) -> Duration {
        self.time_end - self.time_start
    }

    /// A non-repeating copy of this meeting on a single day.
    pub(crate) fn single_on(&self, date: NaiveDate) -> Meeting {
        Meeting {
            date_start: date,
            date_end: date,
            recurrence: None,
            ..self.clone()
        }
    }

    /// Ordering used by the conflict sweep: date, then start time, then end time.
    pub(crate) fn sort_key(&self) -> (NaiveDate, NaiveTime, NaiveTime) {
        (self.date_start, self.time_start, self.time_end)
    }
}

fn build_recurrence(fields: &MeetingFields) -> Result<Option<Recurrence>, ValidationError> {
    match (
        fields.occurrence_unit,
        fields.occurrence_interval,
        fields.occurrence_limit,
    ) {
        (None, None, None) => {
            WeekdaySet::from_bits(fields.days_of_week)?;
            Ok(None)
        }
        (None, Some(_), _) => Err(ValidationError::UnexpectedOccurrenceField(
            "occurrence_interval",
        )),
        (None, None, Some(_)) => Err(ValidationError::UnexpectedOccurrenceField(
            "occurrence_limit",
        )),
        (Some(_), None, _) => Err(ValidationError::MissingOccurrenceField(
            "occurrence_interval",
        )),
        (Some(_), Some(_), None) => Err(ValidationError::MissingOccurrenceField(
            "occurrence_limit",
        )),
        (Some(unit), Some(interval), Some(limit)) => {
            if interval == 0 {
                return Err(ValidationError::ZeroInterval);
            }
            match limit {
                OccurrenceLimit::Count(0) => return Err(ValidationError::ZeroCount),
                OccurrenceLimit::Until(until) if until < fields.date_start => {
                    return Err(ValidationError::LimitBeforeStart {
                        until,
                        start: fields.date_start,
                    })
                }
                _ => {}
            }
            let days = WeekdaySet::from_bits(fields.days_of_week)?;
            let days_of_week = if unit.uses_weekdays() {
                if days.is_empty() {
                    return Err(ValidationError::InvalidWeekdays(fields.days_of_week));
                }
                days
            } else {
                WeekdaySet::EMPTY
            };
            Ok(Some(Recurrence {
                unit,
                interval,
                limit,
                days_of_week,
            }))
        }
    }
}

impl TryFrom<MeetingFields> for Meeting {
    type Error = ValidationError;

    fn try_from(fields: MeetingFields) -> Result<Self, Self::Error> {
        Meeting::new(fields)
    }
}

impl From<Meeting> for MeetingFields {
    fn from(meeting: Meeting) -> Self {
        MeetingFields {
            time_start: meeting.time_start,
            time_end: meeting.time_end,
            date_start: meeting.date_start,
            date_end: meeting.date_end,
            occurrence_unit: meeting.recurrence.map(|r| r.unit),
            occurrence_interval: meeting.recurrence.map(|r| r.interval),
            occurrence_limit: meeting.recurrence.map(|r| r.limit),
            days_of_week: meeting.days_of_week().bits(),
            location: meeting.location,
            timezone: meeting.timezone,
        }
    }
}
