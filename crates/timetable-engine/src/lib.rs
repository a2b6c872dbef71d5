//! # timetable-engine
//!
//! Recurrence and conflict resolution for class timetables and calendar events.
//!
//! A [`Meeting`] is a block of time that may repeat (daily, weekly, monthly by
//! weekday or day number, yearly). The engine expands repeat rules into concrete
//! dates, finds date/time conflicts across a schedule, coalesces weekly rows that
//! only differ by weekday, and scores course sections against user preferences.
//! Everything is pure computation over immutable values.
//!
//! ## Modules
//!
//! - [`meeting`] — `Meeting` value type and its construction-time validation
//! - [`weekday`] — `WeekdaySet` bitmask for `days_of_week`
//! - [`extended`] — `ExtendedMeeting`, a meeting with event metadata
//! - [`expander`] — repeat rule → list of occurrence dates / single meetings
//! - [`conflict`] — detect overlapping meetings in a schedule
//! - [`merger`] — coalesce compatible weekly meetings
//! - [`course`] — course sections and instructors
//! - [`scorer`] — weighted preference scoring of courses
//! - [`error`] — Error types

pub mod conflict;
pub mod course;
pub mod error;
pub mod expander;
pub mod extended;
pub mod meeting;
pub mod merger;
pub mod scorer;
pub mod weekday;

pub use conflict::{find_conflicts, has_conflict, meetings_conflict, pairwise_conflict, Conflict};
pub use course::{Course, Instructor};
pub use error::{ScheduleError, ValidationError};
pub use expander::{all_start_dates, to_single_occurrences};
pub use extended::{Capacity, ExtendedMeeting};
pub use meeting::{Meeting, MeetingFields, OccurrenceLimit, OccurrenceUnit};
pub use merger::merge;
pub use scorer::{score, OptimizerCriteria, Preference, TimeWindow, Weight};
pub use weekday::WeekdaySet;
