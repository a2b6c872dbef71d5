//! `ExtendedMeeting` -- a meeting plus the metadata of a general calendar event.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::expander;
use crate::meeting::{Meeting, MeetingFields};

/// Attendee capacity of an event. Stored as `-1` when unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    Unbounded,
    Limited(u32),
}

impl Capacity {
    /// Decode the stored value: `-1` is unbounded, otherwise it must be positive.
    pub fn from_raw(raw: i64) -> std::result::Result<Self, ValidationError> {
        match raw {
            -1 => Ok(Capacity::Unbounded),
            n if n > 0 => u32::try_from(n)
                .map(Capacity::Limited)
                .map_err(|_| ValidationError::InvalidCapacity(raw)),
            _ => Err(ValidationError::InvalidCapacity(raw)),
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            Capacity::Unbounded => -1,
            Capacity::Limited(n) => i64::from(n),
        }
    }
}

/// Unvalidated event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedMeetingFields {
    #[serde(flatten)]
    pub meeting: MeetingFields,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub seats_filled: i64,
    pub max_capacity: i64,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
}

/// A validated calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExtendedMeetingFields", into = "ExtendedMeetingFields")]
pub struct ExtendedMeeting {
    meeting: Meeting,
    name: String,
    description: String,
    seats_filled: u32,
    max_capacity: Capacity,
    is_virtual: bool,
    colour: Option<String>,
}

impl ExtendedMeeting {
    /// Validate the meeting part first, then seats, capacity and colour.
    pub fn new(fields: ExtendedMeetingFields) -> std::result::Result<Self, ValidationError> {
        let meeting = Meeting::new(fields.meeting)?;
        let seats_filled = u32::try_from(fields.seats_filled)
            .map_err(|_| ValidationError::InvalidSeats(fields.seats_filled))?;
        let max_capacity = Capacity::from_raw(fields.max_capacity)?;
        if let Some(colour) = &fields.colour {
            if !is_hex_colour(colour) {
                return Err(ValidationError::InvalidColour(colour.clone()));
            }
        }

        Ok(Self {
            meeting,
            name: fields.name,
            description: fields.description,
            seats_filled,
            max_capacity,
            is_virtual: fields.is_virtual,
            colour: fields.colour,
        })
    }

    pub fn meeting(&self) -> &Meeting {
        &self.meeting
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Description with line breaks written as a literal `\n`, for single-line formats.
    pub fn escaped_description(&self) -> String {
        self.description.replace('\n', r"\n")
    }

    pub fn seats_filled(&self) -> u32 {
        self.seats_filled
    }

    pub fn max_capacity(&self) -> Capacity {
        self.max_capacity
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn colour(&self) -> Option<&str> {
        self.colour.as_deref()
    }

    /// Whether someone else can still join.
    ///
    /// Enrollment may exceed a limited capacity (overrides happen), which simply
    /// reports no space.
    pub fn has_space(&self) -> bool {
        match self.max_capacity {
            Capacity::Unbounded => true,
            Capacity::Limited(max) => max > self.seats_filled,
        }
    }

    /// One event per occurrence of the underlying meeting, metadata carried along.
    pub fn to_single_occurrences(&self) -> Result<Vec<ExtendedMeeting>> {
        Ok(expander::to_single_occurrences(&self.meeting)?
            .into_iter()
            .map(|meeting| ExtendedMeeting {
                meeting,
                ..self.clone()
            })
            .collect())
    }
}

/// `#` followed by three or six hex digits. Spaces are ignored.
fn is_hex_colour(code: &str) -> bool {
    let cleaned: String = code.chars().filter(|c| *c != ' ').collect();
    match cleaned.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

impl TryFrom<ExtendedMeetingFields> for ExtendedMeeting {
    type Error = ValidationError;

    fn try_from(fields: ExtendedMeetingFields) -> std::result::Result<Self, Self::Error> {
        ExtendedMeeting::new(fields)
    }
}

impl From<ExtendedMeeting> for ExtendedMeetingFields {
    fn from(event: ExtendedMeeting) -> Self {
        ExtendedMeetingFields {
            meeting: event.meeting.into(),
            name: event.name,
            description: event.description,
            seats_filled: i64::from(event.seats_filled),
            max_capacity: event.max_capacity.to_raw(),
            is_virtual: event.is_virtual,
            colour: event.colour,
        }
    }
}
