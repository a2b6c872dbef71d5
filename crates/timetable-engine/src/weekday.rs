//! Weekday bitset for weekly and monthly-by-weekday rules.
//!
//! Bit `i` stands for weekday index `i` (0 = Monday … 6 = Sunday), so `0b000_0101` is
//! Monday and Wednesday. This is the encoding the record layer stores in `days_of_week`.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const ALL_DAYS: u8 = 0b111_1111;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A set of weekdays stored as a seven-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Decode a bitmask. Bits above Sunday are rejected.
    pub fn from_bits(bits: u8) -> Result<Self, ValidationError> {
        if bits & !ALL_DAYS != 0 {
            return Err(ValidationError::InvalidWeekdays(bits));
        }
        Ok(Self(bits))
    }

    pub fn single(day: Weekday) -> Self {
        Self(bit(day))
    }

    /// Encode back to the stored bitmask.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & bit(day) != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= bit(day);
    }

    pub fn union(self, other: WeekdaySet) -> WeekdaySet {
        Self(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in Monday-first order.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEK.into_iter().filter(move |day| self.contains(*day))
    }
}

fn bit(day: Weekday) -> u8 {
    1 << day.num_days_from_monday()
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl TryFrom<u8> for WeekdaySet {
    type Error = ValidationError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<WeekdaySet> for u8 {
    fn from(set: WeekdaySet) -> Self {
        set.bits()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|day| day.to_string()).collect();
        write!(f, "{}", names.join(","))
    }
}
