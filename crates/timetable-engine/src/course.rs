//! Course sections and their instructors, as consumed by scoring and presentation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::conflict::{self, Conflict};
use crate::error::{Result, ValidationError};
use crate::expander;
use crate::extended::{ExtendedMeeting, ExtendedMeetingFields};
use crate::meeting::{Meeting, MeetingFields};
use crate::merger;

/// A faculty member teaching a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InstructorFields", into = "InstructorFields")]
pub struct Instructor {
    faculty_id: u32,
    name: Option<String>,
    email: Option<String>,
    rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorFields {
    pub faculty_id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Out of 100.
    #[serde(default)]
    pub rating: Option<i64>,
}

impl Instructor {
    pub fn new(fields: InstructorFields) -> std::result::Result<Self, ValidationError> {
        let rating = match fields.rating {
            Some(raw) => Some(
                u8::try_from(raw)
                    .ok()
                    .filter(|r| *r <= 100)
                    .ok_or(ValidationError::InvalidRating(raw))?,
            ),
            None => None,
        };
        Ok(Self {
            faculty_id: fields.faculty_id,
            name: fields.name,
            email: fields.email,
            rating,
        })
    }

    pub fn faculty_id(&self) -> u32 {
        self.faculty_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    /// Lowercase ASCII letters only, for matching names across data sources.
    pub fn normalized_name(&self) -> Option<String> {
        self.name.as_ref().map(|name| {
            name.chars()
                .filter(|c| c.is_ascii_alphabetic())
                .map(|c| c.to_ascii_lowercase())
                .collect()
        })
    }
}

impl TryFrom<InstructorFields> for Instructor {
    type Error = ValidationError;

    fn try_from(fields: InstructorFields) -> std::result::Result<Self, Self::Error> {
        Instructor::new(fields)
    }
}

impl From<Instructor> for InstructorFields {
    fn from(instructor: Instructor) -> Self {
        InstructorFields {
            faculty_id: instructor.faculty_id,
            name: instructor.name,
            email: instructor.email,
            rating: instructor.rating.map(i64::from),
        }
    }
}

/// A single course section, identified by its CRN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// e.g. "BIOL1020U"
    pub course_code: String,
    pub title: String,
    pub crn: u32,
    /// e.g. "Lecture"
    pub class_type: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    pub current_enrollment: u32,
    pub maximum_enrollment: u32,
    #[serde(default)]
    pub instructors: Vec<Instructor>,
    #[serde(default)]
    pub class_time: Vec<Meeting>,
}

impl Course {
    /// Open seats; zero once the section is full or over-enrolled.
    pub fn available_seats(&self) -> u32 {
        self.maximum_enrollment
            .saturating_sub(self.current_enrollment)
    }

    /// Key grouping interchangeable sections, e.g. "BIOL1020U Lecture".
    pub fn comp_key(&self) -> String {
        format!("{} {}", self.course_code, self.class_type)
    }

    pub fn unified_name(&self) -> String {
        format!("{} | {} ({})", self.title, self.class_type, self.course_code)
    }

    pub fn unified_description(&self) -> String {
        let instructors = if self.instructors.is_empty() {
            "N/A".to_string()
        } else {
            self.instructors
                .iter()
                .map(|i| i.name().unwrap_or("TBA"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "CRN: {} | Section: {} | Class type: {}\nInstructors: {}\n{}/{} students enrolled",
            self.crn,
            self.section.as_deref().unwrap_or("-"),
            self.class_type,
            instructors,
            self.current_enrollment,
            self.maximum_enrollment
        )
    }

    /// Total occurrences over every class meeting.
    pub fn num_occurrences(&self) -> Result<usize> {
        let mut total = 0;
        for meeting in &self.class_time {
            total += expander::num_occurrences(meeting)?;
        }
        Ok(total)
    }

    /// Mean rating of the instructors that have one.
    pub fn mean_instructor_rating(&self) -> Option<f64> {
        let ratings: Vec<f64> = self
            .instructors
            .iter()
            .filter_map(|i| i.rating())
            .map(f64::from)
            .collect();
        if ratings.is_empty() {
            return None;
        }
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }

    /// The same course with its weekly rows coalesced.
    pub fn with_merged_meetings(&self) -> Course {
        Course {
            class_time: merger::merge(&self.class_time),
            ..self.clone()
        }
    }

    /// One calendar event per class meeting.
    ///
    /// Virtual sections get the location `VIRTUAL`. A maximum enrollment of zero means
    /// the capacity is unknown and is exported as unbounded.
    pub fn to_extended_meetings(&self) -> std::result::Result<Vec<ExtendedMeeting>, ValidationError> {
        self.class_time
            .iter()
            .map(|meeting| {
                let mut fields = MeetingFields::from(meeting.clone());
                if self.is_virtual {
                    fields.location = Some("VIRTUAL".to_string());
                }
                ExtendedMeeting::new(ExtendedMeetingFields {
                    meeting: fields,
                    name: self.unified_name(),
                    description: self.unified_description(),
                    seats_filled: i64::from(self.current_enrollment),
                    max_capacity: match self.maximum_enrollment {
                        0 => -1,
                        n => i64::from(n),
                    },
                    is_virtual: self.is_virtual,
                    colour: None,
                })
            })
            .collect()
    }
}

/// Earliest conflict between the meetings of a set of courses.
pub fn schedule_conflict(courses: &[Course]) -> Result<Option<Conflict>> {
    let meetings: Vec<Meeting> = courses
        .iter()
        .flat_map(|c| c.class_time.iter().cloned())
        .collect();
    conflict::meetings_conflict(&meetings)
}

/// Lower bound on the number of distinct students enrolled across `courses`.
///
/// Enrollment is summed per [`Course::comp_key`]; a student takes one section of each
/// kind, so the smallest sum is the minimum head count. Zero for an empty list.
pub fn min_students(courses: &[Course]) -> u32 {
    let mut by_key: HashMap<String, u32> = HashMap::new();
    for course in courses {
        *by_key.entry(course.comp_key()).or_insert(0) += course.current_enrollment;
    }
    by_key.into_values().min().unwrap_or(0)
}
