//! Tests for course sections, instructors and course-level helpers.

use chrono::{NaiveDate, NaiveTime, Weekday};
use timetable_engine::course::{min_students, schedule_conflict, InstructorFields};
use timetable_engine::{
    Capacity, Course, Instructor, Meeting, MeetingFields, OccurrenceLimit, OccurrenceUnit,
    ValidationError, WeekdaySet,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn instructor(name: &str, rating: Option<i64>) -> Instructor {
    Instructor::new(InstructorFields {
        faculty_id: 42,
        name: Some(name.to_string()),
        email: None,
        rating,
    })
    .unwrap()
}

/// Weekly 4-occurrence meeting on `day` from the week of 2026-01-05.
fn weekly(day: Weekday, from: (u32, u32), to: (u32, u32)) -> Meeting {
    Meeting::new(
        MeetingFields::new(
            time(from.0, from.1),
            time(to.0, to.1),
            date(2026, 1, 5),
            date(2026, 4, 30),
        )
        .repeating(OccurrenceUnit::Weekly, 1, OccurrenceLimit::Count(4))
        .on(WeekdaySet::single(day))
        .at("UA 1350"),
    )
    .unwrap()
}

fn course(code: &str, class_type: &str, crn: u32, enrolled: u32, max: u32) -> Course {
    Course {
        course_code: code.to_string(),
        title: "Biology I".to_string(),
        crn,
        class_type: class_type.to_string(),
        section: Some("001".to_string()),
        is_virtual: false,
        current_enrollment: enrolled,
        maximum_enrollment: max,
        instructors: vec![],
        class_time: vec![],
    }
}

// ---------------------------------------------------------------------------
// Instructor
// ---------------------------------------------------------------------------

#[test]
fn rating_must_be_within_zero_to_hundred() {
    for raw in [-1, 101, 1000] {
        let result = Instructor::new(InstructorFields {
            faculty_id: 1,
            name: None,
            email: None,
            rating: Some(raw),
        });
        assert_eq!(result, Err(ValidationError::InvalidRating(raw)));
    }

    assert_eq!(instructor("A", Some(0)).rating(), Some(0));
    assert_eq!(instructor("A", Some(100)).rating(), Some(100));
    assert_eq!(instructor("A", None).rating(), None);
}

#[test]
fn normalized_name_keeps_lowercase_letters() {
    assert_eq!(
        instructor("Dr. Jane O'Neil-Smith", None).normalized_name(),
        Some("drjaneoneilsmith".to_string())
    );
}

#[test]
fn instructor_serde_validates_rating() {
    let ok: Instructor =
        serde_json::from_str(r#"{"faculty_id": 7, "name": "Ada", "rating": 88}"#).unwrap();
    assert_eq!(ok.rating(), Some(88));
    assert_eq!(ok.email(), None);

    assert!(serde_json::from_str::<Instructor>(r#"{"faculty_id": 7, "rating": 120}"#).is_err());
}

// ---------------------------------------------------------------------------
// Course helpers
// ---------------------------------------------------------------------------

#[test]
fn available_seats_saturate_at_zero() {
    assert_eq!(course("BIOL1020U", "Lecture", 1, 40, 60).available_seats(), 20);
    assert_eq!(course("BIOL1020U", "Lecture", 1, 65, 60).available_seats(), 0);
}

#[test]
fn names_and_keys() {
    let c = course("BIOL1020U", "Lecture", 43512, 40, 60);

    assert_eq!(c.comp_key(), "BIOL1020U Lecture");
    assert_eq!(c.unified_name(), "Biology I | Lecture (BIOL1020U)");
}

#[test]
fn unified_description_lists_instructors() {
    let mut c = course("BIOL1020U", "Lecture", 43512, 40, 60);
    assert!(c.unified_description().contains("Instructors: N/A"));

    c.instructors = vec![instructor("Ada Lovelace", None), instructor("Alan Turing", None)];
    let description = c.unified_description();
    assert!(description.starts_with("CRN: 43512 | Section: 001 | Class type: Lecture"));
    assert!(description.contains("Instructors: Ada Lovelace, Alan Turing"));
    assert!(description.ends_with("40/60 students enrolled"));
}

#[test]
fn num_occurrences_sums_meetings() {
    let mut c = course("BIOL1020U", "Lecture", 1, 0, 60);
    c.class_time = vec![weekly(Weekday::Mon, (8, 0), (10, 0)), weekly(Weekday::Wed, (8, 0), (10, 0))];

    assert_eq!(c.num_occurrences().unwrap(), 8);
}

#[test]
fn mean_rating_ignores_unrated_instructors() {
    let mut c = course("BIOL1020U", "Lecture", 1, 0, 60);
    assert_eq!(c.mean_instructor_rating(), None);

    c.instructors = vec![
        instructor("A", Some(80)),
        instructor("B", None),
        instructor("C", Some(90)),
    ];
    assert_eq!(c.mean_instructor_rating(), Some(85.0));
}

#[test]
fn merged_meetings_coalesce_weekly_rows() {
    let mut c = course("BIOL1020U", "Lecture", 1, 0, 60);
    c.class_time = vec![weekly(Weekday::Mon, (8, 0), (10, 0)), weekly(Weekday::Wed, (8, 0), (10, 0))];

    let merged = c.with_merged_meetings();
    assert_eq!(merged.class_time.len(), 1);
    assert_eq!(merged.class_time[0].days_of_week().len(), 2);
    assert_eq!(merged.crn, c.crn);
}

#[test]
fn extended_meetings_for_a_virtual_section() {
    let mut c = course("BIOL1020U", "Lecture", 1, 12, 0);
    c.is_virtual = true;
    c.class_time = vec![weekly(Weekday::Mon, (8, 0), (10, 0))];

    let events = c.to_extended_meetings().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].meeting().location(), Some("VIRTUAL"));
    assert_eq!(events[0].max_capacity(), Capacity::Unbounded);
    assert_eq!(events[0].seats_filled(), 12);
    assert!(events[0].is_virtual());
    assert_eq!(events[0].name(), c.unified_name());
}

// ---------------------------------------------------------------------------
// Multi-course helpers
// ---------------------------------------------------------------------------

#[test]
fn schedule_conflict_across_courses() {
    let mut lecture = course("BIOL1020U", "Lecture", 1, 0, 60);
    lecture.class_time = vec![weekly(Weekday::Mon, (8, 0), (10, 0))];
    let mut lab = course("BIOL1020U", "Laboratory", 2, 0, 20);
    lab.class_time = vec![weekly(Weekday::Mon, (9, 0), (12, 0))];
    let mut tutorial = course("BIOL1020U", "Tutorial", 3, 0, 30);
    tutorial.class_time = vec![weekly(Weekday::Tue, (9, 0), (10, 0))];

    let conflict = schedule_conflict(&[lecture.clone(), lab]).unwrap().unwrap();
    assert_eq!(
        conflict.at,
        date(2026, 1, 5).and_time(time(9, 0))
    );
    assert!(schedule_conflict(&[lecture, tutorial]).unwrap().is_none());
}

#[test]
fn min_students_is_the_smallest_group_sum() {
    let courses = vec![
        course("BIOL1020U", "Lecture", 1, 120, 150),
        course("BIOL1020U", "Laboratory", 2, 20, 24),
        course("BIOL1020U", "Laboratory", 3, 18, 24),
        course("BIOL1020U", "Tutorial", 4, 45, 50),
    ];

    assert_eq!(min_students(&courses), 38);
    assert_eq!(min_students(&[]), 0);
}
