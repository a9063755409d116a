//! Lecture lookups by composite key and by filter, and the administrative
//! writes that maintain the weekly plan.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

use crate::models::{
    Faculty, Lecture, LectureChanges, LectureDetail, LectureKey, NewLecture, Subject, Timeslot,
    Timetable,
};
use crate::orm::schedule::insert_lecture;
use crate::schema::{batches, faculty, lectures, sections, subjects, timeslots, timetables};

#[derive(Debug, Error)]
pub enum LectureWriteError {
    #[error("A lecture already occupies this timetable slot")]
    Duplicate,
    #[error("Lecture not found")]
    NotFound,
    #[error("Referenced timetable, timeslot, subject or faculty does not exist")]
    InvalidReference,
    #[error(transparent)]
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for LectureWriteError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                LectureWriteError::Duplicate
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                LectureWriteError::InvalidReference
            }
            other => LectureWriteError::Db(other),
        }
    }
}

/// Optional narrowing for [`query_lectures`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LectureFilters {
    pub course_id: Option<i32>,
    /// Batch entry year.
    pub year: Option<i32>,
    /// Section name. Timetables without a section never match.
    pub section: Option<String>,
    pub semester: Option<i32>,
    pub faculty_id: Option<i32>,
    pub room_id: Option<i32>,
}

type LectureRow = (Lecture, Subject, Faculty, Timeslot, Timetable);

fn into_detail((lecture, subject, faculty, timeslot, timetable): LectureRow) -> LectureDetail {
    LectureDetail {
        lecture,
        subject,
        faculty,
        timeslot,
        timetable,
    }
}

/// Looks up one lecture by its `(timetable_id, timeslot_id)` key.
pub fn get_lecture(
    conn: &mut SqliteConnection,
    key: LectureKey,
) -> Result<Option<LectureDetail>, diesel::result::Error> {
    let row = lectures::table
        .inner_join(subjects::table)
        .inner_join(faculty::table)
        .inner_join(timeslots::table)
        .inner_join(timetables::table)
        .filter(lectures::timetable_id.eq(key.timetable_id))
        .filter(lectures::timeslot_id.eq(key.timeslot_id))
        .select((
            Lecture::as_select(),
            Subject::as_select(),
            Faculty::as_select(),
            Timeslot::as_select(),
            Timetable::as_select(),
        ))
        .first::<LectureRow>(conn)
        .optional()?;

    Ok(row.map(into_detail))
}

/// Returns true when a lecture occupies the given key.
pub fn lecture_exists(
    conn: &mut SqliteConnection,
    key: LectureKey,
) -> Result<bool, diesel::result::Error> {
    diesel::select(diesel::dsl::exists(
        lectures::table.find((key.timetable_id, key.timeslot_id)),
    ))
    .get_result(conn)
}

/// Adds a lecture to a free `(timetable_id, timeslot_id)` slot.
pub fn create_lecture(
    conn: &mut SqliteConnection,
    new_lecture: NewLecture,
) -> Result<LectureDetail, LectureWriteError> {
    conn.transaction(|conn| {
        let key = LectureKey::new(new_lecture.timetable_id, new_lecture.timeslot_id);
        if lecture_exists(conn, key)? {
            return Err(LectureWriteError::Duplicate);
        }
        insert_lecture(conn, new_lecture)?;
        get_lecture(conn, key)?.ok_or(LectureWriteError::NotFound)
    })
}

/// Changes the subject, faculty or room of an existing lecture.
pub fn update_lecture(
    conn: &mut SqliteConnection,
    key: LectureKey,
    changes: &LectureChanges,
) -> Result<LectureDetail, LectureWriteError> {
    conn.transaction(|conn| {
        let updated = diesel::update(lectures::table.find((key.timetable_id, key.timeslot_id)))
            .set(changes)
            .execute(conn)?;
        if updated == 0 {
            return Err(LectureWriteError::NotFound);
        }
        get_lecture(conn, key)?.ok_or(LectureWriteError::NotFound)
    })
}

/// Removes a lecture. Sessions recorded for the slot are kept.
pub fn delete_lecture(
    conn: &mut SqliteConnection,
    key: LectureKey,
) -> Result<usize, diesel::result::Error> {
    diesel::delete(lectures::table.find((key.timetable_id, key.timeslot_id))).execute(conn)
}

/// Keys of every lecture taught by `faculty_id`.
pub fn lecture_keys_for_faculty(
    conn: &mut SqliteConnection,
    faculty_id: i32,
) -> Result<Vec<LectureKey>, diesel::result::Error> {
    let pairs = lectures::table
        .filter(lectures::faculty_id.eq(faculty_id))
        .select((lectures::timetable_id, lectures::timeslot_id))
        .load::<(i32, i32)>(conn)?;

    Ok(pairs
        .into_iter()
        .map(|(timetable_id, timeslot_id)| LectureKey::new(timetable_id, timeslot_id))
        .collect())
}

/// Lists lectures matching every filter that is set, in weekly order.
pub fn query_lectures(
    conn: &mut SqliteConnection,
    filters: &LectureFilters,
) -> Result<Vec<LectureDetail>, diesel::result::Error> {
    let mut query = lectures::table
        .inner_join(subjects::table)
        .inner_join(faculty::table)
        .inner_join(timeslots::table)
        .inner_join(
            timetables::table
                .inner_join(batches::table)
                .left_join(sections::table),
        )
        .select((
            Lecture::as_select(),
            Subject::as_select(),
            Faculty::as_select(),
            Timeslot::as_select(),
            Timetable::as_select(),
        ))
        .into_boxed();

    if let Some(course) = filters.course_id {
        query = query.filter(timetables::course_id.eq(course));
    }
    if let Some(entry_year) = filters.year {
        query = query.filter(batches::entry_year.eq(entry_year));
    }
    if let Some(section_name) = &filters.section {
        query = query.filter(sections::name.eq(section_name.clone()));
    }
    if let Some(semester) = filters.semester {
        query = query.filter(timetables::semester.eq(semester));
    }
    if let Some(faculty_id) = filters.faculty_id {
        query = query.filter(lectures::faculty_id.eq(faculty_id));
    }
    if let Some(room_id) = filters.room_id {
        query = query.filter(timetables::room_id.eq(room_id));
    }

    let rows = query
        .order((
            timeslots::day_of_week.asc(),
            timeslots::start_time.asc(),
            lectures::timetable_id.asc(),
        ))
        .load::<LectureRow>(conn)?;

    Ok(rows.into_iter().map(into_detail).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{ScheduleFixture, create_schedule_fixture, setup_test_db};

    fn setup() -> (SqliteConnection, ScheduleFixture) {
        let mut conn = setup_test_db();
        let fixture = create_schedule_fixture(&mut conn).expect("schedule fixture");
        (conn, fixture)
    }

    #[test]
    fn test_get_lecture_by_composite_key() {
        let (mut conn, fx) = setup();

        let detail = get_lecture(&mut conn, LectureKey::new(fx.cs_timetable, fx.monday_nine))
            .unwrap()
            .expect("lecture should exist");
        assert_eq!(detail.subject.name, "Algorithms");
        assert_eq!(detail.faculty.full_name(), "A. Turing");
        assert_eq!(detail.timeslot.day_of_week, 2);

        let missing = get_lecture(&mut conn, LectureKey::new(fx.math_timetable, fx.wednesday_nine))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_lecture_exists() {
        let (mut conn, fx) = setup();
        assert!(lecture_exists(&mut conn, LectureKey::new(fx.cs_timetable, fx.monday_ten)).unwrap());
        assert!(!lecture_exists(&mut conn, LectureKey::new(fx.math_timetable, fx.monday_ten)).unwrap());
    }

    #[test]
    fn test_duplicate_lecture_key_rejected() {
        let (mut conn, fx) = setup();
        let dup = insert_lecture(
            &mut conn,
            NewLecture {
                timetable_id: fx.cs_timetable,
                timeslot_id: fx.monday_nine,
                subject_id: fx.calculus,
                faculty_id: fx.hopper,
                room: "R101".to_string(),
            },
        );
        assert!(dup.is_err());
    }

    fn calculus_on_wednesday(fx: &ScheduleFixture) -> NewLecture {
        NewLecture {
            timetable_id: fx.math_timetable,
            timeslot_id: fx.wednesday_nine,
            subject_id: fx.calculus,
            faculty_id: fx.hopper,
            room: "R202".to_string(),
        }
    }

    #[test]
    fn test_create_lecture() {
        let (mut conn, fx) = setup();

        let detail = create_lecture(&mut conn, calculus_on_wednesday(&fx)).unwrap();
        assert_eq!(detail.subject.name, "Calculus");
        assert_eq!(detail.timeslot.day_of_week, 4);
        assert!(lecture_exists(&mut conn, detail.lecture.key()).unwrap());

        let again = create_lecture(&mut conn, calculus_on_wednesday(&fx));
        assert!(matches!(again, Err(LectureWriteError::Duplicate)));
    }

    #[test]
    fn test_create_lecture_with_unknown_subject() {
        let (mut conn, fx) = setup();

        let mut lecture = calculus_on_wednesday(&fx);
        lecture.subject_id = 9999;
        let result = create_lecture(&mut conn, lecture);
        assert!(matches!(result, Err(LectureWriteError::InvalidReference)));
        assert!(
            !lecture_exists(&mut conn, LectureKey::new(fx.math_timetable, fx.wednesday_nine))
                .unwrap()
        );
    }

    #[test]
    fn test_update_lecture() {
        let (mut conn, fx) = setup();
        let key = LectureKey::new(fx.cs_timetable, fx.monday_ten);

        let changes = LectureChanges {
            faculty_id: Some(fx.turing),
            room: Some("R303".to_string()),
            ..Default::default()
        };
        let detail = update_lecture(&mut conn, key, &changes).unwrap();
        assert_eq!(detail.faculty.full_name(), "A. Turing");
        assert_eq!(detail.lecture.room, "R303");
        assert_eq!(detail.subject.name, "Operating Systems");

        let missing = update_lecture(
            &mut conn,
            LectureKey::new(fx.math_timetable, fx.wednesday_nine),
            &changes,
        );
        assert!(matches!(missing, Err(LectureWriteError::NotFound)));

        let bad_faculty = LectureChanges {
            faculty_id: Some(9999),
            ..Default::default()
        };
        let result = update_lecture(&mut conn, key, &bad_faculty);
        assert!(matches!(result, Err(LectureWriteError::InvalidReference)));
    }

    #[test]
    fn test_delete_lecture() {
        let (mut conn, fx) = setup();
        let key = LectureKey::new(fx.cs_timetable, fx.wednesday_nine);

        assert_eq!(delete_lecture(&mut conn, key).unwrap(), 1);
        assert!(!lecture_exists(&mut conn, key).unwrap());
        assert_eq!(delete_lecture(&mut conn, key).unwrap(), 0);
    }

    #[test]
    fn test_query_lectures_filters() {
        let (mut conn, fx) = setup();

        let all = query_lectures(&mut conn, &LectureFilters::default()).unwrap();
        assert_eq!(all.len(), 4);
        // Monday 09:00 sorts before Monday 10:00 and Wednesday
        assert_eq!(all[0].lecture.key(), LectureKey::new(fx.cs_timetable, fx.monday_nine));

        let turing = query_lectures(
            &mut conn,
            &LectureFilters {
                faculty_id: Some(fx.turing),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(turing.len(), 2);
        assert!(turing.iter().all(|d| d.subject.name == "Algorithms"));

        let section_a = query_lectures(
            &mut conn,
            &LectureFilters {
                section: Some("A".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(section_a.len(), 3);
        assert!(section_a.iter().all(|d| d.timetable.id == fx.cs_timetable));

        let math_2023 = query_lectures(
            &mut conn,
            &LectureFilters {
                course_id: Some(fx.math_course),
                year: Some(2023),
                semester: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(math_2023.len(), 1);
        assert_eq!(math_2023[0].subject.name, "Calculus");

        let nothing = query_lectures(
            &mut conn,
            &LectureFilters {
                room_id: Some(9999),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_lecture_keys_for_faculty() {
        let (mut conn, fx) = setup();
        let mut keys = lecture_keys_for_faculty(&mut conn, fx.hopper).unwrap();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                LectureKey::new(fx.cs_timetable, fx.monday_ten),
                LectureKey::new(fx.math_timetable, fx.monday_nine),
            ]
        );
    }
}
