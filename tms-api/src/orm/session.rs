//! Session records: the per-date status of a lecture, and notes on them.

use chrono::NaiveDate;
use diesel::prelude::*;
use thiserror::Error;

use crate::models::{
    LectureKey, NewSession, NewSessionNote, Session, SessionNote, SessionStatus, day_of_week,
};
use crate::orm::last_insert_rowid;
use crate::schema::{lectures, session_notes, sessions, timeslots};

/// Why a session could not be marked.
#[derive(Debug, Error)]
pub enum MarkSessionError {
    #[error("Lecture not found")]
    LectureNotFound,
    #[error("Date {date} does not fall on the lecture's weekday")]
    WrongWeekday { date: NaiveDate },
    #[error(transparent)]
    Db(#[from] diesel::result::Error),
}

pub fn get_session(
    conn: &mut SqliteConnection,
    session_id: i32,
) -> Result<Option<Session>, diesel::result::Error> {
    sessions::table
        .find(session_id)
        .select(Session::as_select())
        .first(conn)
        .optional()
}

/// Every session recorded on `date`, orphans included.
pub fn sessions_on_date(
    conn: &mut SqliteConnection,
    date: NaiveDate,
) -> Result<Vec<Session>, diesel::result::Error> {
    sessions::table
        .filter(sessions::date.eq(date))
        .select(Session::as_select())
        .load(conn)
}

/// Records `status` for a lecture on `date`, creating the session if needed.
///
/// The lecture lookup, weekday check and upsert share one transaction, so a
/// concurrent mark of the same triple cannot produce a duplicate row.
pub fn mark_session(
    conn: &mut SqliteConnection,
    key: LectureKey,
    date: NaiveDate,
    status: SessionStatus,
) -> Result<Session, MarkSessionError> {
    conn.transaction(|conn| {
        let lecture_day = lectures::table
            .inner_join(timeslots::table)
            .filter(lectures::timetable_id.eq(key.timetable_id))
            .filter(lectures::timeslot_id.eq(key.timeslot_id))
            .select(timeslots::day_of_week)
            .first::<i32>(conn)
            .optional()?
            .ok_or(MarkSessionError::LectureNotFound)?;

        if day_of_week(date) != lecture_day {
            return Err(MarkSessionError::WrongWeekday { date });
        }

        let new_session = NewSession {
            timetable_id: key.timetable_id,
            timeslot_id: key.timeslot_id,
            date,
            status: status.as_str().to_string(),
        };

        diesel::insert_into(sessions::table)
            .values(&new_session)
            .on_conflict((sessions::timetable_id, sessions::timeslot_id, sessions::date))
            .do_update()
            .set(sessions::status.eq(status.as_str()))
            .execute(conn)?;

        let session = sessions::table
            .filter(sessions::timetable_id.eq(key.timetable_id))
            .filter(sessions::timeslot_id.eq(key.timeslot_id))
            .filter(sessions::date.eq(date))
            .select(Session::as_select())
            .first(conn)?;

        Ok(session)
    })
}

pub fn insert_session_note(
    conn: &mut SqliteConnection,
    new_note: NewSessionNote,
) -> Result<SessionNote, diesel::result::Error> {
    conn.transaction(|conn| {
        diesel::insert_into(session_notes::table)
            .values(&new_note)
            .execute(conn)?;

        let last_id = last_insert_rowid(conn)?;
        session_notes::table
            .filter(session_notes::id.eq(last_id))
            .select(SessionNote::as_select())
            .first(conn)
    })
}

/// Notes for a session, oldest first.
pub fn list_session_notes(
    conn: &mut SqliteConnection,
    session_id: i32,
) -> Result<Vec<SessionNote>, diesel::result::Error> {
    session_notes::table
        .filter(session_notes::session_id.eq(session_id))
        .order((session_notes::created_at.asc(), session_notes::id.asc()))
        .select(SessionNote::as_select())
        .load(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{create_schedule_fixture, setup_test_db};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_mark_session_creates_then_updates() {
        let mut conn = setup_test_db();
        let fx = create_schedule_fixture(&mut conn).unwrap();
        let key = LectureKey::new(fx.cs_timetable, fx.monday_nine);

        let first = mark_session(&mut conn, key, date("2024-03-11"), SessionStatus::Held).unwrap();
        assert_eq!(first.status, "held");

        let second =
            mark_session(&mut conn, key, date("2024-03-11"), SessionStatus::Cancelled).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.status, "cancelled");

        let count: i64 = sessions::table
            .filter(sessions::date.eq(date("2024-03-11")))
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_mark_session_requires_lecture() {
        let mut conn = setup_test_db();
        let fx = create_schedule_fixture(&mut conn).unwrap();

        let result = mark_session(
            &mut conn,
            LectureKey::new(fx.math_timetable, fx.wednesday_nine),
            date("2024-03-13"),
            SessionStatus::Held,
        );
        assert!(matches!(result, Err(MarkSessionError::LectureNotFound)));
    }

    #[test]
    fn test_mark_session_rejects_wrong_weekday() {
        let mut conn = setup_test_db();
        let fx = create_schedule_fixture(&mut conn).unwrap();

        // 2024-03-12 is a Tuesday; the slot is on Mondays
        let result = mark_session(
            &mut conn,
            LectureKey::new(fx.cs_timetable, fx.monday_nine),
            date("2024-03-12"),
            SessionStatus::Held,
        );
        assert!(matches!(result, Err(MarkSessionError::WrongWeekday { .. })));
        assert!(sessions_on_date(&mut conn, date("2024-03-12")).unwrap().is_empty());
    }

    #[test]
    fn test_session_notes_roundtrip_in_order() {
        let mut conn = setup_test_db();
        let fx = create_schedule_fixture(&mut conn).unwrap();
        let session = mark_session(
            &mut conn,
            LectureKey::new(fx.cs_timetable, fx.monday_ten),
            date("2024-03-18"),
            SessionStatus::Held,
        )
        .unwrap();

        for text in ["Covered paging", "Quiz postponed"] {
            insert_session_note(
                &mut conn,
                NewSessionNote {
                    session_id: session.id,
                    entered_by: fx.hopper_user,
                    notes: text.to_string(),
                },
            )
            .unwrap();
        }

        let notes = list_session_notes(&mut conn, session.id).unwrap();
        let texts: Vec<&str> = notes.iter().map(|n| n.notes.as_str()).collect();
        assert_eq!(texts, vec!["Covered paging", "Quiz postponed"]);
        assert!(notes.iter().all(|n| n.entered_by == fx.hopper_user));
    }

    #[test]
    fn test_note_for_unknown_session_violates_foreign_key() {
        let mut conn = setup_test_db();
        let fx = create_schedule_fixture(&mut conn).unwrap();

        let result = insert_session_note(
            &mut conn,
            NewSessionNote {
                session_id: 9999,
                entered_by: fx.turing_user,
                notes: "orphan".to_string(),
            },
        );
        assert!(result.is_err());
    }
}
