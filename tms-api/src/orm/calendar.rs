//! Reconciles the weekly lecture plan with dated session records.
//!
//! Two read paths live here. The month summary is session-driven: it counts
//! what was recorded and never consults lectures except to apply the faculty
//! filter. The day roster is lecture-driven: every lecture scheduled on the
//! date's weekday yields a row, and a session on that date (if any) supplies
//! its status. Sessions whose pair has no lecture are dropped from rosters.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use diesel::prelude::*;

use crate::models::{
    CalendarFilters, DaySummary, Lecture, LectureKey, RosterRow, Session, SessionStatus,
    Timeslot, Timetable, day_of_week, format_hhmm,
};
use crate::orm::lecture::lecture_keys_for_faculty;
use crate::orm::session::sessions_on_date;
use crate::schema::{
    batches, courses, faculty, lectures, sections, sessions, subjects, timeslots, timetables,
};

/// First and last day of a month, or `None` if the month does not exist.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Per-date held/cancelled/no-data counts for the sessions of one month.
///
/// Dates without any session are absent. The result is ordered by date.
pub fn summarize_month(
    conn: &mut SqliteConnection,
    year: i32,
    month: u32,
    filters: &CalendarFilters,
) -> Result<Vec<DaySummary>, diesel::result::Error> {
    let Some((first, last)) = month_bounds(year, month) else {
        return Ok(Vec::new());
    };

    let mut query = sessions::table
        .inner_join(timetables::table)
        .filter(sessions::date.between(first, last))
        .select(Session::as_select())
        .into_boxed();

    if let Some(semester) = filters.semester {
        query = query.filter(timetables::semester.eq(semester));
    }
    if let Some(course_id) = filters.course_id {
        query = query.filter(timetables::course_id.eq(course_id));
    }

    let mut month_sessions = query.load::<Session>(conn)?;

    if let Some(faculty_id) = filters.faculty_id {
        let taught: HashSet<LectureKey> = lecture_keys_for_faculty(conn, faculty_id)?
            .into_iter()
            .collect();
        month_sessions.retain(|s| taught.contains(&s.key()));
    }

    Ok(tally_by_date(&month_sessions))
}

#[derive(Default)]
struct DayCounts {
    held: i64,
    cancelled: i64,
    no_data: i64,
}

/// Groups sessions by date and counts them by status.
pub fn tally_by_date(sessions: &[Session]) -> Vec<DaySummary> {
    let mut days: BTreeMap<NaiveDate, DayCounts> = BTreeMap::new();

    for session in sessions {
        let counts = days.entry(session.date).or_default();
        match session.parsed_status() {
            Some(SessionStatus::Held) => counts.held += 1,
            Some(SessionStatus::Cancelled) => counts.cancelled += 1,
            None => counts.no_data += 1,
        }
    }

    days.into_iter()
        .map(|(date, counts)| DaySummary {
            date: date.format("%Y-%m-%d").to_string(),
            total_held: counts.held,
            total_cancelled: counts.cancelled,
            no_data: counts.no_data,
        })
        .collect()
}

/// A lecture on the roster's weekday with the display fields it needs.
#[derive(Debug, Clone)]
pub struct ScheduledLecture {
    pub lecture: Lecture,
    pub timeslot: Timeslot,
    pub timetable: Timetable,
    pub subject: String,
    pub faculty: String,
    pub batch_year: i32,
    pub section: Option<String>,
    pub course_name: String,
}

type ScheduledRow = (
    Lecture,
    Timeslot,
    Timetable,
    String,
    String,
    String,
    i32,
    Option<String>,
    String,
);

/// Lectures whose timeslot falls on `weekday`, narrowed by `filters`,
/// ordered by start time then timetable.
pub fn lectures_on_weekday(
    conn: &mut SqliteConnection,
    weekday: i32,
    filters: &CalendarFilters,
) -> Result<Vec<ScheduledLecture>, diesel::result::Error> {
    let mut query = lectures::table
        .inner_join(timeslots::table)
        .inner_join(subjects::table)
        .inner_join(faculty::table)
        .inner_join(
            timetables::table
                .inner_join(courses::table)
                .inner_join(batches::table)
                .left_join(sections::table),
        )
        .filter(timeslots::day_of_week.eq(weekday))
        .select((
            Lecture::as_select(),
            Timeslot::as_select(),
            Timetable::as_select(),
            subjects::name,
            faculty::first_name,
            faculty::last_name,
            batches::entry_year,
            sections::name.nullable(),
            courses::name,
        ))
        .into_boxed();

    if let Some(semester) = filters.semester {
        query = query.filter(timetables::semester.eq(semester));
    }
    if let Some(course_id) = filters.course_id {
        query = query.filter(timetables::course_id.eq(course_id));
    }
    if let Some(faculty_id) = filters.faculty_id {
        query = query.filter(lectures::faculty_id.eq(faculty_id));
    }

    let rows = query
        .order((timeslots::start_time.asc(), lectures::timetable_id.asc()))
        .load::<ScheduledRow>(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(lecture, timeslot, timetable, subject, first, last, batch_year, section, course)| {
                ScheduledLecture {
                    lecture,
                    timeslot,
                    timetable,
                    subject,
                    faculty: format!("{} {}", first, last),
                    batch_year,
                    section,
                    course_name: course,
                }
            },
        )
        .collect())
}

/// Every lecture scheduled on `date`, with the status recorded for that date.
pub fn roster_for_date(
    conn: &mut SqliteConnection,
    date: NaiveDate,
    filters: &CalendarFilters,
) -> Result<Vec<RosterRow>, diesel::result::Error> {
    let scheduled = lectures_on_weekday(conn, day_of_week(date), filters)?;
    if scheduled.is_empty() {
        return Ok(Vec::new());
    }
    let recorded = sessions_on_date(conn, date)?;
    Ok(merge_roster(scheduled, recorded))
}

/// Left-joins sessions onto scheduled lectures by [`LectureKey`].
///
/// Lecture order is preserved. Sessions with no matching lecture are ignored.
pub fn merge_roster(scheduled: Vec<ScheduledLecture>, recorded: Vec<Session>) -> Vec<RosterRow> {
    let by_key: HashMap<LectureKey, Session> =
        recorded.into_iter().map(|s| (s.key(), s)).collect();

    scheduled
        .into_iter()
        .map(|item| {
            let session = by_key.get(&item.lecture.key());
            RosterRow {
                timetable_id: item.lecture.timetable_id,
                timeslot_id: item.lecture.timeslot_id,
                session_id: session.map(|s| s.id),
                subject: item.subject,
                faculty: item.faculty,
                start_time: format_hhmm(item.timeslot.start_time),
                end_time: format_hhmm(item.timeslot.end_time),
                status: session.map(|s| s.status.clone()).unwrap_or_default(),
                semester: item.timetable.semester,
                room: item.lecture.room,
                batch_year: item.batch_year,
                batch_section: item.section.unwrap_or_default(),
                course_name: item.course_name,
            }
        })
        .collect()
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()?;
    // chrono accepts years beyond four digits
    (1..=9999).contains(&date.year()).then_some(date)
}
