//! Inserts for the static scheduling entities.
//!
//! The timetable plan is maintained administratively; these functions are the
//! write side used by fixtures and by `tms-admin`.

use diesel::prelude::*;

use crate::models::{
    Batch, Course, Lecture, NewBatch, NewCourse, NewLecture, NewRoom, NewSection, NewSubject,
    NewTimeslot, NewTimetable, Room, Section, Subject, Timeslot, Timetable,
};
use crate::orm::last_insert_rowid;
use crate::schema::{batches, courses, lectures, rooms, sections, subjects, timeslots, timetables};

pub fn insert_course(
    conn: &mut SqliteConnection,
    new_course: NewCourse,
) -> Result<Course, diesel::result::Error> {
    diesel::insert_into(courses::table)
        .values(&new_course)
        .execute(conn)?;
    let last_id = last_insert_rowid(conn)?;
    courses::table
        .filter(courses::id.eq(last_id))
        .select(Course::as_select())
        .first(conn)
}

pub fn insert_subject(
    conn: &mut SqliteConnection,
    new_subject: NewSubject,
) -> Result<Subject, diesel::result::Error> {
    diesel::insert_into(subjects::table)
        .values(&new_subject)
        .execute(conn)?;
    let last_id = last_insert_rowid(conn)?;
    subjects::table
        .filter(subjects::id.eq(last_id))
        .select(Subject::as_select())
        .first(conn)
}

pub fn insert_batch(
    conn: &mut SqliteConnection,
    new_batch: NewBatch,
) -> Result<Batch, diesel::result::Error> {
    diesel::insert_into(batches::table)
        .values(&new_batch)
        .execute(conn)?;
    let last_id = last_insert_rowid(conn)?;
    batches::table
        .filter(batches::id.eq(last_id))
        .select(Batch::as_select())
        .first(conn)
}

pub fn insert_section(
    conn: &mut SqliteConnection,
    new_section: NewSection,
) -> Result<Section, diesel::result::Error> {
    diesel::insert_into(sections::table)
        .values(&new_section)
        .execute(conn)?;
    let last_id = last_insert_rowid(conn)?;
    sections::table
        .filter(sections::id.eq(last_id))
        .select(Section::as_select())
        .first(conn)
}

pub fn insert_room(
    conn: &mut SqliteConnection,
    new_room: NewRoom,
) -> Result<Room, diesel::result::Error> {
    diesel::insert_into(rooms::table)
        .values(&new_room)
        .execute(conn)?;
    let last_id = last_insert_rowid(conn)?;
    rooms::table
        .filter(rooms::id.eq(last_id))
        .select(Room::as_select())
        .first(conn)
}

pub fn insert_timetable(
    conn: &mut SqliteConnection,
    new_timetable: NewTimetable,
) -> Result<Timetable, diesel::result::Error> {
    diesel::insert_into(timetables::table)
        .values(&new_timetable)
        .execute(conn)?;
    let last_id = last_insert_rowid(conn)?;
    timetables::table
        .filter(timetables::id.eq(last_id))
        .select(Timetable::as_select())
        .first(conn)
}

pub fn insert_timeslot(
    conn: &mut SqliteConnection,
    new_timeslot: NewTimeslot,
) -> Result<Timeslot, diesel::result::Error> {
    diesel::insert_into(timeslots::table)
        .values(&new_timeslot)
        .execute(conn)?;
    let last_id = last_insert_rowid(conn)?;
    timeslots::table
        .filter(timeslots::id.eq(last_id))
        .select(Timeslot::as_select())
        .first(conn)
}

/// Inserts a lecture. Fails with a unique violation if the
/// `(timetable_id, timeslot_id)` pair is already taken.
pub fn insert_lecture(
    conn: &mut SqliteConnection,
    new_lecture: NewLecture,
) -> Result<Lecture, diesel::result::Error> {
    diesel::insert_into(lectures::table)
        .values(&new_lecture)
        .execute(conn)?;
    lectures::table
        .find((new_lecture.timetable_id, new_lecture.timeslot_id))
        .select(Lecture::as_select())
        .first(conn)
}
