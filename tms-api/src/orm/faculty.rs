use diesel::prelude::*;

use crate::models::{Faculty, NewFaculty};
use crate::orm::last_insert_rowid;
use crate::schema::faculty;

pub fn insert_faculty(
    conn: &mut SqliteConnection,
    new_faculty: NewFaculty,
) -> Result<Faculty, diesel::result::Error> {
    diesel::insert_into(faculty::table)
        .values(&new_faculty)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    faculty::table
        .filter(faculty::id.eq(last_id))
        .select(Faculty::as_select())
        .first(conn)
}

pub fn get_faculty_by_user_id(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<Faculty>, diesel::result::Error> {
    faculty::table
        .filter(faculty::user_id.eq(user_id))
        .select(Faculty::as_select())
        .first(conn)
        .optional()
}

pub fn get_all_faculty(conn: &mut SqliteConnection) -> Result<Vec<Faculty>, diesel::result::Error> {
    faculty::table
        .order((faculty::last_name.asc(), faculty::first_name.asc()))
        .select(Faculty::as_select())
        .load(conn)
}
