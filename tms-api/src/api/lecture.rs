//! Lecture endpoints. Faculty may read the weekly plan; admins maintain it.

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{Route, delete, get, post, put};

use crate::DbConn;
use crate::api::optional_int;
use crate::error::ApiError;
use crate::logged_json::LoggedJson;
use crate::models::{LectureChanges, LectureDetail, LectureKey, NewLecture};
use crate::orm::lecture::{
    LectureFilters, LectureWriteError, create_lecture, delete_lecture, get_lecture,
    query_lectures, update_lecture,
};
use crate::session_guards::{AdminUser, FacultyUser};

impl From<LectureWriteError> for ApiError {
    fn from(e: LectureWriteError) -> Self {
        match e {
            LectureWriteError::Duplicate => ApiError::conflict(e.to_string()),
            LectureWriteError::NotFound => ApiError::not_found(e.to_string()),
            LectureWriteError::InvalidReference => ApiError::validation(e.to_string()),
            LectureWriteError::Db(db_err) => db_err.into(),
        }
    }
}

fn validate_room(room: &str) -> Result<String, ApiError> {
    let room = room.trim();
    if room.is_empty() {
        return Err(ApiError::validation("Room must not be empty"));
    }
    Ok(room.to_string())
}

/// Lists lectures with their subject, faculty, timeslot and timetable.
///
/// - **URL:** `/api/1/lectures[?course_id=&year=&section=&semester=&faculty_id=&room_id=]`
/// - **Method:** `GET`
/// - **Authentication:** faculty or above
///
/// `year` is the batch entry year and `section` the section name. Results are
/// in weekly order.
#[get("/1/lectures?<course_id>&<year>&<section>&<semester>&<faculty_id>&<room_id>")]
pub async fn list_lectures(
    _user: FacultyUser,
    db: DbConn,
    course_id: Option<&str>,
    year: Option<&str>,
    section: Option<&str>,
    semester: Option<&str>,
    faculty_id: Option<&str>,
    room_id: Option<&str>,
) -> Result<Json<Vec<LectureDetail>>, ApiError> {
    let filters = LectureFilters {
        course_id: optional_int("course_id", course_id)?,
        year: optional_int("year", year)?,
        section: section
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        semester: optional_int("semester", semester)?,
        faculty_id: optional_int("faculty_id", faculty_id)?,
        room_id: optional_int("room_id", room_id)?,
    };

    let lectures = db.run(move |conn| query_lectures(conn, &filters)).await?;
    Ok(Json(lectures))
}

/// Looks up the lecture in one timetable slot.
///
/// - **URL:** `/api/1/lectures/<timetable_id>/<timeslot_id>`
/// - **Method:** `GET`
/// - **Authentication:** faculty or above
///
/// 404 when the slot has no lecture.
#[get("/1/lectures/<timetable_id>/<timeslot_id>")]
pub async fn get_lecture_by_key(
    _user: FacultyUser,
    db: DbConn,
    timetable_id: i32,
    timeslot_id: i32,
) -> Result<Json<LectureDetail>, ApiError> {
    let key = LectureKey::new(timetable_id, timeslot_id);
    db.run(move |conn| get_lecture(conn, key))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Lecture not found"))
}

/// Schedules a lecture in a free timetable slot.
///
/// - **URL:** `/api/1/lectures`
/// - **Method:** `POST`
/// - **Authentication:** admin or above
///
/// ```json
/// { "timetable_id": 2, "timeslot_id": 3, "subject_id": 3, "faculty_id": 2, "room": "R202" }
/// ```
///
/// Returns 201 with the lecture. 409 when the slot is taken, 400 when a
/// referenced row does not exist or the room is blank.
#[post("/1/lectures", data = "<new_lecture>")]
pub async fn create_lecture_endpoint(
    user: AdminUser,
    db: DbConn,
    new_lecture: LoggedJson<NewLecture>,
) -> Result<status::Created<Json<LectureDetail>>, ApiError> {
    let mut new_lecture = new_lecture.into_inner();
    new_lecture.room = validate_room(&new_lecture.room)?;

    let detail = db.run(move |conn| create_lecture(conn, new_lecture)).await?;

    let key = detail.lecture.key();
    info!(
        "Lecture {}/{} created by '{}'",
        key.timetable_id, key.timeslot_id, user.user.email
    );
    let location = format!("/api/1/lectures/{}/{}", key.timetable_id, key.timeslot_id);
    Ok(status::Created::new(location).body(Json(detail)))
}

/// Reassigns the subject, faculty or room of a lecture.
///
/// - **URL:** `/api/1/lectures/<timetable_id>/<timeslot_id>`
/// - **Method:** `PUT`
/// - **Authentication:** admin or above
///
/// ```json
/// { "faculty_id": 1, "room": "R303" }
/// ```
///
/// Omitted fields are left alone; a body with no fields is a 400.
#[put("/1/lectures/<timetable_id>/<timeslot_id>", data = "<changes>")]
pub async fn update_lecture_endpoint(
    user: AdminUser,
    db: DbConn,
    timetable_id: i32,
    timeslot_id: i32,
    changes: LoggedJson<LectureChanges>,
) -> Result<Json<LectureDetail>, ApiError> {
    let mut changes = changes.into_inner();
    if changes.is_empty() {
        return Err(ApiError::validation("No changes specified"));
    }
    if let Some(room) = &changes.room {
        changes.room = Some(validate_room(room)?);
    }

    let key = LectureKey::new(timetable_id, timeslot_id);
    let detail = db
        .run(move |conn| update_lecture(conn, key, &changes))
        .await?;

    info!(
        "Lecture {}/{} updated by '{}'",
        timetable_id, timeslot_id, user.user.email
    );
    Ok(Json(detail))
}

/// Removes a lecture from the plan. Recorded sessions stay in place.
///
/// - **URL:** `/api/1/lectures/<timetable_id>/<timeslot_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** admin or above
#[delete("/1/lectures/<timetable_id>/<timeslot_id>")]
pub async fn delete_lecture_endpoint(
    user: AdminUser,
    db: DbConn,
    timetable_id: i32,
    timeslot_id: i32,
) -> Result<Status, ApiError> {
    let key = LectureKey::new(timetable_id, timeslot_id);
    let removed = db.run(move |conn| delete_lecture(conn, key)).await?;
    if removed == 0 {
        return Err(ApiError::not_found("Lecture not found"));
    }

    info!(
        "Lecture {}/{} deleted by '{}'",
        timetable_id, timeslot_id, user.user.email
    );
    Ok(Status::NoContent)
}

pub fn routes() -> Vec<Route> {
    routes![
        list_lectures,
        get_lecture_by_key,
        create_lecture_endpoint,
        update_lecture_endpoint,
        delete_lecture_endpoint
    ]
}
