//! Marking lectures held or cancelled, and notes on those sessions.

use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{Route, get, post, put};

use crate::DbConn;
use crate::error::ApiError;
use crate::logged_json::LoggedJson;
use crate::models::{
    LectureKey, MarkSessionRequest, NewSessionNote, Session, SessionNote, SessionNoteInput,
    SessionStatus,
};
use crate::orm::session::{
    MarkSessionError, get_session, insert_session_note, list_session_notes, mark_session,
};
use crate::session_guards::FacultyUser;

impl From<MarkSessionError> for ApiError {
    fn from(e: MarkSessionError) -> Self {
        match e {
            MarkSessionError::LectureNotFound => ApiError::not_found(e.to_string()),
            MarkSessionError::WrongWeekday { .. } => ApiError::validation(e.to_string()),
            MarkSessionError::Db(db_err) => db_err.into(),
        }
    }
}

/// Records whether a lecture was held or cancelled on a date.
///
/// - **URL:** `/api/1/sessions`
/// - **Method:** `PUT`
/// - **Authentication:** faculty or above
///
/// ```json
/// { "timetable_id": 1, "timeslot_id": 1, "date": "2024-03-11", "status": "held" }
/// ```
///
/// Marking the same lecture and date again replaces the status. Errors: 400
/// for a status other than `held`/`cancelled` or a date on the wrong weekday,
/// 404 when the slot has no lecture.
#[put("/1/sessions", data = "<request>")]
pub async fn mark(
    user: FacultyUser,
    db: DbConn,
    request: LoggedJson<MarkSessionRequest>,
) -> Result<Json<Session>, ApiError> {
    let request = request.into_inner();
    let status = SessionStatus::parse(request.status.trim())
        .ok_or_else(|| ApiError::validation("Status must be 'held' or 'cancelled'"))?;
    let key = LectureKey::new(request.timetable_id, request.timeslot_id);
    let date = request.date;

    let session = db
        .run(move |conn| mark_session(conn, key, date, status))
        .await?;

    info!(
        "Session {} marked {} by '{}'",
        session.id, session.status, user.user.email
    );
    Ok(Json(session))
}

/// Lists notes on a session, oldest first.
///
/// - **URL:** `/api/1/sessions/<session_id>/notes`
/// - **Method:** `GET`
/// - **Authentication:** faculty or above
#[get("/1/sessions/<session_id>/notes")]
pub async fn list_notes(
    _user: FacultyUser,
    db: DbConn,
    session_id: i32,
) -> Result<Json<Vec<SessionNote>>, ApiError> {
    let notes = db
        .run(move |conn| -> Result<Option<Vec<SessionNote>>, diesel::result::Error> {
            match get_session(conn, session_id)? {
                Some(_) => list_session_notes(conn, session_id).map(Some),
                None => Ok(None),
            }
        })
        .await?;

    notes
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Session not found"))
}

/// Adds a note to a session, attributed to the caller.
///
/// - **URL:** `/api/1/sessions/<session_id>/notes`
/// - **Method:** `POST`
/// - **Authentication:** faculty or above
///
/// ```json
/// { "notes": "Covered dynamic programming" }
/// ```
///
/// Returns 201 with the stored note; 400 for an empty note; 404 for an
/// unknown session.
#[post("/1/sessions/<session_id>/notes", data = "<input>")]
pub async fn add_note(
    user: FacultyUser,
    db: DbConn,
    session_id: i32,
    input: LoggedJson<SessionNoteInput>,
) -> Result<status::Created<Json<SessionNote>>, ApiError> {
    let notes = input.into_inner().notes.trim().to_string();
    if notes.is_empty() {
        return Err(ApiError::validation("Note must not be empty"));
    }

    let new_note = NewSessionNote {
        session_id,
        entered_by: user.user.id,
        notes,
    };
    let note = db
        .run(move |conn| -> Result<Option<SessionNote>, diesel::result::Error> {
            match get_session(conn, session_id)? {
                Some(_) => insert_session_note(conn, new_note).map(Some),
                None => Ok(None),
            }
        })
        .await?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    let location = format!("/api/1/sessions/{}/notes", session_id);
    Ok(status::Created::new(location).body(Json(note)))
}

pub fn routes() -> Vec<Route> {
    routes![mark, list_notes, add_note]
}
