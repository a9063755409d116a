//! Calendar endpoints: monthly session summary and a day's lecture roster.

use rocket::serde::json::Json;
use rocket::{Route, get};

use crate::DbConn;
use crate::api::{optional_int, required};
use crate::error::ApiError;
use crate::models::{CalendarFilters, DayRosterResponse, MonthSummaryResponse};
use crate::orm::calendar::{month_bounds, parse_date, roster_for_date, summarize_month};
use crate::session_guards::FacultyUser;

fn filters(
    semester: Option<&str>,
    faculty_id: Option<&str>,
    course_id: Option<&str>,
) -> Result<CalendarFilters, ApiError> {
    Ok(CalendarFilters {
        semester: optional_int("semester", semester)?,
        faculty_id: optional_int("faculty_id", faculty_id)?,
        course_id: optional_int("course_id", course_id)?,
    })
}

/// Monthly summary.
///
/// - **URL:** `/api/1/calendar?month=3&year=2024[&semester=&faculty_id=&course_id=]`
/// - **Method:** `GET`
/// - **Authentication:** faculty or above
///
/// One entry per date that has at least one session, ordered by date:
///
/// ```json
/// { "data": [ { "date": "2024-03-04", "total_held": 2, "total_cancelled": 1, "no_data": 0 } ] }
/// ```
///
/// `month` must be 1-12 and `year` an integer; otherwise 400.
#[get("/1/calendar?<month>&<year>&<semester>&<faculty_id>&<course_id>")]
pub async fn month_summary(
    _user: FacultyUser,
    db: DbConn,
    month: Option<&str>,
    year: Option<&str>,
    semester: Option<&str>,
    faculty_id: Option<&str>,
    course_id: Option<&str>,
) -> Result<Json<MonthSummaryResponse>, ApiError> {
    let month: u32 = required("month", month)?
        .parse()
        .map_err(|_| ApiError::validation("Invalid month parameter"))?;
    let year: i32 = required("year", year)?
        .parse()
        .map_err(|_| ApiError::validation("Invalid year parameter"))?;
    if !(1..=12).contains(&month) {
        return Err(ApiError::validation("Month must be between 1 and 12"));
    }
    if month_bounds(year, month).is_none() {
        return Err(ApiError::validation("Invalid year parameter"));
    }
    let filters = filters(semester, faculty_id, course_id)?;

    let data = db
        .run(move |conn| summarize_month(conn, year, month, &filters))
        .await?;

    Ok(Json(MonthSummaryResponse { data }))
}

/// Day roster.
///
/// - **URL:** `/api/1/calendar/day?date=2024-03-04[&semester=&faculty_id=&course_id=]`
/// - **Method:** `GET`
/// - **Authentication:** faculty or above
///
/// Every lecture scheduled on the date's weekday, ordered by start time then
/// timetable, with the status recorded for that date (`""` when none).
#[get("/1/calendar/day?<date>&<semester>&<faculty_id>&<course_id>")]
pub async fn day_roster(
    _user: FacultyUser,
    db: DbConn,
    date: Option<&str>,
    semester: Option<&str>,
    faculty_id: Option<&str>,
    course_id: Option<&str>,
) -> Result<Json<DayRosterResponse>, ApiError> {
    let date = parse_date(required("date", date)?)
        .ok_or_else(|| ApiError::validation("Invalid date format, expected YYYY-MM-DD"))?;
    let filters = filters(semester, faculty_id, course_id)?;

    let data = db
        .run(move |conn| roster_for_date(conn, date, &filters))
        .await?;

    Ok(Json(DayRosterResponse {
        date: date.format("%Y-%m-%d").to_string(),
        data,
    }))
}

pub fn routes() -> Vec<Route> {
    routes![month_summary, day_roster]
}
