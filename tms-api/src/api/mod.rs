pub mod attendance;
pub mod calendar;
pub mod lecture;
pub mod login;
pub mod status;

use rocket::Route;

use crate::error::ApiError;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(attendance::routes());
    routes.extend(calendar::routes());
    routes.extend(lecture::routes());
    routes.extend(login::routes());
    routes.extend(status::routes());
    routes
}

/// Parses an optional integer query parameter. Absent or empty means "no
/// filter"; anything else must be a valid integer.
pub(crate) fn optional_int(name: &str, raw: Option<&str>) -> Result<Option<i32>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::validation(format!("Invalid {} parameter", name))),
    }
}

/// A query parameter that must be present and non-empty.
pub(crate) fn required<'a>(name: &str, raw: Option<&'a str>) -> Result<&'a str, ApiError> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::validation(format!("Missing {} parameter", name))),
    }
}
