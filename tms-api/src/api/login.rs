//! Login, logout and session validation endpoints.

use rocket::State;
use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket::{Route, get, post};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::DbConn;
use crate::auth::login::process_login;
use crate::auth::resolve_identity;
use crate::auth::token::{TOKEN_COOKIE, TokenKeys, clear_token_cookie};
use crate::error::ApiError;
use crate::logged_json::LoggedJson;
use crate::models::FACULTY_PRIORITY;

/// Credentials posted to `/api/1/login`. `email` and `password` are accepted
/// as aliases.
#[derive(Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default, alias = "email")]
    pub identifier: String,
    #[serde(default, alias = "password")]
    pub secret: String,
}

#[derive(Serialize, TS)]
#[ts(export)]
pub struct LoginSuccessResponse {
    pub message: String,
    pub identifier: String,
    pub role: String,
}

#[derive(Serialize, TS)]
#[ts(export)]
pub struct SessionValidResponse {
    pub message: String,
    pub role: String,
}

#[derive(Serialize, TS)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

/// Login endpoint.
///
/// - **URL:** `/api/1/login`
/// - **Method:** `POST`
/// - **Authentication:** None required
///
/// ```json
/// { "identifier": "turing@example.com", "secret": "facultypass" }
/// ```
///
/// On success sets the `auth_token` cookie (HttpOnly, Secure, SameSite=Lax,
/// seven days) and returns:
///
/// ```json
/// { "message": "Login Successful", "identifier": "turing@example.com", "role": "faculty" }
/// ```
///
/// Empty fields are a 400. Unknown account or wrong secret is a 401 with
/// `{"error": "Invalid credentials"}` either way.
#[post("/1/login", data = "<login>")]
pub async fn login(
    db: DbConn,
    cookies: &CookieJar<'_>,
    keys: &State<TokenKeys>,
    login: LoggedJson<LoginRequest>,
) -> Result<Json<LoginSuccessResponse>, ApiError> {
    let login = login.into_inner();
    let identity = process_login(&db, cookies, keys.inner(), &login.identifier, &login.secret).await?;

    Ok(Json(LoginSuccessResponse {
        message: "Login Successful".to_string(),
        identifier: identity.user.email,
        role: identity.role.name,
    }))
}

/// Session validation endpoint.
///
/// - **URL:** `/api/1/session/validate`
/// - **Method:** `GET`
/// - **Authentication:** session cookie, faculty or above
///
/// Responses: 200 `{"message": "Session is valid", "role": ...}`; 404 when no
/// cookie is present; 401 for a bad or expired token; 403 below faculty.
#[get("/1/session/validate")]
pub async fn validate_session(
    db: DbConn,
    cookies: &CookieJar<'_>,
    keys: &State<TokenKeys>,
) -> Result<Json<SessionValidResponse>, ApiError> {
    let token = cookies
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|value| !value.is_empty());
    let Some(token) = token else {
        return Err(ApiError::not_found("Cookie not present"));
    };

    let identity = resolve_identity(&db, keys.inner(), Some(token.as_str()))
        .await?
        .authorize(FACULTY_PRIORITY)?;

    Ok(Json(SessionValidResponse {
        message: "Session is valid".to_string(),
        role: identity.role.name,
    }))
}

/// Logout endpoint.
///
/// - **URL:** `/api/1/logout`
/// - **Method:** `POST`
///
/// Removes the session cookie. Always succeeds, with or without a session.
#[post("/1/logout")]
pub fn logout(cookies: &CookieJar<'_>) -> Json<MessageResponse> {
    clear_token_cookie(cookies);
    Json(MessageResponse {
        message: "Logout successful".to_string(),
    })
}

pub fn routes() -> Vec<Route> {
    routes![login, validate_session, logout]
}
