//! Error taxonomy shared by the auth layer and the API handlers.
//!
//! Every error is per-request. Handlers return [`ApiError`], which renders as
//! an HTTP status plus a `{"error": ...}` JSON body. Store errors are logged
//! here and replaced by a generic message before they reach the client.

use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder, status};
use rocket::serde::json::Json;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// Error response structure for API failures.
#[derive(Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Authentication and authorization failures.
///
/// `InvalidCredentials` deliberately carries no detail: unknown accounts and
/// wrong passwords must be indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("No session")]
    NoSession,
    #[error("Invalid session")]
    InvalidSession,
    #[error("Insufficient role")]
    InsufficientRole,
}

impl AuthError {
    pub fn status(&self) -> Status {
        match self {
            AuthError::InvalidCredentials | AuthError::NoSession | AuthError::InvalidSession => {
                Status::Unauthorized
            }
            AuthError::InsufficientRole => Status::Forbidden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Malformed or missing client input.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    NotFound(String),
    /// The write would collide with an existing row.
    #[error("{0}")]
    Conflict(String),
    /// Persistence failure. The cause is logged, never returned.
    #[error("Internal server error")]
    Store,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::Auth(e) => e.status(),
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Conflict(_) => Status::Conflict,
            ApiError::Store => Status::InternalServerError,
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        error!("Database error: {:?}", e);
        ApiError::Store
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        status::Custom(self.status(), body).respond_to(req)
    }
}
