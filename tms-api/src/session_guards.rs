//! Request guards that authenticate the session cookie and gate routes by
//! role priority.
//!
//! ```rust,ignore
//! use tms_api::session_guards::FacultyUser;
//!
//! #[get("/1/calendar")]
//! fn calendar(user: FacultyUser) -> String {
//!     format!("{} ({})", user.user.email, user.role.name)
//! }
//! ```
//!
//! A failing guard stores its [`ApiError`] in the request-local cache so the
//! JSON catchers can report the specific reason.

use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::DbConn;
use crate::auth::token::{TOKEN_COOKIE, TokenKeys};
use crate::auth::{Identity, resolve_identity};
use crate::error::ApiError;
use crate::models::{ADMIN_PRIORITY, FACULTY_PRIORITY, Role, User};

/// The error a guard rejected the request with, if any.
pub struct GuardFailure(pub Option<ApiError>);

/// Message recorded by a failing guard for this request.
pub fn guard_failure_message(request: &Request<'_>) -> Option<String> {
    request
        .local_cache(|| GuardFailure(None))
        .0
        .as_ref()
        .map(|e| e.to_string())
}

fn reject<S>(request: &Request<'_>, err: ApiError) -> request::Outcome<S, ApiError> {
    let status = err.status();
    let cached = err.clone();
    request.local_cache(move || GuardFailure(Some(cached)));
    Outcome::Error((status, err))
}

/// Any user holding a valid, unexpired session token.
///
/// - no `auth_token` cookie: 401
/// - bad signature, expired, or user gone: 401
/// - store unavailable: 500
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user: User,
    /// Role as currently stored, never as recorded at login.
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn identity(self) -> Identity {
        Identity {
            user: self.user,
            role: self.role,
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = match request.guard::<DbConn>().await {
            Outcome::Success(db) => db,
            _ => return reject(request, ApiError::Store),
        };

        let Some(keys) = request.rocket().state::<TokenKeys>() else {
            error!("Token keys are not managed; attach token_keys_fairing");
            return reject(request, ApiError::Store);
        };

        let token = request
            .cookies()
            .get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());

        match resolve_identity(&db, keys, token.as_deref()).await {
            Ok(identity) => Outcome::Success(AuthenticatedUser {
                user: identity.user,
                role: identity.role,
            }),
            Err(e) => reject(request, e),
        }
    }
}

/// Defines a guard that admits users whose role priority is at most the
/// given value. Authenticated users below the threshold get 403.
macro_rules! create_priority_guard {
    ($(#[$meta:meta])* $name:ident, $max_priority:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            pub user: User,
            pub role: Role,
        }

        #[rocket::async_trait]
        impl<'r> FromRequest<'r> for $name {
            type Error = ApiError;

            async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
                let auth_user = match AuthenticatedUser::from_request(request).await {
                    Outcome::Success(user) => user,
                    Outcome::Error(e) => return Outcome::Error(e),
                    Outcome::Forward(f) => return Outcome::Forward(f),
                };

                match auth_user.identity().authorize($max_priority) {
                    Ok(identity) => Outcome::Success($name {
                        user: identity.user,
                        role: identity.role,
                    }),
                    Err(e) => reject(request, e.into()),
                }
            }
        }
    };
}

create_priority_guard!(
    /// Admin or above (priority 2 or lower).
    AdminUser,
    ADMIN_PRIORITY
);

create_priority_guard!(
    /// Faculty or above (priority 3 or lower). Students and guests are refused.
    FacultyUser,
    FACULTY_PRIORITY
);
