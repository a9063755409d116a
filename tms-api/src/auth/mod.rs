//! Identity resolution and role-priority authorization.
//!
//! A request is authenticated by the token in its cookie, but the user's role
//! is always re-read from the store, so role changes apply to live sessions.

pub mod login;
pub mod token;

use crate::error::{ApiError, AuthError};
use crate::models::{Role, User};
use crate::orm::DbRunner;
use crate::orm::user::get_user_with_role;
use token::TokenKeys;

/// An authenticated user and its current role.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
    pub role: Role,
}

impl Identity {
    /// Passes if the role's priority is at most `required_max_priority`
    /// (lower numbers are more privileged).
    pub fn authorize(self, required_max_priority: i32) -> Result<Self, AuthError> {
        if self.role.satisfies(required_max_priority) {
            Ok(self)
        } else {
            Err(AuthError::InsufficientRole)
        }
    }
}

/// Validates a presented token and loads the user it names.
pub async fn resolve_identity<D: DbRunner>(
    db: &D,
    keys: &TokenKeys,
    token: Option<&str>,
) -> Result<Identity, ApiError> {
    let token = token.ok_or(AuthError::NoSession)?;
    let user_id = keys.validate_token(token)?.user_id()?;

    let found = db.run(move |conn| get_user_with_role(conn, user_id)).await?;
    let (user, role) = found.ok_or(AuthError::InvalidSession)?;

    Ok(Identity { user, role })
}
