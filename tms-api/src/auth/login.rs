//! Credential checks and the login workflow.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;
use rocket::http::CookieJar;

use crate::auth::Identity;
use crate::auth::token::{TokenKeys, set_token_cookie};
use crate::error::{ApiError, AuthError};
use crate::orm::DbRunner;
use crate::orm::user::get_user_with_role_by_email;

/// Verified against when the identifier is unknown, so that a miss costs
/// the same as a wrong password.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| hash_password("not-a-real-account"));

/// Hashes a password with Argon2 default parameters and a random salt.
///
/// Returns a PHC string suitable for `users.password_hash`.
pub fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Hashing should succeed")
        .to_string()
}

/// Returns true if `password` matches the stored PHC hash.
///
/// A stored value that does not parse as a PHC string never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// Resolves an identifier/secret pair to the user and its role.
///
/// Unknown identifier, wrong secret and corrupt stored hash are all reported
/// as [`AuthError::InvalidCredentials`].
pub async fn authenticate<D: DbRunner>(
    db: &D,
    identifier: &str,
    secret: &str,
) -> Result<Identity, ApiError> {
    if identifier.trim().is_empty() || secret.trim().is_empty() {
        return Err(ApiError::validation("Identifier and secret are required"));
    }

    let email = identifier.trim().to_string();
    let found = db
        .run(move |conn| get_user_with_role_by_email(conn, &email))
        .await?;

    let Some((user, role)) = found else {
        verify_password(secret, &DUMMY_HASH);
        return Err(AuthError::InvalidCredentials.into());
    };

    if !verify_password(secret, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(Identity { user, role })
}

/// Authenticates, issues a token and sets it as the session cookie.
pub async fn process_login<D: DbRunner>(
    db: &D,
    cookies: &CookieJar<'_>,
    keys: &TokenKeys,
    identifier: &str,
    secret: &str,
) -> Result<Identity, ApiError> {
    let identity = authenticate(db, identifier, secret).await?;

    let token = keys.issue_token(&identity.user).map_err(|e| {
        error!("Failed to sign session token: {}", e);
        ApiError::Store
    })?;
    set_token_cookie(cookies, &token);

    info!("User '{}' logged in", identity.user.email);
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::orm::role::get_role_by_name;
    use crate::orm::testing::{setup_test_db, setup_test_dbconn};
    use crate::orm::user::insert_user;
    use diesel::SqliteConnection;

    fn insert_account(conn: &mut SqliteConnection, email: &str, password_hash: String) {
        let role = get_role_by_name(conn, "faculty").unwrap().unwrap();
        insert_user(
            conn,
            NewUser {
                email: email.to_string(),
                password_hash,
                role_id: role.id,
            },
        )
        .expect("insert user");
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct_password");

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct_password", &hash));
        assert!(!verify_password("wrong_password", &hash));
        assert!(!verify_password("correct_password", "not a phc string"));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut conn = setup_test_db();
        insert_account(&mut conn, "ada@example.com", hash_password("secret"));
        let fake_db = setup_test_dbconn(&mut conn);

        let identity = authenticate(&fake_db, "ada@example.com", "secret")
            .await
            .expect("login should succeed");
        assert_eq!(identity.user.email, "ada@example.com");
        assert_eq!(identity.role.name, "faculty");
        assert_eq!(identity.role.level_priority, 3);
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_indistinguishable() {
        let mut conn = setup_test_db();
        insert_account(&mut conn, "ada@example.com", hash_password("secret"));
        insert_account(&mut conn, "corrupt@example.com", "garbage".to_string());
        let fake_db = setup_test_dbconn(&mut conn);

        let wrong_secret = authenticate(&fake_db, "ada@example.com", "nope").await;
        let unknown = authenticate(&fake_db, "nobody@example.com", "secret").await;
        let corrupt = authenticate(&fake_db, "corrupt@example.com", "garbage").await;

        for result in [wrong_secret, unknown, corrupt] {
            let err = result.expect_err("login should fail");
            assert_eq!(err, ApiError::Auth(AuthError::InvalidCredentials));
            assert_eq!(err.to_string(), "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_authenticate_requires_both_fields() {
        let mut conn = setup_test_db();
        let fake_db = setup_test_dbconn(&mut conn);

        for (identifier, secret) in [("", "secret"), ("ada@example.com", ""), ("  ", "  ")] {
            let err = authenticate(&fake_db, identifier, secret)
                .await
                .expect_err("empty input should fail");
            assert!(matches!(err, ApiError::Validation(_)));
        }
    }
}
