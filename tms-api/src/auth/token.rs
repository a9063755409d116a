//! Signed, time-bounded session tokens carried in the `auth_token` cookie.
//!
//! Tokens are HS256 JWTs. Nothing is stored server-side: logging out only
//! removes the client's cookie, so a copied token stays valid until `exp`.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rocket::fairing::AdHoc;
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::{Build, Rocket};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::models::User;

pub const TOKEN_COOKIE: &str = "auth_token";

/// Token and cookie lifetime: seven days.
pub const TOKEN_TTL_SECONDS: i64 = 604_800;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidSession)
    }
}

/// HMAC keys for issuing and validating tokens. Managed Rocket state.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Keys from 32 random bytes. Tokens die with the process.
    pub fn generate() -> Self {
        let mut secret = [0u8; 32];
        rand::rng().fill(&mut secret);
        Self::from_secret(&secret)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_token_at(user, Utc::now().timestamp())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_token_at(
        &self,
        user: &User,
        issued_at: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECONDS,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Checks signature and expiry. Any failure is `InvalidSession`.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidSession)
    }
}

fn configured_secret(rocket: &Rocket<Build>) -> Option<String> {
    rocket
        .figment()
        .extract_inner::<String>("token_secret")
        .ok()
        .or_else(|| {
            dotenvy::dotenv().ok();
            std::env::var("TMS_TOKEN_SECRET").ok()
        })
        .filter(|secret| !secret.trim().is_empty())
}

/// Installs [`TokenKeys`] from `token_secret` or `TMS_TOKEN_SECRET`, falling
/// back to a random secret.
pub fn token_keys_fairing() -> AdHoc {
    AdHoc::on_ignite("Token Signing Keys", |rocket| async {
        let keys = match configured_secret(&rocket) {
            Some(secret) => TokenKeys::from_secret(secret.as_bytes()),
            None => {
                warn!(
                    "[token] No token_secret or TMS_TOKEN_SECRET configured; using a random secret. \
                     Sessions will not survive a restart."
                );
                TokenKeys::generate()
            }
        };
        rocket.manage(keys)
    })
}

/// Sets the session cookie for a freshly issued token.
pub fn set_token_cookie(cookies: &CookieJar<'_>, token: &str) {
    let cookie = Cookie::build((TOKEN_COOKIE, token.to_string()))
        .http_only(true)
        .secure(!cfg!(test))
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(rocket::time::Duration::seconds(TOKEN_TTL_SECONDS))
        .build();
    cookies.add(cookie);
}

pub fn clear_token_cookie(cookies: &CookieJar<'_>) {
    cookies.remove(Cookie::build(TOKEN_COOKIE).path("/").build());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user() -> User {
        User {
            id: 42,
            email: "turing@example.com".to_string(),
            password_hash: String::new(),
            role_id: 3,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let keys = TokenKeys::from_secret(b"secret");
        let token = keys.issue_token(&user()).unwrap();

        let claims = keys.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.email, "turing@example.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = TokenKeys::from_secret(b"secret");
        let long_ago = Utc::now().timestamp() - TOKEN_TTL_SECONDS - 5;
        let token = keys.issue_token_at(&user(), long_ago).unwrap();

        assert_eq!(keys.validate_token(&token), Err(AuthError::InvalidSession));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issuer = TokenKeys::from_secret(b"one secret");
        let verifier = TokenKeys::from_secret(b"another secret");
        let token = issuer.issue_token(&user()).unwrap();

        assert_eq!(verifier.validate_token(&token), Err(AuthError::InvalidSession));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let keys = TokenKeys::from_secret(b"secret");
        let token = keys.issue_token(&user()).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = parts[1].chars().rev().collect();
        let tampered = parts.join(".");

        assert_eq!(keys.validate_token(&tampered), Err(AuthError::InvalidSession));
        assert_eq!(keys.validate_token("not-a-token"), Err(AuthError::InvalidSession));
        assert_eq!(keys.validate_token(""), Err(AuthError::InvalidSession));
    }

    #[test]
    fn test_generated_keys_differ() {
        let token = TokenKeys::generate().issue_token(&user()).unwrap();
        assert!(TokenKeys::generate().validate_token(&token).is_err());
    }

    #[test]
    fn test_non_numeric_subject_is_invalid() {
        let claims = Claims {
            sub: "abc".to_string(),
            email: String::new(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(claims.user_id(), Err(AuthError::InvalidSession));
    }
}
