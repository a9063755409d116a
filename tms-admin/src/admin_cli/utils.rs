use diesel::{prelude::*, sqlite::SqliteConnection};
use dotenvy::dotenv;
use regex::Regex;
use tms_api::models::{Role, User};
use tms_api::orm::role::get_role_by_name;
use tms_api::orm::set_foreign_keys;
use tms_api::orm::user::get_user_by_email;

pub fn establish_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let mut conn = SqliteConnection::establish(&database_url)?;
    set_foreign_keys(&mut conn);
    Ok(conn)
}

/// Search filter shared by the `ls` commands.
pub enum Matcher {
    All,
    Fixed(String),
    Pattern(Regex),
}

impl Matcher {
    /// Builds a matcher from an optional search term. The term is a regex
    /// unless `fixed_string` is set.
    pub fn new(
        search_term: Option<String>,
        fixed_string: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        match search_term {
            None => Ok(Matcher::All),
            Some(term) if fixed_string => Ok(Matcher::Fixed(term)),
            Some(term) => {
                let regex =
                    Regex::new(&term).map_err(|e| format!("Invalid regex '{}': {}", term, e))?;
                Ok(Matcher::Pattern(regex))
            }
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Fixed(term) => haystack.contains(term.as_str()),
            Matcher::Pattern(regex) => regex.is_match(haystack),
        }
    }
}

pub fn require_user(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<User, Box<dyn std::error::Error>> {
    get_user_by_email(conn, email)?
        .ok_or_else(|| format!("User with email '{}' not found", email).into())
}

pub fn require_role(
    conn: &mut SqliteConnection,
    role_name: &str,
) -> Result<Role, Box<dyn std::error::Error>> {
    get_role_by_name(conn, role_name)?
        .ok_or_else(|| format!("Role '{}' does not exist", role_name).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tms_api::orm::testing::setup_test_db;

    #[test]
    fn test_matcher() {
        let all = Matcher::new(None, false).unwrap();
        assert!(all.is_match("anything"));

        let fixed = Matcher::new(Some("a.b".to_string()), true).unwrap();
        assert!(fixed.is_match("xa.by"));
        assert!(!fixed.is_match("axb"));

        let pattern = Matcher::new(Some("^fac".to_string()), false).unwrap();
        assert!(pattern.is_match("faculty"));
        assert!(!pattern.is_match("superadmin"));

        assert!(Matcher::new(Some("(".to_string()), false).is_err());
    }

    #[test]
    fn test_require_role() {
        let mut conn = setup_test_db();
        assert_eq!(require_role(&mut conn, "faculty").unwrap().name, "faculty");
        let err = require_role(&mut conn, "janitor").unwrap_err();
        assert_eq!(err.to_string(), "Role 'janitor' does not exist");
    }

    #[test]
    fn test_require_user_missing() {
        let mut conn = setup_test_db();
        let err = require_user(&mut conn, "nobody@example.com").unwrap_err();
        assert_eq!(err.to_string(), "User with email 'nobody@example.com' not found");
    }
}
