use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use rpassword::read_password;
use std::io::{self, Write};
use tms_api::auth::login::hash_password;
use tms_api::models::{NewUser, Role, User};
use tms_api::orm::user::{
    get_user_by_email, insert_user, list_users_with_roles, update_user_password, update_user_role,
};

use super::utils::{Matcher, require_role, require_user};

#[derive(Subcommand)]
pub enum UserAction {
    #[command(about = "Add a new user")]
    Add {
        #[arg(short, long, help = "Email address")]
        email: String,
        #[arg(
            short,
            long,
            help = "Password (will be prompted securely if not provided)"
        )]
        password: Option<String>,
        #[arg(short, long, default_value = "faculty", help = "Role name")]
        role: String,
    },
    #[command(about = "List users, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
    },
    #[command(about = "Change the role of a user")]
    SetRole {
        #[arg(short, long, help = "User email address")]
        email: String,
        #[arg(short, long, help = "Role name")]
        role: String,
    },
    #[command(about = "Change user password")]
    Passwd {
        #[arg(short, long, help = "Email address")]
        email: String,
        #[arg(
            short,
            long,
            help = "New password (will be prompted securely if not provided)"
        )]
        password: Option<String>,
    },
}

pub fn handle_user_command_with_conn(
    conn: &mut SqliteConnection,
    action: UserAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserAction::Add {
            email,
            password,
            role,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt_for_password()?,
            };
            let (user, role) = add_user_impl(conn, &email, &password, &role)?;
            println!("User created successfully!");
            println!("  ID: {}", user.id);
            println!("  Email: {}", user.email);
            println!("  Role: {}", role.name);
        }
        UserAction::Ls {
            search_term,
            fixed_string,
        } => {
            let users = find_users(conn, search_term, fixed_string)?;
            if users.is_empty() {
                println!("No users found.");
            } else {
                println!("Users:");
                for (user, role) in users {
                    println!(
                        "  ID: {}, Email: {}, Role: {}, Created: {}",
                        user.id, user.email, role.name, user.created_at
                    );
                }
            }
        }
        UserAction::SetRole { email, role } => {
            let role = set_role_impl(conn, &email, &role)?;
            println!("Role of {} set to {}", email, role.name);
        }
        UserAction::Passwd { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_for_password()?,
            };
            change_password_impl(conn, &email, &password)?;
            println!("Password changed successfully for user: {}", email);
        }
    }
    Ok(())
}

pub fn add_user_impl(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    role_name: &str,
) -> Result<(User, Role), Box<dyn std::error::Error>> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email cannot be empty".into());
    }
    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }
    if get_user_by_email(conn, email)?.is_some() {
        return Err(format!("User with email '{}' already exists", email).into());
    }
    let role = require_role(conn, role_name)?;

    let user = insert_user(
        conn,
        NewUser {
            email: email.to_string(),
            password_hash: hash_password(password),
            role_id: role.id,
        },
    )?;
    Ok((user, role))
}

/// Users whose email matches the search term, ordered by email.
pub fn find_users(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<Vec<(User, Role)>, Box<dyn std::error::Error>> {
    let matcher = Matcher::new(search_term, fixed_string)?;
    Ok(list_users_with_roles(conn)?
        .into_iter()
        .filter(|(user, _)| matcher.is_match(&user.email))
        .collect())
}

pub fn set_role_impl(
    conn: &mut SqliteConnection,
    email: &str,
    role_name: &str,
) -> Result<Role, Box<dyn std::error::Error>> {
    let user = require_user(conn, email)?;
    let role = require_role(conn, role_name)?;
    update_user_role(conn, user.id, role.id)?;
    Ok(role)
}

pub fn change_password_impl(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }
    let user = require_user(conn, email)?;
    update_user_password(conn, user.id, &hash_password(password))?;
    Ok(())
}

pub fn prompt_for_password() -> Result<String, Box<dyn std::error::Error>> {
    print!("Enter new password: ");
    io::stdout().flush()?;
    let password = read_password()?;

    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }

    print!("Confirm new password: ");
    io::stdout().flush()?;
    let confirm_password = read_password()?;

    if password != confirm_password {
        return Err("Passwords do not match".into());
    }

    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tms_api::auth::login::verify_password;
    use tms_api::orm::testing::setup_test_db;
    use tms_api::orm::user::get_user_with_role_by_email;

    #[test]
    fn test_add_user() {
        let mut conn = setup_test_db();

        let (user, role) =
            add_user_impl(&mut conn, " lovelace@example.com ", "engine", "faculty").unwrap();
        assert_eq!(user.email, "lovelace@example.com");
        assert_eq!(role.name, "faculty");
        assert_eq!(user.role_id, role.id);
        assert!(verify_password("engine", &user.password_hash));
    }

    #[test]
    fn test_add_user_rejections() {
        let mut conn = setup_test_db();
        add_user_impl(&mut conn, "lovelace@example.com", "engine", "faculty").unwrap();

        assert!(add_user_impl(&mut conn, "lovelace@example.com", "again", "faculty").is_err());
        assert!(add_user_impl(&mut conn, "babbage@example.com", "", "faculty").is_err());
        assert!(add_user_impl(&mut conn, "", "engine", "faculty").is_err());
        let err = add_user_impl(&mut conn, "babbage@example.com", "engine", "janitor").unwrap_err();
        assert_eq!(err.to_string(), "Role 'janitor' does not exist");
    }

    #[test]
    fn test_find_users() {
        let mut conn = setup_test_db();
        add_user_impl(&mut conn, "b@example.com", "pw", "student").unwrap();
        add_user_impl(&mut conn, "a@example.com", "pw", "faculty").unwrap();
        add_user_impl(&mut conn, "c@other.org", "pw", "guest").unwrap();

        let emails = |users: Vec<(User, Role)>| -> Vec<String> {
            users.into_iter().map(|(u, _)| u.email).collect()
        };

        assert_eq!(
            emails(find_users(&mut conn, None, false).unwrap()),
            vec!["a@example.com", "b@example.com", "c@other.org"]
        );
        assert_eq!(
            emails(find_users(&mut conn, Some(r"example\.com$".to_string()), false).unwrap()),
            vec!["a@example.com", "b@example.com"]
        );
        assert_eq!(
            emails(find_users(&mut conn, Some("other".to_string()), true).unwrap()),
            vec!["c@other.org"]
        );
    }

    #[test]
    fn test_set_role() {
        let mut conn = setup_test_db();
        add_user_impl(&mut conn, "lovelace@example.com", "engine", "student").unwrap();

        set_role_impl(&mut conn, "lovelace@example.com", "admin").unwrap();
        let (_, role) = get_user_with_role_by_email(&mut conn, "lovelace@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(role.name, "admin");

        assert!(set_role_impl(&mut conn, "lovelace@example.com", "janitor").is_err());
        assert!(set_role_impl(&mut conn, "nobody@example.com", "admin").is_err());
    }

    #[test]
    fn test_change_password() {
        let mut conn = setup_test_db();
        add_user_impl(&mut conn, "lovelace@example.com", "engine", "faculty").unwrap();

        change_password_impl(&mut conn, "lovelace@example.com", "analytical").unwrap();
        let user = get_user_by_email(&mut conn, "lovelace@example.com")
            .unwrap()
            .unwrap();
        assert!(verify_password("analytical", &user.password_hash));
        assert!(!verify_password("engine", &user.password_hash));

        assert!(change_password_impl(&mut conn, "lovelace@example.com", "").is_err());
        assert!(change_password_impl(&mut conn, "nobody@example.com", "pw").is_err());
    }
}
