use diesel::prelude::*;
use dotenvy::dotenv;
use rocket::Rocket;
use rocket::fairing::AdHoc;

use crate::auth::login::hash_password;
use crate::models::{NewRole, NewUser, Role, SUPERADMIN_PRIORITY, User};
use crate::orm::DbConn;
use crate::orm::role::{get_role_by_name, insert_role};
use crate::orm::user::{get_user_by_email, insert_user};

const SUPERADMIN_ROLE: &str = "superadmin";

/// Ensure a superadmin account exists.
///
/// The account comes from envars TMS_DEFAULT_EMAIL and TMS_DEFAULT_PASSWORD,
/// defaulting to `superadmin@example.com` / `admin`. An existing account is
/// left untouched.
pub fn admin_init_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Admin User Initialization", |rocket| async {
        dotenv().ok();

        let conn = match get_db_connection(&rocket).await {
            Some(conn) => conn,
            None => return Err(rocket),
        };

        let admin_email = get_admin_email();
        let result = conn
            .run(move |c| create_admin_user_if_needed(c, &admin_email))
            .await;

        match result {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("[admin-init] FATAL: Admin user creation failed: {:?}", e);
                Err(rocket)
            }
        }
    })
}

async fn get_db_connection(rocket: &Rocket<rocket::Build>) -> Option<DbConn> {
    match DbConn::get_one(rocket).await {
        Some(conn) => Some(conn),
        None => {
            error!("[admin-init] ERROR: Could not get DB connection.");
            None
        }
    }
}

fn get_admin_email() -> String {
    std::env::var("TMS_DEFAULT_EMAIL").unwrap_or_else(|_| "superadmin@example.com".to_string())
}

fn get_admin_password() -> String {
    std::env::var("TMS_DEFAULT_PASSWORD").unwrap_or_else(|_| "admin".to_string())
}

fn create_admin_user_if_needed(
    c: &mut SqliteConnection,
    admin_email: &str,
) -> Result<(), diesel::result::Error> {
    if get_user_by_email(c, admin_email)?.is_some() {
        info!("[admin-init] Admin user '{}' already exists", admin_email);
        return Ok(());
    }

    let role = find_or_create_superadmin_role(c)?;
    create_admin_user(c, admin_email, &role)?;
    Ok(())
}

fn find_or_create_superadmin_role(c: &mut SqliteConnection) -> Result<Role, diesel::result::Error> {
    if let Some(role) = get_role_by_name(c, SUPERADMIN_ROLE)? {
        return Ok(role);
    }

    info!("[admin-init] Creating role: '{}'", SUPERADMIN_ROLE);
    insert_role(
        c,
        NewRole {
            name: SUPERADMIN_ROLE.to_string(),
            description: Some("Full administrative access".to_string()),
            level_priority: SUPERADMIN_PRIORITY,
        },
    )
    .inspect_err(|e| error!("[admin-init] ERROR creating role: {:?}", e))
}

fn create_admin_user(
    c: &mut SqliteConnection,
    admin_email: &str,
    role: &Role,
) -> Result<User, diesel::result::Error> {
    let admin_user = NewUser {
        email: admin_email.to_string(),
        password_hash: hash_password(&get_admin_password()),
        role_id: role.id,
    };

    match insert_user(c, admin_user) {
        Ok(user) => {
            info!(
                "[admin-init] Created admin user '{}' with role '{}'",
                admin_email, role.name
            );
            Ok(user)
        }
        Err(e) => {
            error!("[admin-init] ERROR creating admin user: {:?}", e);
            Err(e)
        }
    }
}
