use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use tms_api::models::{Faculty, NewFaculty};
use tms_api::orm::faculty::{get_all_faculty, get_faculty_by_user_id, insert_faculty};

use super::utils::require_user;

#[derive(Subcommand)]
pub enum FacultyAction {
    #[command(about = "Create the faculty record for an existing user")]
    Add {
        #[arg(short, long, help = "Email address of the user")]
        email: String,
        #[arg(short, long, help = "First name")]
        first_name: String,
        #[arg(short, long, help = "Last name")]
        last_name: String,
    },
    #[command(about = "List faculty members")]
    Ls,
}

pub fn handle_faculty_command_with_conn(
    conn: &mut SqliteConnection,
    action: FacultyAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FacultyAction::Add {
            email,
            first_name,
            last_name,
        } => {
            let faculty = add_faculty_impl(conn, &email, &first_name, &last_name)?;
            println!("Faculty created successfully!");
            println!("  ID: {}", faculty.id);
            println!("  Name: {}", faculty.full_name());
            println!("  User: {}", email);
        }
        FacultyAction::Ls => {
            let all = get_all_faculty(conn)?;
            if all.is_empty() {
                println!("No faculty found.");
            } else {
                println!("Faculty:");
                for member in all {
                    println!(
                        "  ID: {}, Name: {}, User ID: {}",
                        member.id,
                        member.full_name(),
                        member.user_id
                    );
                }
            }
        }
    }
    Ok(())
}

/// A user has at most one faculty record.
pub fn add_faculty_impl(
    conn: &mut SqliteConnection,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<Faculty, Box<dyn std::error::Error>> {
    let user = require_user(conn, email)?;
    if get_faculty_by_user_id(conn, user.id)?.is_some() {
        return Err(format!("User '{}' already has a faculty record", email).into());
    }

    let faculty = insert_faculty(
        conn,
        NewFaculty {
            user_id: user.id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        },
    )?;
    Ok(faculty)
}
