use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use tms_api::models::Role;
use tms_api::orm::role::get_all_roles;

use super::utils::Matcher;

#[derive(Subcommand)]
pub enum RoleAction {
    #[command(about = "List roles, optionally filtered by search term")]
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
}

pub fn handle_role_command_with_conn(
    conn: &mut SqliteConnection,
    action: RoleAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RoleAction::Ls {
            search_term,
            fixed_string,
        } => {
            let roles = find_roles(conn, search_term, fixed_string)?;
            print_roles(&roles);
        }
    }
    Ok(())
}

/// Roles whose name matches the search term, most privileged first.
pub fn find_roles(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<Vec<Role>, Box<dyn std::error::Error>> {
    let matcher = Matcher::new(search_term, fixed_string)?;
    Ok(get_all_roles(conn)?
        .into_iter()
        .filter(|role| matcher.is_match(&role.name))
        .collect())
}

fn print_roles(roles: &[Role]) {
    if roles.is_empty() {
        println!("No roles found.");
        return;
    }

    println!("Roles:");
    for role in roles {
        let desc = role.description.as_deref().unwrap_or("(no description)");
        println!(
            "  ID: {}, Name: {}, Priority: {}, Description: {}",
            role.id, role.name, role.level_priority, desc
        );
    }
}
