use clap::{Parser, Subcommand};

mod admin_cli;

use admin_cli::faculty_commands::{FacultyAction, handle_faculty_command_with_conn};
use admin_cli::role_commands::{RoleAction, handle_role_command_with_conn};
use admin_cli::user_commands::{UserAction, handle_user_command_with_conn};
use admin_cli::utils::establish_connection;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "tms-admin")]
#[command(about = "Administrative tool for the TMS database")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Inspect roles")]
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },
    #[command(about = "Manage user accounts")]
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    #[command(about = "Manage faculty records")]
    Faculty {
        #[command(subcommand)]
        action: FacultyAction,
    },
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = establish_connection()?;
    match command {
        Commands::Role { action } => handle_role_command_with_conn(&mut conn, action),
        Commands::User { action } => handle_user_command_with_conn(&mut conn, action),
        Commands::Faculty { action } => handle_faculty_command_with_conn(&mut conn, action),
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.version_info {
        println!("tms-admin {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return;
    }

    let Some(command) = cli.command else {
        eprintln!("No command given. Run with --help for usage.");
        std::process::exit(2);
    };

    if let Err(e) = run(command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
