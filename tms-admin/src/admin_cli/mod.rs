pub mod faculty_commands;
pub mod role_commands;
pub mod user_commands;
pub mod utils;
