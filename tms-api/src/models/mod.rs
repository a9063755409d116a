pub mod batch;
pub mod calendar;
pub mod course;
pub mod faculty;
pub mod lecture;
pub mod role;
pub mod room;
pub mod session;
pub mod session_note;
pub mod timetable;
pub mod user;

// Re-export models for easier access
pub use batch::*;
pub use calendar::*;
pub use course::*;
pub use faculty::*;
pub use lecture::*;
pub use role::*;
pub use room::*;
pub use session::*;
pub use session_note::*;
pub use timetable::*;
pub use user::*;
