pub mod calendar;
mod db;
pub mod faculty;
pub mod lecture;
pub mod role;
pub mod schedule;
pub mod session;
#[cfg(any(test, feature = "test-staging"))]
pub mod testing;
pub mod user;

pub use db::*;
