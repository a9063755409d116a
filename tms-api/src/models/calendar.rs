use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Optional narrowing applied to both calendar queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct CalendarFilters {
    pub semester: Option<i32>,
    pub faculty_id: Option<i32>,
    pub course_id: Option<i32>,
}

/// Session tally for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DaySummary {
    /// `YYYY-MM-DD`
    pub date: String,
    pub total_held: i64,
    pub total_cancelled: i64,
    pub no_data: i64,
}

/// One scheduled lecture on a date, with its live status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RosterRow {
    pub timetable_id: i32,
    pub timeslot_id: i32,
    pub session_id: Option<i32>,
    pub subject: String,
    pub faculty: String,
    pub start_time: String,
    pub end_time: String,
    /// Empty when nothing has been recorded for the date yet.
    pub status: String,
    pub semester: i32,
    pub room: String,
    pub batch_year: i32,
    pub batch_section: String,
    pub course_name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct MonthSummaryResponse {
    pub data: Vec<DaySummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct DayRosterResponse {
    pub date: String,
    pub data: Vec<RosterRow>,
}
