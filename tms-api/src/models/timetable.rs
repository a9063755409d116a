use chrono::{Datelike, NaiveDate, NaiveTime};
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::{timeslots, timetables};

/// The teaching plan of a batch (optionally one section of it) for a semester.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = timetables)]
#[ts(export)]
pub struct Timetable {
    pub id: i32,
    pub batch_id: i32,
    pub section_id: Option<i32>,
    pub course_id: i32,
    pub room_id: i32,
    pub semester: i32,
    pub created_by: i32,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = timetables)]
pub struct NewTimetable {
    pub batch_id: i32,
    pub section_id: Option<i32>,
    pub course_id: i32,
    pub room_id: i32,
    pub semester: i32,
    pub created_by: i32,
}

/// A weekly recurring window. `day_of_week` runs 1 = Sunday .. 7 = Saturday.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = timeslots)]
#[ts(export)]
pub struct Timeslot {
    pub id: i32,
    pub day_of_week: i32,
    #[serde(with = "hhmm")]
    #[ts(type = "string")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[ts(type = "string")]
    pub end_time: NaiveTime,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = timeslots)]
pub struct NewTimeslot {
    pub day_of_week: i32,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

/// Day-of-week number used by `timeslots.day_of_week` for a calendar date.
pub fn day_of_week(date: NaiveDate) -> i32 {
    date.weekday().number_from_sunday() as i32
}

/// Formats a time of day as `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format(hhmm::FORMAT).to_string()
}

/// Serde adapter for `HH:MM` wall-clock times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
