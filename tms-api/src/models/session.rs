use chrono::NaiveDate;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::LectureKey;
use crate::schema::sessions;

/// One dated occurrence of a lecture.
///
/// `status` is stored as free text; only the values of [`SessionStatus`] are
/// meaningful, anything else is reported as "no data".
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = sessions)]
#[ts(export)]
pub struct Session {
    pub id: i32,
    pub timetable_id: i32,
    pub timeslot_id: i32,
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub status: String,
}

impl Session {
    pub fn key(&self) -> LectureKey {
        LectureKey::new(self.timetable_id, self.timeslot_id)
    }

    pub fn parsed_status(&self) -> Option<SessionStatus> {
        SessionStatus::parse(&self.status)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    pub timetable_id: i32,
    pub timeslot_id: i32,
    pub date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SessionStatus {
    Held,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Held => "held",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a stored status. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "held" => Some(SessionStatus::Held),
            "cancelled" => Some(SessionStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for marking a lecture held or cancelled on a date.
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MarkSessionRequest {
    pub timetable_id: i32,
    pub timeslot_id: i32,
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub status: String,
}
