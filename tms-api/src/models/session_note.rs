use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::session_notes;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, TS)]
#[diesel(table_name = session_notes)]
#[ts(export)]
pub struct SessionNote {
    pub id: i32,
    pub session_id: i32,
    pub entered_by: i32,
    pub notes: String,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = session_notes)]
pub struct NewSessionNote {
    pub session_id: i32,
    pub entered_by: i32,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SessionNoteInput {
    pub notes: String,
}
