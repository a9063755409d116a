use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::{batches, sections};

/// The cohort of a course that started in `entry_year`.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = batches)]
#[ts(export)]
pub struct Batch {
    pub id: i32,
    pub course_id: i32,
    pub entry_year: i32,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = batches)]
pub struct NewBatch {
    pub course_id: i32,
    pub entry_year: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = sections)]
#[ts(export)]
pub struct Section {
    pub id: i32,
    pub batch_id: i32,
    pub name: String,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = sections)]
pub struct NewSection {
    pub batch_id: i32,
    pub name: String,
}
