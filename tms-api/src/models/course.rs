use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::{courses, subjects};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = courses)]
#[ts(export)]
pub struct Course {
    pub id: i32,
    pub code: String,
    pub name: String,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = courses)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = subjects)]
#[ts(export)]
pub struct Subject {
    pub id: i32,
    pub course_id: i32,
    pub code: String,
    pub name: String,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = subjects)]
pub struct NewSubject {
    pub course_id: i32,
    pub code: String,
    pub name: String,
}
