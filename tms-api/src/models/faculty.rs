use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::faculty;

/// Teaching profile attached to a user account.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = faculty)]
#[ts(export)]
pub struct Faculty {
    pub id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl Faculty {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = faculty)]
pub struct NewFaculty {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
}
