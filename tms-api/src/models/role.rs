use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::roles;

/// Privilege level of the built-in `superadmin` role.
pub const SUPERADMIN_PRIORITY: i32 = 1;
/// Privilege level of the built-in `admin` role.
pub const ADMIN_PRIORITY: i32 = 2;
/// Privilege level of the built-in `faculty` role.
pub const FACULTY_PRIORITY: i32 = 3;

/// A named privilege level. Lower `level_priority` means broader access.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[diesel(table_name = roles)]
#[ts(export)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub level_priority: i32,
}

impl Role {
    /// True when this role is at least as privileged as `required_max_priority`.
    pub fn satisfies(&self, required_max_priority: i32) -> bool {
        self.level_priority <= required_max_priority
    }
}

#[derive(Insertable, Debug, Deserialize, Serialize, TS)]
#[diesel(table_name = roles)]
#[ts(export)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
    pub level_priority: i32,
}
