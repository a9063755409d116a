use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{Faculty, Subject, Timeslot, Timetable};
use crate::schema::lectures;

/// The `(timetable_id, timeslot_id)` pair that identifies a lecture.
///
/// Sessions carry the same pair without a foreign key to `lectures`, so this
/// is the value both sides are matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LectureKey {
    pub timetable_id: i32,
    pub timeslot_id: i32,
}

impl LectureKey {
    pub fn new(timetable_id: i32, timeslot_id: i32) -> Self {
        Self {
            timetable_id,
            timeslot_id,
        }
    }
}

/// A subject taught by a faculty member in one weekly slot of a timetable.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, TS)]
#[diesel(table_name = lectures)]
#[diesel(primary_key(timetable_id, timeslot_id))]
#[ts(export)]
pub struct Lecture {
    pub timetable_id: i32,
    pub timeslot_id: i32,
    pub subject_id: i32,
    pub faculty_id: i32,
    pub room: String,
}

impl Lecture {
    pub fn key(&self) -> LectureKey {
        LectureKey::new(self.timetable_id, self.timeslot_id)
    }
}

#[derive(Insertable, Debug, Clone, Deserialize, Serialize, TS)]
#[diesel(table_name = lectures)]
#[ts(export)]
pub struct NewLecture {
    pub timetable_id: i32,
    pub timeslot_id: i32,
    pub subject_id: i32,
    pub faculty_id: i32,
    pub room: String,
}

/// Partial update of a lecture. The key itself never changes.
#[derive(AsChangeset, Debug, Clone, Default, Deserialize, Serialize, TS)]
#[diesel(table_name = lectures)]
#[ts(export)]
pub struct LectureChanges {
    pub subject_id: Option<i32>,
    pub faculty_id: Option<i32>,
    pub room: Option<String>,
}

impl LectureChanges {
    pub fn is_empty(&self) -> bool {
        self.subject_id.is_none() && self.faculty_id.is_none() && self.room.is_none()
    }
}

/// A lecture together with the rows it references.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct LectureDetail {
    #[serde(flatten)]
    pub lecture: Lecture,
    pub subject: Subject,
    pub faculty: Faculty,
    pub timeslot: Timeslot,
    pub timetable: Timetable,
}
