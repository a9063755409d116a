//! Test support: in-memory databases, seeded fixtures and a test Rocket.

use std::cell::RefCell;

use chrono::{NaiveDate, NaiveTime};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};

use super::db::{DbConn, DbRunner, run_pending_migrations, set_foreign_keys};
use crate::admin_init_fairing::admin_init_fairing;
use crate::auth::login::hash_password;
use crate::auth::token::token_keys_fairing;
use crate::models::{
    NewBatch, NewCourse, NewFaculty, NewLecture, NewRoom, NewSection, NewSession, NewSubject,
    NewTimeslot, NewTimetable, NewUser, User,
};
use crate::orm::faculty::insert_faculty;
use crate::orm::role::get_role_by_name;
use crate::orm::schedule::{
    insert_batch, insert_course, insert_lecture, insert_room, insert_section, insert_subject,
    insert_timeslot, insert_timetable,
};
use crate::orm::user::{get_user_by_email, insert_user};
use crate::schema::sessions;

/// Signing secret used by [`test_rocket`].
pub const TEST_TOKEN_SECRET: &str = "tms-test-token-secret-do-not-use-in-production";

/// Configures SQLite for fast, non-durable operation. Testing only.
///
/// # Panics
/// Panics if the PRAGMA commands fail to execute
fn set_sqlite_test_pragmas(conn: &mut SqliteConnection) {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
    .expect("Failed to set SQLite PRAGMAs");
}

fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for test pragmas");
        conn.run(|c| {
            set_sqlite_test_pragmas(c);
        })
        .await;
        rocket
    })
}

fn test_data_init_fairing() -> AdHoc {
    AdHoc::on_ignite("Test Data Initialization", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for test data initialization");

        conn.run(|c| {
            if let Err(e) = create_test_data(c) {
                eprintln!("[test-data-init] ERROR: Failed to create test data: {:?}", e);
            }
        })
        .await;

        rocket
    })
}

/// Row ids of the seeded schedule, so tests never hard-code them.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleFixture {
    pub admin_user: i32,
    pub turing_user: i32,
    pub hopper_user: i32,
    /// Faculty id of "A. Turing".
    pub turing: i32,
    /// Faculty id of "Grace Hopper".
    pub hopper: i32,
    pub cs_course: i32,
    pub math_course: i32,
    pub algorithms: i32,
    pub operating_systems: i32,
    pub calculus: i32,
    pub cs_timetable: i32,
    pub math_timetable: i32,
    pub monday_nine: i32,
    pub monday_ten: i32,
    pub wednesday_nine: i32,
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid fixture time")
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Creates a user with `password` and the named role, or returns the
/// existing one.
pub fn create_test_user(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    role_name: &str,
) -> Result<User, diesel::result::Error> {
    if let Some(existing) = get_user_by_email(conn, email)? {
        return Ok(existing);
    }

    let role = get_role_by_name(conn, role_name)?.ok_or(diesel::result::Error::NotFound)?;
    insert_user(
        conn,
        NewUser {
            email: email.to_string(),
            password_hash: hash_password(password),
            role_id: role.id,
        },
    )
}

/// Seeds the reference schedule.
///
/// Computer Science 2022 section A (semester 4, room R101) and Mathematics
/// 2023 without a section (semester 2, room R202). Lectures:
///
/// | timetable | slot            | subject           | faculty      |
/// |-----------|-----------------|-------------------|--------------|
/// | CS        | Mon 09:00-10:00 | Algorithms        | A. Turing    |
/// | CS        | Mon 10:00-11:00 | Operating Systems | Grace Hopper |
/// | Maths     | Mon 09:00-10:00 | Calculus          | Grace Hopper |
/// | CS        | Wed 09:00-10:00 | Algorithms        | A. Turing    |
///
/// Sessions: on Monday 2024-03-04 both CS lectures were held and Calculus was
/// cancelled; on Wednesday 2024-03-06 the CS lecture has status "pending" and
/// an orphan session (Maths timetable, Wednesday slot, no lecture) is "held";
/// on Monday 2024-04-01 Algorithms was held.
pub fn create_schedule_fixture(
    conn: &mut SqliteConnection,
) -> Result<ScheduleFixture, diesel::result::Error> {
    let admin = create_test_user(conn, "admin@example.com", "adminpass", "admin")?;
    let turing_user = create_test_user(conn, "turing@example.com", "facultypass", "faculty")?;
    let hopper_user = create_test_user(conn, "hopper@example.com", "facultypass", "faculty")?;

    let turing = insert_faculty(
        conn,
        NewFaculty {
            user_id: turing_user.id,
            first_name: "A.".to_string(),
            last_name: "Turing".to_string(),
        },
    )?;
    let hopper = insert_faculty(
        conn,
        NewFaculty {
            user_id: hopper_user.id,
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
        },
    )?;

    let cs = insert_course(
        conn,
        NewCourse {
            code: "CS".to_string(),
            name: "Computer Science".to_string(),
        },
    )?;
    let math = insert_course(
        conn,
        NewCourse {
            code: "MA".to_string(),
            name: "Mathematics".to_string(),
        },
    )?;

    let cs_2022 = insert_batch(
        conn,
        NewBatch {
            course_id: cs.id,
            entry_year: 2022,
        },
    )?;
    let section_a = insert_section(
        conn,
        NewSection {
            batch_id: cs_2022.id,
            name: "A".to_string(),
        },
    )?;
    let math_2023 = insert_batch(
        conn,
        NewBatch {
            course_id: math.id,
            entry_year: 2023,
        },
    )?;

    let r101 = insert_room(
        conn,
        NewRoom {
            name: "R101".to_string(),
        },
    )?;
    let r202 = insert_room(
        conn,
        NewRoom {
            name: "R202".to_string(),
        },
    )?;

    let mut subject = |code: &str, name: &str, course_id: i32| {
        insert_subject(
            conn,
            NewSubject {
                course_id,
                code: code.to_string(),
                name: name.to_string(),
            },
        )
    };
    let algorithms = subject("ALG", "Algorithms", cs.id)?;
    let operating_systems = subject("OS", "Operating Systems", cs.id)?;
    let calculus = subject("CALC", "Calculus", math.id)?;

    let cs_timetable = insert_timetable(
        conn,
        NewTimetable {
            batch_id: cs_2022.id,
            section_id: Some(section_a.id),
            course_id: cs.id,
            room_id: r101.id,
            semester: 4,
            created_by: admin.id,
        },
    )?;
    let math_timetable = insert_timetable(
        conn,
        NewTimetable {
            batch_id: math_2023.id,
            section_id: None,
            course_id: math.id,
            room_id: r202.id,
            semester: 2,
            created_by: admin.id,
        },
    )?;

    let monday_nine = insert_timeslot(
        conn,
        NewTimeslot {
            day_of_week: 2,
            start_time: hm(9, 0),
            end_time: hm(10, 0),
        },
    )?;
    let monday_ten = insert_timeslot(
        conn,
        NewTimeslot {
            day_of_week: 2,
            start_time: hm(10, 0),
            end_time: hm(11, 0),
        },
    )?;
    let wednesday_nine = insert_timeslot(
        conn,
        NewTimeslot {
            day_of_week: 4,
            start_time: hm(9, 0),
            end_time: hm(10, 0),
        },
    )?;

    let lectures = [
        (cs_timetable.id, monday_nine.id, algorithms.id, turing.id, "R101"),
        (cs_timetable.id, monday_ten.id, operating_systems.id, hopper.id, "R101"),
        (math_timetable.id, monday_nine.id, calculus.id, hopper.id, "R202"),
        (cs_timetable.id, wednesday_nine.id, algorithms.id, turing.id, "R101"),
    ];
    for (timetable_id, timeslot_id, subject_id, faculty_id, room) in lectures {
        insert_lecture(
            conn,
            NewLecture {
                timetable_id,
                timeslot_id,
                subject_id,
                faculty_id,
                room: room.to_string(),
            },
        )?;
    }

    let recorded = [
        (cs_timetable.id, monday_nine.id, ymd(2024, 3, 4), "held"),
        (cs_timetable.id, monday_ten.id, ymd(2024, 3, 4), "held"),
        (math_timetable.id, monday_nine.id, ymd(2024, 3, 4), "cancelled"),
        (cs_timetable.id, wednesday_nine.id, ymd(2024, 3, 6), "pending"),
        (math_timetable.id, wednesday_nine.id, ymd(2024, 3, 6), "held"),
        (cs_timetable.id, monday_nine.id, ymd(2024, 4, 1), "held"),
    ];
    let new_sessions: Vec<NewSession> = recorded
        .into_iter()
        .map(|(timetable_id, timeslot_id, date, status)| NewSession {
            timetable_id,
            timeslot_id,
            date,
            status: status.to_string(),
        })
        .collect();
    diesel::insert_into(sessions::table)
        .values(&new_sessions)
        .execute(conn)?;

    Ok(ScheduleFixture {
        admin_user: admin.id,
        turing_user: turing_user.id,
        hopper_user: hopper_user.id,
        turing: turing.id,
        hopper: hopper.id,
        cs_course: cs.id,
        math_course: math.id,
        algorithms: algorithms.id,
        operating_systems: operating_systems.id,
        calculus: calculus.id,
        cs_timetable: cs_timetable.id,
        math_timetable: math_timetable.id,
        monday_nine: monday_nine.id,
        monday_ten: monday_ten.id,
        wednesday_nine: wednesday_nine.id,
    })
}

/// Schedule fixture plus one account for each remaining role.
///
/// | email               | password    | role    |
/// |---------------------|-------------|---------|
/// | admin@example.com   | adminpass   | admin   |
/// | turing@example.com  | facultypass | faculty |
/// | hopper@example.com  | facultypass | faculty |
/// | student@example.com | studentpass | student |
/// | guest@example.com   | guestpass   | guest   |
pub fn create_test_data(
    conn: &mut SqliteConnection,
) -> Result<ScheduleFixture, diesel::result::Error> {
    let fixture = create_schedule_fixture(conn)?;
    create_test_user(conn, "student@example.com", "studentpass", "student")?;
    create_test_user(conn, "guest@example.com", "guestpass", "guest")?;
    Ok(fixture)
}

/// Creates a Rocket instance backed by a fresh in-memory database.
///
/// The instance runs migrations, creates the default superadmin, seeds
/// [`create_test_data`], signs tokens with [`TEST_TOKEN_SECRET`] and mounts
/// the API routes.
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    // Shared cache keeps one database alive across the pool's connections
    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment()
        .merge(("databases", map!["sqlite_db" => db_config]))
        .merge(("token_secret", TEST_TOKEN_SECRET));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing())
        .attach(admin_init_fairing())
        .attach(test_data_init_fairing())
        .attach(token_keys_fairing());

    crate::mount_api_routes(rocket)
}

/// Sets up a migrated in-memory database with foreign keys enabled.
///
/// # Panics
/// Panics if the database cannot be created
pub fn setup_test_db() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);
    conn
}

/// A synchronous connection behind the [`DbRunner`] interface, for unit
/// testing code written against `DbConn`.
pub struct FakeDbConn<'a>(RefCell<&'a mut SqliteConnection>);

impl DbRunner for FakeDbConn<'_> {
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        let mut conn = self.0.borrow_mut();
        std::future::ready(f(&mut **conn))
    }
}

/// Wraps a connection (typically from [`setup_test_db`]) as a [`FakeDbConn`].
pub fn setup_test_dbconn(conn: &mut SqliteConnection) -> FakeDbConn<'_> {
    FakeDbConn(RefCell::new(conn))
}
