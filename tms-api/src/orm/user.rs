use diesel::prelude::*;

use crate::models::{NewUser, Role, User};
use crate::orm::last_insert_rowid;
use crate::schema::{roles, users};

pub fn insert_user(
    conn: &mut SqliteConnection,
    new_user: NewUser,
) -> Result<User, diesel::result::Error> {
    diesel::insert_into(users::table)
        .values(&new_user)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    users::table
        .filter(users::id.eq(last_id))
        .select(User::as_select())
        .first(conn)
}

pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    user_email: &str,
) -> Result<Option<User>, diesel::result::Error> {
    users::table
        .filter(users::email.eq(user_email))
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Loads a user together with the role currently assigned to it.
pub fn get_user_with_role(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<(User, Role)>, diesel::result::Error> {
    users::table
        .inner_join(roles::table)
        .filter(users::id.eq(user_id))
        .select((User::as_select(), Role::as_select()))
        .first(conn)
        .optional()
}

/// Same as [`get_user_with_role`], keyed by the login identifier.
pub fn get_user_with_role_by_email(
    conn: &mut SqliteConnection,
    user_email: &str,
) -> Result<Option<(User, Role)>, diesel::result::Error> {
    users::table
        .inner_join(roles::table)
        .filter(users::email.eq(user_email))
        .select((User::as_select(), Role::as_select()))
        .first(conn)
        .optional()
}

/// Returns every user with its role, ordered by email.
pub fn list_users_with_roles(
    conn: &mut SqliteConnection,
) -> Result<Vec<(User, Role)>, diesel::result::Error> {
    users::table
        .inner_join(roles::table)
        .order(users::email.asc())
        .select((User::as_select(), Role::as_select()))
        .load(conn)
}

pub fn update_user_role(
    conn: &mut SqliteConnection,
    user_id: i32,
    new_role_id: i32,
) -> Result<usize, diesel::result::Error> {
    diesel::update(users::table.filter(users::id.eq(user_id)))
        .set(users::role_id.eq(new_role_id))
        .execute(conn)
}

pub fn update_user_password(
    conn: &mut SqliteConnection,
    user_id: i32,
    new_password_hash: &str,
) -> Result<usize, diesel::result::Error> {
    diesel::update(users::table.filter(users::id.eq(user_id)))
        .set(users::password_hash.eq(new_password_hash))
        .execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::role::get_role_by_name;
    use crate::orm::testing::setup_test_db;

    fn insert_faculty_user(conn: &mut SqliteConnection, user_email: &str) -> User {
        let faculty_role = get_role_by_name(conn, "faculty").unwrap().unwrap();
        insert_user(
            conn,
            NewUser {
                email: user_email.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                role_id: faculty_role.id,
            },
        )
        .expect("insert user")
    }

    #[test]
    fn test_insert_and_find_user() {
        let mut conn = setup_test_db();
        let user = insert_faculty_user(&mut conn, "ada@example.com");

        let found = get_user_by_email(&mut conn, "ada@example.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(get_user_by_email(&mut conn, "nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_user_with_role_reflects_role_changes() {
        let mut conn = setup_test_db();
        let user = insert_faculty_user(&mut conn, "ada@example.com");

        let (_, role) = get_user_with_role(&mut conn, user.id).unwrap().unwrap();
        assert_eq!(role.name, "faculty");

        let guest = get_role_by_name(&mut conn, "guest").unwrap().unwrap();
        assert_eq!(update_user_role(&mut conn, user.id, guest.id).unwrap(), 1);

        let (_, role) = get_user_with_role_by_email(&mut conn, "ada@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(role.name, "guest");
        assert_eq!(role.level_priority, 5);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let mut conn = setup_test_db();
        insert_faculty_user(&mut conn, "ada@example.com");
        let faculty_role = get_role_by_name(&mut conn, "faculty").unwrap().unwrap();
        let dup = insert_user(
            &mut conn,
            NewUser {
                email: "ada@example.com".to_string(),
                password_hash: "x".to_string(),
                role_id: faculty_role.id,
            },
        );
        assert!(dup.is_err());
    }
}
