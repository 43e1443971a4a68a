// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::{Role, User};

use crate::data_models::UserRow;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Creates or updates a user account keyed by normalized email.
///
/// A new account is stored with the provided role (the caller forces
/// `tourist` at sign-up). An existing account keeps its stored role;
/// only the display fields are refreshed.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_user(conn: &mut SqliteConnection, user: &User) -> Result<User, PersistenceError> {
    let existing: Option<UserRow> = match users::table
        .filter(users::email.eq(user.email.value()))
        .select(UserRow::as_select())
        .first(conn)
    {
        Ok(row) => Some(row),
        Err(diesel::result::Error::NotFound) => None,
        Err(e) => return Err(e.into()),
    };

    match existing {
        Some(row) => {
            diesel::update(users::table.filter(users::user_id.eq(row.user_id)))
                .set((
                    users::name.eq(&user.name),
                    users::photo.eq(user.photo.as_deref()),
                ))
                .execute(conn)?;
            // Role is never touched by the upsert path
            let mut stored: User = row.into_user()?;
            stored.name.clone_from(&user.name);
            stored.photo.clone_from(&user.photo);
            Ok(stored)
        }
        None => {
            diesel::insert_into(users::table)
                .values((
                    users::email.eq(user.email.value()),
                    users::name.eq(&user.name),
                    users::photo.eq(user.photo.as_deref()),
                    users::role.eq(user.role.as_str()),
                ))
                .execute(conn)?;
            let user_id: i64 = get_last_insert_rowid(conn)?;
            Ok(User::with_id(
                user_id,
                user.email.clone(),
                user.name.clone(),
                user.photo.clone(),
                user.role,
            ))
        }
    }
}

/// Sets a user's role.
///
/// # Errors
///
/// Returns `NotFound` if no user with the given id exists.
pub fn set_user_role(
    conn: &mut SqliteConnection,
    user_id: i64,
    role: Role,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::role.eq(role.as_str()))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User {user_id} not found"
        )));
    }
    Ok(())
}

/// Deletes a user account.
///
/// Sessions and guide records cascade via foreign keys.
///
/// # Errors
///
/// Returns `NotFound` if no user with the given id exists.
pub fn delete_user(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(users::table.filter(users::user_id.eq(user_id))).execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User {user_id} not found"
        )));
    }
    Ok(())
}
