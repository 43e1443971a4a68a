// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::{Role, User};

use crate::data_models::UserRow;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Retrieves a user by normalized email.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, PersistenceError> {
    match users::table
        .filter(users::email.eq(email))
        .select(UserRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_user()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves a user by canonical id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<User>, PersistenceError> {
    match users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_user()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists user accounts, optionally filtered by role and a search term
/// matched against name or email.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(
    conn: &mut SqliteConnection,
    role: Option<Role>,
    search: Option<&str>,
) -> Result<Vec<User>, PersistenceError> {
    let mut query = users::table.into_boxed();

    if let Some(role) = role {
        query = query.filter(users::role.eq(role.as_str()));
    }
    if let Some(term) = search {
        let pattern: String = format!("%{term}%");
        query = query.filter(
            users::name
                .like(pattern.clone())
                .or(users::email.like(pattern)),
        );
    }

    let rows: Vec<UserRow> = query
        .order(users::user_id.asc())
        .select(UserRow::as_select())
        .load(conn)?;
    rows.into_iter().map(UserRow::into_user).collect()
}
