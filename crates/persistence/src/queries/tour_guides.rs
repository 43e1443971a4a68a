// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guide-profile reads.
//!
//! Every lookup joins through `users` and requires the linked account's
//! role to still be `tourGuide`. A demoted user's guide record stays in
//! the table but is invisible to these queries.

use diesel::prelude::*;

use wayfare_domain::{Role, TourGuide};

use crate::data_models::TourGuideRow;
use crate::diesel_schema::{tour_guides, users};
use crate::error::PersistenceError;

/// Lists guide profiles whose linked user still holds the guide role.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_guides(conn: &mut SqliteConnection) -> Result<Vec<TourGuide>, PersistenceError> {
    let rows: Vec<TourGuideRow> = tour_guides::table
        .inner_join(users::table)
        .filter(users::role.eq(Role::TourGuide.as_str()))
        .order(tour_guides::guide_id.asc())
        .select(TourGuideRow::as_select())
        .load(conn)?;
    rows.into_iter().map(TourGuideRow::into_tour_guide).collect()
}

/// Retrieves a guide profile by id, role-checked.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_guide(
    conn: &mut SqliteConnection,
    guide_id: i64,
) -> Result<Option<TourGuide>, PersistenceError> {
    match tour_guides::table
        .inner_join(users::table)
        .filter(tour_guides::guide_id.eq(guide_id))
        .filter(users::role.eq(Role::TourGuide.as_str()))
        .select(TourGuideRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_tour_guide()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves a guide profile by id without the role check.
///
/// Used when resolving display fields for bookings that reference a
/// since-demoted guide.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_guide_record(
    conn: &mut SqliteConnection,
    guide_id: i64,
) -> Result<Option<TourGuide>, PersistenceError> {
    match tour_guides::table
        .filter(tour_guides::guide_id.eq(guide_id))
        .select(TourGuideRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_tour_guide()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves a guide profile by the linked user's canonical id.
///
/// Not role-checked: callers resolving the acting user's own guide
/// record need it even mid-demotion.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_guide_by_user_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<TourGuide>, PersistenceError> {
    match tour_guides::table
        .filter(tour_guides::user_id.eq(user_id))
        .select(TourGuideRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_tour_guide()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves a guide profile by the guide's email address.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_guide_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<TourGuide>, PersistenceError> {
    match tour_guides::table
        .filter(tour_guides::email.eq(email))
        .select(TourGuideRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_tour_guide()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
