// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::GuideApplication;

use crate::data_models::ApplicationRow;
use crate::diesel_schema::guide_applications;
use crate::error::PersistenceError;

/// Retrieves a guide application by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_application(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Option<GuideApplication>, PersistenceError> {
    match guide_applications::table
        .filter(guide_applications::application_id.eq(application_id))
        .select(ApplicationRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_application()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all pending guide applications, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_applications(
    conn: &mut SqliteConnection,
) -> Result<Vec<GuideApplication>, PersistenceError> {
    let rows: Vec<ApplicationRow> = guide_applications::table
        .order(guide_applications::application_id.asc())
        .select(ApplicationRow::as_select())
        .load(conn)?;
    rows.into_iter()
        .map(ApplicationRow::into_application)
        .collect()
}
