// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::Package;

use crate::data_models::PackageRow;
use crate::diesel_schema::packages;
use crate::error::PersistenceError;

/// Retrieves a package by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_package(
    conn: &mut SqliteConnection,
    package_id: i64,
) -> Result<Option<Package>, PersistenceError> {
    match packages::table
        .filter(packages::package_id.eq(package_id))
        .select(PackageRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_package()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all packages, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_packages(conn: &mut SqliteConnection) -> Result<Vec<Package>, PersistenceError> {
    let rows: Vec<PackageRow> = packages::table
        .order(packages::package_id.asc())
        .select(PackageRow::as_select())
        .load(conn)?;
    rows.into_iter().map(PackageRow::into_package).collect()
}
