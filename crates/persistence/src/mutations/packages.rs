// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::Package;

use crate::data_models::encode_string_list;
use crate::diesel_schema::packages;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

fn duration_column(duration_days: u32) -> Result<i32, PersistenceError> {
    i32::try_from(duration_days).map_err(|_| {
        PersistenceError::SerializationError(format!("duration {duration_days} out of range"))
    })
}

/// Inserts a new package.
///
/// # Returns
///
/// The generated package id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn create_package(
    conn: &mut SqliteConnection,
    package: &Package,
) -> Result<i64, PersistenceError> {
    let images_json: String = encode_string_list(&package.images)?;
    diesel::insert_into(packages::table)
        .values((
            packages::title.eq(&package.title),
            packages::description.eq(&package.description),
            packages::location.eq(&package.location),
            packages::duration_days.eq(duration_column(package.duration_days)?),
            packages::price_cents.eq(package.price_cents),
            packages::category.eq(&package.category),
            packages::itinerary.eq(&package.itinerary),
            packages::images_json.eq(&images_json),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Replaces all mutable fields of a package.
///
/// # Errors
///
/// Returns `NotFound` if no package with the given id exists.
pub fn update_package(
    conn: &mut SqliteConnection,
    package_id: i64,
    package: &Package,
) -> Result<(), PersistenceError> {
    let images_json: String = encode_string_list(&package.images)?;
    let updated: usize =
        diesel::update(packages::table.filter(packages::package_id.eq(package_id)))
            .set((
                packages::title.eq(&package.title),
                packages::description.eq(&package.description),
                packages::location.eq(&package.location),
                packages::duration_days.eq(duration_column(package.duration_days)?),
                packages::price_cents.eq(package.price_cents),
                packages::category.eq(&package.category),
                packages::itinerary.eq(&package.itinerary),
                packages::images_json.eq(&images_json),
            ))
            .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Package {package_id} not found"
        )));
    }
    Ok(())
}

/// Deletes a package.
///
/// # Errors
///
/// Returns `NotFound` if no package with the given id exists.
pub fn delete_package(
    conn: &mut SqliteConnection,
    package_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(packages::table.filter(packages::package_id.eq(package_id)))
            .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Package {package_id} not found"
        )));
    }
    Ok(())
}
