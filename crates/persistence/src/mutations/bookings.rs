// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::Booking;

use crate::diesel_schema::bookings;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts a new booking.
///
/// The caller is responsible for forcing the initial `Pending` status.
///
/// # Returns
///
/// The generated booking id.
///
/// # Errors
///
/// Returns an error if the database operation fails, including a foreign
/// key violation when the referenced package or guide does not exist.
pub fn create_booking(
    conn: &mut SqliteConnection,
    booking: &Booking,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(bookings::table)
        .values((
            bookings::package_id.eq(booking.package_id),
            bookings::guide_id.eq(booking.guide_id),
            bookings::tourist_email.eq(booking.tourist_email.value()),
            bookings::tourist_name.eq(&booking.tourist_name),
            bookings::price_cents.eq(booking.price_cents),
            bookings::tour_date.eq(&booking.tour_date),
            bookings::status.eq(booking.status.as_str()),
            bookings::transaction_id.eq(booking.transaction_id.as_deref()),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Writes the lifecycle fields of a booking after a status transition.
///
/// # Errors
///
/// Returns `NotFound` if no booking with the given id exists.
pub fn update_booking_state(
    conn: &mut SqliteConnection,
    booking_id: i64,
    booking: &Booking,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(bookings::table.filter(bookings::booking_id.eq(booking_id)))
            .set((
                bookings::status.eq(booking.status.as_str()),
                bookings::transaction_id.eq(booking.transaction_id.as_deref()),
            ))
            .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Booking {booking_id} not found"
        )));
    }
    Ok(())
}

/// Deletes a booking.
///
/// Payments against the booking cascade via foreign keys.
///
/// # Errors
///
/// Returns `NotFound` if no booking with the given id exists.
pub fn delete_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(bookings::table.filter(bookings::booking_id.eq(booking_id)))
            .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Booking {booking_id} not found"
        )));
    }
    Ok(())
}
