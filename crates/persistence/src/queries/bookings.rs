// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::Booking;

use crate::data_models::BookingRow;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

fn collect(rows: Vec<BookingRow>) -> Result<Vec<Booking>, PersistenceError> {
    rows.into_iter().map(BookingRow::into_booking).collect()
}

/// Retrieves a booking by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<Option<Booking>, PersistenceError> {
    match bookings::table
        .filter(bookings::booking_id.eq(booking_id))
        .select(BookingRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_booking()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all bookings, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_all_bookings(conn: &mut SqliteConnection) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load(conn)?;
    collect(rows)
}

/// Lists the bookings placed by a tourist.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_for_tourist(
    conn: &mut SqliteConnection,
    tourist_email: &str,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::tourist_email.eq(tourist_email))
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load(conn)?;
    collect(rows)
}

/// Lists the bookings assigned to a guide record.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_for_guide(
    conn: &mut SqliteConnection,
    guide_id: i64,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::guide_id.eq(guide_id))
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load(conn)?;
    collect(rows)
}
