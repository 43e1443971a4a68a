// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::Payment;

use crate::data_models::PaymentRow;
use crate::diesel_schema::payments;
use crate::error::PersistenceError;

/// Retrieves the payment recorded against a booking, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_payment_by_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<Option<Payment>, PersistenceError> {
    match payments::table
        .filter(payments::booking_id.eq(booking_id))
        .select(PaymentRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_payment()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all recorded payments, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_payments(conn: &mut SqliteConnection) -> Result<Vec<Payment>, PersistenceError> {
    let rows: Vec<PaymentRow> = payments::table
        .order(payments::payment_id.asc())
        .select(PaymentRow::as_select())
        .load(conn)?;
    rows.into_iter().map(PaymentRow::into_payment).collect()
}
