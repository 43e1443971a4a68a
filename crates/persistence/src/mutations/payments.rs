// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use tracing::info;

use wayfare_domain::{Booking, Payment};

use crate::diesel_schema::{bookings, payments};
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Records a payment and advances its booking in one transaction.
///
/// The payment row and the booking's new status plus transaction id
/// land together or not at all.
///
/// # Returns
///
/// The generated payment id.
///
/// # Errors
///
/// Returns an error if any step fails; the transaction is rolled back.
pub fn record_payment(
    conn: &mut SqliteConnection,
    payment: &Payment,
    updated_booking: &Booking,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        diesel::insert_into(payments::table)
            .values((
                payments::booking_id.eq(payment.booking_id),
                payments::payer_email.eq(payment.payer_email.value()),
                payments::transaction_id.eq(&payment.transaction_id),
                payments::amount_cents.eq(payment.amount_cents),
                payments::paid_at.eq(&payment.paid_at),
                payments::status.eq(&payment.status),
            ))
            .execute(conn)?;
        let payment_id: i64 = get_last_insert_rowid(conn)?;

        let updated: usize =
            diesel::update(bookings::table.filter(bookings::booking_id.eq(payment.booking_id)))
                .set((
                    bookings::status.eq(updated_booking.status.as_str()),
                    bookings::transaction_id.eq(updated_booking.transaction_id.as_deref()),
                ))
                .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Booking {} not found",
                payment.booking_id
            )));
        }

        info!(
            payment_id,
            booking_id = payment.booking_id,
            "Payment recorded and booking advanced"
        );
        Ok(payment_id)
    })
}
