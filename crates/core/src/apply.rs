// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{BookingCommand, CancellationCaller};
use crate::error::CoreError;
use wayfare_domain::{Booking, BookingStatus, DomainError};

/// The outcome of applying a booking command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingTransition {
    /// The booking advanced to a new state; persist the returned record.
    Updated(Booking),
    /// The booking was cancelled; delete the record.
    Cancelled,
}

/// Applies a lifecycle command to a booking.
///
/// This is the single enforcement point for the booking state machine:
///
/// ```text
/// Pending --RecordPayment--> InReview --Decide--> Accepted | Rejected
/// ```
///
/// Cancellation is legal from `Pending` for the owning tourist, or from
/// any state for an admin.
///
/// # Arguments
///
/// * `booking` - The booking in its current state (immutable)
/// * `command` - The command to apply
///
/// # Returns
///
/// * `Ok(BookingTransition)` describing the write to persist
/// * `Err(CoreError)` if the command is illegal for the current state
///   or the caller lacks standing
///
/// # Errors
///
/// Returns an error if:
/// - A payment is recorded against a non-pending booking
/// - A decision is made on a booking that is not in review
/// - The deciding caller is not the assigned guide
/// - A tourist cancels a booking they do not own, or one past `Pending`
pub fn apply_booking(
    booking: &Booking,
    command: BookingCommand,
) -> Result<BookingTransition, CoreError> {
    match command {
        BookingCommand::RecordPayment { transaction_id } => {
            if !booking.status.can_transition_to(BookingStatus::InReview) {
                return Err(CoreError::DomainViolation(
                    DomainError::IllegalStatusTransition {
                        from: booking.status,
                        to: BookingStatus::InReview,
                    },
                ));
            }

            let mut updated: Booking = booking.clone();
            updated.status = BookingStatus::InReview;
            updated.transaction_id = Some(transaction_id);
            Ok(BookingTransition::Updated(updated))
        }
        BookingCommand::Decide { guide_id, decision } => {
            // Only the assigned guide may decide
            if booking.guide_id != guide_id {
                return Err(CoreError::NotAssignedGuide {
                    assigned_guide_id: booking.guide_id,
                    caller_guide_id: guide_id,
                });
            }

            let target: BookingStatus = decision.resolved_status();
            if !booking.status.can_transition_to(target) {
                return Err(CoreError::DomainViolation(
                    DomainError::IllegalStatusTransition {
                        from: booking.status,
                        to: target,
                    },
                ));
            }

            let mut updated: Booking = booking.clone();
            updated.status = target;
            Ok(BookingTransition::Updated(updated))
        }
        BookingCommand::Cancel { caller } => {
            match caller {
                CancellationCaller::Admin => Ok(BookingTransition::Cancelled),
                CancellationCaller::Tourist(email) => {
                    if booking.tourist_email != email {
                        return Err(CoreError::NotBookingOwner { caller: email });
                    }
                    if booking.status != BookingStatus::Pending {
                        return Err(CoreError::DomainViolation(
                            DomainError::BookingNotCancellable {
                                status: booking.status,
                            },
                        ));
                    }
                    Ok(BookingTransition::Cancelled)
                }
            }
        }
    }
}
