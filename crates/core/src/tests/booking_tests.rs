// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_booking, create_test_email};
use crate::{BookingCommand, BookingTransition, CancellationCaller, CoreError, Decision, apply_booking};
use wayfare_domain::{Booking, BookingStatus, DomainError};

#[test]
fn test_record_payment_advances_pending_to_in_review() {
    let booking: Booking = create_test_booking(BookingStatus::Pending);
    let command: BookingCommand = BookingCommand::RecordPayment {
        transaction_id: String::from("txn_123"),
    };

    let transition: BookingTransition = apply_booking(&booking, command).unwrap();
    match transition {
        BookingTransition::Updated(updated) => {
            assert_eq!(updated.status, BookingStatus::InReview);
            assert_eq!(updated.transaction_id.as_deref(), Some("txn_123"));
        }
        BookingTransition::Cancelled => panic!("expected update"),
    }
}

#[test]
fn test_record_payment_rejected_when_already_in_review() {
    let booking: Booking = create_test_booking(BookingStatus::InReview);
    let command: BookingCommand = BookingCommand::RecordPayment {
        transaction_id: String::from("txn_456"),
    };

    let result = apply_booking(&booking, command);
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::IllegalStatusTransition {
                from: BookingStatus::InReview,
                to: BookingStatus::InReview,
            }
        ))
    ));
}

#[test]
fn test_record_payment_rejected_on_terminal_booking() {
    for status in [BookingStatus::Accepted, BookingStatus::Rejected] {
        let booking: Booking = create_test_booking(status);
        let command: BookingCommand = BookingCommand::RecordPayment {
            transaction_id: String::from("txn_789"),
        };
        assert!(apply_booking(&booking, command).is_err());
    }
}

#[test]
fn test_assigned_guide_accepts_in_review_booking() {
    let booking: Booking = create_test_booking(BookingStatus::InReview);
    let command: BookingCommand = BookingCommand::Decide {
        guide_id: 5,
        decision: Decision::Accepted,
    };

    let transition: BookingTransition = apply_booking(&booking, command).unwrap();
    assert_eq!(
        transition,
        BookingTransition::Updated(Booking {
            status: BookingStatus::Accepted,
            ..booking
        })
    );
}

#[test]
fn test_assigned_guide_rejects_in_review_booking() {
    let booking: Booking = create_test_booking(BookingStatus::InReview);
    let command: BookingCommand = BookingCommand::Decide {
        guide_id: 5,
        decision: Decision::Rejected,
    };

    let transition: BookingTransition = apply_booking(&booking, command).unwrap();
    match transition {
        BookingTransition::Updated(updated) => assert_eq!(updated.status, BookingStatus::Rejected),
        BookingTransition::Cancelled => panic!("expected update"),
    }
}

#[test]
fn test_non_assigned_guide_cannot_decide() {
    let booking: Booking = create_test_booking(BookingStatus::InReview);
    let command: BookingCommand = BookingCommand::Decide {
        guide_id: 99,
        decision: Decision::Accepted,
    };

    let result = apply_booking(&booking, command);
    assert_eq!(
        result,
        Err(CoreError::NotAssignedGuide {
            assigned_guide_id: 5,
            caller_guide_id: 99,
        })
    );
}

#[test]
fn test_decision_on_pending_booking_rejected() {
    let booking: Booking = create_test_booking(BookingStatus::Pending);
    let command: BookingCommand = BookingCommand::Decide {
        guide_id: 5,
        decision: Decision::Accepted,
    };

    assert!(matches!(
        apply_booking(&booking, command),
        Err(CoreError::DomainViolation(
            DomainError::IllegalStatusTransition { .. }
        ))
    ));
}

#[test]
fn test_decision_on_decided_booking_rejected() {
    let booking: Booking = create_test_booking(BookingStatus::Accepted);
    let command: BookingCommand = BookingCommand::Decide {
        guide_id: 5,
        decision: Decision::Rejected,
    };

    assert!(apply_booking(&booking, command).is_err());
}

#[test]
fn test_owner_cancels_pending_booking() {
    let booking: Booking = create_test_booking(BookingStatus::Pending);
    let command: BookingCommand = BookingCommand::Cancel {
        caller: CancellationCaller::Tourist(create_test_email("tourist@example.com")),
    };

    assert_eq!(
        apply_booking(&booking, command).unwrap(),
        BookingTransition::Cancelled
    );
}

#[test]
fn test_owner_cannot_cancel_after_payment() {
    let booking: Booking = create_test_booking(BookingStatus::InReview);
    let command: BookingCommand = BookingCommand::Cancel {
        caller: CancellationCaller::Tourist(create_test_email("tourist@example.com")),
    };

    assert!(matches!(
        apply_booking(&booking, command),
        Err(CoreError::DomainViolation(
            DomainError::BookingNotCancellable {
                status: BookingStatus::InReview,
            }
        ))
    ));
}

#[test]
fn test_non_owner_cannot_cancel() {
    let booking: Booking = create_test_booking(BookingStatus::Pending);
    let command: BookingCommand = BookingCommand::Cancel {
        caller: CancellationCaller::Tourist(create_test_email("other@example.com")),
    };

    assert!(matches!(
        apply_booking(&booking, command),
        Err(CoreError::NotBookingOwner { .. })
    ));
}

#[test]
fn test_admin_cancels_at_any_state() {
    for status in [
        BookingStatus::Pending,
        BookingStatus::InReview,
        BookingStatus::Accepted,
        BookingStatus::Rejected,
    ] {
        let booking: Booking = create_test_booking(status);
        let command: BookingCommand = BookingCommand::Cancel {
            caller: CancellationCaller::Admin,
        };
        assert_eq!(
            apply_booking(&booking, command).unwrap(),
            BookingTransition::Cancelled
        );
    }
}
