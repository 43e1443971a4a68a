// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use wayfare_persistence::Persistence;

use crate::error::ApiError;
use crate::handlers;
use crate::payments::{LocalPaymentGateway, PaymentGateway, PaymentGatewayError, PaymentIntent};
use crate::request_response::{CreatePaymentIntentRequest, RecordPaymentRequest};
use crate::tests::{
    create_test_persistence, sign_in, sign_in_admin, sign_in_guide, test_booking_request,
    seed_package,
};

struct DownGateway;

impl PaymentGateway for DownGateway {
    fn create_intent(
        &self,
        _amount_cents: i64,
        _currency: &str,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        Err(PaymentGatewayError::Unavailable(String::from(
            "connection refused",
        )))
    }
}

fn seed_pending_booking(persistence: &mut Persistence) -> (crate::auth::AuthenticatedUser, i64) {
    let (_admin_token, admin) = sign_in_admin(persistence, "boss@example.com");
    let (_guide_token, _guide, guide_id) = sign_in_guide(persistence, "gregor@example.com", &admin);
    let package_id: i64 = seed_package(persistence, &admin);
    let (_token, tourist) = sign_in(persistence, "fiona@example.com", "Fiona");
    let booking = handlers::create_booking(
        persistence,
        &tourist,
        test_booking_request(package_id, guide_id),
    )
    .expect("Booking failed");
    (tourist, booking.booking_id)
}

#[test]
fn test_intent_amount_matches_booking_price() {
    let mut persistence: Persistence = create_test_persistence();
    let (tourist, booking_id) = seed_pending_booking(&mut persistence);

    let intent = handlers::create_payment_intent(
        &mut persistence,
        &LocalPaymentGateway,
        &tourist,
        CreatePaymentIntentRequest { booking_id },
    )
    .expect("Intent failed");

    assert_eq!(intent.amount_cents, 120_000);
    assert_eq!(intent.currency, "usd");
    assert!(intent.intent_id.starts_with("pi_"));
    assert!(intent.client_secret.contains("_secret_"));
}

#[test]
fn test_only_booking_owner_may_pay() {
    let mut persistence: Persistence = create_test_persistence();
    let (_tourist, booking_id) = seed_pending_booking(&mut persistence);
    let (_other_token, other) = sign_in(&mut persistence, "hamish@example.com", "Hamish");

    let intent = handlers::create_payment_intent(
        &mut persistence,
        &LocalPaymentGateway,
        &other,
        CreatePaymentIntentRequest { booking_id },
    );
    assert!(matches!(
        intent,
        Err(ApiError::Unauthorized { required_role, .. }) if required_role == "booking tourist"
    ));

    let record = handlers::record_payment(
        &mut persistence,
        &other,
        RecordPaymentRequest {
            booking_id,
            transaction_id: String::from("txn_123"),
        },
    );
    assert!(matches!(record, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_intent_on_paid_booking_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let (tourist, booking_id) = seed_pending_booking(&mut persistence);
    handlers::record_payment(
        &mut persistence,
        &tourist,
        RecordPaymentRequest {
            booking_id,
            transaction_id: String::from("txn_123"),
        },
    )
    .expect("Payment failed");

    let result = handlers::create_payment_intent(
        &mut persistence,
        &LocalPaymentGateway,
        &tourist,
        CreatePaymentIntentRequest { booking_id },
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "booking_status_transition"
    ));
}

#[test]
fn test_double_payment_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let (tourist, booking_id) = seed_pending_booking(&mut persistence);
    handlers::record_payment(
        &mut persistence,
        &tourist,
        RecordPaymentRequest {
            booking_id,
            transaction_id: String::from("txn_123"),
        },
    )
    .expect("Payment failed");

    let result = handlers::record_payment(
        &mut persistence,
        &tourist,
        RecordPaymentRequest {
            booking_id,
            transaction_id: String::from("txn_456"),
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "booking_status_transition"
    ));
}

#[test]
fn test_gateway_failure_surfaces_as_upstream() {
    let mut persistence: Persistence = create_test_persistence();
    let (tourist, booking_id) = seed_pending_booking(&mut persistence);

    let result = handlers::create_payment_intent(
        &mut persistence,
        &DownGateway,
        &tourist,
        CreatePaymentIntentRequest { booking_id },
    );
    assert!(matches!(result, Err(ApiError::UpstreamFailure { .. })));
}

#[test]
fn test_payment_for_missing_booking_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let (_token, tourist) = sign_in(&mut persistence, "fiona@example.com", "Fiona");

    let result = handlers::record_payment(
        &mut persistence,
        &tourist,
        RecordPaymentRequest {
            booking_id: 9999,
            transaction_id: String::from("txn_123"),
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { resource_type, .. }) if resource_type == "Booking"
    ));
}

#[test]
fn test_local_gateway_rejects_non_positive_amounts() {
    let result = LocalPaymentGateway.create_intent(0, "usd");
    assert!(matches!(
        result,
        Err(PaymentGatewayError::AmountRejected { amount_cents: 0, .. })
    ));
}
