// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment gateway seam.
//!
//! Checkout is a two-step flow: the client asks for a payment intent,
//! completes it against the gateway, then posts the resulting
//! transaction id back to record the payment. The gateway itself sits
//! behind a trait so the server can swap a real processor in without
//! touching the handlers.

use thiserror::Error;

/// A payment intent minted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    /// The gateway's intent identifier.
    pub intent_id: String,
    /// The secret the client uses to complete the payment.
    pub client_secret: String,
    /// The amount to charge, in integer cents.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Errors returned by a payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentGatewayError {
    /// The gateway rejected the amount.
    #[error("Gateway rejected amount {amount_cents}: {reason}")]
    AmountRejected {
        /// The rejected amount in cents.
        amount_cents: i64,
        /// The gateway's reason.
        reason: String,
    },
    /// The gateway could not be reached or returned a failure.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

/// Mints payment intents for booking checkout.
pub trait PaymentGateway: Send + Sync {
    /// Creates a payment intent for the given amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the amount or cannot be
    /// reached.
    fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentGatewayError>;
}

/// In-process gateway used for development and tests.
///
/// Mints random intent ids without contacting any processor.
pub struct LocalPaymentGateway;

impl PaymentGateway for LocalPaymentGateway {
    fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        if amount_cents <= 0 {
            return Err(PaymentGatewayError::AmountRejected {
                amount_cents,
                reason: String::from("amount must be positive"),
            });
        }
        let token: u64 = rand::random::<u64>();
        Ok(PaymentIntent {
            intent_id: format!("pi_{token:016x}"),
            client_secret: format!("pi_{token:016x}_secret_{:08x}", rand::random::<u32>()),
            amount_cents,
            currency: currency.to_string(),
        })
    }
}
