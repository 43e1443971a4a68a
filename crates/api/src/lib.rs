// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Wayfare travel booking platform.
//!
//! Handlers here are transport-agnostic: they take the persistence
//! adapter, request DTOs, and the authenticated session user, enforce
//! authorization, run the core transition logic, and return response
//! DTOs or an [`ApiError`]. The HTTP server maps both onto the wire.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

pub mod auth;
pub mod error;
pub mod handlers;
pub mod payments;
pub mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedUser, AuthenticationService, AuthorizationService};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use payments::{LocalPaymentGateway, PaymentGateway, PaymentGatewayError, PaymentIntent};
