// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use types::{
    Booking, BookingStatus, Email, GuideApplication, Package, Payment, Role, Story, TourGuide,
    User,
};
pub use validation::{
    validate_application_fields, validate_booking_fields, validate_package_fields,
    validate_story_fields, validate_tour_date, validate_user_fields,
};
