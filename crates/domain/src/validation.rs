// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Booking, GuideApplication, Package, Story, User};
use time::Date;
use time::format_description::well_known::Iso8601;

/// Validates that a user's basic field constraints are met.
///
/// Email format is validated at construction time via `Email::new`;
/// this checks the remaining fields.
///
/// # Errors
///
/// Returns an error if the user's name is empty.
pub fn validate_user_fields(user: &User) -> Result<(), DomainError> {
    if user.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a package's field constraints.
///
/// # Errors
///
/// Returns an error if:
/// - The title or location is empty
/// - The duration is zero
/// - The price is negative
pub fn validate_package_fields(package: &Package) -> Result<(), DomainError> {
    if package.title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }
    if package.location.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Location cannot be empty",
        )));
    }
    if package.duration_days == 0 {
        return Err(DomainError::InvalidDuration {
            days: package.duration_days,
        });
    }
    if package.price_cents < 0 {
        return Err(DomainError::InvalidPrice {
            cents: package.price_cents,
        });
    }
    Ok(())
}

/// Validates a booking's field constraints.
///
/// Referential checks (package and guide existence) require store context
/// and are performed at the API boundary.
///
/// # Errors
///
/// Returns an error if:
/// - The tourist name is empty
/// - The price is negative
/// - The tour date is not a valid ISO 8601 date
pub fn validate_booking_fields(booking: &Booking) -> Result<(), DomainError> {
    if booking.tourist_name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Tourist name cannot be empty",
        )));
    }
    if booking.price_cents < 0 {
        return Err(DomainError::InvalidPrice {
            cents: booking.price_cents,
        });
    }
    validate_tour_date(&booking.tour_date)?;
    Ok(())
}

/// Validates that a date string is a parseable ISO 8601 date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string does not parse.
pub fn validate_tour_date(date_string: &str) -> Result<(), DomainError> {
    Date::parse(date_string, &Iso8601::DEFAULT).map_err(|e| DomainError::DateParseError {
        date_string: date_string.to_string(),
        error: e.to_string(),
    })?;
    Ok(())
}

/// Validates a story's field constraints.
///
/// # Errors
///
/// Returns an error if the title or body is empty.
pub fn validate_story_fields(story: &Story) -> Result<(), DomainError> {
    if story.title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }
    if story.body.trim().is_empty() {
        return Err(DomainError::EmptyField { field: "body" });
    }
    Ok(())
}

/// Validates a guide application's field constraints.
///
/// # Errors
///
/// Returns an error if:
/// - The motivation, experience, or specialty is empty
/// - No languages are listed
pub fn validate_application_fields(application: &GuideApplication) -> Result<(), DomainError> {
    if application.motivation.trim().is_empty() {
        return Err(DomainError::EmptyField {
            field: "motivation",
        });
    }
    if application.experience.trim().is_empty() {
        return Err(DomainError::EmptyField {
            field: "experience",
        });
    }
    if application.specialty.trim().is_empty() {
        return Err(DomainError::EmptyField { field: "specialty" });
    }
    if application.languages.iter().all(|l| l.trim().is_empty()) {
        return Err(DomainError::NoLanguages);
    }
    Ok(())
}
