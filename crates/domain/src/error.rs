// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::BookingStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// Display name is empty or invalid.
    InvalidName(String),
    /// Role string is not one of the recognized roles.
    InvalidRole(String),
    /// Booking status string is not one of the recognized statuses.
    InvalidBookingStatus(String),
    /// Package title is empty or invalid.
    InvalidTitle(String),
    /// Package location is empty or invalid.
    InvalidLocation(String),
    /// Tour duration must be a positive number of days.
    InvalidDuration {
        /// The invalid duration value.
        days: u32,
    },
    /// Price must be non-negative.
    InvalidPrice {
        /// The invalid price in cents.
        cents: i64,
    },
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A required free-text field is empty.
    EmptyField {
        /// The field name.
        field: &'static str,
    },
    /// An application must list at least one language.
    NoLanguages,
    /// The requested booking status transition is not legal.
    IllegalStatusTransition {
        /// The current status.
        from: BookingStatus,
        /// The requested status.
        to: BookingStatus,
    },
    /// A booking can only be cancelled by its tourist while still pending.
    BookingNotCancellable {
        /// The booking's current status.
        status: BookingStatus,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(value) => write!(f, "Invalid email address: '{value}'"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidRole(value) => {
                write!(
                    f,
                    "Invalid role: '{value}'. Must be 'tourist', 'tourGuide', or 'admin'"
                )
            }
            Self::InvalidBookingStatus(value) => {
                write!(
                    f,
                    "Invalid booking status: '{value}'. Must be 'Pending', 'In Review', 'Accepted', or 'Rejected'"
                )
            }
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidLocation(msg) => write!(f, "Invalid location: {msg}"),
            Self::InvalidDuration { days } => {
                write!(f, "Invalid duration: {days}. Must be at least 1 day")
            }
            Self::InvalidPrice { cents } => {
                write!(f, "Invalid price: {cents}. Must be non-negative")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::EmptyField { field } => write!(f, "Field '{field}' cannot be empty"),
            Self::NoLanguages => write!(f, "At least one language is required"),
            Self::IllegalStatusTransition { from, to } => {
                write!(f, "Illegal booking status transition: {from} -> {to}")
            }
            Self::BookingNotCancellable { status } => {
                write!(
                    f,
                    "Booking cannot be cancelled in status '{status}': only pending bookings may be cancelled by the tourist"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
