// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The role assigned to a user account.
///
/// Roles are the sole access-control primitive: every gated operation
/// requires a minimum role, checked through the authorization service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Default role assigned at first sign-in. May book tours, publish
    /// stories, and apply to become a guide.
    #[default]
    Tourist,
    /// A promoted guide. May additionally decide bookings assigned to them.
    TourGuide,
    /// Administrative role. May manage users, packages, and applications.
    Admin,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tourist" => Ok(Self::Tourist),
            "tourGuide" => Ok(Self::TourGuide),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Converts this role to its canonical wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tourist => "tourist",
            Self::TourGuide => "tourGuide",
            Self::Admin => "admin",
        }
    }
}

/// The lifecycle state of a booking.
///
/// The only legal forward transitions are:
/// - `Pending` → `InReview` (a payment was recorded)
/// - `InReview` → `Accepted` or `Rejected` (the assigned guide decided)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BookingStatus {
    /// Initial state, forced at creation regardless of request content.
    #[default]
    Pending,
    /// A payment has been recorded; awaiting the guide's decision.
    InReview,
    /// The assigned guide accepted the booking. Terminal.
    Accepted,
    /// The assigned guide rejected the booking. Terminal.
    Rejected,
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "In Review" => Ok(Self::InReview),
            "Accepted" => Ok(Self::Accepted),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl BookingStatus {
    /// Converts this status to its wire representation.
    ///
    /// `InReview` serializes as `"In Review"`, the form clients display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InReview => "In Review",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Pending` → `InReview`
    /// - `InReview` → `Accepted`
    /// - `InReview` → `Rejected`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::InReview) | (Self::InReview, Self::Accepted | Self::Rejected)
        )
    }

    /// Returns whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// A normalized email address.
///
/// Email is the natural key for user accounts. Addresses are normalized
/// to lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email {
    /// The normalized address.
    value: String,
}

impl Email {
    /// Creates a new `Email`, normalizing to lowercase.
    ///
    /// # Arguments
    ///
    /// * `value` - The address (will be trimmed and lowercased)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` if the address is empty or has
    /// no `@` separating a non-empty local part and a dotted domain.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value.trim().to_lowercase();
        let valid: bool = normalized
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(DomainError::InvalidEmail(value.to_string()));
        }
        Ok(Self { value: normalized })
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A user account.
///
/// `user_id` is the canonical internal identifier. Email remains unique
/// but is not the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Canonical internal identifier. `None` before first persistence.
    pub user_id: Option<i64>,
    /// The user's email address (unique, natural key for sign-in).
    pub email: Email,
    /// The user's display name.
    pub name: String,
    /// Optional avatar URL.
    pub photo: Option<String>,
    /// The user's role.
    pub role: Role,
}

impl User {
    /// Creates a new `User` without a persisted `user_id`.
    #[must_use]
    pub const fn new(email: Email, name: String, photo: Option<String>, role: Role) -> Self {
        Self {
            user_id: None,
            email,
            name,
            photo,
            role,
        }
    }

    /// Creates a `User` with an existing `user_id` (from persistence).
    #[must_use]
    pub const fn with_id(
        user_id: i64,
        email: Email,
        name: String,
        photo: Option<String>,
        role: Role,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            email,
            name,
            photo,
            role,
        }
    }
}

/// A tour package offered for booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Canonical internal identifier. `None` before first persistence.
    pub package_id: Option<i64>,
    /// The package title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// The destination location.
    pub location: String,
    /// Tour duration in days. Must be positive.
    pub duration_days: u32,
    /// Price in integer cents. Must be non-negative.
    pub price_cents: i64,
    /// Free-form category (e.g., "adventure", "cultural").
    pub category: String,
    /// Free-text itinerary.
    pub itinerary: String,
    /// Image URLs for the package gallery.
    pub images: Vec<String>,
}

/// A tourist's reservation against a package and an assigned guide.
///
/// Packages and guides are referenced by canonical id; display fields are
/// resolved by the read path, so later edits to a package or guide cannot
/// leave stale names on the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Canonical internal identifier. `None` before first persistence.
    pub booking_id: Option<i64>,
    /// The booked package.
    pub package_id: i64,
    /// The assigned tour guide (a `TourGuide` record id).
    pub guide_id: i64,
    /// The booking tourist's email address.
    pub tourist_email: Email,
    /// The booking tourist's display name (snapshot at booking time).
    pub tourist_name: String,
    /// Price in integer cents at booking time.
    pub price_cents: i64,
    /// Requested tour date (ISO 8601 date).
    pub tour_date: String,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Payment transaction id, populated when a payment is recorded.
    pub transaction_id: Option<String>,
}

/// A published travel story.
///
/// Author identity is a snapshot of the session user at creation time.
/// Only the author may mutate or delete a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Canonical internal identifier. `None` before first persistence.
    pub story_id: Option<i64>,
    /// The story title.
    pub title: String,
    /// The story body text.
    pub body: String,
    /// Image URLs attached to the story.
    pub images: Vec<String>,
    /// The author's email address.
    pub author_email: Email,
    /// The author's display name.
    pub author_name: String,
    /// The author's avatar URL.
    pub author_photo: Option<String>,
}

/// A pending request by a tourist to be promoted to the tour-guide role.
///
/// Existence means pending: acceptance and rejection both remove the
/// record, so no terminal state is ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideApplication {
    /// Canonical internal identifier. `None` before first persistence.
    pub application_id: Option<i64>,
    /// The applicant's email address.
    pub applicant_email: Email,
    /// The applicant's display name.
    pub applicant_name: String,
    /// The applicant's avatar URL.
    pub applicant_photo: Option<String>,
    /// Why the applicant wants to become a guide.
    pub motivation: String,
    /// Relevant experience, free text.
    pub experience: String,
    /// Guiding specialty (e.g., "mountain trekking").
    pub specialty: String,
    /// Languages the applicant speaks.
    pub languages: Vec<String>,
    /// Link to the applicant's CV.
    pub cv_link: String,
    /// Submission timestamp (ISO 8601).
    pub submitted_at: String,
}

/// A promoted-applicant profile surfaced in guide listings.
///
/// Distinct from the `User` record. A guide record is only surfaced while
/// the corresponding user's role is still `tourGuide`; role downgrade
/// hides the record at read time without deleting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourGuide {
    /// Canonical internal identifier. `None` before first persistence.
    pub guide_id: Option<i64>,
    /// The promoted user's canonical id. Unique, so acceptance retries
    /// cannot duplicate the guide record.
    pub user_id: i64,
    /// The guide's email address.
    pub email: Email,
    /// The guide's display name.
    pub name: String,
    /// The guide's avatar URL.
    pub photo: Option<String>,
    /// Experience copied from the accepted application.
    pub experience: String,
    /// Specialty copied from the accepted application.
    pub specialty: String,
    /// Languages copied from the accepted application.
    pub languages: Vec<String>,
}

/// A recorded payment against a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Canonical internal identifier. `None` before first persistence.
    pub payment_id: Option<i64>,
    /// The booking this payment settles.
    pub booking_id: i64,
    /// The payer's email address.
    pub payer_email: Email,
    /// The gateway transaction id.
    pub transaction_id: String,
    /// Amount in integer cents.
    pub amount_cents: i64,
    /// Payment timestamp (ISO 8601).
    pub paid_at: String,
    /// Payment status. This system only ever records settled payments.
    pub status: String,
}

impl Payment {
    /// The only payment status this system writes.
    pub const STATUS_SUCCEEDED: &'static str = "succeeded";
}
