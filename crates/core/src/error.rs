// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use wayfare_domain::{DomainError, Email};

/// Errors that can occur during lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The caller is not the guide assigned to the booking.
    NotAssignedGuide {
        /// The guide id on the booking.
        assigned_guide_id: i64,
        /// The guide id of the caller.
        caller_guide_id: i64,
    },
    /// The caller is not the tourist who owns the booking.
    NotBookingOwner {
        /// The email of the caller.
        caller: Email,
    },
    /// The application's email does not match the resolved applicant user.
    ApplicantMismatch {
        /// The email on the application.
        application_email: Email,
        /// The email of the resolved user.
        user_email: Email,
    },
    /// An entity that must already be persisted carries no id.
    UnpersistedEntity {
        /// The entity kind.
        entity: &'static str,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::NotAssignedGuide {
                assigned_guide_id,
                caller_guide_id,
            } => {
                write!(
                    f,
                    "Guide {caller_guide_id} is not assigned to this booking (assigned: {assigned_guide_id})"
                )
            }
            Self::NotBookingOwner { caller } => {
                write!(f, "'{caller}' is not the tourist who owns this booking")
            }
            Self::ApplicantMismatch {
                application_email,
                user_email,
            } => {
                write!(
                    f,
                    "Application email '{application_email}' does not match user '{user_email}'"
                )
            }
            Self::UnpersistedEntity { entity } => {
                write!(f, "{entity} has not been persisted and carries no id")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
