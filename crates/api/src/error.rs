// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use wayfare::CoreError;
use wayfare_domain::DomainError;
use wayfare_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An upstream dependency (the payment gateway) failed.
    UpstreamFailure {
        /// A description of the upstream failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::UpstreamFailure { message } => {
                write!(f, "Upstream failure: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidEmail(value) => ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("Invalid email address: '{value}'"),
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidRole(value) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Invalid role: '{value}'. Must be 'tourist', 'tourGuide', or 'admin'"),
        },
        DomainError::InvalidBookingStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!(
                "Invalid booking status: '{value}'. Must be 'Accepted' or 'Rejected'"
            ),
        },
        DomainError::InvalidTitle(msg) => ApiError::InvalidInput {
            field: String::from("title"),
            message: msg,
        },
        DomainError::InvalidLocation(msg) => ApiError::InvalidInput {
            field: String::from("location"),
            message: msg,
        },
        DomainError::InvalidDuration { days } => ApiError::InvalidInput {
            field: String::from("duration_days"),
            message: format!("Invalid duration: {days}. Must be at least 1 day"),
        },
        DomainError::InvalidPrice { cents } => ApiError::InvalidInput {
            field: String::from("price_cents"),
            message: format!("Invalid price: {cents}. Must be non-negative"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("tour_date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::EmptyField { field } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Field '{field}' cannot be empty"),
        },
        DomainError::NoLanguages => ApiError::InvalidInput {
            field: String::from("languages"),
            message: String::from("At least one language is required"),
        },
        DomainError::IllegalStatusTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("booking_status_transition"),
            message: format!("Illegal booking status transition: {from} -> {to}"),
        },
        DomainError::BookingNotCancellable { status } => ApiError::DomainRuleViolation {
            rule: String::from("booking_cancellation"),
            message: format!(
                "Booking cannot be cancelled in status '{status}': only pending bookings may be cancelled by the tourist"
            ),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotAssignedGuide { .. } => ApiError::Unauthorized {
            action: String::from("decide_booking"),
            required_role: String::from("assigned tourGuide"),
        },
        CoreError::NotBookingOwner { .. } => ApiError::Unauthorized {
            action: String::from("cancel_booking"),
            required_role: String::from("booking tourist"),
        },
        CoreError::ApplicantMismatch {
            application_email,
            user_email,
        } => ApiError::DomainRuleViolation {
            rule: String::from("applicant_identity"),
            message: format!(
                "Application email '{application_email}' does not match user '{user_email}'"
            ),
        },
        CoreError::UnpersistedEntity { entity } => ApiError::Internal {
            message: format!("{entity} has not been persisted and carries no id"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// `NotFound` becomes a resource error; everything else is internal.
#[must_use]
pub fn translate_persistence_error(resource_type: &str, err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message,
        },
        PersistenceError::ForeignKeyViolation(_) => ApiError::DomainRuleViolation {
            rule: String::from("referential_integrity"),
            message: format!("{resource_type} is still referenced by other records"),
        },
        _ => ApiError::Internal {
            message: format!("Storage error: {err}"),
        },
    }
}
