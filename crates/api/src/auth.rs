// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization services.
//!
//! Sign-in is passwordless: presenting an email with a display name
//! upserts the account and mints a session token. Every gated handler
//! resolves the acting user from that token, never from request fields,
//! so a caller cannot act as someone else by naming them.

use time::{Duration, OffsetDateTime};
use wayfare_domain::{Email, Role, User};
use wayfare_persistence::{Persistence, SessionData};

use crate::error::AuthError;

/// The user resolved from a validated session token.
///
/// Handlers trust these fields: they were read from the users table
/// during validation, not from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The user's canonical id.
    pub user_id: i64,
    /// The user's email address.
    pub email: Email,
    /// The user's display name.
    pub name: String,
    /// The user's avatar URL.
    pub photo: Option<String>,
    /// The user's role.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Creates an authenticated user from a stored account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account has not been persisted.
    pub fn from_user(user: User) -> Result<Self, AuthError> {
        let user_id: i64 = user.user_id.ok_or_else(|| AuthError::AuthenticationFailed {
            reason: String::from("Account has no persisted id"),
        })?;
        Ok(Self {
            user_id,
            email: user.email,
            name: user.name,
            photo: user.photo,
            role: user.role,
        })
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Every gated operation routes through exactly one of these checks, so
/// the role requirement for any action can be read off in one place.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(user: &AuthenticatedUser, action: &str) -> Result<(), AuthError> {
        match user.role {
            Role::Admin => Ok(()),
            Role::Tourist | Role::TourGuide => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("admin"),
            }),
        }
    }

    fn require_guide(user: &AuthenticatedUser, action: &str) -> Result<(), AuthError> {
        match user.role {
            Role::TourGuide => Ok(()),
            Role::Tourist | Role::Admin => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("tourGuide"),
            }),
        }
    }

    /// Checks if a user may list, delete, or change the role of accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not hold the admin role.
    pub fn authorize_manage_users(user: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_admin(user, "manage_users")
    }

    /// Checks if a user may create, update, or delete tour packages.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not hold the admin role.
    pub fn authorize_manage_packages(user: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_admin(user, "manage_packages")
    }

    /// Checks if a user may view every booking in the system.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not hold the admin role.
    pub fn authorize_view_all_bookings(user: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_admin(user, "view_all_bookings")
    }

    /// Checks if a user may review, accept, or reject guide applications.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not hold the admin role.
    pub fn authorize_review_applications(user: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_admin(user, "review_applications")
    }

    /// Checks if a user may view the bookings assigned to a guide.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not hold the tour-guide role.
    pub fn authorize_view_guide_bookings(user: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_guide(user, "view_guide_bookings")
    }

    /// Checks if a user may decide an in-review booking.
    ///
    /// Role check only; whether the caller is the assigned guide is
    /// enforced by the booking transition itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not hold the tour-guide role.
    pub fn authorize_decide_booking(user: &AuthenticatedUser) -> Result<(), AuthError> {
        Self::require_guide(user, "decide_booking")
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Signs a user in, creating the account on first contact.
    ///
    /// The account is upserted with the `tourist` role; an existing
    /// account keeps its stored role. A fresh session token is minted
    /// either way.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The sign-in email address
    /// * `name` - The display name to store
    /// * `photo` - Optional avatar URL to store
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_user`)
    ///
    /// # Errors
    ///
    /// Returns an error if the account or session cannot be stored.
    pub fn sign_in(
        persistence: &mut Persistence,
        email: Email,
        name: String,
        photo: Option<String>,
    ) -> Result<(String, AuthenticatedUser), AuthError> {
        let requested: User = User::new(email, name, photo, Role::Tourist);
        let stored: User = persistence.upsert_user(&requested).map_err(|e| {
            AuthError::AuthenticationFailed {
                reason: format!("Failed to store account: {e}"),
            }
        })?;
        let user: AuthenticatedUser = AuthenticatedUser::from_user(stored)?;

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String = expires_at
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, user.user_id, &expires_at_str)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        Ok((session_token, user))
    }

    /// Validates a session token and returns the authenticated user.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired, or the
    /// linked account no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(
            &session.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse session expiration: {e}"),
        })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: User = persistence
            .get_user_by_id(session.user_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Account not found"),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?;

        AuthenticatedUser::from_user(user)
    }

    /// Logs out by deleting the session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to delete
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Generates a session token.
    fn generate_session_token() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp: u128 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }
}
