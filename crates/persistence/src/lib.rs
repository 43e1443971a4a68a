// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Wayfare travel booking platform.
//!
//! This crate stores every Wayfare entity in `SQLite` via Diesel:
//! user accounts, tour packages, bookings, stories, guide applications,
//! promoted guide profiles, payments, and auth sessions.
//!
//! In-memory databases are used for development and tests; production
//! deployments use a file-backed database with WAL mode enabled.
//! Foreign key enforcement is verified at startup, never assumed.
//!
//! Multi-table writes (application acceptance, payment recording) are
//! transactional, so partially-applied fan-outs cannot be observed.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use wayfare::AcceptancePlan;
use wayfare_domain::{
    Booking, GuideApplication, Package, Payment, Role, Story, TourGuide, User,
};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::SessionData;
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Create a unique shared in-memory database name per call so tests are isolated.
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_wayfare_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates or updates a user account keyed by email.
    ///
    /// New accounts are stored as given; existing accounts keep their
    /// stored role and refresh only display fields.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn upsert_user(&mut self, user: &User) -> Result<User, PersistenceError> {
        mutations::users::upsert_user(&mut self.conn, user)
    }

    /// Retrieves a user by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<User>, PersistenceError> {
        queries::users::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves a user by canonical id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<User>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Lists user accounts, optionally filtered by role and search term.
    ///
    /// # Arguments
    ///
    /// * `role` - Restrict to accounts holding this role
    /// * `search` - Substring matched against name or email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(
        &mut self,
        role: Option<Role>,
        search: Option<&str>,
    ) -> Result<Vec<User>, PersistenceError> {
        queries::users::list_users(&mut self.conn, role, search)
    }

    /// Sets a user's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the user doesn't exist or the update fails.
    pub fn set_user_role(&mut self, user_id: i64, role: Role) -> Result<(), PersistenceError> {
        mutations::users::set_user_role(&mut self.conn, user_id, role)
    }

    /// Deletes a user account, cascading sessions and guide records.
    ///
    /// # Errors
    ///
    /// Returns an error if the user doesn't exist or the delete fails.
    pub fn delete_user(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::delete_user(&mut self.conn, user_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a new session for a user.
    ///
    /// # Arguments
    ///
    /// * `session_token` - The unique session token
    /// * `user_id` - The user ID
    /// * `expires_at` - The expiration timestamp (ISO 8601 format)
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all sessions belonging to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_sessions_for_user(&mut self, user_id: i64) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_sessions_for_user(&mut self.conn, user_id)
    }

    /// Deletes all expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn)
    }

    // ========================================================================
    // Packages
    // ========================================================================

    /// Inserts a new tour package.
    ///
    /// # Returns
    ///
    /// The generated package id.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_package(&mut self, package: &Package) -> Result<i64, PersistenceError> {
        mutations::packages::create_package(&mut self.conn, package)
    }

    /// Retrieves a package by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_package(&mut self, package_id: i64) -> Result<Option<Package>, PersistenceError> {
        queries::packages::get_package(&mut self.conn, package_id)
    }

    /// Lists all packages.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_packages(&mut self) -> Result<Vec<Package>, PersistenceError> {
        queries::packages::list_packages(&mut self.conn)
    }

    /// Replaces all mutable fields of a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the package doesn't exist or the update fails.
    pub fn update_package(
        &mut self,
        package_id: i64,
        package: &Package,
    ) -> Result<(), PersistenceError> {
        mutations::packages::update_package(&mut self.conn, package_id, package)
    }

    /// Deletes a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the package doesn't exist or the delete fails.
    pub fn delete_package(&mut self, package_id: i64) -> Result<(), PersistenceError> {
        mutations::packages::delete_package(&mut self.conn, package_id)
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Inserts a new booking.
    ///
    /// # Returns
    ///
    /// The generated booking id.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails, including when the
    /// referenced package or guide does not exist.
    pub fn create_booking(&mut self, booking: &Booking) -> Result<i64, PersistenceError> {
        mutations::bookings::create_booking(&mut self.conn, booking)
    }

    /// Retrieves a booking by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_booking(&mut self, booking_id: i64) -> Result<Option<Booking>, PersistenceError> {
        queries::bookings::get_booking(&mut self.conn, booking_id)
    }

    /// Lists all bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_all_bookings(&mut self) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_all_bookings(&mut self.conn)
    }

    /// Lists the bookings placed by a tourist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_bookings_for_tourist(
        &mut self,
        tourist_email: &str,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_bookings_for_tourist(&mut self.conn, tourist_email)
    }

    /// Lists the bookings assigned to a guide record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_bookings_for_guide(
        &mut self,
        guide_id: i64,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_bookings_for_guide(&mut self.conn, guide_id)
    }

    /// Writes the lifecycle fields of a booking after a status transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking doesn't exist or the update fails.
    pub fn update_booking_state(
        &mut self,
        booking_id: i64,
        booking: &Booking,
    ) -> Result<(), PersistenceError> {
        mutations::bookings::update_booking_state(&mut self.conn, booking_id, booking)
    }

    /// Deletes a booking, cascading its payments.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking doesn't exist or the delete fails.
    pub fn delete_booking(&mut self, booking_id: i64) -> Result<(), PersistenceError> {
        mutations::bookings::delete_booking(&mut self.conn, booking_id)
    }

    // ========================================================================
    // Stories
    // ========================================================================

    /// Inserts a new story.
    ///
    /// # Returns
    ///
    /// The generated story id.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_story(&mut self, story: &Story) -> Result<i64, PersistenceError> {
        mutations::stories::create_story(&mut self.conn, story)
    }

    /// Retrieves a story by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_story(&mut self, story_id: i64) -> Result<Option<Story>, PersistenceError> {
        queries::stories::get_story(&mut self.conn, story_id)
    }

    /// Lists all stories, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_stories(&mut self) -> Result<Vec<Story>, PersistenceError> {
        queries::stories::list_stories(&mut self.conn)
    }

    /// Updates a story's content fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the story doesn't exist or the update fails.
    pub fn update_story(&mut self, story_id: i64, story: &Story) -> Result<(), PersistenceError> {
        mutations::stories::update_story(&mut self.conn, story_id, story)
    }

    /// Deletes a story.
    ///
    /// # Errors
    ///
    /// Returns an error if the story doesn't exist or the delete fails.
    pub fn delete_story(&mut self, story_id: i64) -> Result<(), PersistenceError> {
        mutations::stories::delete_story(&mut self.conn, story_id)
    }

    // ========================================================================
    // Guide applications
    // ========================================================================

    /// Inserts a new guide application.
    ///
    /// # Returns
    ///
    /// The generated application id.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_application(
        &mut self,
        application: &GuideApplication,
    ) -> Result<i64, PersistenceError> {
        mutations::applications::create_application(&mut self.conn, application)
    }

    /// Retrieves a guide application by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_application(
        &mut self,
        application_id: i64,
    ) -> Result<Option<GuideApplication>, PersistenceError> {
        queries::applications::get_application(&mut self.conn, application_id)
    }

    /// Lists all pending guide applications.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_applications(&mut self) -> Result<Vec<GuideApplication>, PersistenceError> {
        queries::applications::list_applications(&mut self.conn)
    }

    /// Deletes a guide application (rejection).
    ///
    /// # Errors
    ///
    /// Returns an error if the application doesn't exist or the delete fails.
    pub fn delete_application(&mut self, application_id: i64) -> Result<(), PersistenceError> {
        mutations::applications::delete_application(&mut self.conn, application_id)
    }

    /// Applies an acceptance plan atomically: role promotion, guide
    /// record creation, and application removal in one transaction.
    ///
    /// # Returns
    ///
    /// The persisted guide record.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; no partial state is kept.
    pub fn accept_application(
        &mut self,
        plan: &AcceptancePlan,
    ) -> Result<TourGuide, PersistenceError> {
        mutations::applications::accept_application(&mut self.conn, plan)
    }

    // ========================================================================
    // Tour guides
    // ========================================================================

    /// Lists guide profiles whose linked user still holds the guide role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_guides(&mut self) -> Result<Vec<TourGuide>, PersistenceError> {
        queries::tour_guides::list_guides(&mut self.conn)
    }

    /// Retrieves a guide profile by id, role-checked.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_guide(&mut self, guide_id: i64) -> Result<Option<TourGuide>, PersistenceError> {
        queries::tour_guides::get_guide(&mut self.conn, guide_id)
    }

    /// Retrieves a guide profile by id without the role check.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_guide_record(
        &mut self,
        guide_id: i64,
    ) -> Result<Option<TourGuide>, PersistenceError> {
        queries::tour_guides::get_guide_record(&mut self.conn, guide_id)
    }

    /// Retrieves a guide profile by the linked user's canonical id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_guide_by_user_id(
        &mut self,
        user_id: i64,
    ) -> Result<Option<TourGuide>, PersistenceError> {
        queries::tour_guides::get_guide_by_user_id(&mut self.conn, user_id)
    }

    /// Retrieves a guide profile by the guide's email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_guide_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<TourGuide>, PersistenceError> {
        queries::tour_guides::get_guide_by_email(&mut self.conn, email)
    }

    // ========================================================================
    // Payments
    // ========================================================================

    /// Records a payment and advances its booking in one transaction.
    ///
    /// # Returns
    ///
    /// The generated payment id.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; no partial state is kept.
    pub fn record_payment(
        &mut self,
        payment: &Payment,
        updated_booking: &Booking,
    ) -> Result<i64, PersistenceError> {
        mutations::payments::record_payment(&mut self.conn, payment, updated_booking)
    }

    /// Retrieves the payment recorded against a booking, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_payment_by_booking(
        &mut self,
        booking_id: i64,
    ) -> Result<Option<Payment>, PersistenceError> {
        queries::payments::get_payment_by_booking(&mut self.conn, booking_id)
    }

    /// Lists all recorded payments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_payments(&mut self) -> Result<Vec<Payment>, PersistenceError> {
        queries::payments::list_payments(&mut self.conn)
    }
}
