// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs mapping `SQLite` tables to domain entities.
//!
//! List-valued columns (`images_json`, `languages_json`) are stored as
//! JSON arrays of strings and decoded on read.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use wayfare_domain::{
    Booking, BookingStatus, Email, GuideApplication, Package, Payment, Role, Story, TourGuide,
    User,
};

use crate::error::PersistenceError;

/// Decodes a JSON-encoded string list column.
fn decode_string_list(raw: &str, table: &'static str) -> Result<Vec<String>, PersistenceError> {
    serde_json::from_str(raw).map_err(|e| PersistenceError::CorruptRecord {
        table,
        reason: format!("invalid JSON list: {e}"),
    })
}

/// Encodes a string list for storage.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_string_list(values: &[String]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(values)?)
}

/// Row struct for the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub photo: Option<String>,
    pub role: String,
}

impl UserRow {
    /// Converts this row into a domain [`User`].
    ///
    /// # Errors
    ///
    /// Returns an error if stored values do not parse into domain types.
    pub fn into_user(self) -> Result<User, PersistenceError> {
        let email: Email =
            Email::new(&self.email).map_err(|e| PersistenceError::CorruptRecord {
                table: "users",
                reason: e.to_string(),
            })?;
        let role: Role = self
            .role
            .parse()
            .map_err(|_| PersistenceError::CorruptRecord {
                table: "users",
                reason: format!("unknown role '{}'", self.role),
            })?;
        Ok(User::with_id(
            self.user_id,
            email,
            self.name,
            self.photo,
            role,
        ))
    }
}

/// Row struct for the `packages` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::packages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PackageRow {
    pub package_id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub duration_days: i32,
    pub price_cents: i64,
    pub category: String,
    pub itinerary: String,
    pub images_json: String,
}

impl PackageRow {
    /// Converts this row into a domain [`Package`].
    ///
    /// # Errors
    ///
    /// Returns an error if stored values do not parse into domain types.
    pub fn into_package(self) -> Result<Package, PersistenceError> {
        let duration_days: u32 =
            u32::try_from(self.duration_days).map_err(|_| PersistenceError::CorruptRecord {
                table: "packages",
                reason: format!("negative duration {}", self.duration_days),
            })?;
        let images: Vec<String> = decode_string_list(&self.images_json, "packages")?;
        Ok(Package {
            package_id: Some(self.package_id),
            title: self.title,
            description: self.description,
            location: self.location,
            duration_days,
            price_cents: self.price_cents,
            category: self.category,
            itinerary: self.itinerary,
            images,
        })
    }
}

/// Row struct for the `tour_guides` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::tour_guides)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TourGuideRow {
    pub guide_id: i64,
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub photo: Option<String>,
    pub experience: String,
    pub specialty: String,
    pub languages_json: String,
}

impl TourGuideRow {
    /// Converts this row into a domain [`TourGuide`].
    ///
    /// # Errors
    ///
    /// Returns an error if stored values do not parse into domain types.
    pub fn into_tour_guide(self) -> Result<TourGuide, PersistenceError> {
        let email: Email =
            Email::new(&self.email).map_err(|e| PersistenceError::CorruptRecord {
                table: "tour_guides",
                reason: e.to_string(),
            })?;
        let languages: Vec<String> = decode_string_list(&self.languages_json, "tour_guides")?;
        Ok(TourGuide {
            guide_id: Some(self.guide_id),
            user_id: self.user_id,
            email,
            name: self.name,
            photo: self.photo,
            experience: self.experience,
            specialty: self.specialty,
            languages,
        })
    }
}

/// Row struct for the `bookings` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookingRow {
    pub booking_id: i64,
    pub package_id: i64,
    pub guide_id: i64,
    pub tourist_email: String,
    pub tourist_name: String,
    pub price_cents: i64,
    pub tour_date: String,
    pub status: String,
    pub transaction_id: Option<String>,
}

impl BookingRow {
    /// Converts this row into a domain [`Booking`].
    ///
    /// # Errors
    ///
    /// Returns an error if stored values do not parse into domain types.
    pub fn into_booking(self) -> Result<Booking, PersistenceError> {
        let tourist_email: Email =
            Email::new(&self.tourist_email).map_err(|e| PersistenceError::CorruptRecord {
                table: "bookings",
                reason: e.to_string(),
            })?;
        let status: BookingStatus =
            self.status
                .parse()
                .map_err(|_| PersistenceError::CorruptRecord {
                    table: "bookings",
                    reason: format!("unknown status '{}'", self.status),
                })?;
        Ok(Booking {
            booking_id: Some(self.booking_id),
            package_id: self.package_id,
            guide_id: self.guide_id,
            tourist_email,
            tourist_name: self.tourist_name,
            price_cents: self.price_cents,
            tour_date: self.tour_date,
            status,
            transaction_id: self.transaction_id,
        })
    }
}

/// Row struct for the `stories` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::stories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoryRow {
    pub story_id: i64,
    pub title: String,
    pub body: String,
    pub images_json: String,
    pub author_email: String,
    pub author_name: String,
    pub author_photo: Option<String>,
}

impl StoryRow {
    /// Converts this row into a domain [`Story`].
    ///
    /// # Errors
    ///
    /// Returns an error if stored values do not parse into domain types.
    pub fn into_story(self) -> Result<Story, PersistenceError> {
        let author_email: Email =
            Email::new(&self.author_email).map_err(|e| PersistenceError::CorruptRecord {
                table: "stories",
                reason: e.to_string(),
            })?;
        let images: Vec<String> = decode_string_list(&self.images_json, "stories")?;
        Ok(Story {
            story_id: Some(self.story_id),
            title: self.title,
            body: self.body,
            images,
            author_email,
            author_name: self.author_name,
            author_photo: self.author_photo,
        })
    }
}

/// Row struct for the `guide_applications` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::guide_applications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ApplicationRow {
    pub application_id: i64,
    pub applicant_email: String,
    pub applicant_name: String,
    pub applicant_photo: Option<String>,
    pub motivation: String,
    pub experience: String,
    pub specialty: String,
    pub languages_json: String,
    pub cv_link: String,
    pub submitted_at: String,
}

impl ApplicationRow {
    /// Converts this row into a domain [`GuideApplication`].
    ///
    /// # Errors
    ///
    /// Returns an error if stored values do not parse into domain types.
    pub fn into_application(self) -> Result<GuideApplication, PersistenceError> {
        let applicant_email: Email =
            Email::new(&self.applicant_email).map_err(|e| PersistenceError::CorruptRecord {
                table: "guide_applications",
                reason: e.to_string(),
            })?;
        let languages: Vec<String> =
            decode_string_list(&self.languages_json, "guide_applications")?;
        Ok(GuideApplication {
            application_id: Some(self.application_id),
            applicant_email,
            applicant_name: self.applicant_name,
            applicant_photo: self.applicant_photo,
            motivation: self.motivation,
            experience: self.experience,
            specialty: self.specialty,
            languages,
            cv_link: self.cv_link,
            submitted_at: self.submitted_at,
        })
    }
}

/// Row struct for the `payments` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentRow {
    pub payment_id: i64,
    pub booking_id: i64,
    pub payer_email: String,
    pub transaction_id: String,
    pub amount_cents: i64,
    pub paid_at: String,
    pub status: String,
}

impl PaymentRow {
    /// Converts this row into a domain [`Payment`].
    ///
    /// # Errors
    ///
    /// Returns an error if stored values do not parse into domain types.
    pub fn into_payment(self) -> Result<Payment, PersistenceError> {
        let payer_email: Email =
            Email::new(&self.payer_email).map_err(|e| PersistenceError::CorruptRecord {
                table: "payments",
                reason: e.to_string(),
            })?;
        Ok(Payment {
            payment_id: Some(self.payment_id),
            booking_id: self.booking_id,
            payer_email,
            transaction_id: self.transaction_id,
            amount_cents: self.amount_cents,
            paid_at: self.paid_at,
            status: self.status,
        })
    }
}

/// Session row data returned to the authentication layer.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}
