// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Booking and guide references travel as canonical ids on the wire.
//! Display fields (package title, guide name) are resolved by the read
//! path at response time, so edits to a package or profile are always
//! reflected.

use wayfare_domain::{Booking, GuideApplication, Package, Payment, Story, TourGuide, User};

/// API request to sign in (and create the account on first contact).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignInRequest {
    /// The display name to store.
    pub name: String,
    /// Optional avatar URL.
    #[serde(default)]
    pub photo: Option<String>,
}

/// API response for a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignInResponse {
    /// The session token for subsequent requests.
    pub token: String,
    /// The signed-in account.
    pub user: UserInfo,
}

/// A user account as presented on the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserInfo {
    /// The canonical user id.
    pub user_id: i64,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// The user's avatar URL.
    pub photo: Option<String>,
    /// The user's role.
    pub role: String,
}

impl UserInfo {
    /// Builds the wire representation of a persisted user.
    ///
    /// # Arguments
    ///
    /// * `user` - The stored account; must carry an id
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.user_id.unwrap_or_default(),
            email: user.email.value().to_string(),
            name: user.name.clone(),
            photo: user.photo.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// API response listing user accounts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListUsersResponse {
    /// The matched accounts.
    pub users: Vec<UserInfo>,
}

/// API request to change a user's role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateRoleRequest {
    /// The new role ('tourist', 'tourGuide', or 'admin').
    pub role: String,
}

/// API request to create or update a tour package.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PackageRequest {
    /// The package title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// The destination location.
    pub location: String,
    /// Tour duration in days.
    pub duration_days: u32,
    /// Price in integer cents.
    pub price_cents: i64,
    /// Free-form category.
    pub category: String,
    /// Free-text itinerary.
    pub itinerary: String,
    /// Image URLs for the package gallery.
    #[serde(default)]
    pub images: Vec<String>,
}

/// A tour package as presented on the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PackageInfo {
    /// The canonical package id.
    pub package_id: i64,
    /// The package title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// The destination location.
    pub location: String,
    /// Tour duration in days.
    pub duration_days: u32,
    /// Price in integer cents.
    pub price_cents: i64,
    /// Free-form category.
    pub category: String,
    /// Free-text itinerary.
    pub itinerary: String,
    /// Image URLs for the package gallery.
    pub images: Vec<String>,
}

impl PackageInfo {
    /// Builds the wire representation of a persisted package.
    #[must_use]
    pub fn from_package(package: &Package) -> Self {
        Self {
            package_id: package.package_id.unwrap_or_default(),
            title: package.title.clone(),
            description: package.description.clone(),
            location: package.location.clone(),
            duration_days: package.duration_days,
            price_cents: package.price_cents,
            category: package.category.clone(),
            itinerary: package.itinerary.clone(),
            images: package.images.clone(),
        }
    }
}

/// API response listing tour packages.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPackagesResponse {
    /// The stored packages.
    pub packages: Vec<PackageInfo>,
}

/// API request to book a tour.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingRequest {
    /// The package to book.
    pub package_id: i64,
    /// The guide to assign.
    pub guide_id: i64,
    /// Requested tour date (ISO 8601 date).
    pub tour_date: String,
}

/// A booking as presented on the wire.
///
/// `package_title` and `guide_name` are resolved from the referenced
/// records at read time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingInfo {
    /// The canonical booking id.
    pub booking_id: i64,
    /// The booked package id.
    pub package_id: i64,
    /// The booked package's current title.
    pub package_title: String,
    /// The assigned guide id.
    pub guide_id: i64,
    /// The assigned guide's current display name.
    pub guide_name: String,
    /// The booking tourist's email address.
    pub tourist_email: String,
    /// The booking tourist's display name.
    pub tourist_name: String,
    /// Price in integer cents at booking time.
    pub price_cents: i64,
    /// Requested tour date (ISO 8601 date).
    pub tour_date: String,
    /// Lifecycle status.
    pub status: String,
    /// Payment transaction id, if a payment was recorded.
    pub transaction_id: Option<String>,
}

impl BookingInfo {
    /// Builds the wire representation of a persisted booking.
    ///
    /// # Arguments
    ///
    /// * `booking` - The stored booking
    /// * `package_title` - Title resolved from the referenced package
    /// * `guide_name` - Name resolved from the referenced guide record
    #[must_use]
    pub fn from_booking(booking: &Booking, package_title: String, guide_name: String) -> Self {
        Self {
            booking_id: booking.booking_id.unwrap_or_default(),
            package_id: booking.package_id,
            package_title,
            guide_id: booking.guide_id,
            guide_name,
            tourist_email: booking.tourist_email.value().to_string(),
            tourist_name: booking.tourist_name.clone(),
            price_cents: booking.price_cents,
            tour_date: booking.tour_date.clone(),
            status: booking.status.as_str().to_string(),
            transaction_id: booking.transaction_id.clone(),
        }
    }
}

/// API response listing bookings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListBookingsResponse {
    /// The matched bookings.
    pub bookings: Vec<BookingInfo>,
}

/// API request for the assigned guide's decision on a booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecideBookingRequest {
    /// The decision: 'Accepted' or 'Rejected'.
    pub status: String,
}

/// API request to create or update a story.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoryRequest {
    /// The story title.
    pub title: String,
    /// The story body text.
    pub body: String,
    /// Image URLs attached to the story.
    #[serde(default)]
    pub images: Vec<String>,
}

/// A story as presented on the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoryInfo {
    /// The canonical story id.
    pub story_id: i64,
    /// The story title.
    pub title: String,
    /// The story body text.
    pub body: String,
    /// Image URLs attached to the story.
    pub images: Vec<String>,
    /// The author's email address.
    pub author_email: String,
    /// The author's display name.
    pub author_name: String,
    /// The author's avatar URL.
    pub author_photo: Option<String>,
}

impl StoryInfo {
    /// Builds the wire representation of a persisted story.
    #[must_use]
    pub fn from_story(story: &Story) -> Self {
        Self {
            story_id: story.story_id.unwrap_or_default(),
            title: story.title.clone(),
            body: story.body.clone(),
            images: story.images.clone(),
            author_email: story.author_email.value().to_string(),
            author_name: story.author_name.clone(),
            author_photo: story.author_photo.clone(),
        }
    }
}

/// API response listing stories.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListStoriesResponse {
    /// The stored stories, newest first.
    pub stories: Vec<StoryInfo>,
}

/// API request to detach one image from a story.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemoveStoryImageRequest {
    /// The image URL to remove.
    pub image: String,
}

/// API request to apply for the tour-guide role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ApplicationRequest {
    /// Why the applicant wants to become a guide.
    pub motivation: String,
    /// Relevant experience, free text.
    pub experience: String,
    /// Guiding specialty.
    pub specialty: String,
    /// Languages the applicant speaks.
    pub languages: Vec<String>,
    /// Link to the applicant's CV.
    pub cv_link: String,
}

/// A guide application as presented on the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ApplicationInfo {
    /// The canonical application id.
    pub application_id: i64,
    /// The applicant's email address.
    pub applicant_email: String,
    /// The applicant's display name.
    pub applicant_name: String,
    /// The applicant's avatar URL.
    pub applicant_photo: Option<String>,
    /// Why the applicant wants to become a guide.
    pub motivation: String,
    /// Relevant experience.
    pub experience: String,
    /// Guiding specialty.
    pub specialty: String,
    /// Languages the applicant speaks.
    pub languages: Vec<String>,
    /// Link to the applicant's CV.
    pub cv_link: String,
    /// Submission timestamp (ISO 8601).
    pub submitted_at: String,
}

impl ApplicationInfo {
    /// Builds the wire representation of a persisted application.
    #[must_use]
    pub fn from_application(application: &GuideApplication) -> Self {
        Self {
            application_id: application.application_id.unwrap_or_default(),
            applicant_email: application.applicant_email.value().to_string(),
            applicant_name: application.applicant_name.clone(),
            applicant_photo: application.applicant_photo.clone(),
            motivation: application.motivation.clone(),
            experience: application.experience.clone(),
            specialty: application.specialty.clone(),
            languages: application.languages.clone(),
            cv_link: application.cv_link.clone(),
            submitted_at: application.submitted_at.clone(),
        }
    }
}

/// API response listing pending guide applications.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListApplicationsResponse {
    /// The pending applications.
    pub applications: Vec<ApplicationInfo>,
}

/// A promoted guide profile as presented on the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GuideInfo {
    /// The canonical guide id.
    pub guide_id: i64,
    /// The linked user's canonical id.
    pub user_id: i64,
    /// The guide's email address.
    pub email: String,
    /// The guide's display name.
    pub name: String,
    /// The guide's avatar URL.
    pub photo: Option<String>,
    /// Experience from the accepted application.
    pub experience: String,
    /// Specialty from the accepted application.
    pub specialty: String,
    /// Languages from the accepted application.
    pub languages: Vec<String>,
}

impl GuideInfo {
    /// Builds the wire representation of a persisted guide profile.
    #[must_use]
    pub fn from_guide(guide: &TourGuide) -> Self {
        Self {
            guide_id: guide.guide_id.unwrap_or_default(),
            user_id: guide.user_id,
            email: guide.email.value().to_string(),
            name: guide.name.clone(),
            photo: guide.photo.clone(),
            experience: guide.experience.clone(),
            specialty: guide.specialty.clone(),
            languages: guide.languages.clone(),
        }
    }
}

/// API response listing promoted guides.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListGuidesResponse {
    /// The active guide profiles.
    pub guides: Vec<GuideInfo>,
}

/// API request to mint a payment intent for a booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// The booking being paid for.
    pub booking_id: i64,
}

/// API response carrying the minted payment intent.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatePaymentIntentResponse {
    /// The gateway's intent identifier.
    pub intent_id: String,
    /// The secret the client uses to complete the payment.
    pub client_secret: String,
    /// The amount to charge, in integer cents.
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// API request to record a completed payment against a booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordPaymentRequest {
    /// The booking that was paid for.
    pub booking_id: i64,
    /// The gateway transaction id.
    pub transaction_id: String,
}

/// A recorded payment as presented on the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaymentInfo {
    /// The canonical payment id.
    pub payment_id: i64,
    /// The booking this payment settles.
    pub booking_id: i64,
    /// The payer's email address.
    pub payer_email: String,
    /// The gateway transaction id.
    pub transaction_id: String,
    /// Amount in integer cents.
    pub amount_cents: i64,
    /// Payment timestamp (ISO 8601).
    pub paid_at: String,
    /// Payment status.
    pub status: String,
}

impl PaymentInfo {
    /// Builds the wire representation of a persisted payment.
    #[must_use]
    pub fn from_payment(payment: &Payment) -> Self {
        Self {
            payment_id: payment.payment_id.unwrap_or_default(),
            booking_id: payment.booking_id,
            payer_email: payment.payer_email.value().to_string(),
            transaction_id: payment.transaction_id.clone(),
            amount_cents: payment.amount_cents,
            paid_at: payment.paid_at.clone(),
            status: payment.status.clone(),
        }
    }
}

/// Generic API response carrying a success message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    /// A success message.
    pub message: String,
}
