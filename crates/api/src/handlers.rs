// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transport-agnostic request handlers.
//!
//! Each handler takes the persistence adapter, the request DTO, and
//! (for gated operations) the user resolved from the session token.
//! Authorization runs first, then domain validation, then the
//! transition logic, then the write. Errors never leak domain or
//! storage types; they are translated into [`ApiError`] at this
//! boundary.

use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;
use tracing::info;
use wayfare::{
    BookingCommand, BookingTransition, CancellationCaller, Decision, apply_booking,
    plan_acceptance,
};
use wayfare_domain::{
    Booking, BookingStatus, DomainError, Email, GuideApplication, Package, Payment, Role, Story,
    User, validate_application_fields, validate_booking_fields, validate_package_fields,
    validate_story_fields, validate_tour_date, validate_user_fields,
};
use wayfare_persistence::Persistence;

use crate::auth::{AuthenticatedUser, AuthenticationService, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::payments::PaymentGateway;
use crate::request_response::{
    ApplicationInfo, ApplicationRequest, BookingInfo, BookingRequest, CreatePaymentIntentRequest,
    CreatePaymentIntentResponse, DecideBookingRequest, GuideInfo, ListApplicationsResponse,
    ListBookingsResponse, ListGuidesResponse, ListPackagesResponse, ListStoriesResponse,
    ListUsersResponse, MessageResponse, PackageInfo, PackageRequest, PaymentInfo,
    RecordPaymentRequest, RemoveStoryImageRequest, SignInRequest, SignInResponse, StoryInfo,
    StoryRequest, UpdateRoleRequest, UserInfo,
};

/// The currency all payment intents are denominated in.
const CHECKOUT_CURRENCY: &str = "usd";

fn now_iso8601() -> Result<String, ApiError> {
    OffsetDateTime::now_utc()
        .format(&Iso8601::DEFAULT)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
}

/// Resolves the wire representation of a booking.
///
/// Package title and guide name come from the referenced records at
/// read time. Foreign keys block deleting a booked package or guide
/// through the API, so the placeholder only shows up for rows removed
/// by hand.
fn booking_info(persistence: &mut Persistence, booking: &Booking) -> Result<BookingInfo, ApiError> {
    let package_title: String = persistence
        .get_package(booking.package_id)
        .map_err(|e| translate_persistence_error("Package", e))?
        .map_or_else(|| String::from("(removed)"), |p| p.title);
    let guide_name: String = persistence
        .get_guide_record(booking.guide_id)
        .map_err(|e| translate_persistence_error("Guide", e))?
        .map_or_else(|| String::from("(removed)"), |g| g.name);
    Ok(BookingInfo::from_booking(booking, package_title, guide_name))
}

fn booking_list(
    persistence: &mut Persistence,
    bookings: &[Booking],
) -> Result<ListBookingsResponse, ApiError> {
    let mut infos: Vec<BookingInfo> = Vec::with_capacity(bookings.len());
    for booking in bookings {
        infos.push(booking_info(persistence, booking)?);
    }
    Ok(ListBookingsResponse { bookings: infos })
}

fn get_booking_or_404(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<Booking, ApiError> {
    persistence
        .get_booking(booking_id)
        .map_err(|e| translate_persistence_error("Booking", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("No booking with id {booking_id}"),
        })
}

// ============================================================================
// Accounts and sessions
// ============================================================================

/// Signs a user in, creating the account on first contact.
///
/// # Errors
///
/// Returns an error if the email or name is invalid, or the account or
/// session cannot be stored.
pub fn sign_in(
    persistence: &mut Persistence,
    email: &str,
    request: SignInRequest,
) -> Result<SignInResponse, ApiError> {
    let email: Email = Email::new(email).map_err(translate_domain_error)?;
    let candidate: User = User::new(
        email.clone(),
        request.name.clone(),
        request.photo.clone(),
        Role::Tourist,
    );
    validate_user_fields(&candidate).map_err(translate_domain_error)?;

    let (token, user): (String, AuthenticatedUser) =
        AuthenticationService::sign_in(persistence, email, request.name, request.photo)?;
    info!("Signed in user {} ({})", user.user_id, user.email);
    Ok(SignInResponse {
        token,
        user: UserInfo {
            user_id: user.user_id,
            email: user.email.value().to_string(),
            name: user.name,
            photo: user.photo,
            role: user.role.as_str().to_string(),
        },
    })
}

/// Logs the session out.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(
    persistence: &mut Persistence,
    session_token: &str,
) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(MessageResponse {
        message: String::from("Logged out"),
    })
}

/// Returns the acting user's own profile.
#[must_use]
pub fn get_profile(actor: &AuthenticatedUser) -> UserInfo {
    UserInfo {
        user_id: actor.user_id,
        email: actor.email.value().to_string(),
        name: actor.name.clone(),
        photo: actor.photo.clone(),
        role: actor.role.as_str().to_string(),
    }
}

/// Fetches a user account by email.
///
/// Users may read their own record; anything else requires admin.
///
/// # Errors
///
/// Returns an error if the email is malformed, the actor lacks
/// standing, or no account exists under that address.
pub fn get_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    email: &str,
) -> Result<UserInfo, ApiError> {
    let email: Email = Email::new(email).map_err(translate_domain_error)?;
    if email != actor.email {
        AuthorizationService::authorize_manage_users(actor)?;
    }
    let user: User = persistence
        .get_user_by_email(email.value())
        .map_err(|e| translate_persistence_error("User", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("No user with email {email}"),
        })?;
    Ok(UserInfo::from_user(&user))
}

/// Lists user accounts, optionally filtered by role and search term.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the role filter is
/// invalid, or the query fails.
pub fn list_users(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    role: Option<&str>,
    search: Option<&str>,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;
    let role_filter: Option<Role> = match role {
        Some(value) => Some(value.parse::<Role>().map_err(translate_domain_error)?),
        None => None,
    };
    let users: Vec<User> = persistence
        .list_users(role_filter, search)
        .map_err(|e| translate_persistence_error("User", e))?;
    Ok(ListUsersResponse {
        users: users.iter().map(UserInfo::from_user).collect(),
    })
}

/// Changes a user's role.
///
/// Demoting a guide hides their guide profile at read time; the record
/// itself is kept so a re-promotion restores it.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the role is invalid,
/// or the target user does not exist.
pub fn update_user_role(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    user_id: i64,
    request: UpdateRoleRequest,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;
    let role: Role = request.role.parse::<Role>().map_err(translate_domain_error)?;
    persistence
        .set_user_role(user_id, role)
        .map_err(|e| translate_persistence_error("User", e))?;
    info!("Set role of user {user_id} to {role}");
    Ok(MessageResponse {
        message: format!("Role updated to {role}"),
    })
}

/// Deletes a user account, cascading its sessions.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the target user does
/// not exist, or bookings still reference the user's guide record.
pub fn delete_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    user_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_manage_users(actor)?;
    persistence
        .delete_user(user_id)
        .map_err(|e| translate_persistence_error("User", e))?;
    info!("Deleted user {user_id}");
    Ok(MessageResponse {
        message: String::from("User deleted"),
    })
}

// ============================================================================
// Packages
// ============================================================================

fn package_from_request(request: PackageRequest) -> Result<Package, ApiError> {
    let package: Package = Package {
        package_id: None,
        title: request.title,
        description: request.description,
        location: request.location,
        duration_days: request.duration_days,
        price_cents: request.price_cents,
        category: request.category,
        itinerary: request.itinerary,
        images: request.images,
    };
    validate_package_fields(&package).map_err(translate_domain_error)?;
    Ok(package)
}

/// Lists all tour packages. Public.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_packages(persistence: &mut Persistence) -> Result<ListPackagesResponse, ApiError> {
    let packages: Vec<Package> = persistence
        .list_packages()
        .map_err(|e| translate_persistence_error("Package", e))?;
    Ok(ListPackagesResponse {
        packages: packages.iter().map(PackageInfo::from_package).collect(),
    })
}

/// Retrieves a single package. Public.
///
/// # Errors
///
/// Returns an error if the package does not exist or the query fails.
pub fn get_package(
    persistence: &mut Persistence,
    package_id: i64,
) -> Result<PackageInfo, ApiError> {
    let package: Package = persistence
        .get_package(package_id)
        .map_err(|e| translate_persistence_error("Package", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Package"),
            message: format!("No package with id {package_id}"),
        })?;
    Ok(PackageInfo::from_package(&package))
}

/// Creates a tour package.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, a field is invalid,
/// or the insert fails.
pub fn create_package(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: PackageRequest,
) -> Result<PackageInfo, ApiError> {
    AuthorizationService::authorize_manage_packages(actor)?;
    let mut package: Package = package_from_request(request)?;
    let package_id: i64 = persistence
        .create_package(&package)
        .map_err(|e| translate_persistence_error("Package", e))?;
    package.package_id = Some(package_id);
    info!("Created package {package_id} '{}'", package.title);
    Ok(PackageInfo::from_package(&package))
}

/// Replaces all mutable fields of a package.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, a field is invalid,
/// or the package does not exist.
pub fn update_package(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    package_id: i64,
    request: PackageRequest,
) -> Result<PackageInfo, ApiError> {
    AuthorizationService::authorize_manage_packages(actor)?;
    let mut package: Package = package_from_request(request)?;
    persistence
        .update_package(package_id, &package)
        .map_err(|e| translate_persistence_error("Package", e))?;
    package.package_id = Some(package_id);
    Ok(PackageInfo::from_package(&package))
}

/// Deletes a package.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the package does not
/// exist, or bookings still reference it.
pub fn delete_package(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    package_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_manage_packages(actor)?;
    persistence
        .delete_package(package_id)
        .map_err(|e| translate_persistence_error("Package", e))?;
    info!("Deleted package {package_id}");
    Ok(MessageResponse {
        message: String::from("Package deleted"),
    })
}

// ============================================================================
// Bookings
// ============================================================================

/// Books a tour for the acting user.
///
/// The booking is created `Pending` regardless of request content, with
/// the price copied from the package at booking time. The package and
/// guide must both exist; the guide must currently hold the role.
///
/// # Errors
///
/// Returns an error if the tour date is invalid, the package or guide
/// does not exist, or the insert fails.
pub fn create_booking(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: BookingRequest,
) -> Result<BookingInfo, ApiError> {
    validate_tour_date(&request.tour_date).map_err(translate_domain_error)?;

    let package: Package = persistence
        .get_package(request.package_id)
        .map_err(|e| translate_persistence_error("Package", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Package"),
            message: format!("No package with id {}", request.package_id),
        })?;
    let package_id: i64 = package.package_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Stored package carries no id"),
    })?;

    let guide_id: i64 = persistence
        .get_guide(request.guide_id)
        .map_err(|e| translate_persistence_error("Guide", e))?
        .and_then(|g| g.guide_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Guide"),
            message: format!("No active guide with id {}", request.guide_id),
        })?;

    let booking: Booking = Booking {
        booking_id: None,
        package_id,
        guide_id,
        tourist_email: actor.email.clone(),
        tourist_name: actor.name.clone(),
        price_cents: package.price_cents,
        tour_date: request.tour_date,
        status: BookingStatus::Pending,
        transaction_id: None,
    };
    validate_booking_fields(&booking).map_err(translate_domain_error)?;

    let booking_id: i64 = persistence
        .create_booking(&booking)
        .map_err(|e| translate_persistence_error("Booking", e))?;
    let mut stored: Booking = booking;
    stored.booking_id = Some(booking_id);
    info!(
        "Created booking {booking_id} for {} on package {package_id}",
        stored.tourist_email
    );
    booking_info(persistence, &stored)
}

/// Fetches a single booking.
///
/// Visible to the booking's tourist, the assigned guide, and admins.
///
/// # Errors
///
/// Returns an error if the booking does not exist or the actor has no
/// standing on it.
pub fn get_booking(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    booking_id: i64,
) -> Result<BookingInfo, ApiError> {
    let booking: Booking = get_booking_or_404(persistence, booking_id)?;
    if booking.tourist_email != actor.email && actor.role != Role::Admin {
        let assigned: bool = actor.role == Role::TourGuide
            && resolve_own_guide_id(persistence, actor)
                .is_ok_and(|guide_id| guide_id == booking.guide_id);
        if !assigned {
            return Err(ApiError::Unauthorized {
                action: String::from("view_booking"),
                required_role: String::from("booking participant"),
            });
        }
    }
    booking_info(persistence, &booking)
}

/// Lists a tourist's bookings.
///
/// Without an email filter this is the acting user's own list. Asking
/// for another tourist's list requires admin.
///
/// # Errors
///
/// Returns an error if the email is malformed, the actor lacks
/// standing, or the query fails.
pub fn list_my_bookings(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    email: Option<&str>,
) -> Result<ListBookingsResponse, ApiError> {
    let email: Email = match email {
        Some(value) => {
            let parsed: Email = Email::new(value).map_err(translate_domain_error)?;
            if parsed != actor.email {
                AuthorizationService::authorize_view_all_bookings(actor)?;
            }
            parsed
        }
        None => actor.email.clone(),
    };
    let bookings: Vec<Booking> = persistence
        .list_bookings_for_tourist(email.value())
        .map_err(|e| translate_persistence_error("Booking", e))?;
    booking_list(persistence, &bookings)
}

/// Lists every booking in the system.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_all_bookings(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<ListBookingsResponse, ApiError> {
    AuthorizationService::authorize_view_all_bookings(actor)?;
    let bookings: Vec<Booking> = persistence
        .list_all_bookings()
        .map_err(|e| translate_persistence_error("Booking", e))?;
    booking_list(persistence, &bookings)
}

/// Lists the bookings assigned to the acting guide.
///
/// # Errors
///
/// Returns an error if the actor is not a guide, has no guide record,
/// or the query fails.
pub fn list_guide_bookings(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<ListBookingsResponse, ApiError> {
    AuthorizationService::authorize_view_guide_bookings(actor)?;
    let guide_id: i64 = resolve_own_guide_id(persistence, actor)?;
    let bookings: Vec<Booking> = persistence
        .list_bookings_for_guide(guide_id)
        .map_err(|e| translate_persistence_error("Booking", e))?;
    booking_list(persistence, &bookings)
}

fn resolve_own_guide_id(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<i64, ApiError> {
    persistence
        .get_guide_by_user_id(actor.user_id)
        .map_err(|e| translate_persistence_error("Guide", e))?
        .and_then(|g| g.guide_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Guide"),
            message: format!("No guide record for user {}", actor.user_id),
        })
}

/// Records the assigned guide's decision on an in-review booking.
///
/// # Errors
///
/// Returns an error if the actor is not the assigned guide, the status
/// value is not a decision, or the transition is illegal for the
/// booking's current state.
pub fn decide_booking(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    booking_id: i64,
    request: DecideBookingRequest,
) -> Result<BookingInfo, ApiError> {
    AuthorizationService::authorize_decide_booking(actor)?;
    let decision: Decision = match request.status.as_str() {
        "Accepted" => Decision::Accepted,
        "Rejected" => Decision::Rejected,
        other => {
            return Err(translate_domain_error(DomainError::InvalidBookingStatus(
                other.to_string(),
            )));
        }
    };

    let guide_id: i64 = resolve_own_guide_id(persistence, actor)?;
    let booking: Booking = get_booking_or_404(persistence, booking_id)?;

    let transition: BookingTransition =
        apply_booking(&booking, BookingCommand::Decide { guide_id, decision })
            .map_err(translate_core_error)?;
    let updated: Booking = match transition {
        BookingTransition::Updated(updated) => updated,
        BookingTransition::Cancelled => {
            return Err(ApiError::Internal {
                message: String::from("Decision produced a cancellation"),
            });
        }
    };

    persistence
        .update_booking_state(booking_id, &updated)
        .map_err(|e| translate_persistence_error("Booking", e))?;
    info!("Booking {booking_id} decided: {}", updated.status);
    booking_info(persistence, &updated)
}

/// Cancels (deletes) a booking.
///
/// A tourist may cancel their own pending booking; an admin may cancel
/// any booking in any state.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the actor lacks
/// standing, or the booking is past `Pending` for a tourist caller.
pub fn cancel_booking(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    booking_id: i64,
) -> Result<MessageResponse, ApiError> {
    let booking: Booking = get_booking_or_404(persistence, booking_id)?;

    let caller: CancellationCaller = match actor.role {
        Role::Admin => CancellationCaller::Admin,
        Role::Tourist | Role::TourGuide => CancellationCaller::Tourist(actor.email.clone()),
    };
    let transition: BookingTransition =
        apply_booking(&booking, BookingCommand::Cancel { caller }).map_err(translate_core_error)?;
    match transition {
        BookingTransition::Cancelled => {
            persistence
                .delete_booking(booking_id)
                .map_err(|e| translate_persistence_error("Booking", e))?;
            info!("Cancelled booking {booking_id}");
            Ok(MessageResponse {
                message: String::from("Booking cancelled"),
            })
        }
        BookingTransition::Updated(_) => Err(ApiError::Internal {
            message: String::from("Cancellation produced an update"),
        }),
    }
}

// ============================================================================
// Stories
// ============================================================================

fn get_story_or_404(persistence: &mut Persistence, story_id: i64) -> Result<Story, ApiError> {
    persistence
        .get_story(story_id)
        .map_err(|e| translate_persistence_error("Story", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Story"),
            message: format!("No story with id {story_id}"),
        })
}

fn require_author(story: &Story, actor: &AuthenticatedUser) -> Result<(), ApiError> {
    if story.author_email == actor.email {
        Ok(())
    } else {
        Err(ApiError::Unauthorized {
            action: String::from("modify_story"),
            required_role: String::from("story author"),
        })
    }
}

/// Lists all stories, newest first. Public.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_stories(persistence: &mut Persistence) -> Result<ListStoriesResponse, ApiError> {
    let stories: Vec<Story> = persistence
        .list_stories()
        .map_err(|e| translate_persistence_error("Story", e))?;
    Ok(ListStoriesResponse {
        stories: stories.iter().map(StoryInfo::from_story).collect(),
    })
}

/// Retrieves a single story. Public.
///
/// # Errors
///
/// Returns an error if the story does not exist or the query fails.
pub fn get_story(persistence: &mut Persistence, story_id: i64) -> Result<StoryInfo, ApiError> {
    let story: Story = get_story_or_404(persistence, story_id)?;
    Ok(StoryInfo::from_story(&story))
}

/// Publishes a story authored by the acting user.
///
/// Author identity is taken from the session, never the request.
///
/// # Errors
///
/// Returns an error if a field is invalid or the insert fails.
pub fn create_story(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: StoryRequest,
) -> Result<StoryInfo, ApiError> {
    let mut story: Story = Story {
        story_id: None,
        title: request.title,
        body: request.body,
        images: request.images,
        author_email: actor.email.clone(),
        author_name: actor.name.clone(),
        author_photo: actor.photo.clone(),
    };
    validate_story_fields(&story).map_err(translate_domain_error)?;
    let story_id: i64 = persistence
        .create_story(&story)
        .map_err(|e| translate_persistence_error("Story", e))?;
    story.story_id = Some(story_id);
    info!("Published story {story_id} by {}", story.author_email);
    Ok(StoryInfo::from_story(&story))
}

/// Updates a story's content. Author only.
///
/// # Errors
///
/// Returns an error if the actor is not the author, a field is
/// invalid, or the story does not exist.
pub fn update_story(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    story_id: i64,
    request: StoryRequest,
) -> Result<StoryInfo, ApiError> {
    let stored: Story = get_story_or_404(persistence, story_id)?;
    require_author(&stored, actor)?;

    let mut updated: Story = stored;
    updated.title = request.title;
    updated.body = request.body;
    updated.images = request.images;
    validate_story_fields(&updated).map_err(translate_domain_error)?;

    persistence
        .update_story(story_id, &updated)
        .map_err(|e| translate_persistence_error("Story", e))?;
    Ok(StoryInfo::from_story(&updated))
}

/// Deletes a story. Author only.
///
/// # Errors
///
/// Returns an error if the actor is not the author or the story does
/// not exist.
pub fn delete_story(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    story_id: i64,
) -> Result<MessageResponse, ApiError> {
    let stored: Story = get_story_or_404(persistence, story_id)?;
    require_author(&stored, actor)?;
    persistence
        .delete_story(story_id)
        .map_err(|e| translate_persistence_error("Story", e))?;
    info!("Deleted story {story_id}");
    Ok(MessageResponse {
        message: String::from("Story deleted"),
    })
}

/// Detaches one image from a story. Author only.
///
/// # Errors
///
/// Returns an error if the actor is not the author, the story does not
/// exist, or the image is not attached to it.
pub fn remove_story_image(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    story_id: i64,
    request: RemoveStoryImageRequest,
) -> Result<StoryInfo, ApiError> {
    let stored: Story = get_story_or_404(persistence, story_id)?;
    require_author(&stored, actor)?;

    let mut updated: Story = stored;
    let before: usize = updated.images.len();
    updated.images.retain(|image| image != &request.image);
    if updated.images.len() == before {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Image"),
            message: format!("Story {story_id} has no image '{}'", request.image),
        });
    }

    persistence
        .update_story(story_id, &updated)
        .map_err(|e| translate_persistence_error("Story", e))?;
    Ok(StoryInfo::from_story(&updated))
}

// ============================================================================
// Guide applications
// ============================================================================

/// Submits an application to become a tour guide.
///
/// Applicant identity comes from the session. Only tourists may apply;
/// guides already hold the role and admins do not take tours.
///
/// # Errors
///
/// Returns an error if the actor is not a tourist, a field is invalid,
/// or the insert fails.
pub fn submit_application(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: ApplicationRequest,
) -> Result<ApplicationInfo, ApiError> {
    if actor.role != Role::Tourist {
        return Err(ApiError::Unauthorized {
            action: String::from("apply_for_guide"),
            required_role: String::from("tourist"),
        });
    }

    let mut application: GuideApplication = GuideApplication {
        application_id: None,
        applicant_email: actor.email.clone(),
        applicant_name: actor.name.clone(),
        applicant_photo: actor.photo.clone(),
        motivation: request.motivation,
        experience: request.experience,
        specialty: request.specialty,
        languages: request.languages,
        cv_link: request.cv_link,
        submitted_at: now_iso8601()?,
    };
    validate_application_fields(&application).map_err(translate_domain_error)?;

    let application_id: i64 = persistence
        .create_application(&application)
        .map_err(|e| translate_persistence_error("Application", e))?;
    application.application_id = Some(application_id);
    info!(
        "Application {application_id} submitted by {}",
        application.applicant_email
    );
    Ok(ApplicationInfo::from_application(&application))
}

/// Lists pending guide applications.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_applications(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<ListApplicationsResponse, ApiError> {
    AuthorizationService::authorize_review_applications(actor)?;
    let applications: Vec<GuideApplication> = persistence
        .list_applications()
        .map_err(|e| translate_persistence_error("Application", e))?;
    Ok(ListApplicationsResponse {
        applications: applications
            .iter()
            .map(ApplicationInfo::from_application)
            .collect(),
    })
}

/// Accepts a guide application.
///
/// The role promotion, guide record creation, and application removal
/// happen in one transaction; a retry after acceptance reuses the
/// existing guide record instead of duplicating it.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the application or
/// applicant account does not exist, or the applicant's account no
/// longer matches the application.
pub fn accept_application(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    application_id: i64,
) -> Result<GuideInfo, ApiError> {
    AuthorizationService::authorize_review_applications(actor)?;

    let application: GuideApplication = persistence
        .get_application(application_id)
        .map_err(|e| translate_persistence_error("Application", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Application"),
            message: format!("No application with id {application_id}"),
        })?;

    let applicant: User = persistence
        .get_user_by_email(application.applicant_email.value())
        .map_err(|e| translate_persistence_error("User", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("No account for applicant {}", application.applicant_email),
        })?;

    let plan = plan_acceptance(&application, &applicant).map_err(translate_core_error)?;
    let guide = persistence
        .accept_application(&plan)
        .map_err(|e| translate_persistence_error("Application", e))?;
    info!(
        "Accepted application {application_id}: user {} is now a guide",
        plan.user_id
    );
    Ok(GuideInfo::from_guide(&guide))
}

/// Rejects a guide application by deleting it.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the application
/// does not exist.
pub fn reject_application(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    application_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_review_applications(actor)?;
    persistence
        .delete_application(application_id)
        .map_err(|e| translate_persistence_error("Application", e))?;
    info!("Rejected application {application_id}");
    Ok(MessageResponse {
        message: String::from("Application rejected"),
    })
}

// ============================================================================
// Tour guides
// ============================================================================

/// Lists active guide profiles. Public.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_guides(persistence: &mut Persistence) -> Result<ListGuidesResponse, ApiError> {
    let guides = persistence
        .list_guides()
        .map_err(|e| translate_persistence_error("Guide", e))?;
    Ok(ListGuidesResponse {
        guides: guides.iter().map(GuideInfo::from_guide).collect(),
    })
}

/// Retrieves an active guide profile. Public.
///
/// # Errors
///
/// Returns an error if no active guide has this id or the query fails.
pub fn get_guide(persistence: &mut Persistence, guide_id: i64) -> Result<GuideInfo, ApiError> {
    let guide = persistence
        .get_guide(guide_id)
        .map_err(|e| translate_persistence_error("Guide", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Guide"),
            message: format!("No active guide with id {guide_id}"),
        })?;
    Ok(GuideInfo::from_guide(&guide))
}

// ============================================================================
// Payments
// ============================================================================

fn require_booking_owner(booking: &Booking, actor: &AuthenticatedUser) -> Result<(), ApiError> {
    if booking.tourist_email == actor.email {
        Ok(())
    } else {
        Err(ApiError::Unauthorized {
            action: String::from("pay_booking"),
            required_role: String::from("booking tourist"),
        })
    }
}

/// Mints a payment intent for a pending booking. Owner only.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the actor does not
/// own it, it is past `Pending`, or the gateway fails.
pub fn create_payment_intent(
    persistence: &mut Persistence,
    gateway: &dyn PaymentGateway,
    actor: &AuthenticatedUser,
    request: CreatePaymentIntentRequest,
) -> Result<CreatePaymentIntentResponse, ApiError> {
    let booking: Booking = get_booking_or_404(persistence, request.booking_id)?;
    require_booking_owner(&booking, actor)?;
    if !booking.status.can_transition_to(BookingStatus::InReview) {
        return Err(translate_domain_error(DomainError::IllegalStatusTransition {
            from: booking.status,
            to: BookingStatus::InReview,
        }));
    }

    let intent = gateway
        .create_intent(booking.price_cents, CHECKOUT_CURRENCY)
        .map_err(|e| ApiError::UpstreamFailure {
            message: e.to_string(),
        })?;
    Ok(CreatePaymentIntentResponse {
        intent_id: intent.intent_id,
        client_secret: intent.client_secret,
        amount_cents: intent.amount_cents,
        currency: intent.currency,
    })
}

/// Records a settled payment and advances the booking to `In Review`.
///
/// The payment row and the booking update commit in one transaction.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the actor does not
/// own it, or the booking is not pending.
pub fn record_payment(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    request: RecordPaymentRequest,
) -> Result<PaymentInfo, ApiError> {
    let booking: Booking = get_booking_or_404(persistence, request.booking_id)?;
    require_booking_owner(&booking, actor)?;

    let transition: BookingTransition = apply_booking(
        &booking,
        BookingCommand::RecordPayment {
            transaction_id: request.transaction_id.clone(),
        },
    )
    .map_err(translate_core_error)?;
    let updated: Booking = match transition {
        BookingTransition::Updated(updated) => updated,
        BookingTransition::Cancelled => {
            return Err(ApiError::Internal {
                message: String::from("Payment produced a cancellation"),
            });
        }
    };

    let mut payment: Payment = Payment {
        payment_id: None,
        booking_id: request.booking_id,
        payer_email: actor.email.clone(),
        transaction_id: request.transaction_id,
        amount_cents: booking.price_cents,
        paid_at: now_iso8601()?,
        status: Payment::STATUS_SUCCEEDED.to_string(),
    };
    let payment_id: i64 = persistence
        .record_payment(&payment, &updated)
        .map_err(|e| translate_persistence_error("Booking", e))?;
    payment.payment_id = Some(payment_id);
    info!(
        "Recorded payment {payment_id} for booking {} ({})",
        payment.booking_id, payment.transaction_id
    );
    Ok(PaymentInfo::from_payment(&payment))
}
