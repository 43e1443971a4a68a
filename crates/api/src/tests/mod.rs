// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod payment_tests;
mod story_tests;

use wayfare_domain::Role;
use wayfare_persistence::Persistence;

use crate::auth::{AuthenticatedUser, AuthenticationService};
use crate::handlers;
use crate::request_response::{
    ApplicationRequest, BookingRequest, PackageRequest, SignInRequest, StoryRequest,
};

fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

/// Signs in a user and returns the token and resolved session user.
fn sign_in(persistence: &mut Persistence, email: &str, name: &str) -> (String, AuthenticatedUser) {
    let response = handlers::sign_in(
        persistence,
        email,
        SignInRequest {
            name: name.to_string(),
            photo: None,
        },
    )
    .expect("Sign-in failed");
    let actor: AuthenticatedUser =
        AuthenticationService::validate_session(persistence, &response.token)
            .expect("Fresh session failed validation");
    (response.token, actor)
}

/// Signs in a user, promotes the account to admin, and re-resolves the
/// session so the returned actor carries the admin role.
fn sign_in_admin(persistence: &mut Persistence, email: &str) -> (String, AuthenticatedUser) {
    let (token, actor) = sign_in(persistence, email, "Test Admin");
    persistence
        .set_user_role(actor.user_id, Role::Admin)
        .expect("Failed to promote admin");
    let actor: AuthenticatedUser = AuthenticationService::validate_session(persistence, &token)
        .expect("Session failed validation after promotion");
    (token, actor)
}

/// Signs in a tourist, walks them through the application flow, and
/// returns the promoted guide actor with their guide record id.
fn sign_in_guide(
    persistence: &mut Persistence,
    email: &str,
    admin: &AuthenticatedUser,
) -> (String, AuthenticatedUser, i64) {
    let (token, actor) = sign_in(persistence, email, "Test Guide");
    let application = handlers::submit_application(
        persistence,
        &actor,
        ApplicationRequest {
            motivation: String::from("I know these hills"),
            experience: String::from("Ten seasons of trekking"),
            specialty: String::from("mountain trekking"),
            languages: vec![String::from("English"), String::from("Gaelic")],
            cv_link: String::from("https://example.com/cv.pdf"),
        },
    )
    .expect("Failed to submit application");
    let guide = handlers::accept_application(persistence, admin, application.application_id)
        .expect("Failed to accept application");
    let actor: AuthenticatedUser = AuthenticationService::validate_session(persistence, &token)
        .expect("Session failed validation after acceptance");
    (token, actor, guide.guide_id)
}

fn test_package_request() -> PackageRequest {
    PackageRequest {
        title: String::from("Highlands Trek"),
        description: String::from("Five days through the Scottish Highlands"),
        location: String::from("Scotland"),
        duration_days: 5,
        price_cents: 120_000,
        category: String::from("adventure"),
        itinerary: String::from("Day 1: Glencoe. Day 2: Ben Nevis."),
        images: vec![String::from("https://example.com/glencoe.jpg")],
    }
}

/// Creates a package as the given admin and returns its id.
fn seed_package(persistence: &mut Persistence, admin: &AuthenticatedUser) -> i64 {
    handlers::create_package(persistence, admin, test_package_request())
        .expect("Failed to create package")
        .package_id
}

fn test_booking_request(package_id: i64, guide_id: i64) -> BookingRequest {
    BookingRequest {
        package_id,
        guide_id,
        tour_date: String::from("2026-09-15"),
    }
}

fn test_story_request() -> StoryRequest {
    StoryRequest {
        title: String::from("Mist over Glencoe"),
        body: String::from("We set out before dawn and the valley was silver."),
        images: vec![
            String::from("https://example.com/mist1.jpg"),
            String::from("https://example.com/mist2.jpg"),
        ],
    }
}
