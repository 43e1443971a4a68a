// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod account_tests;

use wayfare_domain::{
    Booking, BookingStatus, Email, GuideApplication, Package, Role, Story, User,
};

use crate::Persistence;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn create_test_email(address: &str) -> Email {
    Email::new(address).expect("valid test email")
}

pub fn create_test_user(address: &str) -> User {
    User::new(
        create_test_email(address),
        String::from("Test User"),
        None,
        Role::Tourist,
    )
}

pub fn create_test_package() -> Package {
    Package {
        package_id: None,
        title: String::from("Highlands Trek"),
        description: String::from("Five days through the highlands"),
        location: String::from("Scotland"),
        duration_days: 5,
        price_cents: 120_000,
        category: String::from("adventure"),
        itinerary: String::from("Day 1: arrive. Day 2-4: trek. Day 5: depart."),
        images: vec![String::from("https://img.example.com/trek.jpg")],
    }
}

pub fn create_test_story(author: &str) -> Story {
    Story {
        story_id: None,
        title: String::from("A week in the hills"),
        body: String::from("It rained, gloriously."),
        images: vec![],
        author_email: create_test_email(author),
        author_name: String::from("Test Author"),
        author_photo: None,
    }
}

pub fn create_test_application(applicant: &str) -> GuideApplication {
    GuideApplication {
        application_id: None,
        applicant_email: create_test_email(applicant),
        applicant_name: String::from("Aspiring Guide"),
        applicant_photo: None,
        motivation: String::from("I know every trail"),
        experience: String::from("Ten seasons of guiding"),
        specialty: String::from("mountain trekking"),
        languages: vec![String::from("English"), String::from("Gaelic")],
        cv_link: String::from("https://cv.example.com/guide.pdf"),
        submitted_at: String::from("2026-08-30T12:00:00Z"),
    }
}

pub fn create_test_booking(package_id: i64, guide_id: i64, tourist: &str) -> Booking {
    Booking {
        booking_id: None,
        package_id,
        guide_id,
        tourist_email: create_test_email(tourist),
        tourist_name: String::from("Test Tourist"),
        price_cents: 120_000,
        tour_date: String::from("2026-10-01"),
        status: BookingStatus::Pending,
        transaction_id: None,
    }
}

/// Seeds a promoted guide and returns `(guide_id, user_id)`.
pub fn seed_guide(persistence: &mut Persistence, address: &str) -> (i64, i64) {
    let user: User = persistence
        .upsert_user(&create_test_user(address))
        .expect("user stored");
    let user_id: i64 = user.user_id.expect("persisted id");

    let mut application: GuideApplication = create_test_application(address);
    let application_id: i64 = persistence
        .create_application(&application)
        .expect("application stored");
    application.application_id = Some(application_id);

    let plan = wayfare::plan_acceptance(&application, &user).expect("valid plan");
    let guide = persistence.accept_application(&plan).expect("accepted");
    (guide.guide_id.expect("persisted id"), user_id)
}
