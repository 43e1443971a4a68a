// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test fixtures shared across core tests.

use wayfare_domain::{Booking, BookingStatus, Email, GuideApplication, Package, Role, User};

pub fn create_test_email(address: &str) -> Email {
    Email::new(address).unwrap()
}

pub fn create_test_booking(status: BookingStatus) -> Booking {
    Booking {
        booking_id: Some(10),
        package_id: 1,
        guide_id: 5,
        tourist_email: create_test_email("tourist@example.com"),
        tourist_name: String::from("Test Tourist"),
        price_cents: 45_000,
        tour_date: String::from("2026-10-01"),
        status,
        transaction_id: None,
    }
}

pub fn create_test_application() -> GuideApplication {
    GuideApplication {
        application_id: Some(3),
        applicant_email: create_test_email("applicant@example.com"),
        applicant_name: String::from("Aspiring Guide"),
        applicant_photo: Some(String::from("https://img.example.com/me.jpg")),
        motivation: String::from("I love showing people around"),
        experience: String::from("Five years of trekking"),
        specialty: String::from("mountain trekking"),
        languages: vec![String::from("Bengali"), String::from("English")],
        cv_link: String::from("https://cv.example.com/me.pdf"),
        submitted_at: String::from("2026-08-30T10:00:00Z"),
    }
}

pub fn create_test_applicant() -> User {
    User::with_id(
        42,
        create_test_email("applicant@example.com"),
        String::from("Aspiring Guide"),
        Some(String::from("https://img.example.com/me.jpg")),
        Role::Tourist,
    )
}

pub fn create_test_package(location: &str, category: &str, days: u32, cents: i64) -> Package {
    Package {
        package_id: None,
        title: format!("{location} {category}"),
        description: String::from("A test package"),
        location: location.to_string(),
        duration_days: days,
        price_cents: cents,
        category: category.to_string(),
        itinerary: String::new(),
        images: Vec::new(),
    }
}
