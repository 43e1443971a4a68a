// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    users (user_id) {
        user_id -> BigInt,
        email -> Text,
        name -> Text,
        photo -> Nullable<Text>,
        role -> Text,
    }
}

diesel::table! {
    packages (package_id) {
        package_id -> BigInt,
        title -> Text,
        description -> Text,
        location -> Text,
        duration_days -> Integer,
        price_cents -> BigInt,
        category -> Text,
        itinerary -> Text,
        images_json -> Text,
    }
}

diesel::table! {
    tour_guides (guide_id) {
        guide_id -> BigInt,
        user_id -> BigInt,
        email -> Text,
        name -> Text,
        photo -> Nullable<Text>,
        experience -> Text,
        specialty -> Text,
        languages_json -> Text,
    }
}

diesel::table! {
    bookings (booking_id) {
        booking_id -> BigInt,
        package_id -> BigInt,
        guide_id -> BigInt,
        tourist_email -> Text,
        tourist_name -> Text,
        price_cents -> BigInt,
        tour_date -> Text,
        status -> Text,
        transaction_id -> Nullable<Text>,
    }
}

diesel::table! {
    stories (story_id) {
        story_id -> BigInt,
        title -> Text,
        body -> Text,
        images_json -> Text,
        author_email -> Text,
        author_name -> Text,
        author_photo -> Nullable<Text>,
    }
}

diesel::table! {
    guide_applications (application_id) {
        application_id -> BigInt,
        applicant_email -> Text,
        applicant_name -> Text,
        applicant_photo -> Nullable<Text>,
        motivation -> Text,
        experience -> Text,
        specialty -> Text,
        languages_json -> Text,
        cv_link -> Text,
        submitted_at -> Text,
    }
}

diesel::table! {
    payments (payment_id) {
        payment_id -> BigInt,
        booking_id -> BigInt,
        payer_email -> Text,
        transaction_id -> Text,
        amount_cents -> BigInt,
        paid_at -> Text,
        status -> Text,
    }
}

diesel::table! {
    sessions (session_id) {
        session_id -> BigInt,
        session_token -> Text,
        user_id -> BigInt,
        created_at -> Text,
        last_activity_at -> Text,
        expires_at -> Text,
    }
}

diesel::joinable!(tour_guides -> users (user_id));
diesel::joinable!(bookings -> packages (package_id));
diesel::joinable!(bookings -> tour_guides (guide_id));
diesel::joinable!(payments -> bookings (booking_id));
diesel::joinable!(sessions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    packages,
    tour_guides,
    bookings,
    stories,
    guide_applications,
    payments,
    sessions,
);
