// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use clap::Parser;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use wayfare_api::{
    ApiError, LocalPaymentGateway, PaymentGateway, handlers,
    request_response::{
        ApplicationInfo, ApplicationRequest, BookingInfo, BookingRequest,
        CreatePaymentIntentRequest, CreatePaymentIntentResponse, DecideBookingRequest, GuideInfo,
        ListApplicationsResponse, ListBookingsResponse, ListGuidesResponse, ListPackagesResponse,
        ListStoriesResponse, ListUsersResponse, MessageResponse, PackageInfo, PackageRequest,
        PaymentInfo, RecordPaymentRequest, RemoveStoryImageRequest, SignInRequest, SignInResponse,
        StoryInfo, StoryRequest, UpdateRoleRequest, UserInfo,
    },
};
use wayfare_persistence::Persistence;

use crate::session::SessionUser;

/// Wayfare Server - HTTP server for the Wayfare travel booking platform
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer wrapped in a Mutex for safe concurrent access.
    persistence: Arc<Mutex<Persistence>>,
    /// The payment gateway used for checkout.
    gateway: Arc<dyn PaymentGateway>,
}

/// Query parameters for listing users.
#[derive(Debug, Deserialize)]
struct ListUsersQuery {
    /// Restrict to accounts holding this role.
    role: Option<String>,
    /// Substring match on name or email.
    search: Option<String>,
}

/// Query parameters for listing bookings.
#[derive(Debug, Deserialize)]
struct ListBookingsQuery {
    /// Tourist email to list bookings for. Defaults to the acting user.
    email: Option<String>,
}

/// Error response body.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UpstreamFailure { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Accounts and sessions
// ============================================================================

/// Handler for PUT `/users/{user}`.
///
/// Signs in (creating the account on first contact) and mints a session.
async fn handle_sign_in(
    AxumState(app_state): AxumState<AppState>,
    Path(email): Path<String>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, HttpError> {
    info!(email = %email, "Handling sign_in request");
    let mut persistence = app_state.persistence.lock().await;
    let response: SignInResponse = handlers::sign_in(&mut persistence, &email, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_user, token): SessionUser,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = handlers::logout(&mut persistence, &token)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/profile`.
async fn handle_get_profile(SessionUser(user, _token): SessionUser) -> Json<UserInfo> {
    Json(handlers::get_profile(&user))
}

/// Handler for GET `/users`. Admin only.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListUsersResponse = handlers::list_users(
        &mut persistence,
        &user,
        query.role.as_deref(),
        query.search.as_deref(),
    )?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/users/{user}`. Self or admin.
async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(email): Path<String>,
) -> Result<Json<UserInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: UserInfo = handlers::get_user(&mut persistence, &user, &email)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for PATCH `/users/{user}/role`. Admin only.
async fn handle_update_user_role(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse =
        handlers::update_user_role(&mut persistence, &user, user_id, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for DELETE `/users/{user}`. Admin only.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = handlers::delete_user(&mut persistence, &user, user_id)?;
    drop(persistence);
    Ok(Json(response))
}

// ============================================================================
// Packages
// ============================================================================

/// Handler for GET `/packages`. Public.
async fn handle_list_packages(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListPackagesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListPackagesResponse = handlers::list_packages(&mut persistence)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/packages/{package_id}`. Public.
async fn handle_get_package(
    AxumState(app_state): AxumState<AppState>,
    Path(package_id): Path<i64>,
) -> Result<Json<PackageInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PackageInfo = handlers::get_package(&mut persistence, package_id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/packages`. Admin only.
async fn handle_create_package(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Json(req): Json<PackageRequest>,
) -> Result<Json<PackageInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PackageInfo = handlers::create_package(&mut persistence, &user, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for PATCH `/packages/{package_id}`. Admin only.
async fn handle_update_package(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(package_id): Path<i64>,
    Json(req): Json<PackageRequest>,
) -> Result<Json<PackageInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PackageInfo =
        handlers::update_package(&mut persistence, &user, package_id, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for DELETE `/packages/{package_id}`. Admin only.
async fn handle_delete_package(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(package_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse =
        handlers::delete_package(&mut persistence, &user, package_id)?;
    drop(persistence);
    Ok(Json(response))
}

// ============================================================================
// Bookings
// ============================================================================

/// Handler for POST `/bookings`.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Json(req): Json<BookingRequest>,
) -> Result<Json<BookingInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: BookingInfo = handlers::create_booking(&mut persistence, &user, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/bookings`. The acting user's own bookings, or
/// another tourist's with `?email=` (admin only).
async fn handle_list_my_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ListBookingsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListBookingsResponse =
        handlers::list_my_bookings(&mut persistence, &user, query.email.as_deref())?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/bookings/{booking_id}`. Booking participants only.
async fn handle_get_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: BookingInfo = handlers::get_booking(&mut persistence, &user, booking_id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/bookings/all`. Admin only.
async fn handle_list_all_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<ListBookingsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListBookingsResponse = handlers::list_all_bookings(&mut persistence, &user)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/bookings/assigned`. Guide only.
async fn handle_list_guide_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<ListBookingsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListBookingsResponse = handlers::list_guide_bookings(&mut persistence, &user)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for PATCH `/bookings/{booking_id}`. Assigned guide only.
async fn handle_decide_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(booking_id): Path<i64>,
    Json(req): Json<DecideBookingRequest>,
) -> Result<Json<BookingInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: BookingInfo =
        handlers::decide_booking(&mut persistence, &user, booking_id, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for DELETE `/bookings/{booking_id}`. Owner or admin.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(booking_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse =
        handlers::cancel_booking(&mut persistence, &user, booking_id)?;
    drop(persistence);
    Ok(Json(response))
}

// ============================================================================
// Stories
// ============================================================================

/// Handler for GET `/stories`. Public.
async fn handle_list_stories(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListStoriesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListStoriesResponse = handlers::list_stories(&mut persistence)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/stories/{story_id}`. Public.
async fn handle_get_story(
    AxumState(app_state): AxumState<AppState>,
    Path(story_id): Path<i64>,
) -> Result<Json<StoryInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: StoryInfo = handlers::get_story(&mut persistence, story_id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/stories`.
async fn handle_create_story(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Json(req): Json<StoryRequest>,
) -> Result<Json<StoryInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: StoryInfo = handlers::create_story(&mut persistence, &user, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for PUT `/stories/{story_id}`. Author only.
async fn handle_update_story(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(story_id): Path<i64>,
    Json(req): Json<StoryRequest>,
) -> Result<Json<StoryInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: StoryInfo = handlers::update_story(&mut persistence, &user, story_id, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for DELETE `/stories/{story_id}`. Author only.
async fn handle_delete_story(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(story_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = handlers::delete_story(&mut persistence, &user, story_id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for PUT `/stories/{story_id}/remove-image`. Author only.
async fn handle_remove_story_image(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(story_id): Path<i64>,
    Json(req): Json<RemoveStoryImageRequest>,
) -> Result<Json<StoryInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: StoryInfo =
        handlers::remove_story_image(&mut persistence, &user, story_id, req)?;
    drop(persistence);
    Ok(Json(response))
}

// ============================================================================
// Guide applications
// ============================================================================

/// Handler for POST `/applications`. Tourist only.
async fn handle_submit_application(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Json(req): Json<ApplicationRequest>,
) -> Result<Json<ApplicationInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ApplicationInfo = handlers::submit_application(&mut persistence, &user, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/applications`. Admin only.
async fn handle_list_applications(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
) -> Result<Json<ListApplicationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListApplicationsResponse = handlers::list_applications(&mut persistence, &user)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for PATCH `/applications/{application_id}/accept`. Admin only.
async fn handle_accept_application(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(application_id): Path<i64>,
) -> Result<Json<GuideInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GuideInfo =
        handlers::accept_application(&mut persistence, &user, application_id)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for DELETE `/applications/{application_id}`. Admin only.
async fn handle_reject_application(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Path(application_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse =
        handlers::reject_application(&mut persistence, &user, application_id)?;
    drop(persistence);
    Ok(Json(response))
}

// ============================================================================
// Tour guides
// ============================================================================

/// Handler for GET `/tour-guides`. Public.
async fn handle_list_guides(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListGuidesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListGuidesResponse = handlers::list_guides(&mut persistence)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for GET `/tour-guides/{guide_id}`. Public.
async fn handle_get_guide(
    AxumState(app_state): AxumState<AppState>,
    Path(guide_id): Path<i64>,
) -> Result<Json<GuideInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: GuideInfo = handlers::get_guide(&mut persistence, guide_id)?;
    drop(persistence);
    Ok(Json(response))
}

// ============================================================================
// Payments
// ============================================================================

/// Handler for POST `/create-payment-intent`. Booking owner only.
async fn handle_create_payment_intent(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Json(req): Json<CreatePaymentIntentRequest>,
) -> Result<Json<CreatePaymentIntentResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CreatePaymentIntentResponse =
        handlers::create_payment_intent(&mut persistence, app_state.gateway.as_ref(), &user, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Handler for POST `/payments`. Booking owner only.
async fn handle_record_payment(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _token): SessionUser,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<Json<PaymentInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: PaymentInfo = handlers::record_payment(&mut persistence, &user, req)?;
    drop(persistence);
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/users/{user}",
            put(handle_sign_in)
                .get(handle_get_user)
                .delete(handle_delete_user),
        )
        .route("/auth/logout", post(handle_logout))
        .route("/profile", get(handle_get_profile))
        .route("/users", get(handle_list_users))
        .route("/users/{user}/role", patch(handle_update_user_role))
        .route("/packages", get(handle_list_packages).post(handle_create_package))
        .route(
            "/packages/{package_id}",
            get(handle_get_package)
                .patch(handle_update_package)
                .delete(handle_delete_package),
        )
        .route("/bookings", post(handle_create_booking).get(handle_list_my_bookings))
        .route("/bookings/all", get(handle_list_all_bookings))
        .route("/bookings/assigned", get(handle_list_guide_bookings))
        .route(
            "/bookings/{booking_id}",
            get(handle_get_booking)
                .patch(handle_decide_booking)
                .delete(handle_cancel_booking),
        )
        .route("/stories", get(handle_list_stories).post(handle_create_story))
        .route(
            "/stories/{story_id}",
            get(handle_get_story)
                .put(handle_update_story)
                .delete(handle_delete_story),
        )
        .route(
            "/stories/{story_id}/remove-image",
            put(handle_remove_story_image),
        )
        .route("/applications", post(handle_submit_application).get(handle_list_applications))
        .route(
            "/applications/{application_id}/accept",
            patch(handle_accept_application),
        )
        .route(
            "/applications/{application_id}",
            delete(handle_reject_application),
        )
        .route("/tour-guides", get(handle_list_guides))
        .route("/tour-guides/{guide_id}", get(handle_get_guide))
        .route("/create-payment-intent", post(handle_create_payment_intent))
        .route("/payments", post(handle_record_payment))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Wayfare Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        gateway: Arc::new(LocalPaymentGateway),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;
    use wayfare_domain::Role;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            gateway: Arc::new(LocalPaymentGateway),
        }
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    /// Signs in over HTTP and returns the session token.
    async fn sign_in(app: &Router, email: &str, name: &str) -> String {
        let req = SignInRequest {
            name: name.to_string(),
            photo: None,
        };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/users/{email}"))
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&req).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let sign_in: SignInResponse = body_json(response).await;
        sign_in.token
    }

    /// Signs in and promotes the account to admin directly in storage.
    async fn sign_in_admin(app: &Router, app_state: &AppState, email: &str) -> String {
        let token: String = sign_in(app, email, "Test Admin").await;
        let mut persistence = app_state.persistence.lock().await;
        let user = persistence
            .get_user_by_email(email)
            .unwrap()
            .expect("Admin account missing");
        persistence
            .set_user_role(user.user_id.unwrap(), Role::Admin)
            .unwrap();
        drop(persistence);
        token
    }

    fn test_package_body() -> String {
        serde_json::to_string(&PackageRequest {
            title: String::from("Highlands Trek"),
            description: String::from("Five days through the Scottish Highlands"),
            location: String::from("Scotland"),
            duration_days: 5,
            price_cents: 120_000,
            category: String::from("adventure"),
            itinerary: String::from("Day 1: Glencoe."),
            images: vec![],
        })
        .unwrap()
    }

    fn test_application_body() -> String {
        serde_json::to_string(&ApplicationRequest {
            motivation: String::from("I know these hills"),
            experience: String::from("Ten seasons of trekking"),
            specialty: String::from("mountain trekking"),
            languages: vec![String::from("English")],
            cv_link: String::from("https://example.com/cv.pdf"),
        })
        .unwrap()
    }

    /// Seeds a package and a promoted guide, returning
    /// (`admin_token`, `guide_token`, `package_id`, `guide_id`).
    async fn seed_catalog(app: &Router, app_state: &AppState) -> (String, String, i64, i64) {
        let admin_token: String = sign_in_admin(app, app_state, "boss@example.com").await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/packages")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {admin_token}"))
                    .body(Body::from(test_package_body()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let package: PackageInfo = body_json(response).await;

        let guide_token: String = sign_in(app, "gregor@example.com", "Gregor").await;
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/applications")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {guide_token}"))
                    .body(Body::from(test_application_body()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let application: ApplicationInfo = body_json(response).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!(
                        "/applications/{}/accept",
                        application.application_id
                    ))
                    .header("Authorization", format!("Bearer {admin_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let guide: GuideInfo = body_json(response).await;

        (admin_token, guide_token, package.package_id, guide.guide_id)
    }

    #[tokio::test]
    async fn test_sign_in_returns_token_and_tourist_role() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let req = SignInRequest {
            name: String::from("Fiona"),
            photo: None,
        };
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/users/fiona@example.com")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&req).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let sign_in: SignInResponse = body_json(response).await;
        assert!(!sign_in.token.is_empty());
        assert_eq!(sign_in.user.role, "tourist");
    }

    #[tokio::test]
    async fn test_sign_in_then_fetch_round_trips() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = sign_in(&app, "fiona@example.com", "Fiona").await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/users/fiona@example.com")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let user: UserInfo = body_json(response).await;
        assert_eq!(user.email, "fiona@example.com");
        assert_eq!(user.name, "Fiona");
        assert_eq!(user.role, "tourist");
    }

    #[tokio::test]
    async fn test_gated_route_without_token_is_unauthorized() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/bookings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_package_as_tourist_is_forbidden() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = sign_in(&app, "fiona@example.com", "Fiona").await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/packages")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::from(test_package_body()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_creates_package_and_public_sees_it() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let token: String = sign_in_admin(&app, &app_state, "boss@example.com").await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/packages")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::from(test_package_body()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let created: PackageInfo = body_json(response).await;
        assert!(created.package_id > 0);

        // No token needed for the public catalog.
        let listing = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/packages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(listing.status(), HttpStatusCode::OK);
        let packages: ListPackagesResponse = body_json(listing).await;
        assert_eq!(packages.packages.len(), 1);
        assert_eq!(packages.packages[0].title, "Highlands Trek");
    }

    #[tokio::test]
    async fn test_missing_package_is_not_found() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/packages/9999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
        let error: ErrorResponse = body_json(response).await;
        assert!(error.error);
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = sign_in(&app, "fiona@example.com", "Fiona").await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let after = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/profile")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(after.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_booking_lifecycle_over_http() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let (_admin_token, guide_token, package_id, guide_id) =
            seed_catalog(&app, &app_state).await;

        let tourist_token: String = sign_in(&app, "fiona@example.com", "Fiona").await;
        let booking_body = serde_json::to_string(&BookingRequest {
            package_id,
            guide_id,
            tour_date: String::from("2026-09-15"),
        })
        .unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bookings")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {tourist_token}"))
                    .body(Body::from(booking_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let booking: BookingInfo = body_json(response).await;
        assert_eq!(booking.status, "Pending");
        assert_eq!(booking.price_cents, 120_000);

        let payment_body = serde_json::to_string(&RecordPaymentRequest {
            booking_id: booking.booking_id,
            transaction_id: String::from("txn_123"),
        })
        .unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payments")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {tourist_token}"))
                    .body(Body::from(payment_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/bookings/{}", booking.booking_id))
                    .header("Authorization", format!("Bearer {tourist_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let paid: BookingInfo = body_json(response).await;
        assert_eq!(paid.status, "In Review");
        assert_eq!(paid.transaction_id.as_deref(), Some("txn_123"));

        let decide_body = serde_json::to_string(&DecideBookingRequest {
            status: String::from("Accepted"),
        })
        .unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/bookings/{}", booking.booking_id))
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {guide_token}"))
                    .body(Body::from(decide_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let decided: BookingInfo = body_json(response).await;
        assert_eq!(decided.status, "Accepted");
    }

    #[tokio::test]
    async fn test_invalid_booking_date_is_bad_request() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = sign_in(&app, "fiona@example.com", "Fiona").await;

        let body = serde_json::to_string(&BookingRequest {
            package_id: 1,
            guide_id: 1,
            tour_date: String::from("next tuesday"),
        })
        .unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bookings")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cancel_after_payment_is_unprocessable() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let (_admin_token, _guide_token, package_id, guide_id) =
            seed_catalog(&app, &app_state).await;

        let tourist_token: String = sign_in(&app, "fiona@example.com", "Fiona").await;
        let booking_body = serde_json::to_string(&BookingRequest {
            package_id,
            guide_id,
            tour_date: String::from("2026-09-15"),
        })
        .unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bookings")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {tourist_token}"))
                    .body(Body::from(booking_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let booking: BookingInfo = body_json(response).await;

        let payment_body = serde_json::to_string(&RecordPaymentRequest {
            booking_id: booking.booking_id,
            transaction_id: String::from("txn_123"),
        })
        .unwrap();
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payments")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {tourist_token}"))
                    .body(Body::from(payment_body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/bookings/{}", booking.booking_id))
                    .header("Authorization", format!("Bearer {tourist_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_payment_intent_over_http() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let (_admin_token, _guide_token, package_id, guide_id) =
            seed_catalog(&app, &app_state).await;

        let tourist_token: String = sign_in(&app, "fiona@example.com", "Fiona").await;
        let booking_body = serde_json::to_string(&BookingRequest {
            package_id,
            guide_id,
            tour_date: String::from("2026-09-15"),
        })
        .unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bookings")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {tourist_token}"))
                    .body(Body::from(booking_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let booking: BookingInfo = body_json(response).await;

        let intent_body = serde_json::to_string(&CreatePaymentIntentRequest {
            booking_id: booking.booking_id,
        })
        .unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/create-payment-intent")
                    .header("content-type", "application/json")
                    .header("Authorization", format!("Bearer {tourist_token}"))
                    .body(Body::from(intent_body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let intent: CreatePaymentIntentResponse = body_json(response).await;
        assert_eq!(intent.amount_cents, 120_000);
        assert_eq!(intent.currency, "usd");
    }
}
