//! HTTP request handlers.
//!
//! Handlers stay thin: decode and validate the request shape, delegate to
//! the service layer, and map the outcome onto the wire. Domain rules live
//! in `services`; cross-request invariants live in the repository.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use super::auth::CurrentUser;
use super::dto::*;
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::{
    BookingRepository, EstimateRepository, FullRepository, PackageRepository, PostRepository,
};
use crate::models::{
    Booking, Estimate, Package, PackageSource, PaymentStatus, Post, MULTIPLIER_MAX, MULTIPLIER_MIN,
};
use crate::services::{availability, bookings, estimates, packages, JourneySnapshot, ServiceError};

// ── health ────────────────────────────────────────────────

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected",
        _ => "unreachable",
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}

// ── availability ──────────────────────────────────────────

pub async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let post_ref = require("postId", &query.post_id)?;
    let from = parse_day("startDate", require("startDate", &query.start_date)?)?;
    let to = parse_day("endDate", require("endDate", &query.end_date)?)?;

    let range = availability::requested_range(from, to).map_err(AppError::from)?;
    let is_available =
        availability::check_availability(state.repository.as_ref(), post_ref, from, to).await?;

    Ok(Json(AvailabilityResponse {
        is_available,
        requested_range: range,
    }))
}

pub async fn unavailable_dates(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<UnavailableDatesQuery>,
) -> Result<Json<UnavailableDatesResponse>, AppError> {
    let post_ref = require("postId", &query.post_id)?;
    let dates = availability::unavailable_dates(
        state.repository.as_ref(),
        state.billing.as_ref(),
        &user.customer_id,
        post_ref,
    )
    .await?;
    Ok(Json(UnavailableDatesResponse {
        unavailable_dates: dates,
    }))
}

// ── bookings ──────────────────────────────────────────────

pub async fn create_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let from = parse_day("fromDate", &payload.from_date)?;
    let to = parse_day("toDate", &payload.to_date)?;
    let booking = bookings::create_booking(
        state.repository.as_ref(),
        &payload.post_id,
        &user.customer_id,
        payload.guests,
        from,
        to,
        payload.payment_status.unwrap_or(PaymentStatus::Unpaid),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let post_ref = require("postId", &query.post_id)?;
    let post = state.repository.find_post_by_ref(post_ref).await?;
    let bookings = state.repository.list_bookings_for_post(&post.id).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.repository.get_booking(&booking_id).await?))
}

pub async fn invite_link(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(booking_id): Path<String>,
) -> Result<Json<InviteLinkResponse>, AppError> {
    let token = bookings::invite_link(state.repository.as_ref(), &booking_id, false).await?;
    Ok(Json(invite_response(booking_id, token)))
}

pub async fn regenerate_invite_link(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(booking_id): Path<String>,
) -> Result<Json<InviteLinkResponse>, AppError> {
    let token = bookings::invite_link(state.repository.as_ref(), &booking_id, true).await?;
    info!(booking_id, "invite token regenerated");
    Ok(Json(invite_response(booking_id, token)))
}

fn invite_response(booking_id: String, token: String) -> InviteLinkResponse {
    InviteLinkResponse {
        invite_url: format!("/invite/{token}"),
        booking_id,
        token,
    }
}

pub async fn accept_invite(
    State(state): State<AppState>,
    Json(payload): Json<AcceptInviteRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking =
        bookings::accept_invite(state.repository.as_ref(), &payload.token, &payload.guest).await?;
    Ok(Json(booking))
}

// ── estimates ─────────────────────────────────────────────

pub async fn create_estimate(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateEstimateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let from = parse_day("fromDate", &payload.from_date)?;
    let to = parse_day("toDate", &payload.to_date)?;
    let estimate = estimates::create_or_update_estimate(
        state.repository.as_ref(),
        &user.customer_id,
        &payload.post_id,
        from,
        to,
        payload.guests,
        &payload.package_type,
        payload.total,
    )
    .await
    .map_err(|e| match e {
        // An unresolvable package identifier is a client error, not a 404.
        ServiceError::NotFound(details) => AppError::PackageNotFound(details),
        other => other.into(),
    })?;
    Ok((StatusCode::CREATED, Json(estimate)))
}

pub async fn list_estimates(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Estimate>>, AppError> {
    let estimates = state
        .repository
        .list_estimates_for_customer(&user.customer_id)
        .await?;
    Ok(Json(estimates))
}

// ── packages ──────────────────────────────────────────────

fn validate_package_fields(
    name: &str,
    multiplier: f64,
    min_nights: u32,
    max_nights: u32,
    base_rate: Option<f64>,
) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    if !multiplier.is_finite() || !(MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&multiplier) {
        return Err(AppError::Validation(format!(
            "multiplier must be between {MULTIPLIER_MIN} and {MULTIPLIER_MAX}"
        )));
    }
    if min_nights < 1 || max_nights < 1 {
        return Err(AppError::Validation(
            "minNights and maxNights must be at least 1".into(),
        ));
    }
    if max_nights < min_nights {
        return Err(AppError::Validation(
            "maxNights must not be below minNights".into(),
        ));
    }
    if let Some(rate) = base_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(AppError::Validation(
                "baseRate must be a non-negative number".into(),
            ));
        }
    }
    Ok(())
}

pub async fn create_package(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(payload): Json<CreatePackageRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_package_fields(
        &payload.name,
        payload.multiplier,
        payload.min_nights,
        payload.max_nights,
        payload.base_rate,
    )?;
    let post = state.repository.find_post_by_ref(&payload.post_id).await?;

    let package = state
        .repository
        .store_package(&Package {
            id: String::new(),
            post_id: post.id,
            name: payload.name,
            description: payload.description,
            category: payload.category,
            multiplier: payload.multiplier,
            min_nights: payload.min_nights,
            max_nights: payload.max_nights,
            base_rate: payload.base_rate,
            external_catalog_id: payload.external_catalog_id,
            enabled: payload.enabled,
            features: payload.features,
            source: PackageSource::Database,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(package)))
}

pub async fn get_package(
    State(state): State<AppState>,
    Path(package_id): Path<String>,
) -> Result<Json<Package>, AppError> {
    Ok(Json(state.repository.get_package(&package_id).await?))
}

pub async fn update_package(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(package_id): Path<String>,
    Json(payload): Json<UpdatePackageRequest>,
) -> Result<Json<Package>, AppError> {
    let mut package = state.repository.get_package(&package_id).await?;

    if let Some(name) = payload.name {
        package.name = name;
    }
    if let Some(description) = payload.description {
        package.description = description;
    }
    if let Some(category) = payload.category {
        package.category = category;
    }
    if let Some(multiplier) = payload.multiplier {
        package.multiplier = multiplier;
    }
    if let Some(min_nights) = payload.min_nights {
        package.min_nights = min_nights;
    }
    if let Some(max_nights) = payload.max_nights {
        package.max_nights = max_nights;
    }
    if let Some(base_rate) = payload.base_rate {
        package.base_rate = Some(base_rate);
    }
    if let Some(ext) = payload.external_catalog_id {
        package.external_catalog_id = Some(ext);
    }
    if let Some(enabled) = payload.enabled {
        package.enabled = enabled;
    }
    if let Some(features) = payload.features {
        package.features = features;
    }

    validate_package_fields(
        &package.name,
        package.multiplier,
        package.min_nights,
        package.max_nights,
        package.base_rate,
    )?;
    Ok(Json(state.repository.store_package(&package).await?))
}

pub async fn delete_package(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(package_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repository.delete_package(&package_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_packages(
    State(state): State<AppState>,
    Query(query): Query<PackagesQuery>,
) -> Result<Json<PackageListResponse>, AppError> {
    let post_ref = require("postId", &query.post_id)?;
    let post = state.repository.find_post_by_ref(post_ref).await?;
    let packages = packages::guest_visible_packages(state.repository.as_ref(), &post).await?;
    Ok(Json(PackageListResponse {
        total: packages.len(),
        packages,
    }))
}

pub async fn suggest_package(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>, AppError> {
    let post_ref = require("postId", &query.post_id)?;
    let nights = query
        .nights
        .ok_or_else(|| AppError::Validation("missing required parameter 'nights'".into()))?;
    if nights < 1 {
        return Err(AppError::Validation("nights must be at least 1".into()));
    }

    let post = state.repository.find_post_by_ref(post_ref).await?;
    let candidates = packages::guest_visible_packages(state.repository.as_ref(), &post).await?;
    let package = packages::best_fit_package(&candidates, nights).cloned();
    Ok(Json(SuggestResponse { package }))
}

// ── posts ─────────────────────────────────────────────────

pub async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.slug.trim().is_empty() || payload.title.trim().is_empty() {
        return Err(AppError::Validation(
            "slug and title must not be empty".into(),
        ));
    }
    if let Some(rate) = payload.nightly_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(AppError::Validation(
                "nightlyRate must be a non-negative number".into(),
            ));
        }
    }
    let post = state
        .repository
        .store_post(&Post {
            id: String::new(),
            slug: payload.slug,
            host_id: user.customer_id,
            title: payload.title,
            nightly_rate: payload.nightly_rate,
            package_settings: payload.package_settings,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<Json<Post>, AppError> {
    Ok(Json(state.repository.find_post_by_ref(&id_or_slug).await?))
}

pub async fn update_package_settings(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
    Json(payload): Json<UpdatePackageSettingsRequest>,
) -> Result<Json<Post>, AppError> {
    let post = state.repository.get_post(&post_id).await?;
    if post.host_id != user.customer_id {
        return Err(AppError::Unauthorized(
            "only the host can update package settings".into(),
        ));
    }
    let updated = state
        .repository
        .update_package_settings(&post.id, payload.package_settings)
        .await?;
    Ok(Json(updated))
}

// ── journey ───────────────────────────────────────────────

pub async fn get_journey(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Json<JourneySnapshot>, AppError> {
    state
        .journeys
        .get(&post_id, &user.customer_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no fresh booking journey for this post".into()))
}

pub async fn put_journey(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(post_id): Path<String>,
    Json(payload): Json<PutJourneyRequest>,
) -> Result<Json<JourneySnapshot>, AppError> {
    let from_date = payload
        .from_date
        .as_deref()
        .map(|v| parse_day("fromDate", v))
        .transpose()?;
    let to_date = payload
        .to_date
        .as_deref()
        .map(|v| parse_day("toDate", v))
        .transpose()?;
    if let (Some(from), Some(to)) = (from_date, to_date) {
        if from >= to {
            return Err(AppError::Validation(
                "fromDate must be before toDate".into(),
            ));
        }
    }

    let stored = state.journeys.put(JourneySnapshot {
        post_id,
        customer_id: user.customer_id,
        package_ref: payload.package_ref,
        from_date,
        to_date,
        guests: payload.guests,
        updated_at: chrono::Utc::now(),
    });
    Ok(Json(stored))
}
