//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies and response wrappers. Domain models already derive
//! camelCase serde and are embedded directly where the wire shape matches.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::AppError;
use crate::models::{Package, PackageCategory, PackageSetting, PaymentStatus, StayRange};

/// Parse a request date at calendar-day precision.
///
/// Accepts plain `YYYY-MM-DD` or an RFC 3339 datetime; any time-of-day
/// component is dropped so timezone boundaries cannot shift the day.
pub fn parse_day(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| AppError::Validation(format!("{field} is not a valid date: '{value}'")))
}

/// Require a query parameter to be present and non-empty.
pub fn require<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, AppError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!(
            "missing required parameter '{field}'"
        ))),
    }
}

fn default_true() -> bool {
    true
}

// ── health ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

// ── availability ──────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub is_available: bool,
    pub requested_range: StayRange,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableDatesQuery {
    #[serde(default)]
    pub post_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableDatesResponse {
    pub unavailable_dates: Vec<NaiveDate>,
}

// ── bookings ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub post_id: String,
    pub from_date: String,
    pub to_date: String,
    #[serde(default)]
    pub guests: Vec<String>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingsQuery {
    #[serde(default)]
    pub post_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteLinkResponse {
    pub booking_id: String,
    pub token: String,
    pub invite_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInviteRequest {
    pub token: String,
    pub guest: String,
}

// ── estimates ─────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEstimateRequest {
    pub post_id: String,
    pub from_date: String,
    pub to_date: String,
    #[serde(default)]
    pub guests: Vec<String>,
    /// Requested package identifier: database id, catalog id, or legacy
    /// display name.
    pub package_type: String,
    #[serde(default)]
    pub total: Option<f64>,
}

// ── packages ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    pub post_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: PackageCategory,
    pub multiplier: f64,
    pub min_nights: u32,
    pub max_nights: u32,
    #[serde(default)]
    pub base_rate: Option<f64>,
    #[serde(default)]
    pub external_catalog_id: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackageRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<PackageCategory>,
    #[serde(default)]
    pub multiplier: Option<f64>,
    #[serde(default)]
    pub min_nights: Option<u32>,
    #[serde(default)]
    pub max_nights: Option<u32>,
    #[serde(default)]
    pub base_rate: Option<f64>,
    #[serde(default)]
    pub external_catalog_id: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PackagesQuery {
    #[serde(default)]
    pub post_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageListResponse {
    pub packages: Vec<Package>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SuggestQuery {
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub nights: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub package: Option<Package>,
}

// ── posts ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub nightly_rate: Option<f64>,
    #[serde(default)]
    pub package_settings: Vec<PackageSetting>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackageSettingsRequest {
    pub package_settings: Vec<PackageSetting>,
}

// ── journey ───────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PutJourneyRequest {
    #[serde(default)]
    pub package_ref: Option<String>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub guests: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_accepts_plain_dates_and_datetimes() {
        assert_eq!(
            parse_day("startDate", "2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        // Time-of-day is truncated.
        assert_eq!(
            parse_day("startDate", "2024-03-01T23:30:00+02:00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_day("startDate", "not-a-date").is_err());
    }

    #[test]
    fn require_rejects_missing_and_blank() {
        assert!(require("postId", &None).is_err());
        assert!(require("postId", &Some("  ".into())).is_err());
        assert_eq!(require("postId", &Some("post-1".into())).unwrap(), "post-1");
    }
}
