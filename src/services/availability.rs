//! Booking availability checks.
//!
//! Read-only half-open interval scans over a post's bookings. The same
//! predicate runs again inside the repository's booking insert, so a race
//! between two writers is caught at write time as well.

use chrono::NaiveDate;
use tracing::warn;

use crate::db::repository::{BookingRepository, FullRepository, PostRepository};
use crate::models::{InvalidStayRange, StayRange};
use crate::services::{billing::EntitlementVerifier, ServiceError, ServiceResult};

/// Validate and build a stay range from request bounds.
pub fn requested_range(from: NaiveDate, to: NaiveDate) -> ServiceResult<StayRange> {
    StayRange::new(from, to).map_err(|e: InvalidStayRange| ServiceError::Validation(e.to_string()))
}

/// Whether `[from, to)` is free of overlapping bookings for the post.
///
/// The post reference may be an id or a slug. `from >= to` is rejected
/// before any query runs.
pub async fn check_availability(
    repo: &dyn FullRepository,
    post_ref: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> ServiceResult<bool> {
    let range = requested_range(from, to)?;
    let post = repo.find_post_by_ref(post_ref).await?;
    let bookings = repo.list_bookings_for_post(&post.id).await?;
    Ok(!bookings.iter().any(|b| b.range().overlaps(&range)))
}

/// Every calendar day covered by any booking for the post, sorted and
/// deduplicated.
///
/// Gated on the caller holding an active billing entitlement:
/// non-subscribers get an empty list, not an error, so their calendars
/// render fully open until they subscribe. A failed entitlement lookup
/// degrades the same way.
pub async fn unavailable_dates(
    repo: &dyn FullRepository,
    billing: &dyn EntitlementVerifier,
    customer_id: &str,
    post_ref: &str,
) -> ServiceResult<Vec<NaiveDate>> {
    let post = repo.find_post_by_ref(post_ref).await?;

    let entitled = match billing.has_active_entitlement(customer_id).await {
        Ok(entitled) => entitled,
        Err(e) => {
            warn!(customer_id, error = %e, "entitlement lookup failed; treating as not entitled");
            false
        }
    };
    if !entitled {
        return Ok(Vec::new());
    }

    let bookings = repo.list_bookings_for_post(&post.id).await?;
    let mut days: Vec<NaiveDate> = bookings.iter().flat_map(|b| b.range().days().collect::<Vec<_>>()).collect();
    days.sort_unstable();
    days.dedup();
    Ok(days)
}

#[cfg(test)]
#[path = "availability_tests.rs"]
mod availability_tests;
