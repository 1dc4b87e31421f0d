//! Booking creation and guest invites.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::db::repository::{BookingRepository, FullRepository, PostRepository, RepositoryError};
use crate::models::{Booking, NewBooking, PaymentStatus};
use crate::services::{availability::requested_range, ServiceError, ServiceResult};

/// Message surfaced when a booking's range collides with an existing one.
pub const BOOKING_CONFLICT_MESSAGE: &str = "Booking dates are not available.";

/// Create a booking after validating the range.
///
/// The overlap invariant is enforced by the repository atomically with the
/// insert; a conflict surfaces as [`ServiceError::Conflict`].
pub async fn create_booking(
    repo: &dyn FullRepository,
    post_ref: &str,
    customer_id: &str,
    guests: Vec<String>,
    from: NaiveDate,
    to: NaiveDate,
    payment_status: PaymentStatus,
) -> ServiceResult<Booking> {
    let range = requested_range(from, to)?;
    let post = repo.find_post_by_ref(post_ref).await?;

    let booking = repo
        .create_booking(&NewBooking {
            post_id: post.id.clone(),
            customer_id: customer_id.to_string(),
            guests,
            range,
            payment_status,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict { .. } => {
                ServiceError::Conflict(BOOKING_CONFLICT_MESSAGE.to_string())
            }
            other => ServiceError::Repository(other),
        })?;

    info!(booking_id = %booking.id, post_id = %post.id, "booking created");
    Ok(booking)
}

/// Fetch the invite token for a booking, generating it lazily on first
/// request. With `regenerate`, a fresh token replaces (and invalidates)
/// the prior one.
pub async fn invite_link(
    repo: &dyn FullRepository,
    booking_id: &str,
    regenerate: bool,
) -> ServiceResult<String> {
    let booking = repo.get_booking(booking_id).await?;
    if !regenerate {
        if let Some(token) = booking.invite_token {
            return Ok(token);
        }
    }
    let token = Uuid::new_v4().to_string();
    repo.set_invite_token(booking_id, &token).await?;
    Ok(token)
}

/// Join a booking's guest list via its invite token.
pub async fn accept_invite(
    repo: &dyn FullRepository,
    token: &str,
    guest: &str,
) -> ServiceResult<Booking> {
    if guest.trim().is_empty() {
        return Err(ServiceError::Validation("guest must not be empty".into()));
    }
    let booking = repo
        .find_booking_by_token(token)
        .await?
        .ok_or_else(|| ServiceError::NotFound("invite token is not valid".into()))?;
    Ok(repo.add_guest(&booking.id, guest).await?)
}
