//! Confirmed bookings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::range::StayRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// A confirmed stay. Ranges are half-open: `to_date` is the checkout day
/// and is free for the next guest's check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub post_id: String,
    pub customer_id: String,
    #[serde(default)]
    pub guests: Vec<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub payment_status: PaymentStatus,
    /// One-time invite token; generated lazily on the first invite-link
    /// request and replaced wholesale on regeneration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn range(&self) -> StayRange {
        StayRange {
            from: self.from_date,
            to: self.to_date,
        }
    }
}

/// Input for booking creation; the repository assigns the id and enforces
/// the overlap invariant atomically.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub post_id: String,
    pub customer_id: String,
    pub guests: Vec<String>,
    pub range: StayRange,
    pub payment_status: PaymentStatus,
}
