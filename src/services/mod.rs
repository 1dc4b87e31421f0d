//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repository traits. The
//! availability checker and the package resolver live here; both are
//! stateless computations invoked per request against repository data.

pub mod availability;
pub mod billing;
pub mod bookings;
pub mod catalog;
pub mod estimates;
pub mod journey;
pub mod packages;

pub use availability::{check_availability, unavailable_dates};
pub use billing::{EntitlementVerifier, RevenueCatVerifier, StaticEntitlements};
pub use bookings::{accept_invite, create_booking, invite_link};
pub use estimates::create_or_update_estimate;
pub use journey::{JourneySnapshot, JourneyStore};
pub use packages::{best_fit_package, compute_total, resolve_package, ResolvedPackage, ResolvedVia};

use crate::db::repository::RepositoryError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error taxonomy surfaced by the service layer.
///
/// Validation errors carry field-level detail for the caller; not-found and
/// conflict errors carry a user-facing message only.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
