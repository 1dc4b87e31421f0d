//! Repository trait definitions.
//!
//! The persistence layer is abstracted behind per-entity async traits plus
//! the [`FullRepository`] supertrait used for dependency injection. The
//! in-memory implementation lives in `db::repositories::local`; a SQL
//! backend would slot in behind the same seam.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{
    Booking, Estimate, EstimateDraft, NewBooking, Package, PackageSetting, Post,
};

/// Storage operations for posts (property listings).
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert or replace a post. An empty id gets one assigned; the stored
    /// record is returned.
    async fn store_post(&self, post: &Post) -> RepositoryResult<Post>;

    /// Fetch a post by id.
    async fn get_post(&self, post_id: &str) -> RepositoryResult<Post>;

    /// Fetch a post by id or slug, id taking precedence.
    async fn find_post_by_ref(&self, id_or_slug: &str) -> RepositoryResult<Post>;

    /// Replace the per-post package overrides.
    async fn update_package_settings(
        &self,
        post_id: &str,
        settings: Vec<PackageSetting>,
    ) -> RepositoryResult<Post>;
}

/// Storage operations for packages.
#[async_trait]
pub trait PackageRepository: Send + Sync {
    /// Insert or replace a package; an empty id gets one assigned.
    async fn store_package(&self, package: &Package) -> RepositoryResult<Package>;

    /// Fetch a package by id.
    async fn get_package(&self, package_id: &str) -> RepositoryResult<Package>;

    /// Delete a package by id.
    async fn delete_package(&self, package_id: &str) -> RepositoryResult<()>;

    /// All packages owned by a post, optionally restricted to enabled ones.
    async fn list_packages_for_post(
        &self,
        post_id: &str,
        only_enabled: bool,
    ) -> RepositoryResult<Vec<Package>>;

    /// Exact display-name lookup within a post's packages.
    async fn find_package_by_name(
        &self,
        post_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<Package>>;
}

/// Storage operations for bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Create a booking, enforcing the no-overlap invariant atomically with
    /// the insert. Returns [`RepositoryError::Conflict`] when the range
    /// overlaps an existing booking for the same post.
    async fn create_booking(&self, booking: &NewBooking) -> RepositoryResult<Booking>;

    /// Fetch a booking by id.
    async fn get_booking(&self, booking_id: &str) -> RepositoryResult<Booking>;

    /// All bookings for a post.
    async fn list_bookings_for_post(&self, post_id: &str) -> RepositoryResult<Vec<Booking>>;

    /// Resolve a booking by its invite token.
    async fn find_booking_by_token(&self, token: &str) -> RepositoryResult<Option<Booking>>;

    /// Set (or replace) the invite token on a booking.
    async fn set_invite_token(&self, booking_id: &str, token: &str) -> RepositoryResult<Booking>;

    /// Append a guest to a booking's guest list.
    async fn add_guest(&self, booking_id: &str, guest: &str) -> RepositoryResult<Booking>;
}

/// Storage operations for estimates.
#[async_trait]
pub trait EstimateRepository: Send + Sync {
    /// Insert or update an estimate keyed by (post, customer, date range).
    async fn upsert_estimate(&self, draft: &EstimateDraft) -> RepositoryResult<Estimate>;

    /// All estimates a customer has requested.
    async fn list_estimates_for_customer(
        &self,
        customer_id: &str,
    ) -> RepositoryResult<Vec<Estimate>>;
}

/// Session validation. Token issuance is external; the repository only
/// answers "which customer does this token belong to".
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Resolve a bearer token to a customer id.
    async fn resolve_session(&self, token: &str) -> RepositoryResult<Option<String>>;

    /// Register a session token for a customer.
    async fn insert_session(&self, token: &str, customer_id: &str) -> RepositoryResult<()>;
}

/// Combined repository interface for dependency injection.
#[async_trait]
pub trait FullRepository:
    PostRepository + PackageRepository + BookingRepository + EstimateRepository + SessionRepository
{
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
