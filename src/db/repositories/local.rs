//! In-memory repository implementation.
//!
//! Backs local development and the test suites. All entity maps live behind
//! a single `parking_lot::RwLock`, which is what lets `create_booking` run
//! its overlap re-check and the insert under one write guard — the
//! read-then-write race the availability pre-flight leaves open cannot slip
//! through here.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::db::repository::{
    BookingRepository, ErrorContext, EstimateRepository, FullRepository, PackageRepository,
    PostRepository, RepositoryError, RepositoryResult, SessionRepository,
};
use crate::models::{
    Booking, Estimate, EstimateDraft, NewBooking, Package, PackageSetting, Post,
};

#[derive(Default)]
struct Store {
    posts: HashMap<String, Post>,
    packages: HashMap<String, Package>,
    bookings: HashMap<String, Booking>,
    estimates: HashMap<String, Estimate>,
    /// token -> customer id
    sessions: HashMap<String, String>,
}

/// In-memory repository for local development and tests.
#[derive(Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_id(id: &str) -> String {
    if id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        id.to_string()
    }
}

#[async_trait]
impl PostRepository for LocalRepository {
    async fn store_post(&self, post: &Post) -> RepositoryResult<Post> {
        if post.slug.trim().is_empty() {
            return Err(RepositoryError::validation_with_context(
                "post slug must not be empty",
                ErrorContext::new("store_post").with_entity("post"),
            ));
        }
        let mut stored = post.clone();
        stored.id = ensure_id(&post.id);
        let mut store = self.store.write();
        store.posts.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_post(&self, post_id: &str) -> RepositoryResult<Post> {
        self.store.read().posts.get(post_id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("post '{}' not found", post_id),
                ErrorContext::new("get_post")
                    .with_entity("post")
                    .with_entity_id(post_id),
            )
        })
    }

    async fn find_post_by_ref(&self, id_or_slug: &str) -> RepositoryResult<Post> {
        let store = self.store.read();
        if let Some(post) = store.posts.get(id_or_slug) {
            return Ok(post.clone());
        }
        store
            .posts
            .values()
            .find(|p| p.slug == id_or_slug)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("post '{}' not found", id_or_slug),
                    ErrorContext::new("find_post_by_ref")
                        .with_entity("post")
                        .with_entity_id(id_or_slug),
                )
            })
    }

    async fn update_package_settings(
        &self,
        post_id: &str,
        settings: Vec<PackageSetting>,
    ) -> RepositoryResult<Post> {
        let mut store = self.store.write();
        let post = store.posts.get_mut(post_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("post '{}' not found", post_id),
                ErrorContext::new("update_package_settings")
                    .with_entity("post")
                    .with_entity_id(post_id),
            )
        })?;
        post.package_settings = settings;
        Ok(post.clone())
    }
}

#[async_trait]
impl PackageRepository for LocalRepository {
    async fn store_package(&self, package: &Package) -> RepositoryResult<Package> {
        if package.name.trim().is_empty() {
            return Err(RepositoryError::validation_with_context(
                "package name must not be empty",
                ErrorContext::new("store_package").with_entity("package"),
            ));
        }
        if package.min_nights < 1 || package.max_nights < package.min_nights {
            return Err(RepositoryError::validation_with_context(
                "package night window must satisfy 1 <= min <= max",
                ErrorContext::new("store_package").with_entity("package"),
            ));
        }
        let mut stored = package.clone();
        stored.id = ensure_id(&package.id);
        stored.multiplier = crate::models::package::clamp_multiplier(package.multiplier);
        let mut store = self.store.write();
        store.packages.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_package(&self, package_id: &str) -> RepositoryResult<Package> {
        self.store
            .read()
            .packages
            .get(package_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("package '{}' not found", package_id),
                    ErrorContext::new("get_package")
                        .with_entity("package")
                        .with_entity_id(package_id),
                )
            })
    }

    async fn delete_package(&self, package_id: &str) -> RepositoryResult<()> {
        let mut store = self.store.write();
        store.packages.remove(package_id).map(|_| ()).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("package '{}' not found", package_id),
                ErrorContext::new("delete_package")
                    .with_entity("package")
                    .with_entity_id(package_id),
            )
        })
    }

    async fn list_packages_for_post(
        &self,
        post_id: &str,
        only_enabled: bool,
    ) -> RepositoryResult<Vec<Package>> {
        let store = self.store.read();
        let mut packages: Vec<Package> = store
            .packages
            .values()
            .filter(|p| p.post_id == post_id && (!only_enabled || p.enabled))
            .cloned()
            .collect();
        // Stable order for first-match semantics downstream.
        packages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(packages)
    }

    async fn find_package_by_name(
        &self,
        post_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<Package>> {
        let store = self.store.read();
        let mut matches: Vec<&Package> = store
            .packages
            .values()
            .filter(|p| p.post_id == post_id && p.enabled && p.name == name)
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches.first().map(|p| (*p).clone()))
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn create_booking(&self, booking: &NewBooking) -> RepositoryResult<Booking> {
        let mut store = self.store.write();
        // Overlap gate under the write lock: check and insert are atomic.
        let conflict = store
            .bookings
            .values()
            .any(|b| b.post_id == booking.post_id && b.range().overlaps(&booking.range));
        if conflict {
            return Err(RepositoryError::conflict_with_context(
                "booking range overlaps an existing booking",
                ErrorContext::new("create_booking")
                    .with_entity("booking")
                    .with_details(format!(
                        "post={} range={}..{}",
                        booking.post_id, booking.range.from, booking.range.to
                    )),
            ));
        }
        let stored = Booking {
            id: Uuid::new_v4().to_string(),
            post_id: booking.post_id.clone(),
            customer_id: booking.customer_id.clone(),
            guests: booking.guests.clone(),
            from_date: booking.range.from,
            to_date: booking.range.to,
            payment_status: booking.payment_status,
            invite_token: None,
            created_at: Utc::now(),
        };
        store.bookings.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_booking(&self, booking_id: &str) -> RepositoryResult<Booking> {
        self.store
            .read()
            .bookings
            .get(booking_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("booking '{}' not found", booking_id),
                    ErrorContext::new("get_booking")
                        .with_entity("booking")
                        .with_entity_id(booking_id),
                )
            })
    }

    async fn list_bookings_for_post(&self, post_id: &str) -> RepositoryResult<Vec<Booking>> {
        let store = self.store.read();
        let mut bookings: Vec<Booking> = store
            .bookings
            .values()
            .filter(|b| b.post_id == post_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| a.from_date.cmp(&b.from_date));
        Ok(bookings)
    }

    async fn find_booking_by_token(&self, token: &str) -> RepositoryResult<Option<Booking>> {
        Ok(self
            .store
            .read()
            .bookings
            .values()
            .find(|b| b.invite_token.as_deref() == Some(token))
            .cloned())
    }

    async fn set_invite_token(&self, booking_id: &str, token: &str) -> RepositoryResult<Booking> {
        let mut store = self.store.write();
        let booking = store.bookings.get_mut(booking_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("booking '{}' not found", booking_id),
                ErrorContext::new("set_invite_token")
                    .with_entity("booking")
                    .with_entity_id(booking_id),
            )
        })?;
        booking.invite_token = Some(token.to_string());
        Ok(booking.clone())
    }

    async fn add_guest(&self, booking_id: &str, guest: &str) -> RepositoryResult<Booking> {
        let mut store = self.store.write();
        let booking = store.bookings.get_mut(booking_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("booking '{}' not found", booking_id),
                ErrorContext::new("add_guest")
                    .with_entity("booking")
                    .with_entity_id(booking_id),
            )
        })?;
        if !booking.guests.iter().any(|g| g == guest) {
            booking.guests.push(guest.to_string());
        }
        Ok(booking.clone())
    }
}

#[async_trait]
impl EstimateRepository for LocalRepository {
    async fn upsert_estimate(&self, draft: &EstimateDraft) -> RepositoryResult<Estimate> {
        let mut store = self.store.write();
        let existing_id = store
            .estimates
            .values()
            .find(|e| {
                e.post_id == draft.post_id
                    && e.customer_id == draft.customer_id
                    && e.from_date == draft.range.from
                    && e.to_date == draft.range.to
            })
            .map(|e| e.id.clone());

        let id = existing_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let estimate = Estimate {
            id: id.clone(),
            post_id: draft.post_id.clone(),
            customer_id: draft.customer_id.clone(),
            guests: draft.guests.clone(),
            from_date: draft.range.from,
            to_date: draft.range.to,
            total: draft.total,
            selected_package: draft.selected_package.clone(),
            package_label: draft.package_label.clone(),
            updated_at: Utc::now(),
        };
        store.estimates.insert(id, estimate.clone());
        Ok(estimate)
    }

    async fn list_estimates_for_customer(
        &self,
        customer_id: &str,
    ) -> RepositoryResult<Vec<Estimate>> {
        let store = self.store.read();
        let mut estimates: Vec<Estimate> = store
            .estimates
            .values()
            .filter(|e| e.customer_id == customer_id)
            .cloned()
            .collect();
        estimates.sort_by(|a, b| a.from_date.cmp(&b.from_date));
        Ok(estimates)
    }
}

#[async_trait]
impl SessionRepository for LocalRepository {
    async fn resolve_session(&self, token: &str) -> RepositoryResult<Option<String>> {
        Ok(self.store.read().sessions.get(token).cloned())
    }

    async fn insert_session(&self, token: &str, customer_id: &str) -> RepositoryResult<()> {
        self.store
            .write()
            .sessions
            .insert(token.to_string(), customer_id.to_string());
        Ok(())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
