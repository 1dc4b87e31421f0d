//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::{EntitlementVerifier, JourneyStore};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for persistence operations
    pub repository: Arc<dyn FullRepository>,
    /// External billing entitlement verifier
    pub billing: Arc<dyn EntitlementVerifier>,
    /// Booking-journey session store
    pub journeys: JourneyStore,
}

impl AppState {
    /// Create application state from its injected dependencies.
    pub fn new(repository: Arc<dyn FullRepository>, billing: Arc<dyn EntitlementVerifier>) -> Self {
        Self {
            repository,
            billing,
            journeys: JourneyStore::new(),
        }
    }
}
