//! Booking-journey session snapshots.
//!
//! The client keeps its in-progress booking selection (package, dates,
//! guests) server-side in an explicit store keyed by post + customer,
//! with a freshness window after which the snapshot is treated as gone.
//! This replaces ambient client-side storage; the store is injected into
//! the application state like any other dependency.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Snapshots older than this are ignored.
pub const FRESHNESS_WINDOW_MINUTES: i64 = 60;

/// In-progress booking selection for one (post, customer) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneySnapshot {
    pub post_id: String,
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub guests: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory journey store with a freshness window.
#[derive(Clone)]
pub struct JourneyStore {
    entries: Arc<RwLock<HashMap<(String, String), JourneySnapshot>>>,
    window: Duration,
}

impl JourneyStore {
    pub fn new() -> Self {
        Self::with_window(Duration::minutes(FRESHNESS_WINDOW_MINUTES))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            window,
        }
    }

    /// Store or replace the snapshot for a (post, customer) pair,
    /// stamping it with the current time.
    pub fn put(&self, mut snapshot: JourneySnapshot) -> JourneySnapshot {
        snapshot.updated_at = Utc::now();
        let key = (snapshot.post_id.clone(), snapshot.customer_id.clone());
        self.entries.write().insert(key, snapshot.clone());
        snapshot
    }

    /// Fetch a snapshot if it is still fresh; stale entries are evicted.
    pub fn get(&self, post_id: &str, customer_id: &str) -> Option<JourneySnapshot> {
        let key = (post_id.to_string(), customer_id.to_string());
        let now = Utc::now();
        let mut entries = self.entries.write();
        match entries.get(&key) {
            Some(snapshot) if now - snapshot.updated_at <= self.window => {
                Some(snapshot.clone())
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }
}

impl Default for JourneyStore {
    fn default() -> Self {
        Self::new()
    }
}
