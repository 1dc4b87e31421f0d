//! Price estimates.
//!
//! An estimate is the booking shape plus a computed total and a snapshot of
//! the package the resolver selected. Estimates are upserted keyed by
//! (post, customer, date range), so repeating a request refreshes the
//! existing record instead of growing a new one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::range::StayRange;

/// Snapshot of the resolved package at estimate time.
///
/// `package_ref` is populated only for database-sourced packages; catalog
/// entries have no stable row to point at, so the reference stays empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPackage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_ref: Option<String>,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub id: String,
    pub post_id: String,
    pub customer_id: String,
    #[serde(default)]
    pub guests: Vec<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total: f64,
    pub selected_package: SelectedPackage,
    /// Human-readable label, custom-name override already applied.
    pub package_label: String,
    pub updated_at: DateTime<Utc>,
}

/// Everything the repository needs to upsert an estimate.
#[derive(Debug, Clone)]
pub struct EstimateDraft {
    pub post_id: String,
    pub customer_id: String,
    pub guests: Vec<String>,
    pub range: StayRange,
    pub total: f64,
    pub selected_package: SelectedPackage,
    pub package_label: String,
}
