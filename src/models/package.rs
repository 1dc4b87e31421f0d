//! Pricing packages attached to posts.

use serde::{Deserialize, Serialize};

/// Lower bound of the nightly-rate multiplier.
pub const MULTIPLIER_MIN: f64 = 0.1;
/// Upper bound of the nightly-rate multiplier.
pub const MULTIPLIER_MAX: f64 = 3.0;

/// Package grouping shown to guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageCategory {
    Standard,
    Hosted,
    Addon,
    Special,
}

/// Where a package instance came from.
///
/// `Revenuecat` entries are synthesized at request time from the static
/// catalog table and never persisted, so they have no stable database row
/// to reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageSource {
    Database,
    Revenuecat,
}

/// A pricing package: a multiplier over the nightly rate, bounded to a
/// window of stay lengths, optionally carrying its own fixed base rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub post_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: PackageCategory,
    pub multiplier: f64,
    pub min_nights: u32,
    pub max_nights: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_catalog_id: Option<String>,
    pub enabled: bool,
    #[serde(default)]
    pub features: Vec<String>,
    pub source: PackageSource,
}

/// Clamp a multiplier into the valid `[0.1, 3.0]` window.
///
/// Endpoint validation rejects out-of-range input outright; this clamp is
/// the write-time invariant for anything that reaches the store anyway.
pub fn clamp_multiplier(multiplier: f64) -> f64 {
    if !multiplier.is_finite() {
        return 1.0;
    }
    multiplier.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX)
}

impl Package {
    /// Case-insensitive match against the package id or its external
    /// catalog identifier.
    pub fn matches_identifier(&self, ident: &str) -> bool {
        self.id.eq_ignore_ascii_case(ident)
            || self
                .external_catalog_id
                .as_deref()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(ident))
    }

    /// Whether a stay of `nights` falls inside `[min_nights, max_nights]`.
    pub fn fits_duration(&self, nights: i64) -> bool {
        nights >= i64::from(self.min_nights) && nights <= i64::from(self.max_nights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(id: &str, ext: Option<&str>) -> Package {
        Package {
            id: id.into(),
            post_id: "post-1".into(),
            name: "Weekly".into(),
            description: String::new(),
            category: PackageCategory::Standard,
            multiplier: 0.9,
            min_nights: 2,
            max_nights: 7,
            base_rate: None,
            external_catalog_id: ext.map(Into::into),
            enabled: true,
            features: vec![],
            source: PackageSource::Database,
        }
    }

    #[test]
    fn identifier_matching_ignores_case_and_checks_catalog_id() {
        let pkg = package("pkg-1", Some("plek_weekly"));
        assert!(pkg.matches_identifier("PKG-1"));
        assert!(pkg.matches_identifier("Plek_Weekly"));
        assert!(!pkg.matches_identifier("plek_monthly"));
    }

    #[test]
    fn duration_window_is_inclusive() {
        let pkg = package("pkg-1", None);
        assert!(!pkg.fits_duration(1));
        assert!(pkg.fits_duration(2));
        assert!(pkg.fits_duration(7));
        assert!(!pkg.fits_duration(8));
    }

    #[test]
    fn multiplier_clamps_to_valid_window() {
        assert_eq!(clamp_multiplier(0.05), MULTIPLIER_MIN);
        assert_eq!(clamp_multiplier(5.0), MULTIPLIER_MAX);
        assert_eq!(clamp_multiplier(0.9), 0.9);
        assert_eq!(clamp_multiplier(f64::NAN), 1.0);
    }
}
