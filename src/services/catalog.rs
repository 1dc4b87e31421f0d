//! Static external-catalog product table.
//!
//! Mirrors the billing provider's product catalog. Entries are synthesized
//! into [`Package`] values at request time (multiplier 1, fixed price,
//! night window derived from the billing period) and are never persisted —
//! they have no database row, only an external identifier.

use crate::models::{Package, PackageCategory, PackageSource, Post};

/// Billing period of a catalog product, from which the applicable night
/// window is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingPeriod {
    Nightly,
    Weekly,
    Monthly,
}

impl BillingPeriod {
    /// `[min_nights, max_nights]` window for the period: the period caps
    /// the maximum, the previous tier's cap plus one sets the minimum.
    pub fn night_window(self) -> (u32, u32) {
        match self {
            BillingPeriod::Nightly => (1, 1),
            BillingPeriod::Weekly => (2, 7),
            BillingPeriod::Monthly => (8, 31),
        }
    }
}

/// One product in the external catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogProduct {
    pub identifier: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: PackageCategory,
    pub period: BillingPeriod,
    /// Fixed nightly price for the product.
    pub price: f64,
    pub features: &'static [&'static str],
}

/// The catalog table. Declaration order is the tiebreak order for best-fit
/// matching, so keep it stable.
pub const CATALOG: &[CatalogProduct] = &[
    CatalogProduct {
        identifier: "plek_nightly",
        name: "Nightly Stay",
        description: "Per-night rate with no minimum stay",
        category: PackageCategory::Standard,
        period: BillingPeriod::Nightly,
        price: 150.0,
        features: &["Self check-in", "Flexible cancellation"],
    },
    CatalogProduct {
        identifier: "plek_weekly",
        name: "Weekly Stay",
        description: "Discounted rate for stays up to a week",
        category: PackageCategory::Standard,
        period: BillingPeriod::Weekly,
        price: 135.0,
        features: &["Self check-in", "Mid-stay cleaning"],
    },
    CatalogProduct {
        identifier: "plek_monthly",
        name: "Monthly Stay",
        description: "Long-stay rate for a week and beyond",
        category: PackageCategory::Special,
        period: BillingPeriod::Monthly,
        price: 110.0,
        features: &["Self check-in", "Weekly cleaning", "Utilities included"],
    },
    CatalogProduct {
        identifier: "plek_hosted_week",
        name: "Hosted Week",
        description: "Week-long stay with the host on site",
        category: PackageCategory::Hosted,
        period: BillingPeriod::Weekly,
        price: 180.0,
        features: &["Host on site", "Breakfast included"],
    },
    CatalogProduct {
        identifier: "plek_cleaning",
        name: "Cleaning Add-on",
        description: "One-off cleaning service",
        category: PackageCategory::Addon,
        period: BillingPeriod::Nightly,
        price: 45.0,
        features: &["Professional cleaning"],
    },
];

/// Case-insensitive lookup by product identifier.
pub fn find_product(identifier: &str) -> Option<&'static CatalogProduct> {
    CATALOG
        .iter()
        .find(|p| p.identifier.eq_ignore_ascii_case(identifier))
}

/// Map a catalog product into the package shape for a given post.
pub fn synthesize(post_id: &str, product: &CatalogProduct) -> Package {
    let (min_nights, max_nights) = product.period.night_window();
    Package {
        id: product.identifier.to_string(),
        post_id: post_id.to_string(),
        name: product.name.to_string(),
        description: product.description.to_string(),
        category: product.category,
        multiplier: 1.0,
        min_nights,
        max_nights,
        base_rate: Some(product.price),
        external_catalog_id: Some(product.identifier.to_string()),
        enabled: true,
        features: product.features.iter().map(|f| f.to_string()).collect(),
        source: PackageSource::Revenuecat,
    }
}

/// Synthesized packages for a post, skipping products the host disabled.
pub fn synthesized_for_post(post: &Post) -> Vec<Package> {
    CATALOG
        .iter()
        .filter(|p| !post.is_package_disabled(p.identifier))
        .map(|p| synthesize(&post.id, p))
        .collect()
}
