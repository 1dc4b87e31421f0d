use super::*;
use crate::db::repositories::LocalRepository;
use crate::db::repository::PackageRepository;
use crate::models::{PackageCategory, PackageSetting, PackageSource};

fn test_post(settings: Vec<PackageSetting>) -> Post {
    Post {
        id: "post-1".into(),
        slug: "sea-cabin".into(),
        host_id: "host-1".into(),
        title: "Sea Cabin".into(),
        nightly_rate: Some(150.0),
        package_settings: settings,
    }
}

fn db_package(id: &str, name: &str, enabled: bool) -> Package {
    Package {
        id: id.into(),
        post_id: "post-1".into(),
        name: name.into(),
        description: String::new(),
        category: PackageCategory::Standard,
        multiplier: 0.9,
        min_nights: 2,
        max_nights: 7,
        base_rate: None,
        external_catalog_id: None,
        enabled,
        features: vec![],
        source: PackageSource::Database,
    }
}

async fn repo_with(packages: Vec<Package>) -> LocalRepository {
    let repo = LocalRepository::new();
    for pkg in packages {
        repo.store_package(&pkg).await.unwrap();
    }
    repo
}

// ── pricing ───────────────────────────────────────────────

#[test]
fn total_is_base_times_nights_times_multiplier() {
    assert_eq!(compute_total(150.0, 3, 0.9), 405.0);
}

#[test]
fn total_never_negative() {
    assert_eq!(compute_total(-150.0, 3, 0.9), 0.0);
}

#[test]
fn base_rate_prefers_package_fixed_rate() {
    let mut pkg = db_package("pkg-1", "Weekly", true);
    let post = test_post(vec![]);
    assert_eq!(resolved_base_rate(&pkg, Some(&post)), 150.0);
    pkg.base_rate = Some(99.0);
    assert_eq!(resolved_base_rate(&pkg, Some(&post)), 99.0);
    assert_eq!(resolved_base_rate(&db_package("p", "n", true), None), 150.0);
}

// ── resolution ────────────────────────────────────────────

#[tokio::test]
async fn resolves_enabled_db_package_by_exact_id() {
    let repo = repo_with(vec![db_package("pkg-weekly", "Weekly", true)]).await;
    let post = test_post(vec![]);
    let resolved = resolve_package(&repo, Some(&post), "PKG-WEEKLY")
        .await
        .unwrap();
    assert_eq!(resolved.package.id, "pkg-weekly");
    assert_eq!(resolved.via, ResolvedVia::CandidateId);
    assert!(resolved.enabled);
}

#[tokio::test]
async fn post_level_disable_excludes_candidate() {
    let repo = repo_with(vec![db_package("pkg-weekly", "Weekly", true)]).await;
    let post = test_post(vec![PackageSetting {
        package_ref: "pkg-weekly".into(),
        enabled: false,
        custom_name: None,
    }]);
    // Excluded from the candidate set; the direct-id tier still finds the
    // row but reports it disabled.
    let resolved = resolve_package(&repo, Some(&post), "pkg-weekly")
        .await
        .unwrap();
    assert_eq!(resolved.via, ResolvedVia::DirectId);
    assert!(!resolved.enabled);
}

#[tokio::test]
async fn disabled_package_found_by_direct_id_tier() {
    let repo = repo_with(vec![db_package("pkg-off", "Off Season", false)]).await;
    let post = test_post(vec![]);
    let resolved = resolve_package(&repo, Some(&post), "pkg-off").await.unwrap();
    assert_eq!(resolved.via, ResolvedVia::DirectId);
    assert!(!resolved.enabled);
}

#[tokio::test]
async fn direct_id_tier_rejects_foreign_post() {
    let mut foreign = db_package("pkg-foreign", "Foreign", true);
    foreign.post_id = "post-2".into();
    let repo = repo_with(vec![foreign]).await;
    let post = test_post(vec![]);
    let err = resolve_package(&repo, Some(&post), "pkg-foreign")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn legacy_name_fallback_is_tagged() {
    let repo = repo_with(vec![db_package("pkg-1", "Romantic Getaway", true)]).await;
    let post = test_post(vec![]);
    let resolved = resolve_package(&repo, Some(&post), "Romantic Getaway")
        .await
        .unwrap();
    assert_eq!(resolved.via, ResolvedVia::LegacyName);
}

#[tokio::test]
async fn catalog_id_resolves_via_candidates() {
    let repo = repo_with(vec![]).await;
    let post = test_post(vec![]);
    let resolved = resolve_package(&repo, Some(&post), "plek_weekly")
        .await
        .unwrap();
    assert_eq!(resolved.via, ResolvedVia::CandidateCatalogId);
    assert_eq!(resolved.package.source, PackageSource::Revenuecat);
}

#[tokio::test]
async fn catalog_direct_works_without_post() {
    let repo = repo_with(vec![]).await;
    let resolved = resolve_package(&repo, None, "plek_monthly").await.unwrap();
    assert_eq!(resolved.via, ResolvedVia::CatalogDirect);
}

#[tokio::test]
async fn unknown_identifier_fails_all_tiers() {
    let repo = repo_with(vec![db_package("pkg-1", "Weekly", true)]).await;
    let post = test_post(vec![]);
    let err = resolve_package(&repo, Some(&post), "no-such-package")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn custom_name_supersedes_package_name() {
    let repo = repo_with(vec![db_package("pkg-weekly", "Weekly", true)]).await;
    let post = test_post(vec![PackageSetting {
        package_ref: "pkg-weekly".into(),
        enabled: true,
        custom_name: Some("Captain's Week".into()),
    }]);
    let resolved = resolve_package(&repo, Some(&post), "pkg-weekly")
        .await
        .unwrap();
    assert_eq!(resolved.display_name, "Captain's Week");
    assert_eq!(resolved.package.name, "Weekly");
}

#[tokio::test]
async fn custom_name_applies_to_catalog_products_per_post() {
    let repo = repo_with(vec![]).await;
    let post = test_post(vec![PackageSetting {
        package_ref: "plek_weekly".into(),
        enabled: true,
        custom_name: Some("Seven Seas Week".into()),
    }]);
    let resolved = resolve_package(&repo, Some(&post), "plek_weekly")
        .await
        .unwrap();
    assert_eq!(resolved.display_name, "Seven Seas Week");
}

// ── best fit ──────────────────────────────────────────────

fn fit_pkg(id: &str, min: u32, max: u32) -> Package {
    let mut pkg = db_package(id, id, true);
    pkg.min_nights = min;
    pkg.max_nights = max;
    pkg
}

#[test]
fn exact_containment_wins() {
    let packages = vec![fit_pkg("a", 1, 2), fit_pkg("b", 3, 7)];
    assert_eq!(best_fit_package(&packages, 5).unwrap().id, "b");
}

#[test]
fn nearest_min_nights_among_accommodating() {
    // Nothing contains 2 nights; "c" accommodates with the closest window.
    let packages = vec![fit_pkg("a", 5, 9), fit_pkg("c", 3, 9)];
    assert_eq!(best_fit_package(&packages, 2).unwrap().id, "c");
}

#[test]
fn per_unit_package_is_always_eligible() {
    let packages = vec![fit_pkg("unit", 1, 1), fit_pkg("long", 10, 12)];
    assert_eq!(best_fit_package(&packages, 4).unwrap().id, "unit");
}

#[test]
fn ties_break_by_declaration_order() {
    // Both are distance 2 from a 5-night stay; the first declared wins.
    let packages = vec![fit_pkg("first", 7, 9), fit_pkg("second", 7, 9)];
    assert_eq!(best_fit_package(&packages, 5).unwrap().id, "first");
}

#[test]
fn no_package_accommodates() {
    let packages = vec![fit_pkg("a", 2, 3)];
    assert!(best_fit_package(&packages, 10).is_none());
}
