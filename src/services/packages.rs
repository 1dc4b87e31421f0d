//! Package resolution, pricing math, and duration best-fit.
//!
//! Resolution runs an explicit, prioritized list of lookup strategies and
//! tags the result with how the match was found, so callers can tell an
//! exact-id hit from a legacy display-name fallback.

use crate::db::repository::{FullRepository, PackageRepository, RepositoryError};
use crate::models::{Package, Post, DEFAULT_NIGHTLY_RATE};
use crate::services::{catalog, ServiceError, ServiceResult};

/// How the resolver located the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    /// Matched a candidate (enabled db package or synthesized catalog
    /// entry) by its package id.
    CandidateId,
    /// Matched a candidate by its external catalog identifier.
    CandidateCatalogId,
    /// Direct database lookup by id, ownership verified.
    DirectId,
    /// Exact display-name match within the post's enabled packages.
    LegacyName,
    /// Found in the static catalog table without a database row.
    CatalogDirect,
}

/// Outcome of package resolution.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    pub package: Package,
    /// Display name with any per-post custom-name override applied.
    pub display_name: String,
    /// Effective enabled flag (package flag and per-post override).
    pub enabled: bool,
    pub via: ResolvedVia,
}

/// Resolve a requested package identifier for a post.
///
/// Strategies run in order, first match wins:
/// 1. candidate set (enabled db packages ∪ synthesized catalog entries,
///    minus per-post disabled overrides), matched case-insensitively on
///    id or external catalog id;
/// 2. direct database lookup by id, verifying post ownership;
/// 3. exact display-name lookup within the post's enabled packages;
/// 4. the static catalog table itself.
///
/// `post` is `None` when the property could not be fetched; the
/// post-dependent strategies are skipped and only the catalog can answer.
pub async fn resolve_package(
    repo: &dyn FullRepository,
    post: Option<&Post>,
    requested: &str,
) -> ServiceResult<ResolvedPackage> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Err(ServiceError::Validation(
            "packageType must not be empty".into(),
        ));
    }

    if let Some(post) = post {
        // Strategy 1: candidate set.
        if let Some(resolved) = match_candidates(repo, post, requested).await? {
            return Ok(resolved);
        }

        // Strategy 2: direct id lookup, post ownership verified.
        match repo.get_package(requested).await {
            Ok(pkg) if pkg.post_id == post.id => {
                return Ok(finish(post, pkg, ResolvedVia::DirectId));
            }
            Ok(_) => {}
            Err(RepositoryError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        // Strategy 3: legacy display-name lookup.
        if let Some(pkg) = repo.find_package_by_name(&post.id, requested).await? {
            return Ok(finish(post, pkg, ResolvedVia::LegacyName));
        }
    }

    // Strategy 4: catalog table directly, covering products that never got
    // a database row.
    if let Some(product) = catalog::find_product(requested) {
        let post_id = post.map(|p| p.id.as_str()).unwrap_or_default();
        let pkg = catalog::synthesize(post_id, product);
        let resolved = match post {
            Some(post) => finish(post, pkg, ResolvedVia::CatalogDirect),
            None => ResolvedPackage {
                display_name: pkg.name.clone(),
                enabled: pkg.enabled,
                package: pkg,
                via: ResolvedVia::CatalogDirect,
            },
        };
        return Ok(resolved);
    }

    Err(ServiceError::NotFound(format!(
        "no package matches identifier '{}'",
        requested
    )))
}

/// Candidate set for a post: enabled database packages plus synthesized
/// catalog entries, minus per-post disabled overrides.
async fn candidates(repo: &dyn FullRepository, post: &Post) -> ServiceResult<Vec<Package>> {
    let mut candidates = repo.list_packages_for_post(&post.id, true).await?;
    candidates.extend(catalog::synthesized_for_post(post));
    candidates.retain(|p| {
        !post.is_package_disabled(&p.id)
            && !p
                .external_catalog_id
                .as_deref()
                .is_some_and(|ext| post.is_package_disabled(ext))
    });
    Ok(candidates)
}

/// What a guest sees when browsing a post's packages: the candidate set
/// with custom-name overrides already applied.
pub async fn guest_visible_packages(
    repo: &dyn FullRepository,
    post: &Post,
) -> ServiceResult<Vec<Package>> {
    let mut packages = candidates(repo, post).await?;
    for pkg in &mut packages {
        if let Some(name) = custom_name(post, pkg) {
            pkg.name = name;
        }
    }
    Ok(packages)
}

async fn match_candidates(
    repo: &dyn FullRepository,
    post: &Post,
    requested: &str,
) -> ServiceResult<Option<ResolvedPackage>> {
    for pkg in candidates(repo, post).await? {
        if pkg.id.eq_ignore_ascii_case(requested) {
            return Ok(Some(finish(post, pkg, ResolvedVia::CandidateId)));
        }
        if pkg
            .external_catalog_id
            .as_deref()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(requested))
        {
            return Ok(Some(finish(post, pkg, ResolvedVia::CandidateCatalogId)));
        }
    }
    Ok(None)
}

/// Per-post display-name override, matched on the package id first and its
/// external catalog id second.
fn custom_name(post: &Post, package: &Package) -> Option<String> {
    post.custom_name_for(&package.id)
        .or_else(|| {
            package
                .external_catalog_id
                .as_deref()
                .and_then(|ext| post.custom_name_for(ext))
        })
        .map(str::to_string)
}

/// Apply per-post overrides to a resolved package.
fn finish(post: &Post, package: Package, via: ResolvedVia) -> ResolvedPackage {
    let custom_name = custom_name(post, &package);
    let enabled = package.enabled
        && !post.is_package_disabled(&package.id)
        && !package
            .external_catalog_id
            .as_deref()
            .is_some_and(|ext| post.is_package_disabled(ext));
    ResolvedPackage {
        display_name: custom_name.unwrap_or_else(|| package.name.clone()),
        enabled,
        package,
        via,
    }
}

/// `total = baseRate × duration × multiplier`, floored at zero.
pub fn compute_total(base_rate: f64, nights: i64, multiplier: f64) -> f64 {
    (base_rate * nights as f64 * multiplier).max(0.0)
}

/// Base rate for pricing: the package's own fixed rate when set, else the
/// post's nightly rate, else the 150 default when the post is unknown.
pub fn resolved_base_rate(package: &Package, post: Option<&Post>) -> f64 {
    package.base_rate.unwrap_or_else(|| {
        post.map(Post::effective_nightly_rate)
            .unwrap_or(DEFAULT_NIGHTLY_RATE)
    })
}

/// Best-fit package for a stay length, used for auto-suggestion.
///
/// Exact `[min_nights, max_nights]` containment wins; otherwise the
/// smallest `|min_nights - nights|` among packages whose `max_nights`
/// still accommodates the stay (or equals 1, a per-unit rate that is
/// always eligible). Ties break by declaration order.
pub fn best_fit_package<'a>(packages: &'a [Package], nights: i64) -> Option<&'a Package> {
    if let Some(exact) = packages.iter().find(|p| p.fits_duration(nights)) {
        return Some(exact);
    }

    let mut best: Option<(&Package, i64)> = None;
    for pkg in packages {
        let accommodates = i64::from(pkg.max_nights) >= nights || pkg.max_nights == 1;
        if !accommodates {
            continue;
        }
        let distance = (i64::from(pkg.min_nights) - nights).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((pkg, distance)),
        }
    }
    best.map(|(pkg, _)| pkg)
}

#[cfg(test)]
#[path = "packages_tests.rs"]
mod packages_tests;
