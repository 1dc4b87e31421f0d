//! Estimate creation: resolver + pricing merged into a persisted record.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::db::repository::{
    EstimateRepository, FullRepository, PostRepository, RepositoryError,
};
use crate::models::{Estimate, EstimateDraft, PackageSource, SelectedPackage};
use crate::services::{
    availability::requested_range,
    packages::{self, ResolvedPackage},
    ServiceError, ServiceResult,
};

/// Resolve the requested package, price the stay, and upsert the estimate
/// keyed by (post, customer, date range).
///
/// An explicit caller-supplied total is trusted verbatim (fixed-price
/// catalog products priced client-side). A missing post degrades to the
/// default base rate instead of failing; a missing package fails the whole
/// request.
pub async fn create_or_update_estimate(
    repo: &dyn FullRepository,
    customer_id: &str,
    post_ref: &str,
    from: NaiveDate,
    to: NaiveDate,
    guests: Vec<String>,
    requested_package: &str,
    explicit_total: Option<f64>,
) -> ServiceResult<Estimate> {
    let range = requested_range(from, to)?;

    let post = match repo.find_post_by_ref(post_ref).await {
        Ok(post) => Some(post),
        Err(RepositoryError::NotFound { .. }) => {
            warn!(post_ref, "post not found; pricing with default base rate");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let resolved = packages::resolve_package(repo, post.as_ref(), requested_package).await?;
    debug!(
        package_id = %resolved.package.id,
        via = ?resolved.via,
        "package resolved for estimate"
    );

    let nights = range.nights();
    let total = match explicit_total {
        Some(total) if total >= 0.0 => total,
        Some(_) => return Err(ServiceError::Validation("total must not be negative".into())),
        None => {
            let base = packages::resolved_base_rate(&resolved.package, post.as_ref());
            packages::compute_total(base, nights, resolved.package.multiplier)
        }
    };

    let draft = EstimateDraft {
        post_id: post
            .as_ref()
            .map(|p| p.id.clone())
            .unwrap_or_else(|| post_ref.to_string()),
        customer_id: customer_id.to_string(),
        guests,
        range,
        total,
        selected_package: snapshot(&resolved),
        package_label: resolved.display_name.clone(),
    };
    Ok(repo.upsert_estimate(&draft).await?)
}

/// Snapshot of the resolved package for persistence. Catalog-sourced
/// packages have no stable row, so the reference stays empty for those.
fn snapshot(resolved: &ResolvedPackage) -> SelectedPackage {
    let package_ref = match resolved.package.source {
        PackageSource::Database => Some(resolved.package.id.clone()),
        PackageSource::Revenuecat => None,
    };
    SelectedPackage {
        package_ref,
        name: resolved.display_name.clone(),
        enabled: resolved.enabled,
    }
}
