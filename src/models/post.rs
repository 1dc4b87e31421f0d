//! Posts (property listings) and their per-property package overrides.

use serde::{Deserialize, Serialize};

/// Nightly rate applied when a post has no usable rate of its own.
pub const DEFAULT_NIGHTLY_RATE: f64 = 150.0;

/// Host-level override for a single package on a single post.
///
/// `package_ref` may name either a database package id or an external
/// catalog identifier; matching is case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSetting {
    pub package_ref: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
}

/// A bookable property listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub host_id: String,
    pub title: String,
    /// Raw nightly rate as stored; use [`Post::effective_nightly_rate`].
    #[serde(default)]
    pub nightly_rate: Option<f64>,
    #[serde(default)]
    pub package_settings: Vec<PackageSetting>,
}

impl Post {
    /// The rate used for pricing: the stored rate when it is a usable
    /// non-negative number, else the 150 default.
    pub fn effective_nightly_rate(&self) -> f64 {
        self.nightly_rate
            .filter(|r| r.is_finite() && *r >= 0.0)
            .unwrap_or(DEFAULT_NIGHTLY_RATE)
    }

    /// Find the override for a package identifier, if the host set one.
    pub fn setting_for(&self, package_ref: &str) -> Option<&PackageSetting> {
        self.package_settings
            .iter()
            .find(|s| s.package_ref.eq_ignore_ascii_case(package_ref))
    }

    /// Whether the host disabled this package for the post.
    pub fn is_package_disabled(&self, package_ref: &str) -> bool {
        self.setting_for(package_ref).is_some_and(|s| !s.enabled)
    }

    /// Host-chosen display name for a package, if any.
    pub fn custom_name_for(&self, package_ref: &str) -> Option<&str> {
        self.setting_for(package_ref)
            .and_then(|s| s.custom_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_settings(settings: Vec<PackageSetting>) -> Post {
        Post {
            id: "post-1".into(),
            slug: "sea-cabin".into(),
            host_id: "host-1".into(),
            title: "Sea Cabin".into(),
            nightly_rate: None,
            package_settings: settings,
        }
    }

    #[test]
    fn nightly_rate_defaults_to_150() {
        let mut post = post_with_settings(vec![]);
        assert_eq!(post.effective_nightly_rate(), 150.0);
        post.nightly_rate = Some(f64::NAN);
        assert_eq!(post.effective_nightly_rate(), 150.0);
        post.nightly_rate = Some(-20.0);
        assert_eq!(post.effective_nightly_rate(), 150.0);
        post.nightly_rate = Some(210.0);
        assert_eq!(post.effective_nightly_rate(), 210.0);
    }

    #[test]
    fn settings_match_case_insensitively() {
        let post = post_with_settings(vec![PackageSetting {
            package_ref: "Plek_Weekly".into(),
            enabled: false,
            custom_name: Some("Seven Seas Week".into()),
        }]);
        assert!(post.is_package_disabled("plek_weekly"));
        assert_eq!(post.custom_name_for("PLEK_WEEKLY"), Some("Seven Seas Week"));
        assert!(!post.is_package_disabled("plek_monthly"));
    }
}
