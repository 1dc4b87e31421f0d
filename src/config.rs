//! Application configuration file support.
//!
//! Configuration is read from a TOML file (`plek.toml`); every section is
//! optional and falls back to local-development defaults. Secrets such as
//! the billing API key can also come from the environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db::repository::RepositoryError;
use crate::services::{EntitlementVerifier, RevenueCatVerifier, StaticEntitlements};

/// Application configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub billing: BillingSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

/// HTTP bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Billing-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSettings {
    /// `"static"` (local table, no network) or `"revenuecat"`.
    #[serde(default = "default_billing_provider")]
    pub provider: String,
    #[serde(default = "default_billing_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Entitlement identifier gating subscriber features.
    #[serde(default = "default_entitlement")]
    pub entitlement: String,
    /// Customers treated as entitled by the static provider.
    #[serde(default)]
    pub entitled_customers: Vec<String>,
}

/// Session seeding for the local profile: token -> customer id.
///
/// Token issuance is external in production; this table exists so a fresh
/// local server has usable sessions without a login flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub sessions: HashMap<String, String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_billing_provider() -> String {
    "static".to_string()
}

fn default_billing_base_url() -> String {
    "https://api.revenuecat.com/v1".to_string()
}

fn default_entitlement() -> String {
    "plek_pro".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            provider: default_billing_provider(),
            base_url: default_billing_base_url(),
            api_key: String::new(),
            entitlement: default_entitlement(),
            entitled_customers: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `plek.toml` in the current directory, then the parent
    /// directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = vec![PathBuf::from("plek.toml"), PathBuf::from("../plek.toml")];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No plek.toml found in standard locations",
        ))
    }

    /// Build the entitlement verifier selected by `billing.provider`.
    pub fn build_verifier(&self) -> Result<Arc<dyn EntitlementVerifier>, RepositoryError> {
        match self.billing.provider.as_str() {
            "static" => {
                let billing = StaticEntitlements::new();
                for customer in &self.billing.entitled_customers {
                    billing.grant(customer);
                }
                Ok(Arc::new(billing))
            }
            "revenuecat" => {
                let api_key = if self.billing.api_key.is_empty() {
                    std::env::var("REVENUECAT_API_KEY").unwrap_or_default()
                } else {
                    self.billing.api_key.clone()
                };
                if api_key.is_empty() {
                    return Err(RepositoryError::configuration(
                        "revenuecat provider requires 'billing.api_key' or REVENUECAT_API_KEY",
                    ));
                }
                Ok(Arc::new(RevenueCatVerifier::new(
                    self.billing.base_url.as_str(),
                    api_key,
                    self.billing.entitlement.as_str(),
                )))
            }
            other => Err(RepositoryError::configuration(format!(
                "Unknown billing provider: {}",
                other
            ))),
        }
    }
}
