//! Entitlement verification against the external billing provider.
//!
//! The calendar of unavailable dates is a subscriber feature, checked via
//! the provider's subscriber-lookup endpoint. The provider is abstracted
//! behind [`EntitlementVerifier`] so local development and tests can run
//! against a static table instead of the network.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Deserialize;

/// Answers "does this customer hold an active entitlement".
#[async_trait]
pub trait EntitlementVerifier: Send + Sync {
    async fn has_active_entitlement(&self, customer_id: &str) -> anyhow::Result<bool>;
}

/// Static in-memory entitlements for tests and the local profile.
#[derive(Default)]
pub struct StaticEntitlements {
    active: RwLock<HashSet<String>>,
}

impl StaticEntitlements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a customer as actively entitled.
    pub fn grant(&self, customer_id: &str) {
        self.active.write().insert(customer_id.to_string());
    }

    pub fn revoke(&self, customer_id: &str) {
        self.active.write().remove(customer_id);
    }
}

#[async_trait]
impl EntitlementVerifier for StaticEntitlements {
    async fn has_active_entitlement(&self, customer_id: &str) -> anyhow::Result<bool> {
        Ok(self.active.read().contains(customer_id))
    }
}

/// Subscriber-lookup client for the hosted billing provider.
pub struct RevenueCatVerifier {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Entitlement identifier to look for on the subscriber.
    entitlement: String,
}

#[derive(Debug, Deserialize)]
struct SubscriberResponse {
    subscriber: SubscriberBody,
}

#[derive(Debug, Deserialize)]
struct SubscriberBody {
    #[serde(default)]
    entitlements: HashMap<String, EntitlementBody>,
}

#[derive(Debug, Deserialize)]
struct EntitlementBody {
    #[serde(default)]
    expires_date: Option<DateTime<Utc>>,
}

impl RevenueCatVerifier {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        entitlement: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            entitlement: entitlement.into(),
        }
    }
}

#[async_trait]
impl EntitlementVerifier for RevenueCatVerifier {
    async fn has_active_entitlement(&self, customer_id: &str) -> anyhow::Result<bool> {
        let url = format!("{}/subscribers/{}", self.base_url, customer_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        // Unknown subscribers are simply not entitled.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        let body: SubscriberResponse = response.error_for_status()?.json().await?;

        let active = body
            .subscriber
            .entitlements
            .get(&self.entitlement)
            .is_some_and(|e| e.expires_date.is_none_or(|expires| expires > Utc::now()));
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_entitlements_grant_and_revoke() {
        let billing = StaticEntitlements::new();
        assert!(!billing.has_active_entitlement("cust-1").await.unwrap());
        billing.grant("cust-1");
        assert!(billing.has_active_entitlement("cust-1").await.unwrap());
        billing.revoke("cust-1");
        assert!(!billing.has_active_entitlement("cust-1").await.unwrap());
    }

    #[test]
    fn subscriber_response_parses_expiry() {
        let json = r#"{
            "subscriber": {
                "entitlements": {
                    "plek_pro": { "expires_date": "2099-01-01T00:00:00Z" },
                    "lapsed": { "expires_date": "2020-01-01T00:00:00Z" },
                    "lifetime": {}
                }
            }
        }"#;
        let body: SubscriberResponse = serde_json::from_str(json).unwrap();
        let active = |name: &str| {
            body.subscriber
                .entitlements
                .get(name)
                .is_some_and(|e| e.expires_date.is_none_or(|x| x > Utc::now()))
        };
        assert!(active("plek_pro"));
        assert!(!active("lapsed"));
        assert!(active("lifetime"));
    }
}
