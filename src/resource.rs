//! Azure resource identifiers and account handles.
//!
//! ARM resource ids follow the fixed shape
//! `/subscriptions/<id>/resourceGroups/<name>/providers/...`; the helpers
//! here extract the owning subscription and render the canonical resource-id
//! forms of subscription and billing-account handles.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Subscription id newtype. Keeps subscription ids from mixing with other
/// resource-id fragments in signatures.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the owning subscription from an ARM resource id.
pub fn subscription_of(resource_id: &str) -> Result<SubscriptionId> {
    let mut parts = resource_id.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(""), Some("subscriptions"), Some(id)) if !id.is_empty() => {
            Ok(SubscriptionId(id.to_string()))
        }
        _ => Err(Error::InvalidArgument(format!(
            "not a subscription-scoped resource id: '{resource_id}'"
        ))),
    }
}

/// A subscription visible to the current context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionHandle {
    pub subscription_id: String,
    pub subscription_name: String,
    pub tenant_id: String,
    pub is_default: bool,
}

impl SubscriptionHandle {
    /// Canonical ARM resource id of this subscription.
    pub fn resource_id(&self) -> String {
        format!("/subscriptions/{}", self.subscription_id)
    }
}

/// A billing account visible to the current context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAccount {
    pub id: String,
    pub display_name: String,
    pub is_default: bool,
}

impl BillingAccount {
    /// Canonical ARM resource id of this billing account.
    pub fn resource_id(&self) -> String {
        format!("/providers/Microsoft.Billing/billingAccounts/{}", self.id)
    }
}

/// Project the ids out of a subscription list.
pub fn subscription_ids(subscriptions: &[SubscriptionHandle]) -> Vec<String> {
    subscriptions
        .iter()
        .map(|s| s.subscription_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_subscription_from_resource_id() {
        let id = subscription_of(
            "/subscriptions/aaaa-bbbb/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm1",
        )
        .unwrap();
        assert_eq!(id.as_str(), "aaaa-bbbb");
    }

    #[test]
    fn rejects_non_subscription_ids() {
        assert!(subscription_of("/providers/Microsoft.Billing/billingAccounts/1").is_err());
        assert!(subscription_of("not an id").is_err());
        assert!(subscription_of("/subscriptions/").is_err());
    }

    #[test]
    fn handle_resource_ids_are_canonical() {
        let sub = SubscriptionHandle {
            subscription_id: "s-1".into(),
            subscription_name: "prod".into(),
            tenant_id: "t-1".into(),
            is_default: true,
        };
        assert_eq!(sub.resource_id(), "/subscriptions/s-1");

        let account = BillingAccount {
            id: "ba-1".into(),
            display_name: "Contoso".into(),
            is_default: false,
        };
        assert_eq!(
            account.resource_id(),
            "/providers/Microsoft.Billing/billingAccounts/ba-1"
        );
    }

    #[test]
    fn projects_subscription_ids() {
        let subs = vec![
            SubscriptionHandle {
                subscription_id: "a".into(),
                subscription_name: "one".into(),
                tenant_id: "t".into(),
                is_default: true,
            },
            SubscriptionHandle {
                subscription_id: "b".into(),
                subscription_name: "two".into(),
                tenant_id: "t".into(),
                is_default: false,
            },
        ];
        assert_eq!(subscription_ids(&subs), vec!["a", "b"]);
    }
}
