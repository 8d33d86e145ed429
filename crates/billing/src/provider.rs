use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Prices at or below this many minor units (cents) are the Lite tier.
pub const LITE_MAX_UNIT_AMOUNT: i64 = 1000;

/// Plans a customer can check out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Lite,
    Pro,
}

impl Plan {
    pub fn parse(plan_id: &str) -> Option<Self> {
        match plan_id {
            "lite" => Some(Plan::Lite),
            "pro" => Some(Plan::Pro),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Lite,
    Pro,
}

/// Tier is inferred from what the subscription's price charges.
pub fn tier_for_unit_amount(unit_amount: i64) -> SubscriptionTier {
    if unit_amount <= LITE_MAX_UNIT_AMOUNT {
        SubscriptionTier::Lite
    } else {
        SubscriptionTier::Pro
    }
}

/// Configured processor price IDs per plan.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    pub lite: Option<String>,
    pub pro: Option<String>,
}

impl PriceTable {
    pub fn price_for(&self, plan: Plan) -> Option<&str> {
        match plan {
            Plan::Lite => self.lite.as_deref(),
            Plan::Pro => self.pro.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub subscribed: bool,
    pub subscription_tier: Option<SubscriptionTier>,
    /// Unix timestamp (seconds) the current billing period ends.
    pub subscription_end: Option<i64>,
}

impl SubscriptionStatus {
    pub fn inactive() -> Self {
        Self {
            subscribed: false,
            subscription_tier: None,
            subscription_end: None,
        }
    }
}

/// Redirect URLs for a hosted checkout page.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutUrls {
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            success_url: format!("{origin}/payment-success"),
            cancel_url: format!("{origin}/payment-canceled"),
        }
    }
}

/// Where the customer portal sends the customer back to.
pub fn portal_return_url(origin: &str) -> String {
    format!("{}/plans", origin.trim_end_matches('/'))
}

/// A payment processor offering hosted checkout and a customer portal.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Start a subscription checkout for `price_id`; returns the hosted page URL.
    async fn create_checkout_session(
        &self,
        price_id: &str,
        urls: &CheckoutUrls,
    ) -> Result<String, BillingError>;

    /// Open the self-service portal for `customer_id`; returns its URL.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, BillingError>;

    /// Look up the customer's active subscription, if any.
    async fn subscription_status(&self, customer_id: &str) -> Result<SubscriptionStatus, BillingError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("payment API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("unexpected payment API response: {0}")]
    UnexpectedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundary_is_inclusive_for_lite() {
        assert_eq!(tier_for_unit_amount(0), SubscriptionTier::Lite);
        assert_eq!(tier_for_unit_amount(1000), SubscriptionTier::Lite);
        assert_eq!(tier_for_unit_amount(1001), SubscriptionTier::Pro);
    }

    #[test]
    fn plans_are_lowercase_ids() {
        assert_eq!(Plan::parse("lite"), Some(Plan::Lite));
        assert_eq!(Plan::parse("pro"), Some(Plan::Pro));
        assert_eq!(Plan::parse("Pro"), None);
        assert_eq!(Plan::parse("enterprise"), None);
    }

    #[test]
    fn unconfigured_price_is_none() {
        let prices = PriceTable { lite: Some("price_lite".into()), pro: None };
        assert_eq!(prices.price_for(Plan::Lite), Some("price_lite"));
        assert_eq!(prices.price_for(Plan::Pro), None);
    }

    #[test]
    fn redirect_urls_hang_off_origin() {
        let urls = CheckoutUrls::for_origin("https://app.example.com/");
        assert_eq!(urls.success_url, "https://app.example.com/payment-success");
        assert_eq!(urls.cancel_url, "https://app.example.com/payment-canceled");
        assert_eq!(portal_return_url("https://app.example.com"), "https://app.example.com/plans");
    }

    #[test]
    fn status_serializes_tier_lowercase() {
        let status = SubscriptionStatus {
            subscribed: true,
            subscription_tier: Some(SubscriptionTier::Pro),
            subscription_end: Some(1_700_000_000),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["subscription_tier"], "pro");
        assert_eq!(serde_json::to_value(SubscriptionStatus::inactive()).unwrap()["subscription_tier"], serde_json::Value::Null);
    }
}
