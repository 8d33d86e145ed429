//! Thin Stripe REST adapter: form-encoded requests, JSON responses.

use async_trait::async_trait;
use serde_json::Value;
use studio_core::config::BillingConfig;
use tracing::{debug, info};

use crate::provider::{
    tier_for_unit_amount, BillingError, BillingProvider, CheckoutUrls, SubscriptionStatus,
};

pub struct StripeClient {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: String, api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// `None` when no secret key is configured.
    pub fn from_config(config: &BillingConfig) -> Option<Self> {
        let key = config.stripe_secret_key.as_ref()?;
        Some(Self::new(key.clone(), config.api_base.clone()))
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<Value, BillingError> {
        let url = format!("{}{}", self.api_base, path);
        debug!("Stripe POST {}", path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, BillingError> {
        let url = format!("{}{}", self.api_base, path);
        debug!("Stripe GET {}", path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .query(query)
            .send()
            .await?;
        read_json(response).await
    }
}

/// Non-2xx replies carry `{"error": {"message": ...}}`; surface that message.
async fn read_json(response: reqwest::Response) -> Result<Value, BillingError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(body);
        return Err(BillingError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

fn string_field(value: &Value, field: &str) -> Result<String, BillingError> {
    value[field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| BillingError::UnexpectedFormat(format!("missing '{field}'")))
}

#[async_trait]
impl BillingProvider for StripeClient {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        urls: &CheckoutUrls,
    ) -> Result<String, BillingError> {
        let session = self
            .post_form(
                "/v1/checkout/sessions",
                &[
                    ("mode", "subscription"),
                    ("line_items[0][price]", price_id),
                    ("line_items[0][quantity]", "1"),
                    ("success_url", &urls.success_url),
                    ("cancel_url", &urls.cancel_url),
                ],
            )
            .await?;
        info!("Created checkout session for price {}", price_id);
        string_field(&session, "url")
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, BillingError> {
        let session = self
            .post_form(
                "/v1/billing_portal/sessions",
                &[("customer", customer_id), ("return_url", return_url)],
            )
            .await?;
        string_field(&session, "url")
    }

    async fn subscription_status(&self, customer_id: &str) -> Result<SubscriptionStatus, BillingError> {
        let list = self
            .get(
                "/v1/subscriptions",
                &[("customer", customer_id), ("status", "active"), ("limit", "1")],
            )
            .await?;

        let Some(subscription) = list["data"].as_array().and_then(|d| d.first()) else {
            return Ok(SubscriptionStatus::inactive());
        };

        let price_id = subscription["items"]["data"][0]["price"]["id"]
            .as_str()
            .ok_or_else(|| BillingError::UnexpectedFormat("missing items.data[0].price.id".into()))?;
        let price = self.get(&format!("/v1/prices/{price_id}"), &[]).await?;
        let unit_amount = price["unit_amount"]
            .as_i64()
            .ok_or_else(|| BillingError::UnexpectedFormat("missing price unit_amount".into()))?;

        Ok(SubscriptionStatus {
            subscribed: true,
            subscription_tier: Some(tier_for_unit_amount(unit_amount)),
            subscription_end: subscription["current_period_end"].as_i64(),
        })
    }
}
