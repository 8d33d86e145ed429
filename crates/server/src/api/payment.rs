//! Subscription billing endpoints.
//!
//! SRP: validate billing requests and delegate to the configured processor.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use studio_billing::{portal_return_url, BillingProvider, CheckoutUrls, Plan, SubscriptionStatus};
use tracing::info;

use super::{parse_json_body, ApiError, ErrorResponse};
use crate::state::AppState;

// ── Request/Response types ───────────────────────────────────────

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// "lite" or "pro".
    #[serde(default)]
    pub plan_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RedirectResponse {
    pub url: String,
}

// ── Helpers ──────────────────────────────────────────────────────

fn billing(state: &AppState) -> Result<&Arc<dyn BillingProvider>, ApiError> {
    state
        .billing
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("Billing is not configured".into()))
}

/// Origin redirects hang off: the caller's `Origin` header, else the configured public origin.
fn request_origin<'a>(headers: &'a HeaderMap, state: &'a AppState) -> &'a str {
    headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(&state.config.server.public_origin)
}

fn require_customer(body: &[u8]) -> Result<String, ApiError> {
    let request: CustomerRequest = parse_json_body(body)?;
    request
        .customer_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Customer ID required"))
}

// ── POST /api/payment/create-checkout ────────────────────────────

/// Start a subscription checkout
#[utoipa::path(
    post,
    path = "/api/payment/create-checkout",
    tag = "Payment",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Hosted checkout page URL", body = RedirectResponse),
        (status = 400, description = "Missing or invalid plan ID", body = ErrorResponse),
        (status = 503, description = "Billing not configured", body = ErrorResponse)
    )
)]
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RedirectResponse>, ApiError> {
    let request: CheckoutRequest = parse_json_body(&body)?;
    let plan_id = request
        .plan_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing plan ID"))?;

    let billing = billing(&state)?;
    let price_id = Plan::parse(&plan_id)
        .and_then(|plan| state.prices.price_for(plan))
        .ok_or_else(|| ApiError::bad_request("Invalid plan ID"))?;

    let urls = CheckoutUrls::for_origin(request_origin(&headers, &state));
    let url = billing.create_checkout_session(price_id, &urls).await?;
    info!(plan = %plan_id, "Checkout session created");
    Ok(Json(RedirectResponse { url }))
}

// ── POST /api/payment/customer-portal ────────────────────────────

/// Open the customer billing portal
#[utoipa::path(
    post,
    path = "/api/payment/customer-portal",
    tag = "Payment",
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Portal session URL", body = RedirectResponse),
        (status = 400, description = "Missing customer ID", body = ErrorResponse),
        (status = 503, description = "Billing not configured", body = ErrorResponse)
    )
)]
pub async fn customer_portal(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RedirectResponse>, ApiError> {
    let customer_id = require_customer(&body)?;
    let billing = billing(&state)?;

    let return_url = portal_return_url(request_origin(&headers, &state));
    let url = billing.create_portal_session(&customer_id, &return_url).await?;
    Ok(Json(RedirectResponse { url }))
}

// ── POST /api/payment/check-subscription ─────────────────────────

/// Look up a customer's active subscription
#[utoipa::path(
    post,
    path = "/api/payment/check-subscription",
    tag = "Payment",
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "{subscribed, subscription_tier, subscription_end}", body = Object),
        (status = 400, description = "Missing customer ID", body = ErrorResponse),
        (status = 503, description = "Billing not configured", body = ErrorResponse)
    )
)]
pub async fn check_subscription(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SubscriptionStatus>, ApiError> {
    let customer_id = require_customer(&body)?;
    let billing = billing(&state)?;

    let status = billing.subscription_status(&customer_id).await?;
    Ok(Json(status))
}
