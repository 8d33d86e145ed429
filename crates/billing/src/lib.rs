pub mod provider;
pub mod stripe;

pub use provider::{
    portal_return_url, tier_for_unit_amount, BillingError, BillingProvider, CheckoutUrls, Plan,
    PriceTable, SubscriptionStatus, SubscriptionTier,
};
pub use stripe::StripeClient;
