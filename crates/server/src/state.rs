use std::sync::Arc;

use studio_billing::{BillingProvider, PriceTable};
use studio_core::Config;
use studio_llm::StudyGenerator;

/// Shared, read-only after startup.
pub struct AppState {
    pub config: Config,
    pub generator: StudyGenerator,
    /// `None` when no payment processor is configured.
    pub billing: Option<Arc<dyn BillingProvider>>,
    pub prices: PriceTable,
}

impl AppState {
    pub fn new(
        config: Config,
        generator: StudyGenerator,
        billing: Option<Arc<dyn BillingProvider>>,
    ) -> Self {
        let prices = PriceTable {
            lite: config.billing.lite_price_id.clone(),
            pro: config.billing.pro_price_id.clone(),
        };
        Self {
            config,
            generator,
            billing,
            prices,
        }
    }
}
