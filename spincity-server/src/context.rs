use std::sync::Arc;

use axum::extract::FromRef;
use spincity_core::StorefrontConfig;
use spincity_market::Market;

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub market: Arc<Market>,
    pub storefront: StorefrontConfig,
}

impl ServerContext {
    pub fn new(market: Market, storefront: StorefrontConfig) -> Self {
        Self {
            market: Arc::new(market),
            storefront,
        }
    }
}
