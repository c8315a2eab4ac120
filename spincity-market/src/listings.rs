use spincity_core::ListingRecord;

use crate::{MarketContext, MarketError, SharedDatabase};

/// Procedures on listings. Only listings that are still for sale are returned.
pub struct ListingManager {
    database: SharedDatabase,
}

impl ListingManager {
    pub fn new(context: &MarketContext) -> Self {
        Self {
            database: context.database.clone(),
        }
    }

    pub async fn by_album(&self, album_id: &str) -> Result<Vec<ListingRecord>, MarketError> {
        self.database
            .listings_by_album(album_id)
            .await
            .map_err(MarketError::internal("Failed to fetch listings"))
    }

    pub async fn by_user(&self, user_id: &str) -> Result<Vec<ListingRecord>, MarketError> {
        self.database
            .listings_by_user(user_id)
            .await
            .map_err(MarketError::internal("Failed to fetch listings"))
    }
}
