mod catalog;
mod collections;
mod db;
mod identity;
mod listings;
mod payments;
mod sellers;
mod util;

use std::sync::Arc;

use async_trait::async_trait;
use log::error;
use spincity_core::{storefront::CollectionSource, CollectionRecord, ErrorCode, FetchError};
use thiserror::Error;

pub use catalog::*;
pub use collections::*;
pub use db::*;
pub use identity::*;
pub use listings::*;
pub use payments::*;
pub use sellers::*;

/// The marketplace, exposing the procedures the storefront is built on.
pub struct Market {
    pub collections: CollectionManager,
    pub listings: ListingManager,
    pub catalog: CatalogManager,
    pub sellers: SellerOnboarding,

    identity: SharedIdentity,
}

/// A type passed to the various managers of the marketplace, to access the database and external services.
#[derive(Clone)]
pub struct MarketContext {
    pub database: SharedDatabase,
    pub payments: SharedPayments,
    pub identity: SharedIdentity,
    pub onboarding: OnboardingConfig,
}

/// An error returned by a marketplace procedure.
/// The message is meant for the caller, the underlying error is only logged.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl MarketError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Internal(_) => ErrorCode::InternalServerError,
        }
    }

    /// Returns a closure that logs a database error and replaces it with a generic message
    pub(crate) fn internal(message: &'static str) -> impl FnOnce(DatabaseError) -> Self {
        move |e| {
            error!("{}: {}", message, e);
            Self::Internal(message.to_string())
        }
    }
}

impl Market {
    pub fn new(
        database: SharedDatabase,
        payments: SharedPayments,
        identity: SharedIdentity,
        onboarding: OnboardingConfig,
    ) -> Self {
        let context = MarketContext {
            database,
            payments,
            identity: identity.clone(),
            onboarding,
        };

        Self {
            collections: CollectionManager::new(&context),
            listings: ListingManager::new(&context),
            catalog: CatalogManager::new(&context),
            sellers: SellerOnboarding::new(&context),
            identity,
        }
    }

    /// Resolves a session token to the user it belongs to
    pub async fn identify(&self, token: &str) -> std::result::Result<Identity, IdentityError> {
        self.identity.identify(token).await
    }
}

#[async_trait]
impl CollectionSource for Market {
    async fn fetch_collection(
        &self,
        id: &str,
    ) -> std::result::Result<CollectionRecord, FetchError> {
        self.collections.fetch_collection(id).await
    }
}

/// Creates a market on top of a fresh in-memory database, with the given services
pub fn in_memory_market(
    payments: SharedPayments,
    identity: SharedIdentity,
) -> (Arc<MemoryDatabase>, Market) {
    let database = Arc::new(MemoryDatabase::new());
    let market = Market::new(
        database.clone(),
        payments,
        identity,
        OnboardingConfig::default(),
    );

    (database, market)
}
