use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub type SharedPayments = Arc<dyn PaymentProcessor>;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// The processor answered, but refused the request
    #[error("Payment processor rejected the request: {0}")]
    Rejected(String),
    /// The processor could not be reached or answered with garbage
    #[error("Failed to reach payment processor: {0}")]
    Unreachable(String),
}

/// An account a seller gets paid out to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAccount {
    pub id: String,
}

/// Where the processor sends the seller during onboarding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingLinks {
    /// Used when the onboarding link expired and a new one is needed
    pub refresh_url: String,
    /// Used once the seller finished onboarding
    pub return_url: String,
}

/// Represents a third-party payment processor
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Creates an express account for an individual seller
    async fn create_account(&self, email: &str) -> Result<PaymentAccount, PaymentError>;

    /// Creates a link the seller can follow to finish setting up the account
    async fn create_onboarding_link(
        &self,
        account_id: &str,
        links: &OnboardingLinks,
    ) -> Result<String, PaymentError>;
}
