use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub type SharedIdentity = Arc<dyn IdentityProvider>;

/// A user, as known by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    /// The primary email address, if the user has one
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Session is invalid or expired")]
    InvalidSession,
    #[error("Identity provider rejected the request: {0}")]
    Rejected(String),
    #[error("Failed to reach identity provider: {0}")]
    Unreachable(String),
}

/// Represents the external service users sign in with
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a session token to its user
    async fn identify(&self, token: &str) -> Result<Identity, IdentityError>;

    /// Stores the payment account of a user in its private metadata
    async fn attach_payment_account(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> Result<(), IdentityError>;
}
