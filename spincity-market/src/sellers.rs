use log::{error, info, warn};
use spincity_core::SellerRecord;
use thiserror::Error;
use url::Url;

use crate::{
    DatabaseError, Identity, IdentityError, MarketContext, NewSeller, OnboardingLinks,
    PaymentError, SharedDatabase, SharedIdentity, SharedPayments,
};

/// Where sellers are sent back to during onboarding
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// The public address of the storefront
    pub public_url: Url,
}

impl OnboardingConfig {
    pub const DEFAULT_PUBLIC_URL: &'static str = "http://localhost:3000";

    pub fn new(public_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            public_url: Url::parse(public_url)?,
        })
    }

    /// The links for a given user
    pub fn links(&self, user_id: &str) -> OnboardingLinks {
        let base = self.public_url.as_str().trim_end_matches('/');

        OnboardingLinks {
            refresh_url: format!("{base}/profile/startSelling/{user_id}"),
            return_url: format!("{base}/profile/createListing/{user_id}"),
        }
    }
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PUBLIC_URL).expect("default public url is valid")
    }
}

#[derive(Debug)]
pub struct NewSellerProfile {
    pub name: String,
    pub bio: String,
    pub location: String,
}

/// A failed onboarding step. Steps that already succeeded are not undone.
#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("Caller has no email address")]
    MissingEmail,
    #[error("Failed to create payment account: {0}")]
    Account(PaymentError),
    #[error("Failed to create onboarding link for account {account_id}: {source}")]
    Link {
        account_id: String,
        source: PaymentError,
    },
    #[error("Failed to store seller for account {account_id}: {source}")]
    Store {
        account_id: String,
        source: DatabaseError,
    },
    #[error("Failed to attach account {account_id} to user: {source}")]
    Attach {
        account_id: String,
        source: IdentityError,
    },
}

impl OnboardingError {
    /// The payment account that was left behind, if the failure happened after it was created
    pub fn orphaned_account(&self) -> Option<&str> {
        match self {
            Self::MissingEmail | Self::Account(_) => None,
            Self::Link { account_id, .. }
            | Self::Store { account_id, .. }
            | Self::Attach { account_id, .. } => Some(account_id),
        }
    }
}

/// Turns users into sellers, by setting up a payment account for them
pub struct SellerOnboarding {
    database: SharedDatabase,
    payments: SharedPayments,
    identity: SharedIdentity,
    config: OnboardingConfig,
}

impl SellerOnboarding {
    pub fn new(context: &MarketContext) -> Self {
        Self {
            database: context.database.clone(),
            payments: context.payments.clone(),
            identity: context.identity.clone(),
            config: context.onboarding.clone(),
        }
    }

    /// Onboards the caller as a seller, returning the link to continue onboarding at
    pub async fn onboard(
        &self,
        caller: &Identity,
        profile: NewSellerProfile,
    ) -> Result<String, OnboardingError> {
        let result = self.run_steps(caller, profile).await;

        if let Err(e) = &result {
            error!("Onboarding of user {} failed: {}", caller.user_id, e);

            if let Some(account_id) = e.orphaned_account() {
                warn!(
                    "Payment account {} was created but onboarding did not finish",
                    account_id
                );
            }
        }

        result
    }

    async fn run_steps(
        &self,
        caller: &Identity,
        profile: NewSellerProfile,
    ) -> Result<String, OnboardingError> {
        let email = caller
            .email
            .as_deref()
            .ok_or(OnboardingError::MissingEmail)?;

        let account = self
            .payments
            .create_account(email)
            .await
            .map_err(OnboardingError::Account)?;

        let url = self
            .payments
            .create_onboarding_link(&account.id, &self.config.links(&caller.user_id))
            .await
            .map_err(|source| OnboardingError::Link {
                account_id: account.id.clone(),
                source,
            })?;

        let seller = self
            .database
            .create_seller(NewSeller {
                stripe_id: account.id.clone(),
                name: profile.name,
                bio: profile.bio,
                location: profile.location,
            })
            .await
            .map_err(|source| OnboardingError::Store {
                account_id: account.id.clone(),
                source,
            })?;

        self.identity
            .attach_payment_account(&caller.user_id, &account.id)
            .await
            .map_err(|source| OnboardingError::Attach {
                account_id: account.id.clone(),
                source,
            })?;

        log_onboarded(&seller);

        Ok(url)
    }
}

fn log_onboarded(seller: &SellerRecord) {
    info!("Seller {} onboarded with account {}", seller.name, seller.stripe_id);
}
