use std::env;

use spincity_core::StorefrontConfig;
use spincity_market::OnboardingConfig;
use spincity_server::DEFAULT_PORT;
use thiserror::Error;

/// Everything read from the environment at startup
pub struct Config {
    pub port: u16,
    /// Absent when the in-memory store should be used
    pub database_url: Option<String>,
    pub stripe_secret_key: String,
    pub clerk_secret_key: String,
    pub onboarding: OnboardingConfig,
    pub storefront: StorefrontConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match optional("SPINCITY_SERVER_PORT") {
            Some(port) => port.parse().map_err(|_| ConfigError::Invalid {
                name: "SPINCITY_SERVER_PORT",
                reason: format!("{port} is not a port number"),
            })?,
            None => DEFAULT_PORT,
        };

        let public_url = optional("SPINCITY_PUBLIC_URL")
            .unwrap_or_else(|| OnboardingConfig::DEFAULT_PUBLIC_URL.to_string());

        let onboarding =
            OnboardingConfig::new(&public_url).map_err(|e| ConfigError::Invalid {
                name: "SPINCITY_PUBLIC_URL",
                reason: e.to_string(),
            })?;

        let mut storefront = StorefrontConfig::default();

        if let Some(id) = optional("SPINCITY_RECENTLY_ADDED_ID") {
            storefront.recently_added_id = id;
        }

        if let Some(id) = optional("SPINCITY_NEW_RELEASES_ID") {
            storefront.new_releases_id = id;
        }

        Ok(Self {
            port,
            database_url: optional("DATABASE_URL"),
            stripe_secret_key: required("STRIPE_SECRET_KEY")?,
            clerk_secret_key: required("CLERK_SECRET_KEY")?,
            onboarding,
            storefront,
        })
    }
}

/// Blank values count as unset
fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}
