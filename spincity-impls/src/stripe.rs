use async_trait::async_trait;
use log::info;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use spincity_market::{OnboardingLinks, PaymentAccount, PaymentError, PaymentProcessor};

const API_BASE: &str = "https://api.stripe.com";

/// Stripe Connect, used to give sellers an express account
pub struct StripeProcessor {
    client: Client,
    secret_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct Account {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AccountLink {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl StripeProcessor {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            secret_key: secret_key.into(),
            api_base: API_BASE.to_string(),
        }
    }

    /// Points the processor at another API host, such as a mock server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn post<T>(&self, path: &str, form: &[(&str, &str)]) -> Result<T, PaymentError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await
            .map_err(|e| PaymentError::Unreachable(e.to_string()))?;

        parse_response(response).await
    }
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    async fn create_account(&self, email: &str) -> Result<PaymentAccount, PaymentError> {
        let account: Account = self
            .post(
                "/v1/accounts",
                &[
                    ("type", "express"),
                    ("email", email),
                    ("business_type", "individual"),
                ],
            )
            .await?;

        info!("Created payment account {}", account.id);

        Ok(PaymentAccount { id: account.id })
    }

    async fn create_onboarding_link(
        &self,
        account_id: &str,
        links: &OnboardingLinks,
    ) -> Result<String, PaymentError> {
        let link: AccountLink = self
            .post(
                "/v1/account_links",
                &[
                    ("account", account_id),
                    ("refresh_url", &links.refresh_url),
                    ("return_url", &links.return_url),
                    ("type", "account_onboarding"),
                ],
            )
            .await?;

        Ok(link.url)
    }
}

async fn parse_response<T>(response: Response) -> Result<T, PaymentError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| PaymentError::Unreachable(e.to_string()))?;

    if !status.is_success() {
        let message = error_message(&body).unwrap_or_else(|| status.to_string());
        return Err(PaymentError::Rejected(message));
    }

    serde_json::from_str(&body).map_err(|e| PaymentError::Unreachable(e.to_string()))
}

/// Extracts the message of a Stripe error body
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}
