use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header,
    jwk::{Jwk, JwkSet},
    Algorithm, DecodingKey, Validation,
};
use log::{debug, info};
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use spincity_market::{Identity, IdentityError, IdentityProvider};

const API_BASE: &str = "https://api.clerk.com";

/// Clerk, which users sign in with
pub struct ClerkIdentity {
    client: Client,
    secret_key: String,
    api_base: String,
    /// Public keys session tokens are signed with, fetched on first use
    keys: RwLock<Option<JwkSet>>,
}

/// The part of a session token we rely on
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    primary_email_address_id: Option<String>,
    email_addresses: Vec<EmailAddress>,
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    id: String,
    email_address: String,
}

impl User {
    /// The primary address, or the first one if none is marked as primary
    fn primary_email(&self) -> Option<String> {
        let primary = self
            .primary_email_address_id
            .as_ref()
            .and_then(|id| self.email_addresses.iter().find(|e| &e.id == id));

        primary
            .or(self.email_addresses.first())
            .map(|e| e.email_address.clone())
    }
}

impl ClerkIdentity {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            secret_key: secret_key.into(),
            api_base: API_BASE.to_string(),
            keys: RwLock::new(None),
        }
    }

    /// Points the provider at another API host, such as a mock server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T, IdentityError>
    where
        T: DeserializeOwned,
    {
        let response = request
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::UNAUTHORIZED {
            return Err(IdentityError::InvalidSession);
        }

        if !status.is_success() {
            return Err(IdentityError::Rejected(status.to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))
    }

    fn cached_key(&self, kid: &str) -> Option<Jwk> {
        self.keys.read().as_ref().and_then(|k| k.find(kid)).cloned()
    }

    async fn refresh_keys(&self) -> Result<(), IdentityError> {
        let keys: JwkSet = self.send(self.client.get(self.url("/v1/jwks"))).await?;

        info!("Fetched {} session signing keys", keys.keys.len());
        *self.keys.write() = Some(keys);

        Ok(())
    }

    /// Finds the key a token was signed with, refetching once if it is unknown
    async fn signing_key(&self, kid: &str) -> Result<Jwk, IdentityError> {
        if let Some(key) = self.cached_key(kid) {
            return Ok(key);
        }

        self.refresh_keys().await?;
        self.cached_key(kid).ok_or(IdentityError::InvalidSession)
    }
}

/// Checks the signature and expiry of a session token
fn verify_token(token: &str, key: &Jwk) -> Result<Claims, IdentityError> {
    let key = DecodingKey::from_jwk(key).map_err(|_| IdentityError::InvalidSession)?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_aud = false;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!("Rejected session token: {}", e);
            IdentityError::InvalidSession
        })
}

/// The id of the key a token claims to be signed with
fn token_kid(token: &str) -> Result<String, IdentityError> {
    decode_header(token)
        .ok()
        .and_then(|h| h.kid)
        .ok_or(IdentityError::InvalidSession)
}

#[async_trait]
impl IdentityProvider for ClerkIdentity {
    async fn identify(&self, token: &str) -> Result<Identity, IdentityError> {
        let kid = token_kid(token)?;
        let key = self.signing_key(&kid).await?;
        let claims = verify_token(token, &key)?;

        let user: User = self
            .send(self.client.get(self.url(&format!("/v1/users/{}", claims.sub))))
            .await?;

        Ok(Identity {
            email: user.primary_email(),
            user_id: user.id,
        })
    }

    async fn attach_payment_account(
        &self,
        user_id: &str,
        account_id: &str,
    ) -> Result<(), IdentityError> {
        let request = self
            .client
            .patch(self.url(&format!("/v1/users/{user_id}/metadata")))
            .json(&json!({ "private_metadata": { "stripeId": account_id } }));

        let _: serde_json::Value = self.send(request).await?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn shared_secret_token(kid: &str) -> String {
        let header = Header {
            kid: Some(kid.into()),
            ..Header::new(Algorithm::HS256)
        };
        let claims = json!({ "sub": "user_1", "exp": 4_102_444_800u64 });

        encode(&header, &claims, &EncodingKey::from_secret(b"secret")).unwrap()
    }

    fn user(primary: Option<&str>) -> User {
        User {
            id: "user_1".into(),
            primary_email_address_id: primary.map(Into::into),
            email_addresses: vec![
                EmailAddress {
                    id: "idn_1".into(),
                    email_address: "old@example.com".into(),
                },
                EmailAddress {
                    id: "idn_2".into(),
                    email_address: "new@example.com".into(),
                },
            ],
        }
    }

    #[test]
    fn test_primary_email() {
        assert_eq!(
            user(Some("idn_2")).primary_email().as_deref(),
            Some("new@example.com")
        );
        assert_eq!(
            user(None).primary_email().as_deref(),
            Some("old@example.com"),
            "falls back to the first address"
        );
    }

    #[test]
    fn test_user_deserializes() {
        let json = r#"{
            "id": "user_1",
            "primary_email_address_id": null,
            "email_addresses": [],
            "first_name": "Joni"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.primary_email(), None);
    }

    #[test]
    fn test_shared_secret_tokens_are_rejected() {
        let token = shared_secret_token("k1");
        let keys: JwkSet = serde_json::from_value(json!({
            "keys": [{ "kty": "oct", "kid": "k1", "k": "c2VjcmV0" }]
        }))
        .unwrap();

        let key = keys.find("k1").unwrap();
        let result = verify_token(&token, key);

        assert!(matches!(result, Err(IdentityError::InvalidSession)));
    }

    #[test]
    fn test_token_kid() {
        assert_eq!(token_kid(&shared_secret_token("k1")).unwrap(), "k1");
        assert!(matches!(
            token_kid("sess_2abc"),
            Err(IdentityError::InvalidSession)
        ));
    }

    #[tokio::test]
    async fn test_malformed_token_never_reaches_the_api() {
        let identity = ClerkIdentity::new("sk_test").with_api_base("http://127.0.0.1:1");

        let error = identity.identify("sess_2abc").await.unwrap_err();

        assert!(matches!(error, IdentityError::InvalidSession));
    }

    #[tokio::test]
    async fn test_unknown_key_is_refetched() {
        let identity = ClerkIdentity::new("sk_test").with_api_base("http://127.0.0.1:1");
        *identity.keys.write() = Some(JwkSet { keys: vec![] });

        let error = identity
            .identify(&shared_secret_token("k9"))
            .await
            .unwrap_err();

        assert!(matches!(error, IdentityError::Unreachable(_)));
    }
}
