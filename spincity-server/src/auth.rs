use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use log::warn;
use spincity_market::{Identity, IdentityError};

use crate::{errors::ServerError, ServerContext};

/// The signed in user making a request to a private endpoint
pub struct Caller(Identity);

impl Caller {
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<ServerContext> for Caller {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerContext,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|x| x.to_str().ok())
            .ok_or(ServerError::Unauthorized("Missing authorization"))?;

        let words: Vec<_> = header.split_ascii_whitespace().collect();

        let token = match words.as_slice() {
            ["Bearer", token] => *token,
            _ => {
                return Err(ServerError::BadRequest(
                    "Authorization must be Bearer".to_string(),
                ))
            }
        };

        let identity = state.market.identify(token).await.map_err(|e| match e {
            IdentityError::Unreachable(_) => {
                warn!("Failed to verify session: {}", e);
                ServerError::Internal("Failed to verify session".to_string())
            }
            _ => ServerError::Unauthorized("Session does not exist"),
        })?;

        Ok(Self(identity))
    }
}
