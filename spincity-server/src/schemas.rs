use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::ServerError;

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCollectionSchema {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddAlbumSchema {
    #[validate(length(min = 1, max = 64))]
    pub album_id: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewAlbumSchema {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(max = 256))]
    pub label: String,
    #[validate(length(max = 2048))]
    pub artwork: String,
    #[validate(range(min = 1800, max = 3000))]
    pub year: i32,
    #[validate(length(min = 1, max = 64))]
    pub artist_id: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewArtistSchema {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(max = 4096))]
    pub bio: String,
    #[validate(length(max = 2048))]
    pub artwork: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSellerSchema {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub bio: String,
    #[validate(length(max = 256))]
    pub location: String,
}

/// Json, but rejected with a bad request before reaching the handler if the body doesn't validate
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;

        body.validate()?;

        Ok(Self(body))
    }
}
