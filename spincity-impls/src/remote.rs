use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use serde::Deserialize;
use spincity_core::{storefront::CollectionSource, CollectionRecord, ErrorCode, FetchError};
use url::Url;

/// Fetches collections from a running spincity server
pub struct HttpCollectionSource {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: ErrorCode,
    message: String,
}

impl HttpCollectionSource {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn collection_url(&self, id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| FetchError::internal(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["v1", "collections", id]);

        Ok(url)
    }
}

#[async_trait]
impl CollectionSource for HttpCollectionSource {
    async fn fetch_collection(&self, id: &str) -> Result<CollectionRecord, FetchError> {
        let url = self.collection_url(id)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Failed to reach collection source: {}", e);
            FetchError::internal("Failed to reach server")
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::internal(e.to_string()).with_status(status))?;

        if !response_ok(status) {
            return Err(error_from_response(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| FetchError::internal(format!("Invalid collection: {e}")).with_status(status))
    }
}

fn response_ok(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Turns a failed response into a fetch error.
/// Only a tagged body can report not found, anything else is internal.
fn error_from_response(status: u16, body: &str) -> FetchError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(body) => FetchError::new(body.code, body.message),
        Err(_) => FetchError::internal(format!("Server responded with status {status}")),
    }
    .with_status(status)
}
