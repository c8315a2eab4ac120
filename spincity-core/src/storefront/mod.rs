//! Loads the collections shown on the storefront home page, and decides what
//! every section renders when some of them can't be loaded.

use async_trait::async_trait;

use crate::{CollectionRecord, FetchError};

mod home;
mod query;

pub use home::*;
pub use query::*;

/// Represents a type that can fetch collections for the storefront
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Fetches a collection with its albums, their artist and their listings
    async fn fetch_collection(&self, id: &str) -> Result<CollectionRecord, FetchError>;
}

#[cfg(test)]
pub(crate) mod test {
    use std::{collections::HashMap, time::Duration};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::time::{sleep, Instant};

    use super::CollectionSource;
    use crate::{CollectionRecord, FetchError};

    type Response = Result<CollectionRecord, FetchError>;

    /// A source that replays scripted responses, and records when it was called
    #[derive(Default)]
    pub struct ScriptedSource {
        responses: Mutex<HashMap<String, Vec<Response>>>,
        latency: Mutex<HashMap<String, Duration>>,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl ScriptedSource {
        /// Queues responses for an id. The last response repeats.
        pub fn respond(self, id: &str, responses: Vec<Response>) -> Self {
            self.responses.lock().insert(id.to_string(), responses);
            self
        }

        /// Makes every fetch of an id take the given time
        pub fn delay(self, id: &str, duration: Duration) -> Self {
            self.latency.lock().insert(id.to_string(), duration);
            self
        }

        pub fn calls_for(&self, id: &str) -> Vec<Instant> {
            self.calls
                .lock()
                .iter()
                .filter(|(called, _)| called == id)
                .map(|(_, at)| *at)
                .collect()
        }
    }

    #[async_trait]
    impl CollectionSource for ScriptedSource {
        async fn fetch_collection(&self, id: &str) -> Result<CollectionRecord, FetchError> {
            self.calls.lock().push((id.to_string(), Instant::now()));

            let latency = self.latency.lock().get(id).copied();
            if let Some(latency) = latency {
                sleep(latency).await;
            }

            let mut responses = self.responses.lock();
            let queue = responses
                .get_mut(id)
                .ok_or_else(|| FetchError::not_found(format!("Collection with ID {id} not found")))?;

            if queue.len() > 1 {
                queue.remove(0)
            } else {
                queue
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Err(FetchError::internal("no response scripted")))
            }
        }
    }
}
