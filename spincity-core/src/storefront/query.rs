use log::{info, warn};
use tokio::time::sleep;

use crate::{transform_collection, Collection, CollectionRecord, FetchError, QueryConfig};

use super::CollectionSource;

/// The state of a single collection query
#[derive(Debug, Clone, Default, PartialEq)]
pub enum QueryState {
    /// The query hasn't been enabled yet
    #[default]
    Disabled,
    Loading,
    /// The record as fetched, and what it renders as
    Loaded {
        record: CollectionRecord,
        collection: Collection,
    },
    Failed(FetchError),
}

impl QueryState {
    /// Settles with a record, transforming it for display once
    pub fn loaded(record: CollectionRecord) -> Self {
        let collection = transform_collection(Some(record.clone()));

        Self::Loaded { record, collection }
    }

    /// Returns true until the query has settled. A disabled query counts as loading.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Disabled | Self::Loading)
    }

    pub fn data(&self) -> Option<&CollectionRecord> {
        match self {
            Self::Loaded { record, .. } => Some(record),
            _ => None,
        }
    }

    /// The display collection of a loaded query
    pub fn collection(&self) -> Option<&Collection> {
        match self {
            Self::Loaded { collection, .. } => Some(collection),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// What happened while running a query
#[derive(Debug, Clone)]
pub struct QueryReport {
    /// The final outcome
    pub result: Result<CollectionRecord, FetchError>,
    /// Every failed attempt, in order
    pub failures: Vec<FetchError>,
}

impl QueryReport {
    /// How many times the source was asked
    pub fn attempts(&self) -> usize {
        match self.result {
            Ok(_) => self.failures.len() + 1,
            Err(_) => self.failures.len(),
        }
    }

    /// Logs the failures under the given query name
    pub fn log(&self, name: &str) {
        for (attempt, failure) in self.failures.iter().enumerate() {
            if failure.is_not_found() {
                info!("{} query found nothing: {}", name, failure);
            } else {
                warn!(
                    "{} query failed on attempt {}: {}",
                    name,
                    attempt + 1,
                    failure
                );
            }
        }
    }
}

impl From<QueryReport> for QueryState {
    fn from(report: QueryReport) -> Self {
        match report.result {
            Ok(record) => Self::loaded(record),
            Err(error) => Self::Failed(error),
        }
    }
}

/// Fetches a collection, retrying failed attempts as configured.
/// A not found error is definitive and isn't retried.
pub async fn run_query<S>(source: &S, id: &str, config: &QueryConfig) -> QueryReport
where
    S: CollectionSource + ?Sized,
{
    let max_attempts = config.max_attempts() as usize;
    let mut failures = Vec::new();

    loop {
        let error = match source.fetch_collection(id).await {
            Ok(record) => {
                return QueryReport {
                    result: Ok(record),
                    failures,
                }
            }
            Err(error) => error,
        };

        failures.push(error.clone());

        if error.is_not_found() || failures.len() >= max_attempts {
            return QueryReport {
                result: Err(error),
                failures,
            };
        }

        sleep(config.retry_delay).await;
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::{collection::test::collection, storefront::test::ScriptedSource};

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let source = ScriptedSource::default().respond(
            "c1",
            vec![
                Err(FetchError::internal("timeout")),
                Err(FetchError::internal("timeout")),
                Ok(collection("c1", vec![])),
            ],
        );

        let report = run_query(&source, "c1", &QueryConfig::default()).await;

        assert!(report.result.is_ok(), "third attempt should succeed");
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.attempts(), 3);

        let calls = source.calls_for("c1");
        assert!(
            calls[1] - calls[0] >= Duration::from_secs(1),
            "retries should wait for the retry delay"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_retry_count() {
        let source =
            ScriptedSource::default().respond("c1", vec![Err(FetchError::internal("db down"))]);

        let report = run_query(&source, "c1", &QueryConfig::default()).await;

        assert_eq!(report.result.unwrap_err().message, "db down");
        assert_eq!(source.calls_for("c1").len(), 3, "one attempt plus two retries");
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_not_retried() {
        let source = ScriptedSource::default();

        let report = run_query(&source, "missing", &QueryConfig::default()).await;

        assert!(report.result.unwrap_err().is_not_found());
        assert_eq!(source.calls_for("missing").len(), 1);
    }

    #[test]
    fn test_disabled_counts_as_loading() {
        assert!(QueryState::Disabled.is_loading());
        assert!(QueryState::Loading.is_loading());
        assert!(!QueryState::Failed(FetchError::internal("x")).is_loading());
    }
}
