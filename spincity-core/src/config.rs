use std::time::Duration;

/// How a single collection query is executed
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// How many times a failed attempt is retried
    pub retry_count: u32,
    /// How long to wait before retrying a failed attempt
    pub retry_delay: Duration,
    /// How long after the primary query settles before the secondary query is enabled
    pub stagger_delay: Duration,
}

impl QueryConfig {
    /// Total number of attempts a query may make
    pub fn max_attempts(&self) -> u32 {
        self.retry_count + 1
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            retry_count: 2,
            retry_delay: Duration::from_secs(1),
            // Keeps the two queries from holding database connections at the same time
            stagger_delay: Duration::from_secs(1),
        }
    }
}

/// The configuration of the storefront home page
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// The collection shown in the "recently added" and "best sellers" sections
    pub recently_added_id: String,
    /// The collection shown in the "new releases" section
    pub new_releases_id: String,
    pub query: QueryConfig,
}

impl StorefrontConfig {
    pub const DEFAULT_RECENTLY_ADDED_ID: &'static str = "cljmx6n8c0000ua3czgt95ysp";
    pub const DEFAULT_NEW_RELEASES_ID: &'static str = "cmauprcnt0002hx9rn5qyji1q";
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            recently_added_id: Self::DEFAULT_RECENTLY_ADDED_ID.to_string(),
            new_releases_id: Self::DEFAULT_NEW_RELEASES_ID.to_string(),
            query: QueryConfig::default(),
        }
    }
}
