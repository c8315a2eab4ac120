use async_trait::async_trait;
use log::{error, info};
use spincity_core::{storefront::CollectionSource, CollectionRecord, FetchError};

use crate::{CollectionData, MarketContext, MarketError, NewCollection, SharedDatabase};

/// Procedures on collections and their album membership
pub struct CollectionManager {
    database: SharedDatabase,
}

impl CollectionManager {
    pub fn new(context: &MarketContext) -> Self {
        Self {
            database: context.database.clone(),
        }
    }

    /// Returns a collection with its albums. The only procedure that can fail with not found.
    pub async fn by_id(&self, collection_id: &str) -> Result<CollectionRecord, MarketError> {
        self.database
            .collection_by_id(collection_id)
            .await
            .map_err(|e| {
                error!("Failed to fetch collection {}: {}", collection_id, e);

                if e.is_not_found() {
                    MarketError::NotFound(format!("Collection with ID {collection_id} not found"))
                } else {
                    MarketError::Internal("Failed to fetch collection".to_string())
                }
            })
    }

    pub async fn all(&self) -> Result<Vec<CollectionRecord>, MarketError> {
        self.database
            .list_collections()
            .await
            .map_err(MarketError::internal("Failed to fetch collections"))
    }

    pub async fn by_user(&self, user_id: &str) -> Result<Vec<CollectionRecord>, MarketError> {
        self.database
            .collections_by_user(user_id)
            .await
            .map_err(MarketError::internal("Failed to fetch collections"))
    }

    pub async fn create(&self, new_collection: NewCollection) -> Result<CollectionData, MarketError> {
        let collection = self
            .database
            .create_collection(new_collection)
            .await
            .map_err(MarketError::internal("Failed to create collection"))?;

        info!("Created collection {}", collection.name);

        Ok(collection)
    }

    /// Connects an album to a collection. Concurrent changes are last write wins.
    pub async fn add_album(
        &self,
        collection_id: &str,
        album_id: &str,
    ) -> Result<CollectionData, MarketError> {
        self.database
            .add_album_to_collection(collection_id, album_id)
            .await
            .map_err(MarketError::internal("Failed to add album to collection"))
    }

    /// Disconnects an album from a collection, leaving the album itself intact
    pub async fn remove_album(
        &self,
        collection_id: &str,
        album_id: &str,
    ) -> Result<CollectionData, MarketError> {
        self.database
            .remove_album_from_collection(collection_id, album_id)
            .await
            .map_err(MarketError::internal("Failed to remove album from collection"))
    }
}

#[async_trait]
impl CollectionSource for CollectionManager {
    async fn fetch_collection(&self, id: &str) -> Result<CollectionRecord, FetchError> {
        self.by_id(id).await.map_err(|e| {
            let code = e.code();
            FetchError::new(code, e.to_string()).with_status(code.http_status())
        })
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::Utc;
    use spincity_core::ErrorCode;

    use super::*;
    use crate::{CollectionData, Database, MemoryDatabase, NewAlbum, NewArtist};

    fn manager(database: Arc<MemoryDatabase>) -> CollectionManager {
        CollectionManager { database }
    }

    #[tokio::test]
    async fn test_missing_collection_is_not_found() {
        let collections = manager(Arc::new(MemoryDatabase::new()));

        let error = collections.by_id("nope").await.unwrap_err();

        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.to_string(), "Collection with ID nope not found");
    }

    #[tokio::test]
    async fn test_store_failures_are_internal() {
        let database = Arc::new(MemoryDatabase::new());
        database.set_offline(true);
        let collections = manager(database);

        let error = collections.by_id("any").await.unwrap_err();
        assert_eq!(error.code(), ErrorCode::InternalServerError);
        assert_eq!(error.to_string(), "Failed to fetch collection");

        let error = collections.all().await.unwrap_err();
        assert_eq!(error.to_string(), "Failed to fetch collections");
    }

    #[tokio::test]
    async fn test_adding_to_missing_collection_is_internal() {
        let collections = manager(Arc::new(MemoryDatabase::new()));

        let error = collections.add_album("nope", "album").await.unwrap_err();

        assert_eq!(error.code(), ErrorCode::InternalServerError);
        assert_eq!(error.to_string(), "Failed to add album to collection");
    }

    #[tokio::test]
    async fn test_source_reports_codes() {
        let database = Arc::new(MemoryDatabase::new());
        database.insert_collection(CollectionData {
            id: "recent".into(),
            name: "Recently Added".into(),
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });

        let artist = database
            .create_artist(NewArtist {
                name: "Can".into(),
                bio: String::new(),
                artwork: String::new(),
            })
            .await
            .unwrap();
        let album = database
            .create_album(NewAlbum {
                name: "Tago Mago".into(),
                label: "United Artists".into(),
                artwork: String::new(),
                year: 1971,
                artist_id: artist.id,
            })
            .await
            .unwrap();

        let collections = manager(database.clone());
        collections.add_album("recent", &album.id).await.unwrap();

        let record = collections.fetch_collection("recent").await.unwrap();
        assert_eq!(record.albums.len(), 1);

        let error = collections.fetch_collection("nope").await.unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(error.http_status, Some(404));

        database.set_offline(true);
        let error = collections.fetch_collection("recent").await.unwrap_err();
        assert_eq!(error.code, ErrorCode::InternalServerError);
        assert_eq!(error.http_status, Some(500));
    }
}
