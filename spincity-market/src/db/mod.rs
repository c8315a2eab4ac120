use async_trait::async_trait;
use spincity_core::{AlbumRecord, ArtistRecord, CollectionRecord, ListingRecord, SellerRecord};
use thiserror::Error;

mod data;
pub use data::*;

mod memory;
pub use memory::*;

mod pg;
pub use pg::*;

pub type Result<T> = std::result::Result<T, DatabaseError>;
pub type SharedDatabase = std::sync::Arc<dyn Database>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
}

impl DatabaseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Helper trait to reduce boilerplate
pub trait DatabaseResult {
    /// Turns the Result into a conflict error if it's Ok()
    fn conflict_or_ok(self, resource: &'static str, field: &'static str, value: &str)
        -> Result<()>;
}

impl<T> DatabaseResult for Result<T> {
    fn conflict_or_ok(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<()> {
        match self {
            Ok(_) => Err(DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            }),
            Err(DatabaseError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Represents a type that can fetch marketplace data from a database.
///
/// Every read that returns listings only returns those that aren't sold.
#[async_trait]
pub trait Database: Send + Sync {
    async fn collection_by_id(&self, collection_id: &str) -> Result<CollectionRecord>;
    async fn list_collections(&self) -> Result<Vec<CollectionRecord>>;
    async fn collections_by_user(&self, user_id: &str) -> Result<Vec<CollectionRecord>>;
    async fn create_collection(&self, new_collection: NewCollection) -> Result<CollectionData>;
    async fn add_album_to_collection(
        &self,
        collection_id: &str,
        album_id: &str,
    ) -> Result<CollectionData>;
    async fn remove_album_from_collection(
        &self,
        collection_id: &str,
        album_id: &str,
    ) -> Result<CollectionData>;

    async fn list_albums(&self) -> Result<Vec<AlbumRecord>>;
    async fn create_album(&self, new_album: NewAlbum) -> Result<AlbumRecord>;
    async fn create_artist(&self, new_artist: NewArtist) -> Result<ArtistRecord>;

    async fn listings_by_album(&self, album_id: &str) -> Result<Vec<ListingRecord>>;
    async fn listings_by_user(&self, user_id: &str) -> Result<Vec<ListingRecord>>;

    async fn seller_by_stripe_id(&self, stripe_id: &str) -> Result<SellerRecord>;
    async fn create_seller(&self, new_seller: NewSeller) -> Result<SellerRecord>;
}
