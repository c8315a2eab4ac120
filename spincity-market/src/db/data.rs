use chrono::{DateTime, Utc};
use spincity_core::RecordId;

/// A collection without its albums, as returned by mutations
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionData {
    pub id: RecordId,
    pub name: String,
    pub user_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewCollection {
    pub name: String,
    /// The owner of the new collection
    pub user_id: RecordId,
}

#[derive(Debug)]
pub struct NewArtist {
    pub name: String,
    pub bio: String,
    pub artwork: String,
}

#[derive(Debug)]
pub struct NewAlbum {
    pub name: String,
    pub label: String,
    pub artwork: String,
    pub year: i32,
    pub artist_id: RecordId,
}

#[derive(Debug)]
pub struct NewSeller {
    /// The payment processor account of the seller
    pub stripe_id: String,
    pub name: String,
    pub bio: String,
    pub location: String,
}
