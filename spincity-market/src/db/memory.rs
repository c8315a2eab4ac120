use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use spincity_core::{AlbumRecord, ArtistRecord, CollectionRecord, ListingRecord, SellerRecord};

use crate::{
    util::random_id, CollectionData, Database, DatabaseError, DatabaseResult, NewAlbum, NewArtist,
    NewCollection, NewSeller, Result,
};

/// An in-memory database, used when no database is configured and in tests
#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

#[derive(Default)]
struct Tables {
    collections: Vec<CollectionData>,
    /// Collection id and album id pairs, in the order they were added
    memberships: Vec<(String, String)>,
    artists: Vec<ArtistRecord>,
    /// Albums without their joins
    albums: Vec<AlbumRecord>,
    listings: Vec<ListingRecord>,
    sellers: Vec<SellerRecord>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as if the database was unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Inserts a collection with a known id, such as a system collection
    pub fn insert_collection(&self, collection: CollectionData) {
        self.tables.write().collections.push(collection);
    }

    /// Inserts a listing. Listings are created outside of the marketplace.
    pub fn insert_listing(&self, listing: ListingRecord) {
        self.tables.write().listings.push(listing);
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DatabaseError::Internal("database is offline".into()));
        }

        Ok(())
    }
}

impl Tables {
    fn collection(&self, collection_id: &str) -> Result<&CollectionData> {
        self.collections
            .iter()
            .find(|c| c.id == collection_id)
            .ok_or(DatabaseError::NotFound {
                resource: "collection",
                identifier: "id",
            })
    }

    fn touch_collection(&mut self, collection_id: &str) -> Result<CollectionData> {
        let collection = self
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .ok_or(DatabaseError::NotFound {
                resource: "collection",
                identifier: "id",
            })?;

        collection.updated_at = Utc::now();
        Ok(collection.clone())
    }

    fn joined_album(&self, album: &AlbumRecord) -> AlbumRecord {
        AlbumRecord {
            artist: self
                .artists
                .iter()
                .find(|a| a.id == album.artist_id)
                .cloned(),
            listings: self.available_listings(|l| l.album_id == album.id),
            collection_ids: self
                .memberships
                .iter()
                .filter(|(_, album_id)| *album_id == album.id)
                .map(|(collection_id, _)| collection_id.clone())
                .collect(),
            ..album.clone()
        }
    }

    fn joined_collection(&self, collection: &CollectionData) -> CollectionRecord {
        let albums = self
            .memberships
            .iter()
            .filter(|(collection_id, _)| *collection_id == collection.id)
            .filter_map(|(_, album_id)| self.albums.iter().find(|a| a.id == *album_id))
            .map(|album| self.joined_album(album))
            .collect();

        CollectionRecord {
            id: collection.id.clone(),
            name: collection.name.clone(),
            user_id: collection.user_id.clone(),
            created_at: collection.created_at,
            updated_at: collection.updated_at,
            albums,
        }
    }

    fn available_listings(&self, filter: impl Fn(&ListingRecord) -> bool) -> Vec<ListingRecord> {
        self.listings
            .iter()
            .filter(|l| l.is_available() && filter(l))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn collection_by_id(&self, collection_id: &str) -> Result<CollectionRecord> {
        self.ensure_online()?;

        let tables = self.tables.read();
        let collection = tables.collection(collection_id)?;

        Ok(tables.joined_collection(collection))
    }

    async fn list_collections(&self) -> Result<Vec<CollectionRecord>> {
        self.ensure_online()?;

        let tables = self.tables.read();

        Ok(tables
            .collections
            .iter()
            .map(|c| tables.joined_collection(c))
            .collect())
    }

    async fn collections_by_user(&self, user_id: &str) -> Result<Vec<CollectionRecord>> {
        self.ensure_online()?;

        let tables = self.tables.read();

        Ok(tables
            .collections
            .iter()
            .filter(|c| c.user_id.as_deref() == Some(user_id))
            .map(|c| tables.joined_collection(c))
            .collect())
    }

    async fn create_collection(&self, new_collection: NewCollection) -> Result<CollectionData> {
        self.ensure_online()?;

        let now = Utc::now();
        let collection = CollectionData {
            id: random_id(),
            name: new_collection.name,
            user_id: Some(new_collection.user_id),
            created_at: now,
            updated_at: now,
        };

        self.tables.write().collections.push(collection.clone());

        Ok(collection)
    }

    async fn add_album_to_collection(
        &self,
        collection_id: &str,
        album_id: &str,
    ) -> Result<CollectionData> {
        self.ensure_online()?;

        let mut tables = self.tables.write();
        tables.collection(collection_id)?;

        if !tables.albums.iter().any(|a| a.id == album_id) {
            return Err(DatabaseError::NotFound {
                resource: "album",
                identifier: "id",
            });
        }

        let membership = (collection_id.to_string(), album_id.to_string());
        if !tables.memberships.contains(&membership) {
            tables.memberships.push(membership);
        }

        tables.touch_collection(collection_id)
    }

    async fn remove_album_from_collection(
        &self,
        collection_id: &str,
        album_id: &str,
    ) -> Result<CollectionData> {
        self.ensure_online()?;

        let mut tables = self.tables.write();
        tables.collection(collection_id)?;

        tables
            .memberships
            .retain(|(c, a)| !(c == collection_id && a == album_id));

        tables.touch_collection(collection_id)
    }

    async fn list_albums(&self) -> Result<Vec<AlbumRecord>> {
        self.ensure_online()?;

        let tables = self.tables.read();

        Ok(tables.albums.iter().map(|a| tables.joined_album(a)).collect())
    }

    async fn create_album(&self, new_album: NewAlbum) -> Result<AlbumRecord> {
        self.ensure_online()?;

        let mut tables = self.tables.write();

        if !tables.artists.iter().any(|a| a.id == new_album.artist_id) {
            return Err(DatabaseError::NotFound {
                resource: "artist",
                identifier: "id",
            });
        }

        let now = Utc::now();
        let album = AlbumRecord {
            id: random_id(),
            name: new_album.name,
            label: new_album.label,
            artwork: new_album.artwork,
            year: new_album.year,
            artist_id: new_album.artist_id,
            created_at: now,
            updated_at: now,
            artist: None,
            listings: vec![],
            collection_ids: vec![],
        };

        tables.albums.push(album.clone());

        Ok(tables.joined_album(&album))
    }

    async fn create_artist(&self, new_artist: NewArtist) -> Result<ArtistRecord> {
        self.ensure_online()?;

        let now = Utc::now();
        let artist = ArtistRecord {
            id: random_id(),
            name: new_artist.name,
            bio: new_artist.bio,
            artwork: new_artist.artwork,
            created_at: now,
            updated_at: now,
        };

        self.tables.write().artists.push(artist.clone());

        Ok(artist)
    }

    async fn listings_by_album(&self, album_id: &str) -> Result<Vec<ListingRecord>> {
        self.ensure_online()?;

        Ok(self
            .tables
            .read()
            .available_listings(|l| l.album_id == album_id))
    }

    async fn listings_by_user(&self, user_id: &str) -> Result<Vec<ListingRecord>> {
        self.ensure_online()?;

        Ok(self
            .tables
            .read()
            .available_listings(|l| l.user_id.as_deref() == Some(user_id)))
    }

    async fn seller_by_stripe_id(&self, stripe_id: &str) -> Result<SellerRecord> {
        self.ensure_online()?;

        self.tables
            .read()
            .sellers
            .iter()
            .find(|s| s.stripe_id == stripe_id)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "seller",
                identifier: "stripe_id",
            })
    }

    async fn create_seller(&self, new_seller: NewSeller) -> Result<SellerRecord> {
        self.seller_by_stripe_id(&new_seller.stripe_id)
            .await
            .conflict_or_ok("seller", "stripe_id", &new_seller.stripe_id)?;

        let now = Utc::now();
        let seller = SellerRecord {
            id: random_id(),
            stripe_id: new_seller.stripe_id,
            name: new_seller.name,
            bio: new_seller.bio,
            rating: 0,
            location: new_seller.location,
            created_at: now,
            updated_at: now,
        };

        self.tables.write().sellers.push(seller.clone());

        Ok(seller)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    async fn seeded() -> (MemoryDatabase, AlbumRecord) {
        let db = MemoryDatabase::new();

        let artist = db
            .create_artist(NewArtist {
                name: "Joni Mitchell".into(),
                bio: String::new(),
                artwork: String::new(),
            })
            .await
            .unwrap();

        let album = db
            .create_album(NewAlbum {
                name: "Blue".into(),
                label: "Reprise".into(),
                artwork: String::new(),
                year: 1971,
                artist_id: artist.id,
            })
            .await
            .unwrap();

        (db, album)
    }

    #[tokio::test]
    async fn test_membership_is_ordered_and_deduplicated() {
        let (db, album) = seeded().await;
        let collection = db
            .create_collection(NewCollection {
                name: "Favorites".into(),
                user_id: "user".into(),
            })
            .await
            .unwrap();

        db.add_album_to_collection(&collection.id, &album.id)
            .await
            .unwrap();
        db.add_album_to_collection(&collection.id, &album.id)
            .await
            .unwrap();

        let record = db.collection_by_id(&collection.id).await.unwrap();
        assert_eq!(record.albums.len(), 1, "adding twice keeps one membership");
        assert_eq!(record.albums[0].collection_ids, vec![collection.id.clone()]);
        assert!(record.albums[0].artist.is_some(), "artist should be joined");

        db.remove_album_from_collection(&collection.id, &album.id)
            .await
            .unwrap();

        let record = db.collection_by_id(&collection.id).await.unwrap();
        assert!(record.albums.is_empty());
        assert_eq!(db.list_albums().await.unwrap().len(), 1, "album itself survives");
    }

    #[tokio::test]
    async fn test_offline_fails_internally() {
        let (db, _) = seeded().await;
        db.set_offline(true);

        let error = db.list_collections().await.unwrap_err();
        assert!(matches!(error, DatabaseError::Internal(_)));
    }

    #[tokio::test]
    async fn test_seller_stripe_id_conflicts() {
        let db = MemoryDatabase::new();
        let new_seller = || NewSeller {
            stripe_id: "acct_1".into(),
            name: "Spin City".into(),
            bio: String::new(),
            location: "Portland".into(),
        };

        let seller = db.create_seller(new_seller()).await.unwrap();
        assert_eq!(seller.rating, 0);

        let error = db.create_seller(new_seller()).await.unwrap_err();
        assert!(matches!(error, DatabaseError::Conflict { .. }));
    }
}
