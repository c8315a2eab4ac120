use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use spincity_core::{AlbumRecord, ArtistRecord, CollectionRecord, ListingRecord, SellerRecord};
use sqlx::{postgres::PgPoolOptions, query, query_as, Error as SqlxError, FromRow, PgPool};

use crate::{
    util::random_id, CollectionData, Database, DatabaseError, DatabaseResult, IntoDatabaseError,
    NewAlbum, NewArtist, NewCollection, NewSeller, Result,
};

const ALBUM_COLUMNS: &str = "
    albums.*,
    artists.name AS artist_name,
    artists.bio AS artist_bio,
    artists.artwork AS artist_artwork,
    artists.created_at AS artist_created_at,
    artists.updated_at AS artist_updated_at";

const AVAILABLE_LISTING: &str = "(listings.order_id IS NULL OR listings.order_id = '')";

/// A postgres database implementation for the marketplace
pub struct PgDatabase {
    pool: PgPool,
}

#[derive(FromRow)]
struct CollectionRow {
    id: String,
    name: String,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct AlbumRow {
    id: String,
    name: String,
    label: String,
    artwork: String,
    year: i32,
    artist_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    artist_name: Option<String>,
    artist_bio: Option<String>,
    artist_artwork: Option<String>,
    artist_created_at: Option<DateTime<Utc>>,
    artist_updated_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct ArtistRow {
    id: String,
    name: String,
    bio: String,
    artwork: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct ListingRow {
    id: String,
    price: i64,
    currency: String,
    weight: i32,
    format: String,
    condition: String,
    speed: String,
    description: String,
    stripe_product: String,
    stripe_price: String,
    stripe_id: String,
    album_id: String,
    user_id: Option<String>,
    order_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct SellerRow {
    id: String,
    stripe_id: String,
    name: String,
    bio: String,
    rating: i32,
    location: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct MembershipRow {
    album_id: String,
    collection_id: String,
}

impl PgDatabase {
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| e.any())?;

        info!("Running database migrations...");
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        Ok(Self { pool })
    }

    async fn collection_row(&self, collection_id: &str) -> Result<CollectionRow> {
        query_as::<_, CollectionRow>("SELECT * FROM collections WHERE id = $1")
            .bind(collection_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("collection", "id"))
    }

    /// Fetches the listings and memberships of album rows, and assembles them
    async fn join_albums(&self, rows: Vec<AlbumRow>) -> Result<Vec<AlbumRecord>> {
        let album_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();

        let listing_rows = query_as::<_, ListingRow>(&format!(
            "SELECT * FROM listings
            WHERE album_id = ANY($1) AND {AVAILABLE_LISTING}
            ORDER BY created_at"
        ))
        .bind(&album_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        let membership_rows = query_as::<_, MembershipRow>(
            "SELECT album_id, collection_id FROM album_collections
            WHERE album_id = ANY($1)
            ORDER BY added_at",
        )
        .bind(&album_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        let mut listings: HashMap<String, Vec<ListingRecord>> = HashMap::new();
        for row in listing_rows {
            listings
                .entry(row.album_id.clone())
                .or_default()
                .push(row.into());
        }

        let mut memberships: HashMap<String, Vec<String>> = HashMap::new();
        for row in membership_rows {
            memberships
                .entry(row.album_id)
                .or_default()
                .push(row.collection_id);
        }

        let albums = rows
            .into_iter()
            .map(|row| {
                let listings = listings.remove(&row.id).unwrap_or_default();
                let collection_ids = memberships.remove(&row.id).unwrap_or_default();

                row.into_record(listings, collection_ids)
            })
            .collect();

        Ok(albums)
    }

    async fn join_collection(&self, row: CollectionRow) -> Result<CollectionRecord> {
        let album_rows = query_as::<_, AlbumRow>(&format!(
            "SELECT {ALBUM_COLUMNS}
            FROM album_collections
                INNER JOIN albums ON album_collections.album_id = albums.id
                LEFT JOIN artists ON albums.artist_id = artists.id
            WHERE album_collections.collection_id = $1
            ORDER BY album_collections.added_at, albums.id"
        ))
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        let albums = self.join_albums(album_rows).await?;

        Ok(CollectionRecord {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            albums,
        })
    }

    async fn join_collections(&self, rows: Vec<CollectionRow>) -> Result<Vec<CollectionRecord>> {
        let mut collections = Vec::with_capacity(rows.len());

        for row in rows {
            collections.push(self.join_collection(row).await?);
        }

        Ok(collections)
    }

    async fn album_by_id(&self, album_id: &str) -> Result<AlbumRecord> {
        let row = query_as::<_, AlbumRow>(&format!(
            "SELECT {ALBUM_COLUMNS}
            FROM albums
                LEFT JOIN artists ON albums.artist_id = artists.id
            WHERE albums.id = $1"
        ))
        .bind(album_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("album", "id"))?;

        let mut albums = self.join_albums(vec![row]).await?;

        albums.pop().ok_or(DatabaseError::NotFound {
            resource: "album",
            identifier: "id",
        })
    }

    async fn touch_collection(&self, collection_id: &str) -> Result<CollectionData> {
        query_as::<_, CollectionRow>(
            "UPDATE collections SET updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(collection_id)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.not_found_or("collection", "id"))
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn collection_by_id(&self, collection_id: &str) -> Result<CollectionRecord> {
        let row = self.collection_row(collection_id).await?;

        self.join_collection(row).await
    }

    async fn list_collections(&self) -> Result<Vec<CollectionRecord>> {
        let rows = query_as::<_, CollectionRow>("SELECT * FROM collections ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())?;

        self.join_collections(rows).await
    }

    async fn collections_by_user(&self, user_id: &str) -> Result<Vec<CollectionRecord>> {
        let rows = query_as::<_, CollectionRow>(
            "SELECT * FROM collections WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.join_collections(rows).await
    }

    async fn create_collection(&self, new_collection: NewCollection) -> Result<CollectionData> {
        query_as::<_, CollectionRow>(
            "INSERT INTO collections (id, name, user_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(random_id())
        .bind(new_collection.name)
        .bind(new_collection.user_id)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.any())
    }

    async fn add_album_to_collection(
        &self,
        collection_id: &str,
        album_id: &str,
    ) -> Result<CollectionData> {
        // Ensure both sides exist
        self.collection_row(collection_id).await?;
        query("SELECT id FROM albums WHERE id = $1")
            .bind(album_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("album", "id"))?;

        query(
            "INSERT INTO album_collections (collection_id, album_id) VALUES ($1, $2)
            ON CONFLICT DO NOTHING",
        )
        .bind(collection_id)
        .bind(album_id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.touch_collection(collection_id).await
    }

    async fn remove_album_from_collection(
        &self,
        collection_id: &str,
        album_id: &str,
    ) -> Result<CollectionData> {
        self.collection_row(collection_id).await?;

        query("DELETE FROM album_collections WHERE collection_id = $1 AND album_id = $2")
            .bind(collection_id)
            .bind(album_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        self.touch_collection(collection_id).await
    }

    async fn list_albums(&self) -> Result<Vec<AlbumRecord>> {
        let rows = query_as::<_, AlbumRow>(&format!(
            "SELECT {ALBUM_COLUMNS}
            FROM albums
                LEFT JOIN artists ON albums.artist_id = artists.id
            ORDER BY albums.created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.join_albums(rows).await
    }

    async fn create_album(&self, new_album: NewAlbum) -> Result<AlbumRecord> {
        query("SELECT id FROM artists WHERE id = $1")
            .bind(&new_album.artist_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("artist", "id"))?;

        let album_id = random_id();

        query(
            "INSERT INTO albums (id, name, label, artwork, year, artist_id)
            VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&album_id)
        .bind(new_album.name)
        .bind(new_album.label)
        .bind(new_album.artwork)
        .bind(new_album.year)
        .bind(new_album.artist_id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.album_by_id(&album_id).await
    }

    async fn create_artist(&self, new_artist: NewArtist) -> Result<ArtistRecord> {
        query_as::<_, ArtistRow>(
            "INSERT INTO artists (id, name, bio, artwork) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(random_id())
        .bind(new_artist.name)
        .bind(new_artist.bio)
        .bind(new_artist.artwork)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.any())
    }

    async fn listings_by_album(&self, album_id: &str) -> Result<Vec<ListingRecord>> {
        let rows = query_as::<_, ListingRow>(&format!(
            "SELECT * FROM listings WHERE album_id = $1 AND {AVAILABLE_LISTING} ORDER BY created_at"
        ))
        .bind(album_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn listings_by_user(&self, user_id: &str) -> Result<Vec<ListingRecord>> {
        let rows = query_as::<_, ListingRow>(&format!(
            "SELECT * FROM listings WHERE user_id = $1 AND {AVAILABLE_LISTING} ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn seller_by_stripe_id(&self, stripe_id: &str) -> Result<SellerRecord> {
        query_as::<_, SellerRow>("SELECT * FROM sellers WHERE stripe_id = $1")
            .bind(stripe_id)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("seller", "stripe_id"))
    }

    async fn create_seller(&self, new_seller: NewSeller) -> Result<SellerRecord> {
        self.seller_by_stripe_id(&new_seller.stripe_id)
            .await
            .conflict_or_ok("seller", "stripe_id", &new_seller.stripe_id)?;

        query_as::<_, SellerRow>(
            "INSERT INTO sellers (id, stripe_id, name, bio, rating, location)
            VALUES ($1, $2, $3, $4, 0, $5)
            RETURNING *",
        )
        .bind(random_id())
        .bind(new_seller.stripe_id)
        .bind(new_seller.name)
        .bind(new_seller.bio)
        .bind(new_seller.location)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.any())
    }
}

impl AlbumRow {
    fn into_record(self, listings: Vec<ListingRecord>, collection_ids: Vec<String>) -> AlbumRecord {
        // The artist columns are all null when the join didn't resolve
        let artist = match (
            self.artist_name,
            self.artist_bio,
            self.artist_artwork,
            self.artist_created_at,
            self.artist_updated_at,
        ) {
            (Some(name), Some(bio), Some(artwork), Some(created_at), Some(updated_at)) => {
                Some(ArtistRecord {
                    id: self.artist_id.clone(),
                    name,
                    bio,
                    artwork,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        AlbumRecord {
            id: self.id,
            name: self.name,
            label: self.label,
            artwork: self.artwork,
            year: self.year,
            artist_id: self.artist_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            artist,
            listings,
            collection_ids,
        }
    }
}

impl From<CollectionRow> for CollectionData {
    fn from(row: CollectionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<ArtistRow> for ArtistRecord {
    fn from(row: ArtistRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            bio: row.bio,
            artwork: row.artwork,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<ListingRow> for ListingRecord {
    fn from(row: ListingRow) -> Self {
        Self {
            id: row.id,
            price: row.price,
            currency: row.currency,
            weight: row.weight,
            format: row.format,
            condition: row.condition,
            speed: row.speed,
            description: row.description,
            stripe_product: row.stripe_product,
            stripe_price: row.stripe_price,
            stripe_id: row.stripe_id,
            album_id: row.album_id,
            user_id: row.user_id,
            order_id: row.order_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<SellerRow> for SellerRecord {
    fn from(row: SellerRow) -> Self {
        Self {
            id: row.id,
            stripe_id: row.stripe_id,
            name: row.name,
            bio: row.bio,
            rating: row.rating,
            location: row.location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier,
            },
            e => Self::any(e),
        }
    }
}
