//! All schemas that are exposed from endpoints are defined here
//! along with their ToSerialized impls

use chrono::{DateTime, Utc};
use serde::Serialize;
use spincity_core::{
    storefront::Section, Album as ShelfAlbumData, AlbumRecord, Artist as ShelfArtistData,
    ArtistRecord, Collection as ShelfCollectionData, CollectionRecord, ErrorCode,
    Listing as ShelfListingData, ListingRecord,
};
use spincity_market::CollectionData;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    id: String,
    name: String,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    albums: Vec<Album>,
}

/// A collection without its albums, returned by mutations
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    id: String,
    name: String,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    id: String,
    name: String,
    label: String,
    artwork: String,
    year: i32,
    artist_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    artist: Option<Artist>,
    listings: Vec<Listing>,
    collection_ids: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    id: String,
    name: String,
    bio: String,
    artwork: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    id: String,
    /// In the smallest unit of the currency
    price: i64,
    currency: String,
    /// In grams
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

#[derive(Debug, Serialize, ToSchema)]
pub struct OnboardingResult {
    /// Where the seller continues onboarding
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StorefrontPage {
    sections: Vec<StorefrontSection>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StorefrontSection {
    #[schema(example = "RECENTLY ADDED")]
    title: String,
    loading: bool,
    collection: ShelfCollection,
}

/// A collection as it is rendered. Sold listings are left out.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShelfCollection {
    id: String,
    name: String,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    albums: Vec<ShelfAlbum>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShelfAlbum {
    id: String,
    name: String,
    label: String,
    artwork: String,
    year: i32,
    artist_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    artist: Artist,
    listings: Vec<ShelfListing>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShelfListing {
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
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(value_type = String, example = "NOT_FOUND")]
    pub code: ErrorCode,
    pub message: String,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<Collection> for CollectionRecord {
    fn to_serialized(&self) -> Collection {
        Collection {
            id: self.id.clone(),
            name: self.name.clone(),
            user_id: self.user_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            albums: self.albums.to_serialized(),
        }
    }
}

impl ToSerialized<CollectionSummary> for CollectionData {
    fn to_serialized(&self) -> CollectionSummary {
        CollectionSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            user_id: self.user_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ToSerialized<Album> for AlbumRecord {
    fn to_serialized(&self) -> Album {
        Album {
            id: self.id.clone(),
            name: self.name.clone(),
            label: self.label.clone(),
            artwork: self.artwork.clone(),
            year: self.year,
            artist_id: self.artist_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            artist: self.artist.as_ref().map(|a| a.to_serialized()),
            listings: self.listings.to_serialized(),
            collection_ids: self.collection_ids.clone(),
        }
    }
}

impl ToSerialized<Artist> for ArtistRecord {
    fn to_serialized(&self) -> Artist {
        Artist {
            id: self.id.clone(),
            name: self.name.clone(),
            bio: self.bio.clone(),
            artwork: self.artwork.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ToSerialized<Listing> for ListingRecord {
    fn to_serialized(&self) -> Listing {
        Listing {
            id: self.id.clone(),
            price: self.price,
            currency: self.currency.clone(),
            weight: self.weight,
            format: self.format.clone(),
            condition: self.condition.clone(),
            speed: self.speed.clone(),
            description: self.description.clone(),
            stripe_product: self.stripe_product.clone(),
            stripe_price: self.stripe_price.clone(),
            stripe_id: self.stripe_id.clone(),
            album_id: self.album_id.clone(),
            user_id: self.user_id.clone(),
            order_id: self.order_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ToSerialized<StorefrontSection> for Section {
    fn to_serialized(&self) -> StorefrontSection {
        StorefrontSection {
            title: self.kind.title().to_string(),
            loading: self.loading,
            collection: self.collection.to_serialized(),
        }
    }
}

impl ToSerialized<ShelfCollection> for ShelfCollectionData {
    fn to_serialized(&self) -> ShelfCollection {
        ShelfCollection {
            id: self.id.clone(),
            name: self.name.clone(),
            user_id: self.user_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            albums: self.albums.to_serialized(),
        }
    }
}

impl ToSerialized<ShelfAlbum> for ShelfAlbumData {
    fn to_serialized(&self) -> ShelfAlbum {
        ShelfAlbum {
            id: self.id.clone(),
            name: self.name.clone(),
            label: self.label.clone(),
            artwork: self.artwork.clone(),
            year: self.year,
            artist_id: self.artist_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            artist: self.artist.to_serialized(),
            listings: self.listings.to_serialized(),
        }
    }
}

impl ToSerialized<Artist> for ShelfArtistData {
    fn to_serialized(&self) -> Artist {
        Artist {
            id: self.id.clone(),
            name: self.name.clone(),
            bio: self.bio.clone(),
            artwork: self.artwork.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ToSerialized<ShelfListing> for ShelfListingData {
    fn to_serialized(&self) -> ShelfListing {
        ShelfListing {
            id: self.id.clone(),
            price: self.price,
            currency: self.currency.clone(),
            weight: self.weight,
            format: self.format.clone(),
            condition: self.condition.clone(),
            speed: self.speed.clone(),
            description: self.description.clone(),
            stripe_product: self.stripe_product.clone(),
            stripe_price: self.stripe_price.clone(),
            stripe_id: self.stripe_id.clone(),
            album_id: self.album_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl StorefrontPage {
    pub fn new(sections: &[Section]) -> Self {
        Self {
            sections: sections.iter().map(|s| s.to_serialized()).collect(),
        }
    }
}
