//! Wire shapes, as returned by the remote procedure layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The type used for record identifiers.
pub type RecordId = String;

/// A collection with its albums, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub id: RecordId,
    pub name: String,
    /// The owner of the collection. System collections have none.
    pub user_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub albums: Vec<AlbumRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRecord {
    pub id: RecordId,
    pub name: String,
    pub label: String,
    pub artwork: String,
    pub year: i32,
    pub artist_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// The joined artist, if the join resolved
    pub artist: Option<ArtistRecord>,
    pub listings: Vec<ListingRecord>,
    /// Every collection this album is a member of
    #[serde(default)]
    pub collection_ids: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRecord {
    pub id: RecordId,
    pub name: String,
    pub bio: String,
    pub artwork: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A specific copy of an album put up for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub id: RecordId,
    /// Price in the smallest unit of `currency`
    pub price: i64,
    pub currency: String,
    /// Weight in grams
    pub weight: i32,
    pub format: String,
    pub condition: String,
    pub speed: String,
    pub description: String,
    pub stripe_product: String,
    pub stripe_price: String,
    pub stripe_id: String,
    pub album_id: RecordId,
    /// The seller that put up the listing
    pub user_id: Option<RecordId>,
    /// The order fulfilling this listing. Present means sold or reserved.
    pub order_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingRecord {
    /// Returns true if no order references this listing
    pub fn is_available(&self) -> bool {
        self.order_id.as_deref().map_or(true, str::is_empty)
    }
}

/// A seller profile, keyed by its payment processor account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerRecord {
    pub id: RecordId,
    pub stripe_id: String,
    pub name: String,
    pub bio: String,
    pub rating: i32,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn listing(order_id: Option<&str>) -> ListingRecord {
        ListingRecord {
            id: "l1".into(),
            price: 2500,
            currency: "usd".into(),
            weight: 180,
            format: "LP".into(),
            condition: "Near Mint".into(),
            speed: "33".into(),
            description: String::new(),
            stripe_product: String::new(),
            stripe_price: String::new(),
            stripe_id: String::new(),
            album_id: "a1".into(),
            user_id: None,
            order_id: order_id.map(Into::into),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_listing_availability() {
        assert!(listing(None).is_available(), "no order means available");
        assert!(
            listing(Some("")).is_available(),
            "an empty order reference is no reference"
        );
        assert!(!listing(Some("o1")).is_available(), "ordered is sold");
    }

    #[test]
    fn test_album_without_collection_ids_deserializes() {
        let json = serde_json::json!({
            "id": "a1",
            "name": "Blue",
            "label": "Reprise",
            "artwork": "blue.jpg",
            "year": 1971,
            "artistId": "ar1",
            "createdAt": "2023-07-01T00:00:00Z",
            "updatedAt": "2023-07-01T00:00:00Z",
            "artist": null,
            "listings": []
        });

        let album: AlbumRecord = serde_json::from_value(json).unwrap();

        assert!(album.collection_ids.is_empty());
        assert!(album.artist.is_none());
    }
}
