//! Display shapes, and the transform from records into them.

use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use thiserror::Error;

use crate::{AlbumRecord, ArtistRecord, CollectionRecord, ListingRecord, RecordId};

/// A collection ready to be rendered.
///
/// The default value is the empty placeholder rendered whenever real data
/// can't be obtained, so rendering never has to tell "missing" from "empty".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: RecordId,
    pub name: String,
    /// Empty for system collections
    pub user_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub albums: Vec<Album>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: RecordId,
    pub name: String,
    pub label: String,
    pub artwork: String,
    pub year: i32,
    pub artist_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub artist: Artist,
    /// Only listings that are still for sale
    pub listings: Vec<Listing>,
}

/// An artist embedded in an album. Its own albums are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: RecordId,
    pub name: String,
    pub bio: String,
    pub artwork: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: RecordId,
    pub price: i64,
    pub currency: String,
    pub weight: i32,
    pub format: String,
    pub condition: String,
    pub speed: String,
    pub description: String,
    pub stripe_product: String,
    pub stripe_price: String,
    pub stripe_id: String,
    pub album_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A record that doesn't fit the display shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("album {album_id} is missing its artist")]
    MissingArtist { album_id: RecordId },
    #[error("album {album_id} references artist {expected} but embeds {found}")]
    ArtistMismatch {
        album_id: RecordId,
        expected: RecordId,
        found: RecordId,
    },
    #[error("listing {listing_id} belongs to album {owner_id}, not {album_id}")]
    ForeignListing {
        listing_id: RecordId,
        owner_id: RecordId,
        album_id: RecordId,
    },
}

impl TryFrom<CollectionRecord> for Collection {
    type Error = TransformError;

    fn try_from(record: CollectionRecord) -> Result<Self, Self::Error> {
        let albums = record
            .albums
            .into_iter()
            .map(Album::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: record.id,
            name: record.name,
            user_id: record.user_id.unwrap_or_default(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            albums,
        })
    }
}

impl TryFrom<AlbumRecord> for Album {
    type Error = TransformError;

    fn try_from(record: AlbumRecord) -> Result<Self, Self::Error> {
        let artist = record.artist.ok_or_else(|| TransformError::MissingArtist {
            album_id: record.id.clone(),
        })?;

        if artist.id != record.artist_id {
            return Err(TransformError::ArtistMismatch {
                album_id: record.id,
                expected: record.artist_id,
                found: artist.id,
            });
        }

        let mut listings = Vec::with_capacity(record.listings.len());

        for listing in record.listings {
            if listing.album_id != record.id {
                return Err(TransformError::ForeignListing {
                    listing_id: listing.id,
                    owner_id: listing.album_id,
                    album_id: record.id,
                });
            }

            if listing.is_available() {
                listings.push(listing.into());
            }
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            label: record.label,
            artwork: record.artwork,
            year: record.year,
            artist_id: record.artist_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            artist: artist.into(),
            listings,
        })
    }
}

impl From<ArtistRecord> for Artist {
    fn from(record: ArtistRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            bio: record.bio,
            artwork: record.artwork,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<ListingRecord> for Listing {
    fn from(record: ListingRecord) -> Self {
        Self {
            id: record.id,
            price: record.price,
            currency: record.currency,
            weight: record.weight,
            format: record.format,
            condition: record.condition,
            speed: record.speed,
            description: record.description,
            stripe_product: record.stripe_product,
            stripe_price: record.stripe_price,
            stripe_id: record.stripe_id,
            album_id: record.album_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Reshapes a collection record for display.
/// Returns the empty placeholder if there is no record or it doesn't fit.
pub fn transform_collection(record: Option<CollectionRecord>) -> Collection {
    let Some(record) = record else {
        return Collection::default();
    };

    let id = record.id.clone();

    Collection::try_from(record).unwrap_or_else(|e| {
        warn!("Collection {} could not be transformed: {}", id, e);
        Collection::default()
    })
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub fn artist(id: &str) -> ArtistRecord {
        ArtistRecord {
            id: id.to_string(),
            name: "Joni Mitchell".into(),
            bio: String::new(),
            artwork: "joni.jpg".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn listing(id: &str, album_id: &str, order_id: Option<&str>) -> ListingRecord {
        ListingRecord {
            id: id.to_string(),
            price: 3200,
            currency: "usd".into(),
            weight: 180,
            format: "LP".into(),
            condition: "Very Good Plus".into(),
            speed: "33".into(),
            description: "Original pressing".into(),
            stripe_product: format!("prod_{id}"),
            stripe_price: format!("price_{id}"),
            stripe_id: String::new(),
            album_id: album_id.to_string(),
            user_id: Some("seller".into()),
            order_id: order_id.map(Into::into),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn album(id: &str, listings: Vec<ListingRecord>) -> AlbumRecord {
        AlbumRecord {
            id: id.to_string(),
            name: format!("Album {id}"),
            label: "Reprise".into(),
            artwork: format!("{id}.jpg"),
            year: 1971,
            artist_id: "artist".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            artist: Some(artist("artist")),
            listings,
            collection_ids: vec!["c1".into()],
        }
    }

    pub fn collection(id: &str, albums: Vec<AlbumRecord>) -> CollectionRecord {
        CollectionRecord {
            id: id.to_string(),
            name: format!("Collection {id}"),
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            albums,
        }
    }

    #[test]
    fn test_empty_collection() {
        let result = transform_collection(Some(collection("c1", vec![])));

        assert_eq!(result.id, "c1");
        assert!(result.albums.is_empty(), "no albums should stay no albums");
        assert_eq!(result.user_id, "", "missing owner becomes empty");
    }

    #[test]
    fn test_missing_record_is_placeholder() {
        assert_eq!(transform_collection(None), Collection::default());
    }

    #[test]
    fn test_sold_listings_are_filtered() {
        let record = collection(
            "c1",
            vec![
                album(
                    "a1",
                    vec![
                        listing("l1", "a1", None),
                        listing("l2", "a1", Some("order")),
                    ],
                ),
                album("a2", vec![]),
            ],
        );

        let result = transform_collection(Some(record));

        assert_eq!(result.albums.len(), 2);
        assert_eq!(result.albums[0].listings.len(), 1, "sold listing is dropped");
        assert_eq!(result.albums[0].listings[0].id, "l1");
        assert_eq!(result.albums[0].artist.name, "Joni Mitchell");
    }

    #[test]
    fn test_shape_errors_become_placeholder() {
        let mut missing_artist = album("a1", vec![]);
        missing_artist.artist = None;

        let mut mismatched_artist = album("a1", vec![]);
        mismatched_artist.artist = Some(artist("someone-else"));

        let foreign_listing = album("a1", vec![listing("l1", "a2", None)]);

        for broken in [missing_artist, mismatched_artist, foreign_listing] {
            let result = transform_collection(Some(collection("c1", vec![broken])));
            assert_eq!(result, Collection::default());
        }
    }

    #[test]
    fn test_transform_error_names_the_album() {
        let mut broken = album("a1", vec![]);
        broken.artist = None;

        let error = Collection::try_from(collection("c1", vec![broken])).unwrap_err();

        assert_eq!(
            error,
            TransformError::MissingArtist {
                album_id: "a1".into()
            }
        );
    }
}
