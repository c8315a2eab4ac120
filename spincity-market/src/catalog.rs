use log::info;
use spincity_core::{AlbumRecord, ArtistRecord};

use crate::{MarketContext, MarketError, NewAlbum, NewArtist, SharedDatabase};

/// Procedures on the album catalog
pub struct CatalogManager {
    database: SharedDatabase,
}

impl CatalogManager {
    pub fn new(context: &MarketContext) -> Self {
        Self {
            database: context.database.clone(),
        }
    }

    pub async fn albums(&self) -> Result<Vec<AlbumRecord>, MarketError> {
        self.database
            .list_albums()
            .await
            .map_err(MarketError::internal("Failed to fetch albums"))
    }

    pub async fn create_album(&self, new_album: NewAlbum) -> Result<AlbumRecord, MarketError> {
        let album = self
            .database
            .create_album(new_album)
            .await
            .map_err(MarketError::internal("Failed to create album"))?;

        info!("Created album {}", album.name);

        Ok(album)
    }

    pub async fn create_artist(&self, new_artist: NewArtist) -> Result<ArtistRecord, MarketError> {
        let artist = self
            .database
            .create_artist(new_artist)
            .await
            .map_err(MarketError::internal("Failed to create artist"))?;

        info!("Created artist {}", artist.name);

        Ok(artist)
    }
}
