use axum::{
    extract::State,
    routing::{get, post},
    Json,
};
use spincity_market::{NewAlbum, NewArtist};

use crate::{
    auth::Caller,
    context::ServerContext,
    errors::ServerResult,
    schemas::{NewAlbumSchema, NewArtistSchema, ValidatedJson},
    serialized::{Album, Artist, ToSerialized},
    Router,
};

#[utoipa::path(
    get,
    path = "/v1/albums",
    tag = "catalog",
    responses(
        (status = 200, body = Vec<Album>)
    )
)]
pub(crate) async fn albums(State(context): State<ServerContext>) -> ServerResult<Json<Vec<Album>>> {
    let albums = context.market.catalog.albums().await?;

    Ok(Json(albums.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/v1/albums",
    tag = "catalog",
    request_body = NewAlbumSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Album)
    )
)]
pub(crate) async fn create_album(
    _caller: Caller,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewAlbumSchema>,
) -> ServerResult<Json<Album>> {
    let album = context
        .market
        .catalog
        .create_album(NewAlbum {
            name: body.name,
            label: body.label,
            artwork: body.artwork,
            year: body.year,
            artist_id: body.artist_id,
        })
        .await?;

    Ok(Json(album.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/v1/artists",
    tag = "catalog",
    request_body = NewArtistSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Artist)
    )
)]
pub(crate) async fn create_artist(
    _caller: Caller,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewArtistSchema>,
) -> ServerResult<Json<Artist>> {
    let artist = context
        .market
        .catalog
        .create_artist(NewArtist {
            name: body.name,
            bio: body.bio,
            artwork: body.artwork,
        })
        .await?;

    Ok(Json(artist.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/albums", get(albums).post(create_album))
        .route("/artists", post(create_artist))
}
