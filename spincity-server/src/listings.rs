use axum::{
    extract::{Path, State},
    routing::get,
    Json,
};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    serialized::{Listing, ToSerialized},
    Router,
};

#[utoipa::path(
    get,
    path = "/v1/albums/{albumId}/listings",
    tag = "listings",
    params(
        ("albumId" = String, Path, description = "The album being sold")
    ),
    responses(
        (status = 200, description = "Listings that are still for sale", body = Vec<Listing>)
    )
)]
pub(crate) async fn album_listings(
    State(context): State<ServerContext>,
    Path(album_id): Path<String>,
) -> ServerResult<Json<Vec<Listing>>> {
    let listings = context.market.listings.by_album(&album_id).await?;

    Ok(Json(listings.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/v1/users/{userId}/listings",
    tag = "listings",
    params(
        ("userId" = String, Path, description = "The seller")
    ),
    responses(
        (status = 200, description = "Listings that are still for sale", body = Vec<Listing>)
    )
)]
pub(crate) async fn user_listings(
    State(context): State<ServerContext>,
    Path(user_id): Path<String>,
) -> ServerResult<Json<Vec<Listing>>> {
    let listings = context.market.listings.by_user(&user_id).await?;

    Ok(Json(listings.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/albums/:album_id/listings", get(album_listings))
        .route("/users/:user_id/listings", get(user_listings))
}
