use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json,
};
use spincity_market::NewCollection;

use crate::{
    auth::Caller,
    context::ServerContext,
    errors::ServerResult,
    schemas::{AddAlbumSchema, NewCollectionSchema, ValidatedJson},
    serialized::{Collection, CollectionSummary, ToSerialized},
    Router,
};

#[utoipa::path(
    get,
    path = "/v1/collections",
    tag = "collections",
    responses(
        (status = 200, body = Vec<Collection>)
    )
)]
pub(crate) async fn list_collections(
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<Collection>>> {
    let collections = context.market.collections.all().await?;

    Ok(Json(collections.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/v1/collections/{id}",
    tag = "collections",
    params(
        ("id" = String, Path, description = "The id of the collection")
    ),
    responses(
        (status = 200, body = Collection),
        (status = 404, body = crate::serialized::ErrorBody)
    )
)]
pub(crate) async fn collection(
    State(context): State<ServerContext>,
    Path(id): Path<String>,
) -> ServerResult<Json<Collection>> {
    let collection = context.market.collections.by_id(&id).await?;

    Ok(Json(collection.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/v1/users/{userId}/collections",
    tag = "collections",
    params(
        ("userId" = String, Path, description = "The owner of the collections")
    ),
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Vec<Collection>)
    )
)]
pub(crate) async fn user_collections(
    _caller: Caller,
    State(context): State<ServerContext>,
    Path(user_id): Path<String>,
) -> ServerResult<Json<Vec<Collection>>> {
    let collections = context.market.collections.by_user(&user_id).await?;

    Ok(Json(collections.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/v1/collections",
    tag = "collections",
    request_body = NewCollectionSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = CollectionSummary)
    )
)]
pub(crate) async fn create_collection(
    _caller: Caller,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewCollectionSchema>,
) -> ServerResult<Json<CollectionSummary>> {
    let collection = context
        .market
        .collections
        .create(NewCollection {
            name: body.name,
            user_id: body.user_id,
        })
        .await?;

    Ok(Json(collection.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/v1/collections/{id}/albums",
    tag = "collections",
    request_body = AddAlbumSchema,
    params(
        ("id" = String, Path, description = "The id of the collection")
    ),
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = CollectionSummary)
    )
)]
pub(crate) async fn add_album(
    _caller: Caller,
    State(context): State<ServerContext>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<AddAlbumSchema>,
) -> ServerResult<Json<CollectionSummary>> {
    let collection = context
        .market
        .collections
        .add_album(&id, &body.album_id)
        .await?;

    Ok(Json(collection.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/v1/collections/{id}/albums/{albumId}",
    tag = "collections",
    params(
        ("id" = String, Path, description = "The id of the collection"),
        ("albumId" = String, Path, description = "The album to disconnect")
    ),
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = CollectionSummary)
    )
)]
pub(crate) async fn remove_album(
    _caller: Caller,
    State(context): State<ServerContext>,
    Path((id, album_id)): Path<(String, String)>,
) -> ServerResult<Json<CollectionSummary>> {
    let collection = context
        .market
        .collections
        .remove_album(&id, &album_id)
        .await?;

    Ok(Json(collection.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/collections", get(list_collections).post(create_collection))
        .route("/collections/:id", get(collection))
        .route("/collections/:id/albums", post(add_album))
        .route("/collections/:id/albums/:album_id", delete(remove_album))
        .route("/users/:user_id/collections", get(user_collections))
}
