use axum::{response::IntoResponse, Json};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{catalog, collections, listings, schemas, sellers, serialized, storefront};

#[derive(OpenApi)]
#[openapi(
    paths(
        collections::list_collections,
        collections::collection,
        collections::user_collections,
        collections::create_collection,
        collections::add_album,
        collections::remove_album,
        listings::album_listings,
        listings::user_listings,
        catalog::albums,
        catalog::create_album,
        catalog::create_artist,
        sellers::create_seller,
        storefront::storefront,
    ),
    components(schemas(
        serialized::Collection,
        serialized::CollectionSummary,
        serialized::Album,
        serialized::Artist,
        serialized::Listing,
        serialized::OnboardingResult,
        serialized::StorefrontPage,
        serialized::StorefrontSection,
        serialized::ShelfCollection,
        serialized::ShelfAlbum,
        serialized::ShelfListing,
        serialized::ErrorBody,
        schemas::NewCollectionSchema,
        schemas::AddAlbumSchema,
        schemas::NewAlbumSchema,
        schemas::NewArtistSchema,
        schemas::NewSellerSchema,
    )),
    modifiers(&Security),
    info(
        title = "spincity API",
        description = "spincity-server exposes the record store catalog, its collections, listings and seller onboarding"
    )
)]
pub struct ApiDoc;

struct Security;

impl Modify for Security {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("Bearer <token>")
                .build();

            components.add_security_scheme("BearerAuth", SecurityScheme::Http(scheme))
        }
    }
}

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
