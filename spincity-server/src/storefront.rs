use axum::{extract::State, routing::get, Json};
use spincity_core::storefront::{HomeLoader, HomeView};

use crate::{
    context::ServerContext,
    errors::{ServerError, ServerResult},
    serialized::StorefrontPage,
    Router,
};

#[utoipa::path(
    get,
    path = "/v1/storefront",
    tag = "storefront",
    responses(
        (status = 200, description = "Every section of the home page", body = StorefrontPage),
        (status = 500, description = "The primary collection could not be loaded", body = crate::serialized::ErrorBody)
    )
)]
pub(crate) async fn storefront(
    State(context): State<ServerContext>,
) -> ServerResult<Json<StorefrontPage>> {
    let loader = HomeLoader::new(context.market.clone(), context.storefront.clone());
    let state = loader.load().await;

    match state.view() {
        HomeView::Error {
            message,
            status_code,
        } => Err(ServerError::Upstream {
            message,
            status: status_code,
        }),
        HomeView::Sections(sections) => Ok(Json(StorefrontPage::new(&sections))),
    }
}

pub fn router() -> Router {
    Router::new().route("/storefront", get(storefront))
}
