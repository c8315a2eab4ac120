use axum::{extract::State, routing::post, Json};
use spincity_market::NewSellerProfile;

use crate::{
    auth::Caller,
    context::ServerContext,
    errors::ServerResult,
    schemas::{NewSellerSchema, ValidatedJson},
    serialized::OnboardingResult,
    Router,
};

#[utoipa::path(
    post,
    path = "/v1/sellers",
    tag = "sellers",
    request_body = NewSellerSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, description = "The caller is now a seller and can finish onboarding at the returned url", body = OnboardingResult)
    )
)]
pub(crate) async fn create_seller(
    caller: Caller,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewSellerSchema>,
) -> ServerResult<Json<OnboardingResult>> {
    let url = context
        .market
        .sellers
        .onboard(
            caller.identity(),
            NewSellerProfile {
                name: body.name,
                bio: body.bio,
                location: body.location,
            },
        )
        .await?;

    Ok(Json(OnboardingResult { url }))
}

pub fn router() -> Router {
    Router::new().route("/sellers", post(create_seller))
}
