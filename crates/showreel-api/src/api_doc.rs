//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Showreel API",
        version = "0.1.0",
        description = "Portfolio store for a video studio site: list, create, update, reorder and delete portfolio entries, and publish uploaded videos."
    ),
    paths(
        handlers::portfolio::list_portfolio,
        handlers::portfolio::create_portfolio_entry,
        handlers::portfolio::update_portfolio,
        handlers::portfolio::delete_portfolio_entry,
        handlers::upload::upload_media,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::portfolio::CreatePortfolioRequest,
        handlers::portfolio::UpdatePortfolioRequest,
        handlers::portfolio::ReorderItem,
        handlers::portfolio::SuccessResponse,
    )),
    tags(
        (name = "portfolio", description = "Portfolio entries"),
        (name = "upload", description = "Media intake")
    )
)]
pub struct ApiDoc;
