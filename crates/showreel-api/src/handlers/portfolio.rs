use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use showreel_core::models::{EntryPatch, NewEntry, PortfolioEntry};
use showreel_core::AppError;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePortfolioRequest {
    pub title: Option<String>,
    /// Hosted video URL (watch, share or embed form)
    #[serde(rename = "videoUrl")]
    pub video_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePortfolioRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub order: Option<i64>,
    /// `null` clears the thumbnail override
    #[serde(
        rename = "thumbnailSrc",
        default,
        deserialize_with = "deserialize_some"
    )]
    #[schema(value_type = Option<String>)]
    pub thumbnail_src: Option<Option<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderItem {
    pub id: String,
}

/// `PUT /api/portfolio` accepts either a single update or the full ordering.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PutPortfolioRequest {
    Reorder(Vec<ReorderItem>),
    Single(UpdatePortfolioRequest),
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteQuery {
    /// Entry ID
    pub id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub success: bool,
    pub item: PortfolioEntry,
}

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl From<UpdatePortfolioRequest> for EntryPatch {
    fn from(req: UpdatePortfolioRequest) -> Self {
        EntryPatch {
            title: req.title,
            tags: req.tags,
            sort_order: req.order,
            thumbnail_override: req.thumbnail_src,
        }
    }
}

/// List portfolio entries in display order
#[utoipa::path(
    get,
    path = "/api/portfolio",
    tag = "portfolio",
    responses(
        (status = 200, description = "Entries sorted by order", body = serde_json::Value),
        (status = 500, description = "Portfolio storage unavailable (body is `[]` unless the list failure policy is `propagate`)", body = serde_json::Value)
    )
)]
pub async fn list_portfolio(State(state): State<Arc<AppState>>) -> Result<Response, HttpAppError> {
    let listing = state.portfolio.list().await?;

    // The public gallery renders an empty grid from a degraded `[]` body.
    let status = if listing.degraded {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    Ok((status, Json(listing.entries)).into_response())
}

/// Create an entry from a hosted video URL
#[utoipa::path(
    post,
    path = "/api/portfolio",
    tag = "portfolio",
    request_body = CreatePortfolioRequest,
    responses(
        (status = 200, description = "Entry created", body = serde_json::Value),
        (status = 400, description = "Missing or unrecognized video URL", body = ErrorResponse),
        (status = 500, description = "Portfolio storage unavailable", body = ErrorResponse)
    )
)]
pub async fn create_portfolio_entry(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreatePortfolioRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let new_entry = NewEntry {
        title: body.title,
        description: None,
        tags: body.tags,
        ..NewEntry::external(body.video_url.unwrap_or_default())
    };

    let item = state.portfolio.create(new_entry).await?;

    Ok(Json(EntryResponse {
        success: true,
        item,
    }))
}

/// Update one entry, or reorder all entries when the body is an array
#[utoipa::path(
    put,
    path = "/api/portfolio",
    tag = "portfolio",
    request_body(
        content = UpdatePortfolioRequest,
        description = "Single update, or an array of `{ id }` objects in the desired display order"
    ),
    responses(
        (status = 200, description = "Entry updated or entries reordered", body = serde_json::Value),
        (status = 400, description = "Missing ID or malformed body", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Portfolio storage unavailable", body = ErrorResponse)
    )
)]
pub async fn update_portfolio(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<PutPortfolioRequest>,
) -> Result<Response, HttpAppError> {
    match body {
        PutPortfolioRequest::Reorder(items) => {
            let ids: Vec<String> = items.into_iter().map(|item| item.id).collect();
            state.portfolio.reorder(&ids).await?;
            Ok(Json(SuccessResponse { success: true }).into_response())
        }
        PutPortfolioRequest::Single(mut req) => {
            let id = req
                .id
                .take()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| AppError::ValidationError("Missing ID".to_string()))?;

            let item = state.portfolio.update(&id, req.into()).await?;
            Ok(Json(EntryResponse {
                success: true,
                item,
            })
            .into_response())
        }
    }
}

/// Delete an entry; unknown IDs succeed
#[utoipa::path(
    delete,
    path = "/api/portfolio",
    tag = "portfolio",
    params(DeleteQuery),
    responses(
        (status = 200, description = "Entry removed (or was already absent)", body = SuccessResponse),
        (status = 400, description = "Missing ID", body = ErrorResponse),
        (status = 500, description = "Portfolio storage unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_portfolio_entry(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<SuccessResponse>, HttpAppError> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::ValidationError("Missing ID".to_string()))?;

    state.portfolio.delete(&id).await?;

    Ok(Json(SuccessResponse { success: true }))
}
