use crate::error::{ErrorResponse, HttpAppError};
use crate::services::intake::{read_intake_form, IntakeService};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use showreel_core::models::PortfolioEntry;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub entry: PortfolioEntry,
}

/// Upload a video (and optional thumbnail) and publish it as a new entry
///
/// Title and tags are inferred from the file name unless `tags` is supplied.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Fields: `video` (file, required), `thumbnail` (file), `tags` (comma-separated text)"),
    responses(
        (status = 200, description = "Video stored and entry created", body = serde_json::Value),
        (status = 400, description = "No video file provided", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Media or portfolio storage failed", body = ErrorResponse)
    )
)]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let form = read_intake_form(multipart).await?;

    let service = IntakeService::new(state.storage.clone(), state.portfolio.clone(), &state.config);
    let entry = service.ingest(form).await?;

    Ok(Json(UploadResponse {
        success: true,
        entry,
    }))
}
