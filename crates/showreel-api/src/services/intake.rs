//! Media intake service
//!
//! Turns an uploaded video (plus optional thumbnail and tag text) into a
//! published portfolio entry: extract → validate → store files → infer
//! metadata → persist entry. Stored files are removed again when the entry
//! cannot be persisted.

use axum::extract::Multipart;
use bytes::Bytes;
use chrono::Utc;
use showreel_core::intake::{derive_tags, raw_title, sanitize_filename, title_case};
use showreel_core::models::{MediaSource, NewEntry, PortfolioEntry};
use showreel_core::video_ref::PLACEHOLDER_THUMBNAIL;
use showreel_core::{AppError, Config};
use showreel_db::PortfolioRepository;
use showreel_storage::keys::{thumbnail_key, video_key};
use showreel_storage::Storage;
use std::sync::Arc;

use crate::error::storage_app_error;

pub const VIDEO_FIELD: &str = "video";
pub const THUMBNAIL_FIELD: &str = "thumbnail";
pub const TAGS_FIELD: &str = "tags";

/// One file part of the upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// The parsed upload form.
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    pub video: Option<UploadedFile>,
    pub thumbnail: Option<UploadedFile>,
    pub tags: Option<String>,
}

/// Read the `video`, `thumbnail` and `tags` fields; other fields are skipped.
pub async fn read_intake_form(mut multipart: Multipart) -> Result<IntakeForm, AppError> {
    let mut form = IntakeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            VIDEO_FIELD | THUMBNAIL_FIELD => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::ValidationError(format!("Failed to read file data: {}", e))
                })?;

                let file = UploadedFile {
                    file_name,
                    content_type,
                    data,
                };
                if field_name == VIDEO_FIELD {
                    form.video = Some(file);
                } else {
                    form.thumbnail = Some(file);
                }
            }
            TAGS_FIELD => {
                let text = field.text().await.map_err(|e| {
                    AppError::ValidationError(format!("Failed to read tags: {}", e))
                })?;
                form.tags = Some(text);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown upload field");
            }
        }
    }

    Ok(form)
}

fn validate_file_size(file_size: usize, max_size: usize, what: &str) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "{} exceeds maximum allowed size of {} MB",
            what,
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// File name a stored upload gets: upload time prefix, then the sanitized original name.
fn stored_name(millis: i64, original: &str) -> String {
    sanitize_filename(&format!("{}-{}", millis, original))
}

pub struct IntakeService {
    storage: Arc<dyn Storage>,
    portfolio: PortfolioRepository,
    max_video_size_bytes: usize,
    max_thumbnail_size_bytes: usize,
}

impl IntakeService {
    pub fn new(storage: Arc<dyn Storage>, portfolio: PortfolioRepository, config: &Config) -> Self {
        Self {
            storage,
            portfolio,
            max_video_size_bytes: config.max_video_size_bytes,
            max_thumbnail_size_bytes: config.max_thumbnail_size_bytes,
        }
    }

    /// Store the uploaded files and create the matching entry.
    pub async fn ingest(&self, form: IntakeForm) -> Result<PortfolioEntry, AppError> {
        let video = form
            .video
            .ok_or_else(|| AppError::ValidationError("No video file provided".to_string()))?;
        if video.data.is_empty() {
            return Err(AppError::ValidationError(
                "Video file is empty".to_string(),
            ));
        }
        validate_file_size(video.data.len(), self.max_video_size_bytes, "Video file")?;

        // An empty thumbnail part means none was chosen in the form.
        let thumbnail = form.thumbnail.filter(|t| !t.data.is_empty());
        if let Some(ref thumb) = thumbnail {
            validate_file_size(
                thumb.data.len(),
                self.max_thumbnail_size_bytes,
                "Thumbnail",
            )?;
        }

        let millis = Utc::now().timestamp_millis();
        let mut stored_keys = Vec::new();

        let video_key = video_key(&stored_name(millis, &video.file_name));
        let video_url = self
            .storage
            .upload_with_key(&video_key, video.data.to_vec(), &video.content_type)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %video_key, "Failed to store uploaded video");
                storage_app_error(e)
            })?;
        stored_keys.push(video_key);

        let thumbnail_url = match thumbnail {
            Some(thumb) => {
                let key = thumbnail_key(&stored_name(millis, &thumb.file_name));
                match self
                    .storage
                    .upload_with_key(&key, thumb.data.to_vec(), &thumb.content_type)
                    .await
                {
                    Ok(url) => {
                        stored_keys.push(key);
                        url
                    }
                    Err(e) => {
                        tracing::error!(error = %e, key = %key, "Failed to store uploaded thumbnail");
                        self.remove_stored(&stored_keys).await;
                        return Err(storage_app_error(e));
                    }
                }
            }
            None => PLACEHOLDER_THUMBNAIL.to_string(),
        };

        let raw = raw_title(&video.file_name);
        let new_entry = NewEntry {
            title: Some(title_case(&raw)),
            description: Some(format!(
                "Uploaded via Admin. Original file: {}",
                video.file_name
            )),
            tags: Some(derive_tags(form.tags.as_deref(), &raw)),
            source: MediaSource::Local {
                path: video_url,
                thumbnail: Some(thumbnail_url),
            },
        };

        match self.portfolio.create(new_entry).await {
            Ok(entry) => {
                tracing::info!(
                    entry_id = %entry.id,
                    original_file = %video.file_name,
                    size_bytes = video.data.len(),
                    tags = ?entry.tags,
                    "Media intake completed"
                );
                Ok(entry)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist uploaded entry, removing stored files");
                self.remove_stored(&stored_keys).await;
                Err(e)
            }
        }
    }

    async fn remove_stored(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!(error = %e, key = %key, "Failed to remove orphaned upload");
            }
        }
    }
}
