use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::video_ref::{thumbnail_url_for, PLACEHOLDER_THUMBNAIL};

/// Sort key used for entries that carry no explicit order.
pub const UNORDERED_SORT_KEY: i64 = i64::MAX;

/// Order assigned to freshly created entries so they surface first.
pub const NEW_ENTRY_SORT_ORDER: i64 = -1;

/// Tag applied when no tags could be derived for an entry.
pub const FALLBACK_TAG: &str = "new";

/// Title given to entries created without one.
pub const DEFAULT_TITLE: &str = "New Video";
/// Description given to hosted-video entries created without one.
pub const DEFAULT_EXTERNAL_DESCRIPTION: &str = "YouTube Import";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Video,
    Image,
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Image => write!(f, "image"),
        }
    }
}

/// One published work item, as persisted in the portfolio document.
///
/// Field names on disk follow the document format the public site and admin
/// tooling already read (`type`, `videoSrc`, `youtubeId`, `thumbnailSrc`,
/// `order`). Keys this struct does not know about are kept in `extra` and
/// written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    #[serde(rename = "videoSrc", default, skip_serializing_if = "Option::is_none")]
    pub media_reference: Option<String>,
    #[serde(rename = "youtubeId", default, skip_serializing_if = "Option::is_none")]
    pub external_video_id: Option<String>,
    #[serde(rename = "thumbnailSrc", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_override: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "order", default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl PortfolioEntry {
    /// Sort key: the explicit order, or a sentinel placing the entry after every ordered one.
    pub fn effective_sort_order(&self) -> i64 {
        self.sort_order.unwrap_or(UNORDERED_SORT_KEY)
    }

    /// Thumbnail to display: override, then the hosted video thumbnail, then the placeholder.
    pub fn effective_thumbnail(&self) -> String {
        if let Some(thumb) = self.thumbnail_override.as_deref().filter(|t| !t.is_empty()) {
            return thumb.to_string();
        }
        match self.external_video_id.as_deref() {
            Some(id) => thumbnail_url_for(id),
            None => PLACEHOLDER_THUMBNAIL.to_string(),
        }
    }

    /// Check the per-entry invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Entry id must not be empty".to_string());
        }
        if self.kind == MediaKind::Video
            && self
                .media_reference
                .as_deref()
                .map_or(true, |r| r.trim().is_empty())
        {
            return Err(format!("Video entry {} has no media reference", self.id));
        }
        Ok(())
    }
}

/// Where the media of a new entry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A hosted video URL; an external id must be extractable from it.
    External { url: String },
    /// A file placed by media intake, with its thumbnail if one was stored.
    Local {
        path: String,
        thumbnail: Option<String>,
    },
}

/// Input for creating an entry. Missing fields fall back to per-source defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub source: MediaSource,
}

impl NewEntry {
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            title: None,
            description: None,
            tags: None,
            source: MediaSource::External { url: url.into() },
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Partial update of a single entry; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub sort_order: Option<i64>,
    /// `Some(None)` clears the override.
    pub thumbnail_override: Option<Option<String>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.tags.is_none()
            && self.sort_order.is_none()
            && self.thumbnail_override.is_none()
    }

    /// Apply the supplied fields to `entry`.
    pub fn apply_to(self, entry: &mut PortfolioEntry) {
        if let Some(title) = self.title {
            entry.title = title;
        }
        if let Some(tags) = self.tags {
            entry.tags = normalize_tags(tags);
        }
        if let Some(order) = self.sort_order {
            entry.sort_order = Some(order);
        }
        if let Some(thumbnail) = self.thumbnail_override {
            entry.thumbnail_override = thumbnail.filter(|t| !t.trim().is_empty());
        }
    }
}

/// Trim and lowercase tags, dropping blanks. Duplicates are kept.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
