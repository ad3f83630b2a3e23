use chrono::Utc;
use showreel_core::models::{
    normalize_tags, EntryPatch, MediaKind, MediaSource, NewEntry, PortfolioEntry,
    DEFAULT_EXTERNAL_DESCRIPTION, DEFAULT_TITLE, FALLBACK_TAG, NEW_ENTRY_SORT_ORDER,
};
use showreel_core::{extract_external_id, AppError, ListFailurePolicy};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::document::{ensure_document, read_entries, write_entries};

/// Result of `PortfolioRepository::list`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub entries: Vec<PortfolioEntry>,
    /// The document could not be read and the failure policy substituted an empty list.
    pub degraded: bool,
}

/// Repository for the portfolio document.
///
/// Every mutation is a full read-modify-write of the document. Mutations run
/// under one in-process lock, so concurrent callers sharing a repository (or
/// any clone of it) cannot overwrite each other's changes. Separate processes
/// writing the same file are not coordinated.
#[derive(Clone, Debug)]
pub struct PortfolioRepository {
    path: PathBuf,
    list_failure_policy: ListFailurePolicy,
    /// Guards read-modify-write cycles; holds the last id handed out.
    last_id: Arc<Mutex<u64>>,
}

impl PortfolioRepository {
    pub fn new(path: impl Into<PathBuf>, list_failure_policy: ListFailurePolicy) -> Self {
        Self {
            path: path.into(),
            list_failure_policy,
            last_id: Arc::new(Mutex::new(0)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty document if none exists yet. An existing document is left as is.
    #[tracing::instrument(skip(self), fields(db.operation = "init", db.path = %self.path.display()))]
    pub async fn init(&self) -> Result<(), AppError> {
        let _guard = self.last_id.lock().await;
        if ensure_document(&self.path).await? {
            tracing::info!(path = %self.path.display(), "Created empty portfolio document");
        }
        Ok(())
    }

    /// All entries in display order, applying the configured failure policy.
    ///
    /// Under `ListFailurePolicy::Degrade` a storage failure is logged and an
    /// empty, degraded listing returned.
    #[tracing::instrument(skip(self), fields(db.operation = "list"))]
    pub async fn list(&self) -> Result<Listing, AppError> {
        match self.list_strict().await {
            Ok(entries) => Ok(Listing {
                entries,
                degraded: false,
            }),
            Err(e) => match self.list_failure_policy {
                ListFailurePolicy::Degrade => {
                    tracing::error!(
                        error = %e,
                        path = %self.path.display(),
                        "Portfolio document unavailable, serving empty list"
                    );
                    Ok(Listing {
                        entries: Vec::new(),
                        degraded: true,
                    })
                }
                ListFailurePolicy::Propagate => Err(e),
            },
        }
    }

    /// All entries in display order; storage failures are always returned.
    pub async fn list_strict(&self) -> Result<Vec<PortfolioEntry>, AppError> {
        let entries = read_entries(&self.path).await?;
        Ok(sort_for_display(entries))
    }

    #[tracing::instrument(skip(self), fields(db.operation = "get", db.record_id = %id))]
    pub async fn get(&self, id: &str) -> Result<PortfolioEntry, AppError> {
        read_entries(&self.path)
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    /// Create an entry, place it first in display order, and persist it.
    #[tracing::instrument(skip(self, new_entry), fields(db.operation = "insert"))]
    pub async fn create(&self, new_entry: NewEntry) -> Result<PortfolioEntry, AppError> {
        let mut entry = build_entry(new_entry)?;

        let mut last_id = self.last_id.lock().await;
        let mut entries = read_entries(&self.path).await?;

        entry.id = next_id(&mut last_id, &entries);
        entry
            .validate()
            .map_err(|msg| AppError::Internal(format!("Refusing to store entry: {}", msg)))?;

        entries.insert(0, entry.clone());
        write_entries(&self.path, &entries).await?;

        tracing::info!(
            entry_id = %entry.id,
            title = %entry.title,
            external_video_id = ?entry.external_video_id,
            total = entries.len(),
            "Portfolio entry created"
        );

        Ok(entry)
    }

    /// Apply a partial update to one entry.
    #[tracing::instrument(skip(self, patch), fields(db.operation = "update", db.record_id = %id))]
    pub async fn update(&self, id: &str, patch: EntryPatch) -> Result<PortfolioEntry, AppError> {
        let _guard = self.last_id.lock().await;
        let mut entries = read_entries(&self.path).await?;

        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        patch.apply_to(entry);
        let updated = entry.clone();

        write_entries(&self.path, &entries).await?;

        tracing::info!(entry_id = %id, "Portfolio entry updated");
        Ok(updated)
    }

    /// Remove an entry. A missing id is not an error; returns whether anything was removed.
    ///
    /// Media files the entry points at are left on disk.
    #[tracing::instrument(skip(self), fields(db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.last_id.lock().await;
        let mut entries = read_entries(&self.path).await?;

        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;

        if removed {
            write_entries(&self.path, &entries).await?;
            tracing::info!(entry_id = %id, "Portfolio entry deleted");
        } else {
            tracing::debug!(entry_id = %id, "Delete of unknown portfolio entry ignored");
        }

        Ok(removed)
    }

    /// Give each listed entry its 0-based position as sort order.
    ///
    /// Unknown ids are skipped; entries not listed keep their order. Returns
    /// how many stored entries were reordered.
    #[tracing::instrument(skip(self, ordered_ids), fields(db.operation = "reorder", count = ordered_ids.len()))]
    pub async fn reorder<S: AsRef<str>>(&self, ordered_ids: &[S]) -> Result<usize, AppError> {
        let _guard = self.last_id.lock().await;
        let mut entries = read_entries(&self.path).await?;

        let mut matched = 0;
        for (position, id) in ordered_ids.iter().enumerate() {
            if let Some(entry) = entries.iter_mut().find(|e| e.id == id.as_ref()) {
                entry.sort_order = Some(position as i64);
                matched += 1;
            }
        }

        write_entries(&self.path, &entries).await?;

        tracing::info!(
            requested = ordered_ids.len(),
            matched,
            "Portfolio entries reordered"
        );
        Ok(matched)
    }
}

/// Stable ascending sort on effective sort order.
pub fn sort_for_display(mut entries: Vec<PortfolioEntry>) -> Vec<PortfolioEntry> {
    entries.sort_by_key(PortfolioEntry::effective_sort_order);
    entries
}

/// Time-derived id, strictly greater than the last one issued and unused in the document.
fn next_id(last_id: &mut u64, entries: &[PortfolioEntry]) -> String {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let mut candidate = now.max(last_id.saturating_add(1));
    while entries.iter().any(|e| e.id == candidate.to_string()) {
        candidate += 1;
    }
    *last_id = candidate;
    candidate.to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Turn creation input into an entry (without id), validating the media source.
fn build_entry(new_entry: NewEntry) -> Result<PortfolioEntry, AppError> {
    let NewEntry {
        title,
        description,
        tags,
        source,
    } = new_entry;

    let (media_reference, external_video_id, thumbnail_override, default_description) =
        match source {
            MediaSource::External { url } => {
                let url = url.trim().to_string();
                if url.is_empty() {
                    return Err(AppError::ValidationError(
                        "Missing YouTube URL".to_string(),
                    ));
                }
                let external_id = extract_external_id(&url)
                    .ok_or_else(|| AppError::InvalidReference("Invalid YouTube URL".to_string()))?;
                (url, Some(external_id), None, DEFAULT_EXTERNAL_DESCRIPTION)
            }
            MediaSource::Local { path, thumbnail } => {
                if path.trim().is_empty() {
                    return Err(AppError::ValidationError(
                        "Missing media path".to_string(),
                    ));
                }
                (path, None, non_blank(thumbnail), "")
            }
        };

    // Only an absent tag list falls back; an explicit empty list is kept.
    let tags = match tags {
        Some(tags) => normalize_tags(tags),
        None => vec![FALLBACK_TAG.to_string()],
    };

    Ok(PortfolioEntry {
        id: String::new(),
        title: non_blank(title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: description.unwrap_or_else(|| default_description.to_string()),
        kind: MediaKind::Video,
        media_reference: Some(media_reference),
        external_video_id,
        thumbnail_override,
        tags,
        sort_order: Some(NEW_ENTRY_SORT_ORDER),
        extra: Default::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use showreel_core::models::MediaSource;
    use std::collections::HashSet;
    use tempfile::{tempdir, TempDir};

    async fn repo_with(json: &str) -> (TempDir, PortfolioRepository) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        tokio::fs::write(&path, json).await.unwrap();
        let repo = PortfolioRepository::new(path, ListFailurePolicy::Degrade);
        (dir, repo)
    }

    fn seed_abc() -> &'static str {
        r#"[
            {"id": "a", "title": "A", "description": "", "type": "video", "videoSrc": "/videos/a.mp4", "tags": []},
            {"id": "b", "title": "B", "description": "", "type": "video", "videoSrc": "/videos/b.mp4", "tags": []},
            {"id": "c", "title": "C", "description": "", "type": "video", "videoSrc": "/videos/c.mp4", "tags": []}
        ]"#
    }

    fn ids(entries: &[PortfolioEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let (_dir, repo) = repo_with("[]").await;

        let created = repo
            .create(NewEntry::external("https://youtu.be/dQw4w9WgXcQ").with_title("Demo"))
            .await
            .unwrap();

        assert_eq!(created.external_video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(created.sort_order, Some(-1));
        assert_eq!(created.title, "Demo");
        assert_eq!(created.description, "YouTube Import");
        assert_eq!(created.tags, vec!["new".to_string()]);
        assert_eq!(
            created.media_reference.as_deref(),
            Some("https://youtu.be/dQw4w9WgXcQ")
        );

        let listed = repo.list_strict().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn explicit_empty_tags_are_kept() {
        let (_dir, repo) = repo_with("[]").await;

        let created = repo
            .create(NewEntry::external("https://youtu.be/dQw4w9WgXcQ").with_tags(vec![]))
            .await
            .unwrap();
        assert!(created.tags.is_empty());

        let stored = repo.get(&created.id).await.unwrap();
        assert_eq!(stored.tags, Vec::<String>::new());
    }

    #[tokio::test]
    async fn readable_document_lists_without_degrading() {
        let (_dir, repo) = repo_with(seed_abc()).await;

        let listing = repo.list().await.unwrap();
        assert!(!listing.degraded);
        assert_eq!(ids(&listing.entries), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn created_entry_sorts_before_ordered_entries() {
        let (_dir, repo) = repo_with(
            r#"[{"id": "x", "title": "X", "description": "", "type": "video", "videoSrc": "/x.mp4", "tags": [], "order": 0}]"#,
        )
        .await;

        let created = repo
            .create(NewEntry::external("https://www.youtube.com/watch?v=dQw4w9WgXcQ"))
            .await
            .unwrap();

        let listed = repo.list_strict().await.unwrap();
        assert_eq!(ids(&listed), vec![created.id.as_str(), "x"]);
        assert_eq!(listed[0].title, "New Video");
    }

    #[tokio::test]
    async fn invalid_reference_leaves_document_unchanged() {
        let (_dir, repo) = repo_with(seed_abc()).await;
        let before = tokio::fs::read(repo.path()).await.unwrap();

        let result = repo
            .create(NewEntry::external("https://example.com/not-a-video"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidReference(_))));

        let result = repo.create(NewEntry::external("   ")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        assert_eq!(tokio::fs::read(repo.path()).await.unwrap(), before);
        assert_eq!(repo.list_strict().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn local_source_skips_id_extraction() {
        let (_dir, repo) = repo_with("[]").await;

        let created = repo
            .create(NewEntry {
                title: Some("Neon Nights".to_string()),
                description: Some("Uploaded via Admin. Original file: neon.mp4".to_string()),
                tags: Some(vec!["Dark".to_string(), "urban".to_string()]),
                source: MediaSource::Local {
                    path: "/uploads/videos/1-neon.mp4".to_string(),
                    thumbnail: Some("/uploads/thumbnails/1-neon.png".to_string()),
                },
            })
            .await
            .unwrap();

        assert_eq!(created.external_video_id, None);
        assert_eq!(created.tags, vec!["dark".to_string(), "urban".to_string()]);
        assert_eq!(
            created.thumbnail_override.as_deref(),
            Some("/uploads/thumbnails/1-neon.png")
        );
        assert_eq!(created.sort_order, Some(-1));
    }

    #[tokio::test]
    async fn rapid_creates_get_unique_ids() {
        let (_dir, repo) = repo_with("[]").await;

        let mut seen = HashSet::new();
        for _ in 0..25 {
            let entry = repo
                .create(NewEntry::external("https://youtu.be/dQw4w9WgXcQ"))
                .await
                .unwrap();
            assert!(seen.insert(entry.id));
        }
        assert_eq!(repo.list_strict().await.unwrap().len(), 25);
    }

    #[tokio::test]
    async fn concurrent_creates_do_not_lose_updates() {
        let (_dir, repo) = repo_with("[]").await;

        let mut handles = Vec::new();
        for i in 0..10 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create(
                    NewEntry::external("https://youtu.be/dQw4w9WgXcQ").with_title(format!("{}", i)),
                )
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = repo.list_strict().await.unwrap();
        assert_eq!(listed.len(), 10);
        let unique: HashSet<_> = listed.iter().map(|e| e.id.clone()).collect();
        assert_eq!(unique.len(), 10);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, repo) = repo_with(seed_abc()).await;

        assert!(repo.delete("b").await.unwrap());
        assert!(!repo.delete("b").await.unwrap());

        let listed = repo.list_strict().await.unwrap();
        assert_eq!(ids(&listed), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn list_orders_by_effective_order_with_stable_ties() {
        let (_dir, repo) = repo_with(
            r#"[
                {"id": "u1", "title": "", "description": "", "type": "video", "videoSrc": "/1", "tags": []},
                {"id": "o5", "title": "", "description": "", "type": "video", "videoSrc": "/2", "tags": [], "order": 5},
                {"id": "u2", "title": "", "description": "", "type": "video", "videoSrc": "/3", "tags": []},
                {"id": "o0a", "title": "", "description": "", "type": "video", "videoSrc": "/4", "tags": [], "order": 0},
                {"id": "o0b", "title": "", "description": "", "type": "video", "videoSrc": "/5", "tags": [], "order": 0},
                {"id": "neg", "title": "", "description": "", "type": "video", "videoSrc": "/6", "tags": [], "order": -1}
            ]"#,
        )
        .await;

        let listed = repo.list_strict().await.unwrap();
        assert_eq!(ids(&listed), vec!["neg", "o0a", "o0b", "o5", "u1", "u2"]);
        assert!(listed
            .windows(2)
            .all(|w| w[0].effective_sort_order() <= w[1].effective_sort_order()));
    }

    #[tokio::test]
    async fn reorder_places_mentioned_entries_first() {
        let (_dir, repo) = repo_with(seed_abc()).await;

        let matched = repo.reorder(&["c", "a", "missing"]).await.unwrap();
        assert_eq!(matched, 2);

        let listed = repo.list_strict().await.unwrap();
        assert_eq!(ids(&listed), vec!["c", "a", "b"]);
        assert_eq!(listed[0].sort_order, Some(0));
        assert_eq!(listed[1].sort_order, Some(1));
        assert_eq!(listed[2].sort_order, None);
    }

    #[tokio::test]
    async fn reorder_keeps_order_of_unmentioned_entries() {
        let (_dir, repo) = repo_with(seed_abc()).await;
        repo.update(
            "b",
            EntryPatch {
                sort_order: Some(7),
                ..EntryPatch::default()
            },
        )
        .await
        .unwrap();

        repo.reorder(&["a".to_string()]).await.unwrap();

        assert_eq!(repo.get("b").await.unwrap().sort_order, Some(7));
        assert_eq!(repo.get("a").await.unwrap().sort_order, Some(0));
    }

    #[tokio::test]
    async fn partial_update_changes_only_supplied_fields() {
        let (_dir, repo) = repo_with(
            r#"[{"id": "a", "title": "Keep", "description": "d", "type": "video", "videoSrc": "/a.mp4", "thumbnailSrc": "/t.png", "tags": ["old"], "order": 2}]"#,
        )
        .await;

        let updated = repo
            .update(
                "a",
                EntryPatch {
                    tags: Some(vec!["x".to_string()]),
                    ..EntryPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.tags, vec!["x".to_string()]);
        assert_eq!(updated.title, "Keep");
        assert_eq!(updated.thumbnail_override.as_deref(), Some("/t.png"));
        assert_eq!(updated.sort_order, Some(2));
        assert_eq!(repo.get("a").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found_and_document_unchanged() {
        let (_dir, repo) = repo_with(seed_abc()).await;
        let before = tokio::fs::read(repo.path()).await.unwrap();

        let result = repo
            .update(
                "does-not-exist",
                EntryPatch {
                    title: Some("nope".to_string()),
                    ..EntryPatch::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(tokio::fs::read(repo.path()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn unknown_keys_survive_rewrites() {
        let (_dir, repo) = repo_with(
            r#"[{"id": "a", "title": "A", "description": "", "type": "video", "videoSrc": "/a.mp4", "tags": [], "featured": {"home": true}}]"#,
        )
        .await;

        repo.reorder(&["a"]).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&tokio::fs::read(repo.path()).await.unwrap()).unwrap();
        assert_eq!(raw[0]["featured"]["home"], serde_json::Value::Bool(true));
        assert_eq!(raw[0]["order"], serde_json::json!(0));
    }

    #[tokio::test]
    async fn corrupt_document_degrades_list_but_fails_mutations() {
        let (_dir, repo) = repo_with("{ not json").await;

        let listing = repo.list().await.unwrap();
        assert!(listing.degraded);
        assert!(listing.entries.is_empty());
        assert!(matches!(
            repo.list_strict().await,
            Err(AppError::StorageUnavailable(_))
        ));
        assert!(matches!(
            repo.create(NewEntry::external("https://youtu.be/dQw4w9WgXcQ"))
                .await,
            Err(AppError::StorageUnavailable(_))
        ));
        assert!(matches!(
            repo.delete("a").await,
            Err(AppError::StorageUnavailable(_))
        ));
        assert_eq!(
            tokio::fs::read_to_string(repo.path()).await.unwrap(),
            "{ not json"
        );
    }

    #[tokio::test]
    async fn propagate_policy_surfaces_list_failures() {
        let dir = tempdir().unwrap();
        let repo = PortfolioRepository::new(
            dir.path().join("missing.json"),
            ListFailurePolicy::Propagate,
        );
        assert!(matches!(
            repo.list().await,
            Err(AppError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn init_creates_empty_document() {
        let dir = tempdir().unwrap();
        let repo = PortfolioRepository::new(
            dir.path().join("data").join("db.json"),
            ListFailurePolicy::Propagate,
        );

        repo.init().await.unwrap();
        assert!(repo.list_strict().await.unwrap().is_empty());
    }

    #[test]
    fn next_id_skips_ids_already_in_document() {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap();
        let taken = PortfolioEntry {
            id: (now + 1_000).to_string(),
            title: String::new(),
            description: String::new(),
            kind: MediaKind::Image,
            media_reference: None,
            external_video_id: None,
            thumbnail_override: None,
            tags: Vec::new(),
            sort_order: None,
            extra: Default::default(),
        };
        let mut last = now + 999;
        let id = next_id(&mut last, &[taken]);
        assert_eq!(id, (now + 1_001).to_string());
        assert_eq!(last, now + 1_001);
    }
}
