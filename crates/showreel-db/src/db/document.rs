//! JSON document I/O
//!
//! Reads and rewrites the portfolio document. Writes go to a sibling temp
//! file which is synced and then renamed over the original, so readers only
//! ever observe the previous or the next complete document.

use showreel_core::models::PortfolioEntry;
use showreel_core::AppError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Read and parse the whole document.
pub async fn read_entries(path: &Path) -> Result<Vec<PortfolioEntry>, AppError> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::StorageUnavailable(format!(
                "Portfolio document {} does not exist",
                path.display()
            )));
        }
        Err(e) => {
            return Err(AppError::StorageUnavailable(format!(
                "Failed to read portfolio document {}: {}",
                path.display(),
                e
            )));
        }
    };

    serde_json::from_slice::<Vec<PortfolioEntry>>(&raw).map_err(|e| {
        AppError::StorageUnavailable(format!(
            "Portfolio document {} is not a valid entry array: {}",
            path.display(),
            e
        ))
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "portfolio.json".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()))
}

/// Rewrite the whole document atomically.
pub async fn write_entries(path: &Path, entries: &[PortfolioEntry]) -> Result<(), AppError> {
    let mut body = serde_json::to_vec_pretty(entries).map_err(|e| {
        AppError::Internal(format!("Failed to serialize portfolio document: {}", e))
    })?;
    body.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::StorageUnavailable(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = write_and_sync(&temp_path, &body).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(AppError::StorageUnavailable(format!(
            "Failed to write portfolio document {}: {}",
            temp_path.display(),
            e
        )));
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(AppError::StorageUnavailable(format!(
            "Failed to replace portfolio document {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

async fn write_and_sync(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(body).await?;
    file.sync_all().await
}

/// Create an empty document when none exists. Returns `true` if one was created.
pub async fn ensure_document(path: &Path) -> Result<bool, AppError> {
    if fs::try_exists(path).await.unwrap_or(false) {
        return Ok(false);
    }
    write_entries(path, &[]).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_document_is_storage_unavailable() {
        let dir = tempdir().unwrap();
        let result = read_entries(&dir.path().join("db.json")).await;
        assert!(matches!(result, Err(AppError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn non_array_document_is_storage_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, br#"{"id": "1"}"#).await.unwrap();
        let result = read_entries(&path).await;
        assert!(matches!(result, Err(AppError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");

        write_entries(&path, &[]).await.unwrap();
        write_entries(&path, &[]).await.unwrap();

        let mut names = Vec::new();
        let mut read_dir = fs::read_dir(path.parent().unwrap()).await.unwrap();
        while let Some(entry) = read_dir.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["db.json".to_string()]);
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "[]\n");
    }

    #[tokio::test]
    async fn ensure_document_never_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        assert!(ensure_document(&path).await.unwrap());
        fs::write(&path, b"not json").await.unwrap();
        assert!(!ensure_document(&path).await.unwrap());
        assert_eq!(fs::read(&path).await.unwrap(), b"not json");
    }
}
