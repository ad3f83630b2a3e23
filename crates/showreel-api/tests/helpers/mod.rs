//! Test helpers: build the application against a temporary data directory.
//!
//! Run from workspace root: `cargo test -p showreel-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use showreel_api::setup::initialize_app;
use showreel_core::{Config, ListFailurePolicy};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SEED_DOCUMENT: &str = r#"[
  {
    "id": "1",
    "title": "Neon Nights",
    "description": "Cyberpunk aesthetic",
    "type": "video",
    "videoSrc": "/videos/example1.mp4",
    "tags": ["dark", "urban"],
    "order": 1
  },
  {
    "id": "2",
    "title": "Golden Hour",
    "description": "Cinematic sunlight",
    "type": "video",
    "videoSrc": "https://youtu.be/dQw4w9WgXcQ",
    "youtubeId": "dQw4w9WgXcQ",
    "tags": ["light"],
    "order": 0
  },
  {
    "id": "3",
    "title": "Still",
    "description": "",
    "type": "image",
    "tags": []
  }
]"#;

/// Test application: server plus the directory holding its document and media.
pub struct TestApp {
    pub server: TestServer,
    pub dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("data").join("db.json")
    }

    pub fn media_root(&self) -> PathBuf {
        self.dir.path().join("public")
    }

    pub fn read_document(&self) -> serde_json::Value {
        let raw = std::fs::read(self.data_file()).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }
}

/// App over the seed document with the default (degrading) list policy.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(Some(SEED_DOCUMENT), ListFailurePolicy::Degrade).await
}

/// App over `document` (or a freshly created empty one when `None`).
pub async fn setup_test_app_with(document: Option<&str>, policy: ListFailurePolicy) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), policy);

    if let Some(json) = document {
        std::fs::create_dir_all(config.data_file.parent().unwrap()).unwrap();
        std::fs::write(&config.data_file, json).unwrap();
    }

    let (_state, router) = initialize_app(config).await.unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp { server, dir }
}

fn test_config(root: &Path, policy: ListFailurePolicy) -> Config {
    Config {
        data_file: root.join("data").join("db.json"),
        media_root: root.join("public"),
        list_failure_policy: policy,
        max_video_size_bytes: 1024,
        max_thumbnail_size_bytes: 256,
        ..Config::default()
    }
}
