//! Showreel Storage Library
//!
//! Storage abstraction for uploaded media files (videos and thumbnails) and
//! the local filesystem implementation behind it.
//!
//! # Storage key format
//!
//! - **Videos**: `uploads/videos/{filename}`
//! - **Thumbnails**: `uploads/thumbnails/{filename}`
//!
//! Keys must not contain `..` or a leading `/`. The public URL of a key is the
//! configured base URL joined with the key, so an empty base URL yields
//! site-relative paths such as `/uploads/videos/reel.mp4`.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
