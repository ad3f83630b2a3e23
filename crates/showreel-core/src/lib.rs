//! Showreel Core Library
//!
//! This crate provides the portfolio domain models, error types, configuration,
//! and the pure text rules (video reference parsing, intake inference) shared
//! across all Showreel components.

pub mod config;
pub mod error;
pub mod intake;
pub mod models;
pub mod video_ref;

// Re-export commonly used types
pub use config::{Config, ListFailurePolicy};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use video_ref::{extract_external_id, thumbnail_url_for};
