//! Data models for the application

mod portfolio;

pub use portfolio::*;
