//! Showreel API Library
//!
//! HTTP handlers, media intake service and application setup for the
//! portfolio service.

mod api_doc;
mod handlers;
mod telemetry;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
