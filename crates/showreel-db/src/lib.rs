//! Showreel persistence layer
//!
//! The portfolio lives in a single JSON document. `PortfolioRepository` owns
//! every read-modify-write of that document.

pub mod db;

pub use db::portfolio::{Listing, PortfolioRepository};
