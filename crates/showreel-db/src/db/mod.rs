pub mod document;
pub mod portfolio;
