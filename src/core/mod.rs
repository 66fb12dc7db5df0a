// FeedbackReport - core/mod.rs
//
// Core business logic layer: extraction, filtering, export.
// Must NOT depend on: ui, platform, app.

pub mod export;
pub mod filter;
pub mod model;
pub mod parser;
