// FeedbackReport - ui/panels/mod.rs

pub mod filters;
pub mod records;
