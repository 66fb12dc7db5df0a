// FeedbackReport - platform/mod.rs
//
// Platform abstraction layer: config directories and filesystem access.

pub mod config;
pub mod fs;
