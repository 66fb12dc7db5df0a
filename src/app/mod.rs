// FeedbackReport - app/mod.rs
//
// Application layer: the run pipeline and the window state.
// Dependencies: core, platform.
// Must NOT depend on: ui.

pub mod pipeline;
pub mod state;
