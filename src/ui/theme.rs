// FeedbackReport - ui/theme.rs
//
// Colours for feedback categories and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Label colours, assigned to markers in configured order.
const MARKER_PALETTE: [Color32; 4] = [
    Color32::from_rgb(96, 165, 250),  // Blue 400
    Color32::from_rgb(251, 191, 36),  // Amber 400
    Color32::from_rgb(52, 211, 153),  // Emerald 400
    Color32::from_rgb(244, 114, 182), // Pink 400
];

/// Labels matching no marker.
const UNMARKED: Color32 = Color32::from_rgb(209, 213, 219); // Gray 300

/// Colour of a feedback label in the table, keyed on the first marker it
/// contains. Markers past the palette length wrap around.
pub fn feedback_colour(feedback_type: &str, markers: &[String]) -> Color32 {
    markers
        .iter()
        .position(|m| feedback_type.contains(m.as_str()))
        .map(|idx| MARKER_PALETTE[idx % MARKER_PALETTE.len()])
        .unwrap_or(UNMARKED)
}

/// Colour of warning text in the sidebar.
pub const WARNING_TEXT: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 260.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const LINE_COLUMN_WIDTH: f32 = 60.0;
pub const TIMESTAMP_COLUMN_WIDTH: f32 = 170.0;
