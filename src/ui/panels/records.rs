// FeedbackReport - ui/panels/records.rs
//
// Central table of filtered feedback records.

use crate::app::state::{self, AppState};
use crate::ui::theme;
use crate::util::constants;

/// Render the filtered records table.
pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Filtered Customer Feedback Summary");
    ui.separator();

    if state.filtered_indices.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label("No feedback events match the current filters.");
        });
        return;
    }

    let [ts_title, type_title] = state::column_titles();
    ui.horizontal(|ui| {
        ui.add_sized(
            [theme::LINE_COLUMN_WIDTH, theme::ROW_HEIGHT],
            egui::Label::new(egui::RichText::new("Line").strong()),
        );
        ui.add_sized(
            [theme::TIMESTAMP_COLUMN_WIDTH, theme::ROW_HEIGHT],
            egui::Label::new(egui::RichText::new(ts_title).strong()),
        );
        ui.label(egui::RichText::new(type_title).strong());
    });
    ui.separator();

    let total_rows = state.filtered_indices.len();
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show_rows(ui, theme::ROW_HEIGHT, total_rows, |ui, row_range| {
            for idx in row_range {
                let Some(record) = state
                    .filtered_indices
                    .get(idx)
                    .and_then(|&i| state.records.get(i))
                else {
                    continue;
                };
                ui.horizontal(|ui| {
                    ui.add_sized(
                        [theme::LINE_COLUMN_WIDTH, theme::ROW_HEIGHT],
                        egui::Label::new(
                            egui::RichText::new(record.line_number.to_string()).weak(),
                        ),
                    );
                    ui.add_sized(
                        [theme::TIMESTAMP_COLUMN_WIDTH, theme::ROW_HEIGHT],
                        egui::Label::new(
                            egui::RichText::new(
                                record
                                    .timestamp
                                    .format(constants::EXPORT_TIMESTAMP_FORMAT)
                                    .to_string(),
                            )
                            .monospace(),
                        ),
                    );
                    ui.label(
                        egui::RichText::new(&record.feedback_type)
                            .color(theme::feedback_colour(
                                &record.feedback_type,
                                &state.extract_config.markers,
                            )),
                    );
                });
            }
        });
}
