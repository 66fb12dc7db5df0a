// FeedbackReport - ui/panels/filters.rs
//
// Filter controls sidebar: date range, optional time range, feedback types.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the filter controls.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    if state.records.is_empty() {
        ui.label("No feedback events loaded.");
        return;
    }

    let mut changed = false;

    egui::Grid::new("date_range_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Start date:");
            changed |= ui.text_edit_singleline(&mut state.start_date_input).changed();
            ui.end_row();

            ui.label("End date:");
            changed |= ui.text_edit_singleline(&mut state.end_date_input).changed();
            ui.end_row();
        });

    ui.add_space(4.0);
    changed |= ui
        .checkbox(&mut state.filter_time, "Filter by time range")
        .changed();

    if state.filter_time {
        egui::Grid::new("time_range_grid")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Start time:");
                changed |= ui.text_edit_singleline(&mut state.start_time_input).changed();
                ui.end_row();

                ui.label("End time:");
                changed |= ui.text_edit_singleline(&mut state.end_time_input).changed();
                ui.end_row();
            });
    }

    if changed {
        state.apply_filters();
    }

    ui.separator();
    ui.label("Feedback types:");

    // Collect toggles first; set_type_selected refilters and rebuilds the list.
    let mut toggled: Option<(String, bool)> = None;
    for feedback_type in &state.available_types {
        let mut checked = !state.excluded_types.contains(feedback_type);
        if ui.checkbox(&mut checked, feedback_type.as_str()).changed() {
            toggled = Some((feedback_type.clone(), checked));
        }
    }
    if let Some((feedback_type, checked)) = toggled {
        state.set_type_selected(&feedback_type, checked);
    }

    ui.separator();
    if ui.button("Reset Filters").clicked() {
        state.reset_filters();
    }

    if !state.warnings.is_empty() {
        ui.separator();
        ui.collapsing(format!("Warnings ({})", state.warnings.len()), |ui| {
            for warning in &state.warnings {
                ui.label(egui::RichText::new(warning).color(theme::WARNING_TEXT));
            }
        });
    }
}
