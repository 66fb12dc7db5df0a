// FeedbackReport - gui.rs
//
// Top-level eframe::App implementation.
// Wires the sidebar and table panels to the window state and handles the
// open/export dialogs.

use crate::app::state::AppState;
use crate::core::model::ExportFormat;
use crate::ui;
use crate::util::constants;
use std::path::Path;

/// The FeedbackReport window.
pub struct FeedbackReportApp {
    pub state: AppState,
}

impl FeedbackReportApp {
    /// Create a new application instance with the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn open_log(&mut self, path: &Path) {
        if let Err(e) = self.state.load_path(path) {
            tracing::error!(path = %path.display(), error = %e, "Failed to load log");
            self.state.status_message = e.to_string();
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let Some(file_name) = self.state.suggested_file_name(format) else {
            return;
        };
        let mut dialog = rfd::FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(file_name);
        if let Some(dir) = self.state.export_dir_hint() {
            dialog = dialog.set_directory(dir);
        }
        let Some(dest) = dialog.save_file() else {
            return;
        };
        if let Err(e) = self.state.export_to(&dest, format) {
            tracing::error!(path = %dest.display(), error = %e, "Export failed");
            self.state.status_message = format!("Export failed: {e}");
        }
    }
}

impl eframe::App for FeedbackReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Log File\u{2026}").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Log files", constants::LOG_FILE_EXTENSIONS)
                            .pick_file()
                        {
                            self.open_log(&path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    // Export sub-menu -- enabled once a log is loaded
                    let can_export = self.state.can_export();
                    ui.add_enabled_ui(can_export, |ui| {
                        ui.menu_button("Export", |ui| {
                            for format in ExportFormat::all() {
                                let label = format!("{}\u{2026}", format.label());
                                if ui.button(label).clicked() {
                                    self.export(*format);
                                    ui.close_menu();
                                }
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let can_export = self.state.can_export();
                    let download = format!("Download {}", self.state.export_format.label());
                    if ui
                        .add_enabled(can_export, egui::Button::new(download))
                        .clicked()
                    {
                        self.export(self.state.export_format);
                    }
                    if let Some(ref path) = self.state.source_path {
                        ui.label(path.display().to_string());
                    }
                });
            });
        });

        // Left sidebar
        egui::SidePanel::left("sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_filters")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui::panels::filters::render(ui, &mut self.state);
                    });
            });

        // Central panel (records table)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::records::render(ui, &self.state);
        });
    }
}
