//! Dashboard Main Application
//! Country selector on the left, charts for the selection on the right.

use crate::charts::ChartPlotter;
use crate::config::Settings;
use crate::data::{ColumnMapping, Table};
use crate::gui::{ControlPanel, ControlPanelAction};
use crate::pipeline;
use crate::report::{self, ReportItem};
use egui::{Color32, RichText, ScrollArea, SidePanel};
use std::path::PathBuf;
use tracing::{error, info};

/// Main application window.
pub struct DashboardApp {
    settings: Settings,
    control_panel: ControlPanel,
    table: Option<Table>,
    items: Vec<ReportItem>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf, settings: Settings) -> Self {
        let mut app = Self::with_settings(data_path, settings);
        app.reload();
        app
    }

    fn with_settings(data_path: PathBuf, settings: Settings) -> Self {
        Self {
            control_panel: ControlPanel::new(data_path, settings.top_n),
            settings,
            table: None,
            items: Vec::new(),
        }
    }

    /// Run the whole pipeline again from the source file.
    fn reload(&mut self) {
        let path = self.control_panel.data_path.clone();
        match pipeline::load_table(&path, &ColumnMapping::dashboard()) {
            Ok(table) => {
                info!(rows = table.len(), "dashboard table ready");
                self.control_panel
                    .update_countries(table.countries(), &self.settings.focus_country);
                self.control_panel
                    .set_status(&format!("Loaded {} rows", table.len()));
                self.table = Some(table);
                self.refresh_views();
            }
            Err(e) => {
                error!("{}", e);
                self.table = None;
                self.items.clear();
                self.control_panel.set_error(&e.to_string());
            }
        }
    }

    /// Re-derive every view for the current selection.
    fn refresh_views(&mut self) {
        self.items = match &self.table {
            Some(table) => report::dashboard_report(
                table,
                &self.control_panel.selected_country,
                self.control_panel.top_n,
            ),
            None => Vec::new(),
        };
    }

    fn show_items(&self, ui: &mut egui::Ui) {
        if let Some(error) = &self.control_panel.error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("⚠ {}", error))
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for item in &self.items {
                    egui::Frame::none()
                        .rounding(8.0)
                        .fill(ui.visuals().widgets.noninteractive.bg_fill)
                        .inner_margin(12.0)
                        .show(ui, |ui| match item {
                            ReportItem::Chart(request) => ChartPlotter::draw_request(ui, request),
                            ReportItem::Notice(notice) => {
                                ui.label(
                                    RichText::new(format!("ℹ {}", notice.message))
                                        .size(14.0)
                                        .color(Color32::from_rgb(23, 162, 184)),
                                );
                            }
                        });
                    ui.add_space(12.0);
                }
            });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                let action = self.control_panel.show(ui);

                match action {
                    ControlPanelAction::Reload => self.reload(),
                    ControlPanelAction::CountryChanged | ControlPanelAction::TopNChanged => {
                        self.refresh_views()
                    }
                    ControlPanelAction::None => {}
                }
            });

        // Central panel - Charts
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_items(ui);
        });
    }
}
