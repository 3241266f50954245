//! Control Panel Widget
//! Left side panel with the country selector, ranking size and status line.

use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Left side control panel.
pub struct ControlPanel {
    pub data_path: PathBuf,
    pub countries: Vec<String>,
    pub selected_country: String,
    pub top_n: usize,
    pub status: String,
    /// Load or schema failure; when set nothing else is rendered
    pub error: Option<String>,
}

impl ControlPanel {
    pub fn new(data_path: PathBuf, top_n: usize) -> Self {
        Self {
            data_path,
            countries: Vec::new(),
            selected_country: String::new(),
            top_n,
            status: "Ready".to_string(),
            error: None,
        }
    }

    /// Replace the selector options, keeping `preferred` when available.
    pub fn update_countries(&mut self, countries: Vec<String>, preferred: &str) {
        self.selected_country = if countries.iter().any(|c| c == preferred) {
            preferred.to_string()
        } else if countries.iter().any(|c| *c == self.selected_country) {
            self.selected_country.clone()
        } else {
            countries.first().cloned().unwrap_or_default()
        };
        self.countries = countries;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.error = None;
    }

    pub fn set_error(&mut self, error: &str) {
        self.error = Some(error.to_string());
        self.status = "Error".to_string();
        self.countries.clear();
        self.selected_country.clear();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌍 COVID-19 Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("WHO daily data")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = self
                        .data_path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    ui.label(RichText::new(name).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🔄 Reload").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Selection Section =====
        ui.label(RichText::new("🔧 Selection").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 170.0;

        ui.add_enabled_ui(!self.countries.is_empty(), |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Select a Country:"));
                ComboBox::from_id_salt("country")
                    .width(combo_width)
                    .selected_text(&self.selected_country)
                    .show_ui(ui, |ui| {
                        for country in &self.countries {
                            if ui
                                .selectable_label(self.selected_country == *country, country)
                                .clicked()
                                && self.selected_country != *country
                            {
                                self.selected_country = country.clone();
                                action = ControlPanelAction::CountryChanged;
                            }
                        }
                    });
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Ranking Size:"));
                let response = ui.add(egui::DragValue::new(&mut self.top_n).range(1..=50));
                if response.changed() {
                    action = ControlPanelAction::TopNChanged;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if self.error.is_some() {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    CountryChanged,
    TopNChanged,
    Reload,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_preferred_country_is_selected() {
        let mut panel = ControlPanel::new(PathBuf::from("data.csv"), 10);
        panel.update_countries(countries(&["China", "India"]), "India");
        assert_eq!(panel.selected_country, "India");
    }

    #[test]
    fn test_falls_back_to_current_then_first() {
        let mut panel = ControlPanel::new(PathBuf::from("data.csv"), 10);
        panel.update_countries(countries(&["Chad", "Peru"]), "India");
        assert_eq!(panel.selected_country, "Chad");

        panel.selected_country = "Peru".to_string();
        panel.update_countries(countries(&["Chad", "Peru"]), "India");
        assert_eq!(panel.selected_country, "Peru");

        panel.update_countries(Vec::new(), "India");
        assert!(panel.selected_country.is_empty());
    }

    #[test]
    fn test_error_clears_selection() {
        let mut panel = ControlPanel::new(PathBuf::from("data.csv"), 10);
        panel.update_countries(countries(&["India"]), "India");
        panel.set_error("Missing required columns in CSV: [\"Country\"]");

        assert!(panel.countries.is_empty());
        assert!(panel.error.is_some());

        panel.set_status("Loaded 3 rows");
        assert!(panel.error.is_none());
    }
}
