//! GUI module - Dashboard user interface components

mod app;
mod control_panel;

pub use app::DashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
