//! Header strip

use crate::app_state::SharedAppState;
use crate::panels::Panel;

/// Branding strip across the top of the window
pub struct HeaderPanel;

impl HeaderPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeaderPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for HeaderPanel {
    fn name(&self) -> &str {
        "Header"
    }

    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState) {
        let state = app_state.lock();

        ui.horizontal(|ui| {
            ui.heading("URDF Viewer");
            ui.separator();
            match &state.source {
                Some(source) => ui.weak(&source.name),
                None => ui.weak("No file selected"),
            };
        });
    }
}
