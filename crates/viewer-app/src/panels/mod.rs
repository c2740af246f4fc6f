//! UI panels

mod control;
mod header;

pub use control::ControlPanel;
pub use header::HeaderPanel;

use crate::app_state::SharedAppState;

/// Common interface for UI panels
pub trait Panel {
    fn name(&self) -> &str;
    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState);
}
