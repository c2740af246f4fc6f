//! Control panel
//!
//! Pure form: reads shared state and forwards user intent (load requests,
//! camera directions, joint values, geometry substitutions). All reactions
//! happen in the viewer controller.

use crate::app_state::SharedAppState;
use crate::panels::Panel;

use viewer_core::GeometryKind;
use viewer_renderer::ViewDirection;

const GEOMETRY_NAMES: &[&str] = &["Box", "Cylinder", "Sphere"];

/// Control panel for file selection, camera presets, and model edits
pub struct ControlPanel;

impl ControlPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for ControlPanel {
    fn name(&self) -> &str {
        "Control"
    }

    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState) {
        let mut state = app_state.lock();

        ui.heading("Robot");
        ui.separator();

        #[cfg(not(target_arch = "wasm32"))]
        if ui.button("Open URDF…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("URDF", &["urdf", "xml"])
                .pick_file()
            {
                match std::fs::read(&path) {
                    Ok(bytes) => {
                        state.source = Some(crate::app_state::UrdfSource {
                            name: path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| path.to_string_lossy().to_string()),
                            bytes: std::sync::Arc::new(bytes),
                            base_dir: path.parent().map(|p| p.to_path_buf()),
                        });
                        state.load_error = None;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to read file");
                        state.load_error = Some(format!("Failed to read file: {e}"));
                    }
                }
            }
        }

        let has_source = state.source.is_some();
        if ui
            .add_enabled(has_source, egui::Button::new("Load"))
            .clicked()
        {
            state.request_load();
        }

        if let Some(error) = state.load_error.clone() {
            ui.colored_label(egui::Color32::LIGHT_RED, error);
        }

        ui.separator();
        ui.heading("Camera");

        ui.horizontal_wrapped(|ui| {
            for direction in ViewDirection::all() {
                if ui.button(direction.display_name()).clicked() {
                    state.camera_direction = direction.display_name().to_string();
                }
            }
        });

        ui.separator();
        ui.heading("Selection");

        match state.selection.clone() {
            Some(selection) => {
                ui.label(format!("Link: {}", selection.link_name));

                ui.horizontal_wrapped(|ui| {
                    for name in GEOMETRY_NAMES {
                        if ui.button(*name).clicked() {
                            // Unknown names no-op downstream; these are known
                            debug_assert!(GeometryKind::from_name(name).is_some());
                            state.geometry_override = name.to_string();
                        }
                    }
                });
            }
            None => {
                ui.weak("Click a link in the viewport");
            }
        }

        ui.separator();
        ui.heading("Joints");

        if state.joint_names.is_empty() {
            ui.weak("No robot loaded");
            return;
        }

        let joint_names = state.joint_names.clone();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for name in &joint_names {
                let Some(mut value) = state.joint_values.get(name).copied() else {
                    // Fixed joints carry no scalar; shown for completeness
                    ui.weak(name);
                    continue;
                };
                let (lower, upper) = state
                    .joint_ranges
                    .get(name)
                    .copied()
                    .unwrap_or((-3.0, 3.0));

                if ui
                    .add(egui::Slider::new(&mut value, lower..=upper).text(name))
                    .changed()
                {
                    state.joint_values.insert(name.clone(), value);
                }
            }
        });
    }
}
