//! Viewer application and controller
//!
//! The controller reacts to three externally driven triggers as explicit
//! diffs: a load request keyed by session token, a camera-direction change,
//! and joint/geometry edits. Nothing re-runs wholesale on a frame; each
//! trigger re-applies only when its input actually changed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use viewer_core::{GeometryKind, LoadError, SessionToken};
use viewer_renderer::resolve_selection;

use crate::app_state::{AppState, SharedAppState, ViewerEvent};
use crate::loader::LoadWorker;
use crate::panels::{ControlPanel, HeaderPanel, Panel};
use crate::viewport_state::{SharedViewportState, ViewportState};

type SharedEguiRenderer = Arc<egui::mutex::RwLock<egui_wgpu::Renderer>>;

/// The viewer application.
pub struct ViewerApp {
    state: SharedAppState,
    viewport: Option<SharedViewportState>,
    egui_renderer: Option<SharedEguiRenderer>,
    loader: LoadWorker,

    header_panel: HeaderPanel,
    control_panel: ControlPanel,

    // Last-applied trigger inputs; the diffs against these decide reactions
    applied_token: Option<SessionToken>,
    applied_direction: String,
    applied_joint_values: HashMap<String, f32>,
    applied_geometry: Option<(Uuid, GeometryKind)>,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let (viewport, egui_renderer) = match &cc.wgpu_render_state {
            Some(render_state) => (
                Some(Arc::new(Mutex::new(ViewportState::new(
                    render_state.device.clone(),
                    render_state.queue.clone(),
                    render_state.target_format,
                )))),
                Some(render_state.renderer.clone()),
            ),
            None => {
                tracing::error!("no wgpu render state; the viewport stays empty");
                (None, None)
            }
        };

        Self {
            state: Arc::new(Mutex::new(AppState::new())),
            viewport,
            egui_renderer,
            loader: LoadWorker::new(),
            header_panel: HeaderPanel::new(),
            control_panel: ControlPanel::new(),
            applied_token: None,
            applied_direction: String::new(),
            applied_joint_values: HashMap::new(),
            applied_geometry: None,
        }
    }

    /// Drain load completions, applying only the one matching the current
    /// session token. Stale completions are dropped silently.
    fn process_completions(&mut self) {
        while let Some(complete) = self.loader.poll() {
            let mut state = self.state.lock();

            if !state.session.is_current(complete.token) {
                tracing::debug!(token = %complete.token, "dropping stale load completion");
                continue;
            }
            state.load_requested = false;

            match complete.result {
                Ok(loaded) => {
                    state.link_names = loaded.link_names.clone();
                    state.joint_names = loaded.joint_names.clone();
                    state.joint_values = loaded.initial_joint_values.clone();
                    state.joint_ranges = loaded
                        .joint_names
                        .iter()
                        .map(|name| {
                            let range = loaded.model.joint_range(name);
                            (name.clone(), (range.lower, range.upper))
                        })
                        .collect();
                    state.selection = None;
                    state.load_error = None;

                    state.emit(ViewerEvent::JointNamesChanged(loaded.joint_names));
                    state.emit(ViewerEvent::LinkNamesChanged(loaded.link_names));
                    state.emit(ViewerEvent::LinkSelected(None));
                    drop(state);

                    self.applied_joint_values.clear();
                    self.applied_geometry = None;

                    if let Some(viewport) = &self.viewport {
                        viewport.lock().attach_robot(loaded.model);
                    }
                }
                Err(error) => {
                    // The previous model, if any, stays attached and displayed
                    tracing::warn!(error = %error, "robot load failed");
                    state.load_error = Some(error.to_string());
                    state.emit(ViewerEvent::LoadFailed(error));
                }
            }
        }
    }

    /// React to trigger diffs: load token, camera direction, edits.
    fn process_triggers(&mut self) {
        let Some(viewport) = self.viewport.clone() else {
            return;
        };
        let mut state = self.state.lock();

        // (a) Load request. The token, not the flag, decides: the flag may
        // repeat while only a fresh token forces a reload.
        if state.load_requested
            && let Some(token) = state.session.current()
            && Some(token) != self.applied_token
        {
            self.applied_token = Some(token);
            match state.source.clone() {
                Some(source) => {
                    tracing::info!(token = %token, source = %source.name, "load requested");
                    self.loader.spawn(source, token);
                }
                None => {
                    state.load_requested = false;
                    state.load_error = Some(LoadError::NoSource.to_string());
                    state.emit(ViewerEvent::LoadFailed(LoadError::NoSource));
                }
            }
        }

        // (b) Camera direction, only on change; unknown names no-op.
        if state.camera_direction != self.applied_direction {
            self.applied_direction = state.camera_direction.clone();
            if !self.applied_direction.is_empty()
                && !viewport.lock().renderer.apply_direction(&self.applied_direction)
            {
                tracing::debug!(direction = %self.applied_direction, "unknown camera direction ignored");
            }
        }

        // (c) Joint value edits, applied to the live model.
        let changed: Vec<(String, f32)> = state
            .joint_values
            .iter()
            .filter(|(name, value)| self.applied_joint_values.get(*name) != Some(value))
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        for (name, value) in changed {
            if viewport.lock().set_joint_value(&name, value) {
                self.applied_joint_values.insert(name, value);
            }
        }

        // (d) Geometry override for the picked mesh; unknown names no-op.
        if let Some(selection) = state.selection.clone()
            && let Some(kind) = GeometryKind::from_name(&state.geometry_override)
        {
            let pair = (selection.mesh_id, kind);
            if self.applied_geometry != Some(pair)
                && viewport.lock().substitute_geometry(selection.mesh_id, kind)
            {
                self.applied_geometry = Some(pair);
            }
        }
    }

    /// The viewport image plus its pointer interactions.
    fn viewport_ui(&mut self, ui: &mut egui::Ui, frame: &eframe::Frame) {
        let Some(viewport) = self.viewport.clone() else {
            ui.weak("Viewport unavailable");
            return;
        };
        let Some(render_state) = frame.wgpu_render_state() else {
            return;
        };

        let size = ui.available_size();
        let texture_id = {
            let mut egui_renderer = render_state.renderer.write();
            viewport.lock().ensure_texture(
                size.x.round() as u32,
                size.y.round() as u32,
                &mut egui_renderer,
            )
        };
        // No usable size yet; retried next frame
        let Some(texture_id) = texture_id else {
            return;
        };

        let response = ui.add(
            egui::Image::new((texture_id, size)).sense(egui::Sense::click_and_drag()),
        );

        {
            let mut viewport = viewport.lock();

            if response.dragged() {
                let delta = response.drag_delta();
                viewport.renderer.orbit_mut().handle_drag(delta.x, delta.y);
            }

            if response.hovered() {
                let scroll = ui.input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    viewport.renderer.orbit_mut().handle_zoom(scroll / 120.0);
                }
            }
        }

        if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            let local = pos - response.rect.min;
            let hit = viewport.lock().pick(local.x, local.y);

            let mut state = self.state.lock();
            let previous = state.selection.clone();
            let resolved = resolve_selection(previous.clone(), hit.as_ref(), state.miss_policy);
            if resolved != previous {
                state.selection = resolved.clone();
                state.emit(ViewerEvent::LinkSelected(resolved.map(|s| s.link_name)));
            }
        }

        viewport.lock().render();
    }

    /// Hand emitted events to the hosting side. This build logs them; an
    /// embedding host would forward them to its own UI.
    fn drain_events(&mut self) {
        let mut state = self.state.lock();
        while let Some(event) = state.next_event() {
            match event {
                ViewerEvent::JointNamesChanged(names) => {
                    tracing::info!(count = names.len(), "joint names changed")
                }
                ViewerEvent::LinkNamesChanged(names) => {
                    tracing::info!(count = names.len(), "link names changed")
                }
                ViewerEvent::LinkSelected(name) => {
                    tracing::info!(link = name.as_deref().unwrap_or("<none>"), "link selected")
                }
                ViewerEvent::LoadFailed(error) => {
                    tracing::warn!(error = %error, "load failed")
                }
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.process_completions();
        self.process_triggers();

        let state = self.state.clone();
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.header_panel.ui(ui, &state);
        });

        egui::SidePanel::left("control")
            .default_width(280.0)
            .show(ctx, |ui| {
                self.control_panel.ui(ui, &state);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewport_ui(ui, frame);
        });

        self.drain_events();

        // The continuous render loop: redraw every frame so orbit damping
        // and background load completions keep flowing
        ctx.request_repaint();
    }

    fn on_exit(&mut self) {
        tracing::info!("shutting down viewer");
        if let Some(viewport) = &self.viewport {
            let mut viewport = viewport.lock();
            match &self.egui_renderer {
                Some(egui_renderer) => viewport.teardown(&mut egui_renderer.write()),
                None => viewport.renderer.teardown(),
            }
        }
    }
}
