//! Viewport rendering state
//!
//! Owns the offscreen render texture shown inside the egui viewport and the
//! renderer drawing into it. Exactly one mounted viewport owns the render
//! surface; teardown is idempotent and must run before the host goes away.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use viewer_core::{GeometryKind, RobotModel};
use viewer_renderer::{PickHit, Renderer, RendererConfig};

/// Render texture for the viewport
struct RenderTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    egui_texture_id: egui::TextureId,
    width: u32,
    height: u32,
}

/// Viewport rendering state
pub struct ViewportState {
    pub renderer: Renderer,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    render_texture: Option<RenderTexture>,
}

impl ViewportState {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
    ) -> Self {
        let renderer = Renderer::new(&device, format, 800, 600, RendererConfig::default());
        Self {
            renderer,
            device,
            queue,
            render_texture: None,
        }
    }

    /// Ensure the render texture matches the requested size.
    ///
    /// Returns None while the viewport has no usable size yet; the caller
    /// simply retries on a later frame.
    pub fn ensure_texture(
        &mut self,
        width: u32,
        height: u32,
        egui_renderer: &mut egui_wgpu::Renderer,
    ) -> Option<egui::TextureId> {
        if width == 0 || height == 0 {
            return None;
        }

        let needs_recreate = self
            .render_texture
            .as_ref()
            .is_none_or(|t| t.width != width || t.height != height);

        if needs_recreate {
            // Free old texture if exists
            if let Some(old) = self.render_texture.take() {
                egui_renderer.free_texture(&old.egui_texture_id);
            }

            let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Viewport Render Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: self.renderer.format(),
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });

            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

            let egui_texture_id = egui_renderer.register_native_texture(
                &self.device,
                &view,
                wgpu::FilterMode::Linear,
            );

            self.renderer.resize(&self.device, width, height);

            self.render_texture = Some(RenderTexture {
                texture,
                view,
                egui_texture_id,
                width,
                height,
            });
        }

        self.render_texture.as_ref().map(|t| t.egui_texture_id)
    }

    /// Render the 3D scene to the texture. Called once per frame; orbit
    /// damping is integrated here.
    pub fn render(&mut self) {
        let Some(ref rt) = self.render_texture else {
            return;
        };

        self.renderer.update_camera(&self.queue);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewport Render Encoder"),
            });

        self.renderer.render(&mut encoder, &rt.view, &self.queue);

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Attach a loaded robot, disposing the previous one.
    pub fn attach_robot(&mut self, model: RobotModel) {
        self.renderer.attach_robot(&self.device, model);
    }

    pub fn set_joint_value(&mut self, name: &str, value: f32) -> bool {
        self.renderer.set_joint_value(&self.queue, name, value)
    }

    pub fn substitute_geometry(&mut self, mesh_id: Uuid, kind: GeometryKind) -> bool {
        self.renderer.substitute_geometry(&self.device, mesh_id, kind)
    }

    /// Pick the link under a texture-local point.
    pub fn pick(&self, local_x: f32, local_y: f32) -> Option<PickHit> {
        self.renderer.pick((local_x, local_y))
    }

    /// Release the render surface and every robot GPU resource. Idempotent.
    pub fn teardown(&mut self, egui_renderer: &mut egui_wgpu::Renderer) {
        if let Some(old) = self.render_texture.take() {
            egui_renderer.free_texture(&old.egui_texture_id);
        }
        self.renderer.teardown();
    }
}

pub type SharedViewportState = Arc<Mutex<ViewportState>>;
