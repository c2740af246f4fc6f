//! Main renderer
//!
//! Owns the camera, the helper renderers, the mesh pipeline, and the
//! currently attached robot. All render state lives in this object; callers
//! thread it through every operation instead of sharing ambient globals.

use uuid::Uuid;
use wgpu::util::DeviceExt;

use viewer_core::{GeometryKind, RobotModel};

use crate::axis::AxisRenderer;
use crate::camera::{Camera, CameraUniform};
use crate::config::RendererConfig;
use crate::grid::GridRenderer;
use crate::mesh::MeshRenderer;
use crate::orbit::{OrbitController, ViewDirection};
use crate::picking::{pick_link, PickHit};
use crate::scene::{robot_root_transform, SceneModel};

/// Main renderer for the viewer scene.
pub struct Renderer {
    config: RendererConfig,
    camera: Camera,
    orbit: OrbitController,
    camera_buffer: wgpu::Buffer,
    #[allow(dead_code)] // Held so sub-renderer bind groups stay valid
    camera_bind_group_layout: wgpu::BindGroupLayout,
    depth_view: wgpu::TextureView,
    grid_renderer: GridRenderer,
    axis_renderer: AxisRenderer,
    mesh_renderer: MeshRenderer,
    scene: Option<SceneModel>,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: RendererConfig,
    ) -> Self {
        let depth_format = wgpu::TextureFormat::Depth32Float;

        let mut camera = Camera::new(width as f32 / height as f32);
        camera.apply_config(&config.camera);
        let orbit = OrbitController::new(&camera);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera.uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let grid_renderer = GridRenderer::new(
            device,
            format,
            depth_format,
            &camera_bind_group_layout,
            &camera_buffer,
            config.grid_extent,
            config.grid_spacing,
        );
        let axis_renderer = AxisRenderer::new(
            device,
            format,
            depth_format,
            &camera_bind_group_layout,
            &camera_buffer,
            config.axis_length,
        );
        let mesh_renderer = MeshRenderer::new(
            device,
            format,
            depth_format,
            &camera_bind_group_layout,
            &camera_buffer,
        );

        let depth_view = Self::create_depth_view(device, depth_format, width, height);

        Self {
            config,
            camera,
            orbit,
            camera_buffer,
            camera_bind_group_layout,
            depth_view,
            grid_renderer,
            axis_renderer,
            mesh_renderer,
            scene: None,
            format,
            width,
            height,
        }
    }

    fn create_depth_view(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitController {
        &mut self.orbit
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.camera.update_aspect(width as f32 / height as f32);
        self.depth_view =
            Self::create_depth_view(device, wgpu::TextureFormat::Depth32Float, width, height);
    }

    /// Per-frame camera update: integrate orbit damping and upload the
    /// camera uniform.
    pub fn update_camera(&mut self, queue: &wgpu::Queue) {
        self.orbit.update();
        self.orbit.apply_to(&mut self.camera);
        let uniform: CameraUniform = self.camera.uniform();
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Apply a named view preset. Unknown names are a no-op.
    pub fn apply_direction(&mut self, name: &str) -> bool {
        match ViewDirection::from_name(name) {
            Some(direction) => {
                self.orbit.apply_direction(direction);
                true
            }
            None => false,
        }
    }

    /// Attach a freshly loaded robot, disposing any previous one first so
    /// exactly one model is attached at a time.
    pub fn attach_robot(&mut self, device: &wgpu::Device, model: RobotModel) {
        self.detach_robot();
        tracing::info!(robot = %model.name, "attaching robot");
        self.scene = Some(SceneModel::new(
            device,
            self.mesh_renderer.mesh_bind_group_layout(),
            model,
        ));
    }

    /// Detach and dispose the attached robot, if any. Idempotent.
    pub fn detach_robot(&mut self) {
        if let Some(mut scene) = self.scene.take() {
            scene.dispose();
        }
    }

    pub fn set_joint_value(&mut self, queue: &wgpu::Queue, name: &str, value: f32) -> bool {
        self.scene
            .as_mut()
            .is_some_and(|scene| scene.set_joint_value(queue, name, value))
    }

    pub fn substitute_geometry(
        &mut self,
        device: &wgpu::Device,
        mesh_id: Uuid,
        kind: GeometryKind,
    ) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        scene.substitute_geometry(device, self.mesh_renderer.mesh_bind_group_layout(), mesh_id, kind)
    }

    /// Pick the robot link under a surface-local point. Helpers are not in
    /// the pick set; empty space yields None.
    pub fn pick(&self, screen: (f32, f32)) -> Option<PickHit> {
        let scene = self.scene.as_ref()?;
        pick_link(
            &self.camera,
            screen,
            (self.width as f32, self.height as f32),
            scene.model(),
            robot_root_transform(),
        )
    }

    /// Record one frame into the encoder.
    pub fn render(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        _queue: &wgpu::Queue,
    ) {
        let [r, g, b, a] = self.config.clear_color;
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Viewer Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.grid_renderer.render(&mut render_pass);
        self.axis_renderer.render(&mut render_pass);

        if let Some(scene) = &self.scene {
            self.mesh_renderer.render(&mut render_pass, scene.gpu_meshes());
        }
    }

    /// Release everything owned for the attached model. Idempotent; used by
    /// the hosting viewport on unmount.
    pub fn teardown(&mut self) {
        self.detach_robot();
    }
}
