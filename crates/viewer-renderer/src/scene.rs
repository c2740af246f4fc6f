//! Attached-model lifecycle
//!
//! At most one robot model is attached to the scene at a time. The scene
//! owns the model for its load session: it uploads one GPU mesh per visual,
//! keeps transforms in sync with the model's kinematics, and disposes every
//! GPU buffer when the model is replaced or the viewer shuts down.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::Mat4;
use uuid::Uuid;

use viewer_core::{GeometryKind, RobotModel};

use crate::mesh::RobotGpuMesh;

/// Transform placing the robot at the scene origin, rotated -90 degrees
/// about X to reconcile the loader's Z-up frame with the scene's Y-up frame.
pub fn robot_root_transform() -> Mat4 {
    Mat4::from_rotation_x(-FRAC_PI_2)
}

/// One attached robot and its GPU-side meshes.
pub struct SceneModel {
    model: RobotModel,
    gpu: HashMap<Uuid, RobotGpuMesh>,
}

impl SceneModel {
    /// Upload every visual mesh of the model.
    pub fn new(
        device: &wgpu::Device,
        mesh_bind_group_layout: &wgpu::BindGroupLayout,
        model: RobotModel,
    ) -> Self {
        let root = robot_root_transform();
        let mut gpu = HashMap::new();

        for (link, mesh) in model.visuals() {
            let transform = root * link.world_transform * mesh.origin.to_mat4();
            gpu.insert(
                mesh.id,
                RobotGpuMesh::new(device, mesh_bind_group_layout, &mesh.geometry, mesh.color, transform),
            );
        }

        tracing::debug!(meshes = gpu.len(), robot = %model.name, "robot attached to scene");
        Self { model, gpu }
    }

    pub fn model(&self) -> &RobotModel {
        &self.model
    }

    pub fn gpu_meshes(&self) -> impl Iterator<Item = &RobotGpuMesh> {
        self.gpu.values()
    }

    /// Set a joint value on the live model and re-upload the affected
    /// transforms. Returns false for unknown joint names.
    pub fn set_joint_value(&mut self, queue: &wgpu::Queue, name: &str, value: f32) -> bool {
        if !self.model.set_joint_value(name, value) {
            return false;
        }
        self.upload_transforms(queue);
        true
    }

    /// Swap one mesh's geometry for a debug primitive, replacing its GPU
    /// buffers. The old buffers are disposed. Returns false for unknown ids.
    pub fn substitute_geometry(
        &mut self,
        device: &wgpu::Device,
        mesh_bind_group_layout: &wgpu::BindGroupLayout,
        mesh_id: Uuid,
        kind: GeometryKind,
    ) -> bool {
        if !self.model.substitute_geometry(mesh_id, kind) {
            return false;
        }

        if let Some(mut old) = self.gpu.remove(&mesh_id) {
            old.dispose();
        }

        let root = robot_root_transform();
        if let Some((link, mesh)) = self.model.visuals().find(|(_, m)| m.id == mesh_id) {
            let transform = root * link.world_transform * mesh.origin.to_mat4();
            self.gpu.insert(
                mesh_id,
                RobotGpuMesh::new(device, mesh_bind_group_layout, &mesh.geometry, mesh.color, transform),
            );
        }
        true
    }

    fn upload_transforms(&self, queue: &wgpu::Queue) {
        let root = robot_root_transform();
        for (link, mesh) in self.model.visuals() {
            if let Some(gpu) = self.gpu.get(&mesh.id) {
                gpu.update_transform(queue, root * link.world_transform * mesh.origin.to_mat4());
            }
        }
    }

    /// Dispose every GPU mesh. Idempotent; the model data stays readable.
    pub fn dispose(&mut self) {
        for mesh in self.gpu.values_mut() {
            mesh.dispose();
        }
        tracing::debug!(robot = %self.model.name, "robot GPU resources disposed");
    }
}
