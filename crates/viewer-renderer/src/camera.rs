//! Perspective camera

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::config::CameraConfig;

/// Camera uniform data uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 4],
        }
    }
}

/// Perspective camera looking from `eye` toward `target`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    fov_y_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// Initial pose matches the viewer's startup framing.
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 8.0, 8.0),
            target: Vec3::ZERO,
            fov_y_degrees: 75.0,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn update_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn apply_config(&mut self, config: &CameraConfig) {
        self.fov_y_degrees = config.fov_degrees;
        self.near = config.near_plane;
        self.far = config.far_plane;
    }

    /// View matrix. Falls back to a Z up vector when the view direction is
    /// collinear with Y (e.g. the Top preset), which would otherwise be
    /// degenerate.
    pub fn view(&self) -> Mat4 {
        let forward = (self.target - self.eye).normalize_or_zero();
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.eye, self.target, up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            eye: [self.eye.x, self.eye.y, self.eye.z, 1.0],
        }
    }

    /// Cast a ray through a screen point given the render surface size.
    ///
    /// Returns (origin, normalized direction).
    pub fn screen_to_ray(&self, screen_x: f32, screen_y: f32, width: f32, height: f32) -> (Vec3, Vec3) {
        let ndc_x = (screen_x / width) * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen_y / height) * 2.0;

        let inv_view_proj = self.view_proj().inverse();
        let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let far = far.truncate() / far.w;

        (self.eye, (far - self.eye).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera {
            eye: Vec3::new(3.0, 0.0, 0.0),
            target: Vec3::ZERO,
            ..Camera::new(1.0)
        };
        let (origin, dir) = camera.screen_to_ray(400.0, 300.0, 800.0, 600.0);
        assert_eq!(origin, camera.eye);
        assert!((dir - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_view_handles_eye_on_y_axis() {
        let camera = Camera {
            eye: Vec3::new(0.0, 3.0, 0.0),
            target: Vec3::ZERO,
            ..Camera::new(1.0)
        };
        let view = camera.view();
        assert!(view.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_uniform_carries_eye() {
        let camera = Camera::new(1.5);
        let uniform = camera.uniform();
        assert_eq!(uniform.eye, [0.0, 8.0, 8.0, 1.0]);
    }
}
