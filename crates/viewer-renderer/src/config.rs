//! Renderer configuration

use serde::{Deserialize, Serialize};

/// Camera projection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Background clear color (RGBA).
    pub clear_color: [f32; 4],
    /// Half-extent of the ground grid.
    pub grid_extent: f32,
    /// Spacing between grid lines.
    pub grid_spacing: f32,
    /// Length of the origin axis helper.
    pub axis_length: f32,
    pub camera: CameraConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.10, 0.10, 0.12, 1.0],
            grid_extent: 5.0,
            grid_spacing: 1.0,
            axis_length: 4.0,
            camera: CameraConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_viewer_constants() {
        let config = RendererConfig::default();
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.near_plane, 0.1);
        assert_eq!(config.camera.far_plane, 1000.0);
        assert_eq!(config.axis_length, 4.0);
    }
}
