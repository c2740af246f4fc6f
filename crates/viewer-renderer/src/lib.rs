//! URDF Viewer Renderer
//!
//! WGPU-based 3D rendering for the URDF viewer: camera and orbit navigation,
//! grid/axis helpers, the robot mesh pipeline, scene lifecycle (attach,
//! detach, GPU disposal), and ray picking.

pub mod axis;
pub mod camera;
pub mod config;
pub mod grid;
pub mod mesh;
pub mod orbit;
pub mod picking;
pub mod renderer;
pub mod scene;

pub use camera::*;
pub use config::*;
pub use orbit::*;
pub use picking::*;
pub use renderer::*;
