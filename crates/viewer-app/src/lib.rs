//! URDF Viewer Frontend
//!
//! egui-based application hosting the 3D viewer: control panel, header
//! strip, and the viewport that owns the render loop.

mod app;
mod app_state;
mod loader;
mod panels;
mod viewport_state;

pub use app::ViewerApp;
pub use app_state::{AppState, SharedAppState, UrdfSource, ViewerEvent};

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebHandle;
