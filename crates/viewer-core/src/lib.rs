//! URDF Viewer Core Data Structures
//!
//! This crate contains the model domain of the viewer:
//! - RobotModel: loaded kinematic tree with links, joints, and visual meshes
//! - Color classification of semantic material tags
//! - URDF loading (parsing delegated to urdf-rs)
//! - Session tokens correlating load requests with async completions

pub mod color;
pub mod load;
pub mod primitive;
pub mod robot;
pub mod session;
pub mod stl;
pub mod types;

pub use color::*;
pub use load::*;
pub use primitive::*;
pub use robot::*;
pub use session::*;
pub use stl::*;
pub use types::*;
