//! Shared type definitions for the robot model

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Joint type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JointType {
    #[default]
    Fixed,
    Revolute,
    Continuous,
    Prismatic,
    Floating,
    Planar,
}

impl JointType {
    /// Check if this joint type carries a scalar position value
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            JointType::Revolute | JointType::Continuous | JointType::Prismatic
        )
    }

    /// Check if this joint type declares position limits in URDF
    pub fn has_limits(&self) -> bool {
        matches!(self, JointType::Revolute | JointType::Prismatic)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            JointType::Fixed => "Fixed",
            JointType::Revolute => "Revolute",
            JointType::Continuous => "Continuous",
            JointType::Prismatic => "Prismatic",
            JointType::Floating => "Floating",
            JointType::Planar => "Planar",
        }
    }
}

impl From<&urdf_rs::JointType> for JointType {
    fn from(urdf_type: &urdf_rs::JointType) -> Self {
        match urdf_type {
            urdf_rs::JointType::Fixed => JointType::Fixed,
            urdf_rs::JointType::Revolute => JointType::Revolute,
            urdf_rs::JointType::Continuous => JointType::Continuous,
            urdf_rs::JointType::Prismatic => JointType::Prismatic,
            urdf_rs::JointType::Floating => JointType::Floating,
            urdf_rs::JointType::Planar => JointType::Planar,
            urdf_rs::JointType::Spherical => JointType::Floating, // Approximate as floating
        }
    }
}

/// Declared joint position limits (rad or m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    pub lower: f32,
    pub upper: f32,
}

/// Fallback range applied when a model declares no usable limits.
pub const DEFAULT_JOINT_RANGE: JointLimits = JointLimits {
    lower: -3.0,
    upper: 3.0,
};

impl JointLimits {
    /// Create limits with the specified range
    pub fn new(lower: f32, upper: f32) -> Self {
        Self { lower, upper }
    }

    /// Clamp a value into this range
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.lower, self.upper)
    }

    /// A degenerate range (upper <= lower) carries no information
    pub fn is_usable(&self) -> bool {
        self.upper > self.lower
    }
}

impl Default for JointLimits {
    fn default() -> Self {
        DEFAULT_JOINT_RANGE
    }
}

/// Position and orientation as URDF expresses them: xyz translation plus
/// roll/pitch/yaw fixed-axis rotations.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pose {
    pub xyz: [f32; 3],
    pub rpy: [f32; 3],
}

impl Pose {
    /// Convert to a transform matrix
    pub fn to_mat4(&self) -> Mat4 {
        // URDF rpy is extrinsic x-y-z, equivalent to intrinsic z-y-x
        let rotation = Quat::from_euler(EulerRot::ZYX, self.rpy[2], self.rpy[1], self.rpy[0]);
        Mat4::from_rotation_translation(rotation, Vec3::from(self.xyz))
    }
}

impl From<&urdf_rs::Pose> for Pose {
    fn from(urdf_pose: &urdf_rs::Pose) -> Self {
        Self {
            xyz: [
                urdf_pose.xyz.0[0] as f32,
                urdf_pose.xyz.0[1] as f32,
                urdf_pose.xyz.0[2] as f32,
            ],
            rpy: [
                urdf_pose.rpy.0[0] as f32,
                urdf_pose.rpy.0[1] as f32,
                urdf_pose.rpy.0[2] as f32,
            ],
        }
    }
}
