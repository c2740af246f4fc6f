//! URDF loading
//!
//! Wraps the external urdf-rs parser: one traversal over the parsed robot
//! builds the viewer's model, resolving each visual's semantic material tag
//! to a display color and collecting ordered link/joint name lists.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::color::classify;
use crate::primitive::{generate_box_mesh, generate_cylinder_mesh, generate_sphere_mesh};
use crate::robot::{Joint, Link, MeshGeometry, RobotModel, VisualMesh};
use crate::stl::{apply_scale, load_stl};
use crate::types::{JointLimits, JointType, Pose};

/// Errors that can occur while loading a robot description
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("No robot description source is available")]
    NoSource,

    #[error("Failed to parse URDF: {0}")]
    Parse(String),

    #[error("Mesh file not found: {path}")]
    MeshNotFound { path: String },

    #[error("Failed to load mesh '{path}': {reason}")]
    MeshLoad { path: String, reason: String },

    #[error("Unsupported mesh format: {0} (only STL is supported)")]
    UnsupportedMeshFormat(String),

    #[error("package:// URIs are not supported: {0}")]
    PackageUriNotSupported(String),

    #[error("Empty robot description: no links defined")]
    EmptyModel,
}

/// Load options
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Base directory for resolving relative mesh paths. None when the
    /// source is an in-memory blob with no filesystem context; mesh
    /// references then fail to resolve.
    pub base_dir: Option<PathBuf>,
}

/// A fully loaded robot plus the lists emitted upward on completion.
#[derive(Debug, Clone)]
pub struct LoadedRobot {
    pub model: RobotModel,
    pub link_names: Vec<String>,
    pub joint_names: Vec<String>,
    pub initial_joint_values: HashMap<String, f32>,
}

/// Parse a URDF document and build the viewer model.
pub fn load_robot_from_str(xml: &str, options: &LoadOptions) -> Result<LoadedRobot, LoadError> {
    let robot = urdf_rs::read_from_string(xml).map_err(|e| LoadError::Parse(e.to_string()))?;

    if robot.links.is_empty() {
        return Err(LoadError::EmptyModel);
    }

    let mut model = RobotModel::new(robot.name.clone());
    let mut link_ids: HashMap<String, uuid::Uuid> = HashMap::new();

    // Links in document order; the order is what gets emitted upward
    for urdf_link in &robot.links {
        let mut link = Link::new(urdf_link.name.clone());

        for visual in &urdf_link.visual {
            let tag = visual
                .material
                .as_ref()
                .filter(|m| !m.name.is_empty())
                .map(|m| m.name.clone());
            let color = classify(tag.as_deref());

            let geometry = build_geometry(&visual.geometry, options.base_dir.as_deref())?;
            link.visuals
                .push(VisualMesh::new(Pose::from(&visual.origin), geometry, color, tag));
        }

        tracing::debug!(link = %urdf_link.name, visuals = link.visuals.len(), "loaded link");
        link_ids.insert(urdf_link.name.clone(), link.id);
        model.add_link(link);
    }

    for urdf_joint in &robot.joints {
        let parent = link_ids
            .get(&urdf_joint.parent.link)
            .copied()
            .ok_or_else(|| LoadError::Parse(format!("unknown parent link {}", urdf_joint.parent.link)))?;
        let child = link_ids
            .get(&urdf_joint.child.link)
            .copied()
            .ok_or_else(|| LoadError::Parse(format!("unknown child link {}", urdf_joint.child.link)))?;

        let joint_type = JointType::from(&urdf_joint.joint_type);
        let limits = joint_type.has_limits().then(|| {
            JointLimits::new(urdf_joint.limit.lower as f32, urdf_joint.limit.upper as f32)
        });

        model.connect(Joint {
            id: uuid::Uuid::new_v4(),
            name: urdf_joint.name.clone(),
            joint_type,
            parent_link: parent,
            child_link: child,
            origin: Pose::from(&urdf_joint.origin),
            axis: Vec3::new(
                urdf_joint.axis.xyz.0[0] as f32,
                urdf_joint.axis.xyz.0[1] as f32,
                urdf_joint.axis.xyz.0[2] as f32,
            ),
            limits,
            value: 0.0,
        });
    }

    // Root link: the one no joint names as a child
    let child_ids: Vec<uuid::Uuid> = robot
        .joints
        .iter()
        .filter_map(|j| link_ids.get(&j.child.link).copied())
        .collect();
    let root_link = model
        .links()
        .map(|l| l.id)
        .find(|id| !child_ids.contains(id));
    model.root_link = root_link;

    model.update_world_transforms();

    let link_names = model.link_names();
    let joint_names = model.joint_names();
    let initial_joint_values = model.joint_values();

    tracing::info!(
        robot = %model.name,
        links = link_names.len(),
        joints = joint_names.len(),
        "robot description loaded"
    );

    Ok(LoadedRobot {
        model,
        link_names,
        joint_names,
        initial_joint_values,
    })
}

/// Build mesh geometry for one URDF visual element.
fn build_geometry(
    geometry: &urdf_rs::Geometry,
    base_dir: Option<&Path>,
) -> Result<MeshGeometry, LoadError> {
    let (vertices, normals, indices) = match geometry {
        urdf_rs::Geometry::Mesh { filename, scale } => {
            let path = resolve_mesh_path(filename, base_dir)?;
            let mut geometry = load_stl(&path).map_err(|e| LoadError::MeshLoad {
                path: filename.clone(),
                reason: e.to_string(),
            })?;
            if let Some(s) = scale {
                apply_scale(&mut geometry, [s.0[0] as f32, s.0[1] as f32, s.0[2] as f32]);
            }
            return Ok(geometry);
        }

        urdf_rs::Geometry::Box { size } => {
            generate_box_mesh([size.0[0] as f32, size.0[1] as f32, size.0[2] as f32])
        }

        urdf_rs::Geometry::Cylinder { radius, length } => {
            generate_cylinder_mesh(*radius as f32, *length as f32)
        }

        urdf_rs::Geometry::Sphere { radius } => generate_sphere_mesh(*radius as f32),

        // Approximate capsule as cylinder
        urdf_rs::Geometry::Capsule { radius, length } => {
            generate_cylinder_mesh(*radius as f32, *length as f32)
        }
    };

    Ok(MeshGeometry {
        vertices,
        normals,
        indices,
    })
}

/// Resolve a mesh filename reference against the load context.
fn resolve_mesh_path(filename: &str, base_dir: Option<&Path>) -> Result<PathBuf, LoadError> {
    if filename.starts_with("package://") {
        return Err(LoadError::PackageUriNotSupported(filename.to_string()));
    }

    let path_str = filename.strip_prefix("file://").unwrap_or(filename);

    if !path_str.to_lowercase().ends_with(".stl") {
        return Err(LoadError::UnsupportedMeshFormat(filename.to_string()));
    }

    let path = if Path::new(path_str).is_absolute() {
        PathBuf::from(path_str)
    } else {
        match base_dir {
            Some(dir) => dir.join(path_str),
            None => {
                return Err(LoadError::MeshNotFound {
                    path: path_str.to_string(),
                })
            }
        }
    };

    if !path.exists() {
        return Err(LoadError::MeshNotFound {
            path: path.to_string_lossy().to_string(),
        });
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{COLOR_BLACK, COLOR_BLUE};
    use crate::robot::GeometryKind;

    const CART_URDF: &str = r#"
        <robot name="cart">
          <material name="blue"><color rgba="0 0 1 1"/></material>
          <material name="Black"><color rgba="0 0 0 1"/></material>
          <link name="base_link">
            <visual>
              <geometry><box size="1 0.6 0.3"/></geometry>
              <material name="blue"/>
            </visual>
          </link>
          <link name="wheel_left">
            <visual>
              <geometry><cylinder radius="0.2" length="0.1"/></geometry>
              <material name="Black"/>
            </visual>
          </link>
          <link name="antenna">
            <visual>
              <geometry><sphere radius="0.05"/></geometry>
            </visual>
          </link>
          <joint name="wheel_left_joint" type="continuous">
            <parent link="base_link"/>
            <child link="wheel_left"/>
            <origin xyz="0 0.4 0"/>
            <axis xyz="0 1 0"/>
          </joint>
          <joint name="antenna_joint" type="revolute">
            <parent link="base_link"/>
            <child link="antenna"/>
            <origin xyz="0 0 0.3"/>
            <axis xyz="0 0 1"/>
            <limit lower="-1.5" upper="1.5" effort="10" velocity="1"/>
          </joint>
        </robot>
    "#;

    #[test]
    fn test_load_collects_ordered_names() {
        let loaded = load_robot_from_str(CART_URDF, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.link_names, vec!["base_link", "wheel_left", "antenna"]);
        assert_eq!(loaded.joint_names, vec!["wheel_left_joint", "antenna_joint"]);
    }

    #[test]
    fn test_name_order_stable_across_loads() {
        let a = load_robot_from_str(CART_URDF, &LoadOptions::default()).unwrap();
        let b = load_robot_from_str(CART_URDF, &LoadOptions::default()).unwrap();
        assert_eq!(a.joint_names, b.joint_names);
        assert_eq!(a.link_names, b.link_names);
    }

    #[test]
    fn test_materials_classified_case_insensitively() {
        let loaded = load_robot_from_str(CART_URDF, &LoadOptions::default()).unwrap();
        let model = &loaded.model;

        let base = model.link_by_name("base_link").unwrap();
        assert_eq!(base.visuals[0].color, COLOR_BLUE);

        // "Black" resolves despite the capital letter
        let wheel = model.link_by_name("wheel_left").unwrap();
        assert_eq!(wheel.visuals[0].color, COLOR_BLACK);

        // Absent material falls back to the default
        let antenna = model.link_by_name("antenna").unwrap();
        assert_eq!(antenna.visuals[0].color, COLOR_BLACK);
        assert!(antenna.visuals[0].tag.is_none());
    }

    #[test]
    fn test_meshes_marked_shadow_casting() {
        let loaded = load_robot_from_str(CART_URDF, &LoadOptions::default()).unwrap();
        for (_, mesh) in loaded.model.visuals() {
            assert!(mesh.cast_shadow);
        }
    }

    #[test]
    fn test_initial_joint_values_cover_scalar_joints() {
        let loaded = load_robot_from_str(CART_URDF, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.initial_joint_values.len(), 2);
        assert_eq!(loaded.initial_joint_values["wheel_left_joint"], 0.0);
        assert_eq!(loaded.initial_joint_values["antenna_joint"], 0.0);
    }

    #[test]
    fn test_declared_limits_kept_continuous_defaults() {
        let loaded = load_robot_from_str(CART_URDF, &LoadOptions::default()).unwrap();
        let model = &loaded.model;

        let declared = model.joint_range("antenna_joint");
        assert_eq!((declared.lower, declared.upper), (-1.5, 1.5));

        // Continuous joints declare no usable range; the default applies
        let fallback = model.joint_range("wheel_left_joint");
        assert_eq!((fallback.lower, fallback.upper), (-3.0, 3.0));
    }

    #[test]
    fn test_root_link_resolved() {
        let loaded = load_robot_from_str(CART_URDF, &LoadOptions::default()).unwrap();
        let root = loaded.model.root_link.unwrap();
        assert_eq!(loaded.model.link(root).unwrap().name, "base_link");
    }

    #[test]
    fn test_invalid_xml_is_parse_error() {
        let result = load_robot_from_str("<robot", &LoadOptions::default());
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_package_uri_rejected() {
        let result = resolve_mesh_path("package://robot/meshes/link.stl", None);
        assert!(matches!(result, Err(LoadError::PackageUriNotSupported(_))));
    }

    #[test]
    fn test_non_stl_mesh_rejected() {
        let result = resolve_mesh_path("mesh.dae", None);
        assert!(matches!(result, Err(LoadError::UnsupportedMeshFormat(_))));
    }

    #[test]
    fn test_relative_mesh_without_base_dir_not_found() {
        let result = resolve_mesh_path("meshes/link.stl", None);
        assert!(matches!(result, Err(LoadError::MeshNotFound { .. })));
    }

    #[test]
    fn test_substitution_on_loaded_model() {
        let loaded = load_robot_from_str(CART_URDF, &LoadOptions::default()).unwrap();
        let mut model = loaded.model;

        let mesh_id = model.link_by_name("wheel_left").unwrap().visuals[0].id;
        assert!(model.substitute_geometry(mesh_id, GeometryKind::Box));
        assert_eq!(
            model.link_by_name("wheel_left").unwrap().visuals[0].substituted,
            Some(GeometryKind::Box)
        );
    }
}
