//! Robot model: links, joints, and visual meshes
//!
//! The model is a kinematic tree built once at load time. Nodes are typed by
//! construction (links, joints, and meshes live in distinct collections)
//! rather than discriminated by string tags at use sites.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};
use uuid::Uuid;

use crate::primitive::{generate_box_mesh, generate_cylinder_mesh, generate_sphere_mesh};
use crate::types::{JointLimits, JointType, Pose, DEFAULT_JOINT_RANGE};

/// Indexed mesh geometry with per-vertex normals.
#[derive(Debug, Clone, Default)]
pub struct MeshGeometry {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    /// Axis-aligned bounds of the geometry in its local frame.
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        (min, max)
    }
}

/// Debug substitution shapes for a visual mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Box,
    Cylinder,
    Sphere,
}

impl GeometryKind {
    /// Parse a geometry name; unknown names yield None (treated as no-op).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Box" => Some(GeometryKind::Box),
            "Cylinder" => Some(GeometryKind::Cylinder),
            "Sphere" => Some(GeometryKind::Sphere),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GeometryKind::Box => "Box",
            GeometryKind::Cylinder => "Cylinder",
            GeometryKind::Sphere => "Sphere",
        }
    }
}

/// A renderable mesh belonging to a link.
#[derive(Debug, Clone)]
pub struct VisualMesh {
    pub id: Uuid,
    /// Transform from the link frame to the mesh frame.
    pub origin: Pose,
    pub geometry: MeshGeometry,
    /// Display color resolved from the semantic material tag at load time.
    pub color: [f32; 4],
    /// The original semantic tag, kept for inspection.
    pub tag: Option<String>,
    pub cast_shadow: bool,
    /// Set when the geometry has been swapped for a debug primitive.
    pub substituted: Option<GeometryKind>,
}

impl VisualMesh {
    pub fn new(origin: Pose, geometry: MeshGeometry, color: [f32; 4], tag: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            geometry,
            color,
            tag,
            cast_shadow: true,
            substituted: None,
        }
    }
}

/// A named rigid body in the kinematic tree.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: Uuid,
    pub name: String,
    pub visuals: Vec<VisualMesh>,
    /// World transform in the robot's own (Z-up) frame, updated by
    /// [`RobotModel::update_world_transforms`].
    pub world_transform: Mat4,
}

impl Link {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            visuals: Vec::new(),
            world_transform: Mat4::IDENTITY,
        }
    }
}

/// A named scalar connector between two links.
#[derive(Debug, Clone)]
pub struct Joint {
    pub id: Uuid,
    pub name: String,
    pub joint_type: JointType,
    pub parent_link: Uuid,
    pub child_link: Uuid,
    /// Transform from the parent link to the joint origin.
    pub origin: Pose,
    /// Motion axis (revolute/prismatic).
    pub axis: Vec3,
    /// Declared limits, if the model provides a usable range.
    pub limits: Option<JointLimits>,
    /// Current scalar position.
    pub value: f32,
}

impl Joint {
    /// The editable range: declared limits, or the default policy range.
    pub fn range(&self) -> JointLimits {
        self.limits
            .filter(JointLimits::is_usable)
            .unwrap_or(DEFAULT_JOINT_RANGE)
    }
}

/// Loaded kinematic tree with stable traversal order.
#[derive(Debug, Clone, Default)]
pub struct RobotModel {
    pub name: String,
    pub root_link: Option<Uuid>,
    links: HashMap<Uuid, Link>,
    joints: HashMap<Uuid, Joint>,
    /// parent link -> [(joint, child link)]
    children: HashMap<Uuid, Vec<(Uuid, Uuid)>>,
    /// child link -> (joint, parent link)
    parent: HashMap<Uuid, (Uuid, Uuid)>,
    link_order: Vec<Uuid>,
    joint_order: Vec<Uuid>,
}

impl RobotModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a link; insertion order is the emitted name order.
    pub fn add_link(&mut self, link: Link) -> Uuid {
        let id = link.id;
        self.link_order.push(id);
        self.links.insert(id, link);
        id
    }

    /// Connect two links with a joint; insertion order is the emitted name order.
    pub fn connect(&mut self, joint: Joint) -> Uuid {
        let id = joint.id;
        self.children
            .entry(joint.parent_link)
            .or_default()
            .push((id, joint.child_link));
        self.parent.insert(joint.child_link, (id, joint.parent_link));
        self.joint_order.push(id);
        self.joints.insert(id, joint);
        id
    }

    pub fn link(&self, id: Uuid) -> Option<&Link> {
        self.links.get(&id)
    }

    pub fn link_by_name(&self, name: &str) -> Option<&Link> {
        self.links.values().find(|l| l.name == name)
    }

    pub fn joint_by_name(&self, name: &str) -> Option<&Joint> {
        self.joints.values().find(|j| j.name == name)
    }

    /// Link names in load order.
    pub fn link_names(&self) -> Vec<String> {
        self.link_order
            .iter()
            .filter_map(|id| self.links.get(id))
            .map(|l| l.name.clone())
            .collect()
    }

    /// Joint names in load order.
    pub fn joint_names(&self) -> Vec<String> {
        self.joint_order
            .iter()
            .filter_map(|id| self.joints.get(id))
            .map(|j| j.name.clone())
            .collect()
    }

    /// name -> current value for every scalar joint.
    pub fn joint_values(&self) -> HashMap<String, f32> {
        self.joints
            .values()
            .filter(|j| j.joint_type.has_value())
            .map(|j| (j.name.clone(), j.value))
            .collect()
    }

    /// The editable range for a joint, by name.
    pub fn joint_range(&self, name: &str) -> JointLimits {
        self.joint_by_name(name)
            .map(Joint::range)
            .unwrap_or(DEFAULT_JOINT_RANGE)
    }

    /// Set a joint value, clamped to its range, and re-pose descendants.
    ///
    /// Returns false if no joint carries the name.
    pub fn set_joint_value(&mut self, name: &str, value: f32) -> bool {
        let Some(joint) = self.joints.values_mut().find(|j| j.name == name) else {
            return false;
        };
        joint.value = joint.range().clamp(value);
        self.update_world_transforms();
        true
    }

    /// Iterate links in load order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.link_order.iter().filter_map(|id| self.links.get(id))
    }

    /// Iterate joints in load order.
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.joint_order.iter().filter_map(|id| self.joints.get(id))
    }

    /// Iterate (link, mesh) pairs in load order.
    pub fn visuals(&self) -> impl Iterator<Item = (&Link, &VisualMesh)> {
        self.links().flat_map(|l| l.visuals.iter().map(move |v| (l, v)))
    }

    /// The link owning a mesh, if the mesh id is live.
    pub fn owning_link(&self, mesh_id: Uuid) -> Option<&Link> {
        self.links
            .values()
            .find(|l| l.visuals.iter().any(|v| v.id == mesh_id))
    }

    /// Recompute every link's world transform from joint origins and values.
    pub fn update_world_transforms(&mut self) {
        let Some(root) = self.root_link else {
            return;
        };
        self.update_transform_recursive(root, Mat4::IDENTITY);
    }

    fn update_transform_recursive(&mut self, link_id: Uuid, parent_transform: Mat4) {
        let transform = if let Some((joint_id, _)) = self.parent.get(&link_id) {
            if let Some(joint) = self.joints.get(joint_id) {
                let motion = compute_joint_transform(&joint.joint_type, joint.axis, joint.value);
                parent_transform * joint.origin.to_mat4() * motion
            } else {
                parent_transform
            }
        } else {
            parent_transform
        };

        if let Some(link) = self.links.get_mut(&link_id) {
            link.world_transform = transform;
        }

        // Collect child IDs first to avoid borrow issues
        let children: Vec<Uuid> = self
            .children
            .get(&link_id)
            .map(|c| c.iter().map(|(_, child_id)| *child_id).collect())
            .unwrap_or_default();

        for child_id in children {
            self.update_transform_recursive(child_id, transform);
        }
    }

    /// Swap one mesh's geometry for a debug primitive sized to its bounds.
    ///
    /// Only the addressed mesh changes; it stays under its owning link.
    /// Returns false if the mesh id is not live.
    pub fn substitute_geometry(&mut self, mesh_id: Uuid, kind: GeometryKind) -> bool {
        let Some(mesh) = self
            .links
            .values_mut()
            .flat_map(|l| l.visuals.iter_mut())
            .find(|v| v.id == mesh_id)
        else {
            return false;
        };

        let (min, max) = mesh.geometry.bounds();
        let extent = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];

        let (vertices, normals, indices) = match kind {
            GeometryKind::Box => generate_box_mesh(extent),
            GeometryKind::Cylinder => {
                let radius = 0.5 * extent[0].max(extent[1]);
                generate_cylinder_mesh(radius, extent[2])
            }
            GeometryKind::Sphere => {
                let radius = 0.5 * extent[0].max(extent[1]).max(extent[2]);
                generate_sphere_mesh(radius)
            }
        };

        mesh.geometry = MeshGeometry {
            vertices,
            normals,
            indices,
        };
        mesh.substituted = Some(kind);
        true
    }
}

/// Transform contributed by a joint at a given scalar position.
pub fn compute_joint_transform(joint_type: &JointType, axis: Vec3, position: f32) -> Mat4 {
    match joint_type {
        JointType::Revolute | JointType::Continuous => {
            Mat4::from_quat(Quat::from_axis_angle(axis, position))
        }
        JointType::Prismatic => Mat4::from_translation(axis * position),
        // Floating/planar would need more DOFs than a scalar carries
        JointType::Fixed | JointType::Floating | JointType::Planar => Mat4::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> MeshGeometry {
        let (vertices, normals, indices) = generate_box_mesh([1.0, 1.0, 1.0]);
        MeshGeometry {
            vertices,
            normals,
            indices,
        }
    }

    fn two_wheel_robot() -> RobotModel {
        let mut model = RobotModel::new("cart");

        let mut base = Link::new("base_link");
        base.visuals
            .push(VisualMesh::new(Pose::default(), unit_box(), [0.0, 0.0, 0.0, 1.0], None));
        let base_id = model.add_link(base);
        model.root_link = Some(base_id);

        for (name, joint_name, y) in [
            ("wheel_left", "wheel_left_joint", 0.5f32),
            ("wheel_right", "wheel_right_joint", -0.5),
        ] {
            let mut wheel = Link::new(name);
            wheel.visuals.push(VisualMesh::new(
                Pose::default(),
                unit_box(),
                [0.0, 0.0, 0.0, 1.0],
                Some("black".into()),
            ));
            let wheel_id = model.add_link(wheel);

            model.connect(Joint {
                id: Uuid::new_v4(),
                name: joint_name.into(),
                joint_type: JointType::Revolute,
                parent_link: base_id,
                child_link: wheel_id,
                origin: Pose {
                    xyz: [0.0, y, 0.0],
                    rpy: [0.0, 0.0, 0.0],
                },
                axis: Vec3::Y,
                limits: Some(JointLimits::new(-1.0, 1.0)),
                value: 0.0,
            });
        }

        model.update_world_transforms();
        model
    }

    #[test]
    fn test_name_order_follows_insertion() {
        let model = two_wheel_robot();
        assert_eq!(model.link_names(), vec!["base_link", "wheel_left", "wheel_right"]);
        assert_eq!(model.joint_names(), vec!["wheel_left_joint", "wheel_right_joint"]);
    }

    #[test]
    fn test_every_joint_name_maps_to_one_joint() {
        let model = two_wheel_robot();
        for name in model.joint_names() {
            let count = model.joints().filter(|j| j.name == name).count();
            assert_eq!(count, 1);
        }
    }

    #[test]
    fn test_set_joint_value_clamps_to_declared_range() {
        let mut model = two_wheel_robot();
        assert!(model.set_joint_value("wheel_left_joint", 5.0));
        assert_eq!(model.joint_by_name("wheel_left_joint").unwrap().value, 1.0);
    }

    #[test]
    fn test_unknown_joint_value_is_rejected() {
        let mut model = two_wheel_robot();
        assert!(!model.set_joint_value("no_such_joint", 0.5));
    }

    #[test]
    fn test_default_range_when_undeclared() {
        let mut model = two_wheel_robot();
        // Strip the declared limits from one joint
        let joint = model
            .joints
            .values_mut()
            .find(|j| j.name == "wheel_left_joint")
            .unwrap();
        joint.limits = None;

        let range = model.joint_range("wheel_left_joint");
        assert_eq!(range.lower, -3.0);
        assert_eq!(range.upper, 3.0);
    }

    #[test]
    fn test_joint_edit_reposes_descendants() {
        let mut model = two_wheel_robot();
        let before = model.link_by_name("wheel_left").unwrap().world_transform;

        model.set_joint_value("wheel_left_joint", 0.8);

        let after = model.link_by_name("wheel_left").unwrap().world_transform;
        assert_ne!(before.to_cols_array(), after.to_cols_array());

        // The sibling chain and the base are untouched
        let base = model.link_by_name("base_link").unwrap().world_transform;
        assert_eq!(base.to_cols_array(), Mat4::IDENTITY.to_cols_array());
    }

    #[test]
    fn test_prismatic_joint_translates() {
        let motion = compute_joint_transform(&JointType::Prismatic, Vec3::Z, 2.0);
        let p = motion.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_substitution_affects_only_target_mesh() {
        let mut model = two_wheel_robot();

        // Give wheel_left a second visual so it has siblings
        let extra = VisualMesh::new(Pose::default(), unit_box(), [1.0, 0.0, 0.0, 1.0], None);
        let extra_id = extra.id;
        let left_id = model.link_by_name("wheel_left").unwrap().id;
        model.links.get_mut(&left_id).unwrap().visuals.push(extra);

        let target_id = model.link_by_name("wheel_left").unwrap().visuals[0].id;
        assert!(model.substitute_geometry(target_id, GeometryKind::Sphere));

        let link = model.link_by_name("wheel_left").unwrap();
        assert_eq!(link.visuals[0].substituted, Some(GeometryKind::Sphere));
        assert!(link.visuals[1].substituted.is_none());

        // Never reparented: both meshes still belong to wheel_left
        assert_eq!(model.owning_link(target_id).unwrap().name, "wheel_left");
        assert_eq!(model.owning_link(extra_id).unwrap().name, "wheel_left");
    }

    #[test]
    fn test_substitution_unknown_mesh_is_noop() {
        let mut model = two_wheel_robot();
        assert!(!model.substitute_geometry(Uuid::new_v4(), GeometryKind::Box));
    }

    #[test]
    fn test_geometry_kind_parse() {
        assert_eq!(GeometryKind::from_name("Box"), Some(GeometryKind::Box));
        assert_eq!(GeometryKind::from_name("Cylinder"), Some(GeometryKind::Cylinder));
        assert_eq!(GeometryKind::from_name("Sphere"), Some(GeometryKind::Sphere));
        assert_eq!(GeometryKind::from_name(""), None);
        assert_eq!(GeometryKind::from_name("Torus"), None);
    }
}
