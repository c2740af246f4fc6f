//! Ray picking
//!
//! Converts a pointer position on the render surface into a ray and
//! intersects it against the attached robot's meshes. Helpers (grid, axis)
//! are not part of the pick set and can never be selected. A hit resolves to
//! the owning link, carried explicitly on each mesh since load time.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use viewer_core::RobotModel;

use crate::camera::Camera;

/// What to do with the previous selection when a pick hits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissPolicy {
    /// Keep the previous selection.
    #[default]
    Keep,
    /// Clear the selection.
    Clear,
}

/// Currently picked link (and the mesh the ray actually hit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub link_name: String,
    pub mesh_id: Uuid,
}

/// Result of a successful pick.
#[derive(Debug, Clone)]
pub struct PickHit {
    pub link_name: String,
    pub mesh_id: Uuid,
    pub distance: f32,
}

/// Pick the robot mesh under a screen point.
///
/// `screen` is in surface-local pixels, `surface` the surface size. Returns
/// the nearest hit, or None without error when the ray misses everything.
pub fn pick_link(
    camera: &Camera,
    screen: (f32, f32),
    surface: (f32, f32),
    model: &RobotModel,
    root_transform: Mat4,
) -> Option<PickHit> {
    let (ray_origin, ray_dir) = camera.screen_to_ray(screen.0, screen.1, surface.0, surface.1);

    let mut closest: Option<PickHit> = None;

    for (link, mesh) in model.visuals() {
        let transform = root_transform * link.world_transform * mesh.origin.to_mat4();

        // World-space AABB from the transformed local bounds, for early rejection
        let (min, max) = mesh.geometry.bounds();
        let (bbox_min, bbox_max) = (Vec3::from(min), Vec3::from(max));
        let mut world_min = Vec3::splat(f32::INFINITY);
        let mut world_max = Vec3::splat(f32::NEG_INFINITY);
        for corner in [
            Vec3::new(bbox_min.x, bbox_min.y, bbox_min.z),
            Vec3::new(bbox_max.x, bbox_min.y, bbox_min.z),
            Vec3::new(bbox_min.x, bbox_max.y, bbox_min.z),
            Vec3::new(bbox_max.x, bbox_max.y, bbox_min.z),
            Vec3::new(bbox_min.x, bbox_min.y, bbox_max.z),
            Vec3::new(bbox_max.x, bbox_min.y, bbox_max.z),
            Vec3::new(bbox_min.x, bbox_max.y, bbox_max.z),
            Vec3::new(bbox_max.x, bbox_max.y, bbox_max.z),
        ] {
            let p = transform.transform_point3(corner);
            world_min = world_min.min(p);
            world_max = world_max.max(p);
        }

        if ray_aabb_intersection(ray_origin, ray_dir, world_min, world_max).is_none() {
            continue;
        }

        for chunk in mesh.geometry.indices.chunks(3) {
            if chunk.len() != 3 {
                continue;
            }

            let v0 = transform.transform_point3(Vec3::from(mesh.geometry.vertices[chunk[0] as usize]));
            let v1 = transform.transform_point3(Vec3::from(mesh.geometry.vertices[chunk[1] as usize]));
            let v2 = transform.transform_point3(Vec3::from(mesh.geometry.vertices[chunk[2] as usize]));

            if let Some(t) = ray_triangle_intersection(ray_origin, ray_dir, v0, v1, v2)
                && closest.as_ref().is_none_or(|hit| t < hit.distance)
            {
                closest = Some(PickHit {
                    link_name: link.name.clone(),
                    mesh_id: mesh.id,
                    distance: t,
                });
            }
        }
    }

    closest
}

/// Fold a pick result into the previous selection per the miss policy.
pub fn resolve_selection(
    previous: Option<Selection>,
    hit: Option<&PickHit>,
    policy: MissPolicy,
) -> Option<Selection> {
    match (hit, policy) {
        (Some(hit), _) => Some(Selection {
            link_name: hit.link_name.clone(),
            mesh_id: hit.mesh_id,
        }),
        (None, MissPolicy::Keep) => previous,
        (None, MissPolicy::Clear) => None,
    }
}

/// Ray-AABB intersection test; returns the entry distance if hit.
fn ray_aabb_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    bbox_min: Vec3,
    bbox_max: Vec3,
) -> Option<f32> {
    let inv_dir = Vec3::new(1.0 / ray_dir.x, 1.0 / ray_dir.y, 1.0 / ray_dir.z);

    let t1 = (bbox_min.x - ray_origin.x) * inv_dir.x;
    let t2 = (bbox_max.x - ray_origin.x) * inv_dir.x;
    let t3 = (bbox_min.y - ray_origin.y) * inv_dir.y;
    let t4 = (bbox_max.y - ray_origin.y) * inv_dir.y;
    let t5 = (bbox_min.z - ray_origin.z) * inv_dir.z;
    let t6 = (bbox_max.z - ray_origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Ray-triangle intersection using the Möller–Trumbore algorithm.
fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<f32> {
    const EPSILON: f32 = 1e-6;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < EPSILON {
        return None; // Ray is parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if t > EPSILON { Some(t) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use viewer_core::{
        generate_box_mesh, Joint, JointType, Link, MeshGeometry, Pose, VisualMesh,
    };

    fn box_visual(size: f32, tag: Option<&str>) -> VisualMesh {
        let (vertices, normals, indices) = generate_box_mesh([size, size, size]);
        VisualMesh::new(
            Pose::default(),
            MeshGeometry {
                vertices,
                normals,
                indices,
            },
            [0.0, 0.0, 0.0, 1.0],
            tag.map(String::from),
        )
    }

    /// base_link box at the origin, wheel_left box two units along +Z (in
    /// the robot's Z-up frame, i.e. above the base after the root rotation).
    fn wheel_model() -> RobotModel {
        let mut model = RobotModel::new("test");

        let mut base = Link::new("base_link");
        base.visuals.push(box_visual(1.0, None));
        let base_id = model.add_link(base);
        model.root_link = Some(base_id);

        let mut wheel = Link::new("wheel_left");
        wheel.visuals.push(box_visual(1.0, Some("black")));
        wheel.visuals.push(box_visual(0.4, Some("black")));
        let wheel_id = model.add_link(wheel);

        model.connect(Joint {
            id: Uuid::new_v4(),
            name: "wheel_left_joint".into(),
            joint_type: JointType::Fixed,
            parent_link: base_id,
            child_link: wheel_id,
            origin: Pose {
                xyz: [0.0, 0.0, 2.0],
                rpy: [0.0, 0.0, 0.0],
            },
            axis: glam::Vec3::Z,
            limits: None,
            value: 0.0,
        });

        model.update_world_transforms();
        model
    }

    fn front_camera() -> Camera {
        let mut camera = Camera::new(800.0 / 600.0);
        camera.eye = glam::Vec3::new(5.0, 0.0, 0.0);
        camera.target = glam::Vec3::ZERO;
        camera
    }

    fn root() -> Mat4 {
        Mat4::from_rotation_x(-FRAC_PI_2)
    }

    #[test]
    fn test_center_pick_hits_base_link() {
        let model = wheel_model();
        let camera = front_camera();
        let hit = pick_link(&camera, (400.0, 300.0), (800.0, 600.0), &model, root());
        assert_eq!(hit.unwrap().link_name, "base_link");
    }

    #[test]
    fn test_pick_sub_mesh_resolves_owning_link() {
        let model = wheel_model();
        let mut camera = front_camera();
        // Aim straight at the wheel, which sits at y=2 after the root rotation
        camera.eye = glam::Vec3::new(5.0, 2.0, 0.0);
        camera.target = glam::Vec3::new(0.0, 2.0, 0.0);

        let hit = pick_link(&camera, (400.0, 300.0), (800.0, 600.0), &model, root());
        assert_eq!(hit.unwrap().link_name, "wheel_left");
    }

    #[test]
    fn test_nearest_hit_wins() {
        let model = wheel_model();
        let mut camera = front_camera();
        camera.eye = glam::Vec3::new(5.0, 2.0, 0.0);
        camera.target = glam::Vec3::new(0.0, 2.0, 0.0);

        // Both wheel boxes overlap the ray; the hit must be the near face
        // of the outer box
        let hit = pick_link(&camera, (400.0, 300.0), (800.0, 600.0), &model, root()).unwrap();
        assert!((hit.distance - 4.5).abs() < 1e-3);
    }

    #[test]
    fn test_empty_space_returns_none() {
        let model = wheel_model();
        let camera = front_camera();
        // Top-left corner: ray passes well outside every box
        let hit = pick_link(&camera, (0.0, 0.0), (800.0, 600.0), &model, root());
        assert!(hit.is_none());
    }

    #[test]
    fn test_pick_empty_model_never_panics() {
        let model = RobotModel::new("empty");
        let camera = front_camera();
        let hit = pick_link(&camera, (400.0, 300.0), (800.0, 600.0), &model, root());
        assert!(hit.is_none());
    }

    #[test]
    fn test_miss_policy_keep() {
        let previous = Some(Selection {
            link_name: "base_link".into(),
            mesh_id: Uuid::new_v4(),
        });
        let resolved = resolve_selection(previous.clone(), None, MissPolicy::Keep);
        assert_eq!(resolved, previous);
    }

    #[test]
    fn test_miss_policy_clear() {
        let previous = Some(Selection {
            link_name: "base_link".into(),
            mesh_id: Uuid::new_v4(),
        });
        assert!(resolve_selection(previous, None, MissPolicy::Clear).is_none());
    }

    #[test]
    fn test_hit_replaces_selection_either_policy() {
        let hit = PickHit {
            link_name: "wheel_left".into(),
            mesh_id: Uuid::new_v4(),
            distance: 1.0,
        };
        for policy in [MissPolicy::Keep, MissPolicy::Clear] {
            let resolved = resolve_selection(None, Some(&hit), policy).unwrap();
            assert_eq!(resolved.link_name, "wheel_left");
            assert_eq!(resolved.mesh_id, hit.mesh_id);
        }
    }
}
