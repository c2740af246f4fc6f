//! Primitive mesh generation
//!
//! Generates indexed meshes for the URDF primitive geometries (box, cylinder,
//! sphere). The same generators back the debug geometry substitution.

use std::f32::consts::PI;

const CYLINDER_SEGMENTS: u32 = 30;
const SPHERE_RINGS: u32 = 16;
const SPHERE_SEGMENTS: u32 = 24;

/// Generate a box mesh centered at the origin.
///
/// `size` is the full extent along x/y/z.
pub fn generate_box_mesh(size: [f32; 3]) -> (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<u32>) {
    let hx = size[0] * 0.5;
    let hy = size[1] * 0.5;
    let hz = size[2] * 0.5;

    let mut vertices = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [1.0, 0.0, 0.0],
            [
                [hx, -hy, -hz],
                [hx, hy, -hz],
                [hx, hy, hz],
                [hx, -hy, hz],
            ],
        ),
        (
            [-1.0, 0.0, 0.0],
            [
                [-hx, hy, -hz],
                [-hx, -hy, -hz],
                [-hx, -hy, hz],
                [-hx, hy, hz],
            ],
        ),
        (
            [0.0, 1.0, 0.0],
            [
                [hx, hy, -hz],
                [-hx, hy, -hz],
                [-hx, hy, hz],
                [hx, hy, hz],
            ],
        ),
        (
            [0.0, -1.0, 0.0],
            [
                [-hx, -hy, -hz],
                [hx, -hy, -hz],
                [hx, -hy, hz],
                [-hx, -hy, hz],
            ],
        ),
        (
            [0.0, 0.0, 1.0],
            [
                [-hx, -hy, hz],
                [hx, -hy, hz],
                [hx, hy, hz],
                [-hx, hy, hz],
            ],
        ),
        (
            [0.0, 0.0, -1.0],
            [
                [hx, -hy, -hz],
                [-hx, -hy, -hz],
                [-hx, hy, -hz],
                [hx, hy, -hz],
            ],
        ),
    ];

    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        for corner in corners {
            vertices.push(corner);
            normals.push(normal);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, normals, indices)
}

/// Generate a cylinder mesh centered at the origin, axis along Z
/// (the URDF cylinder convention).
pub fn generate_cylinder_mesh(radius: f32, length: f32) -> (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<u32>) {
    let hz = length * 0.5;
    let segs = CYLINDER_SEGMENTS;

    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // Side wall: two rings of vertices with radial normals
    for i in 0..=segs {
        let angle = i as f32 / segs as f32 * 2.0 * PI;
        let (sin, cos) = angle.sin_cos();
        let normal = [cos, sin, 0.0];

        vertices.push([radius * cos, radius * sin, -hz]);
        normals.push(normal);
        vertices.push([radius * cos, radius * sin, hz]);
        normals.push(normal);
    }
    for i in 0..segs {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 2, base + 3, base, base + 3, base + 1]);
    }

    // Caps: fan around a center vertex
    for (z, normal_z) in [(-hz, -1.0f32), (hz, 1.0)] {
        let center = vertices.len() as u32;
        vertices.push([0.0, 0.0, z]);
        normals.push([0.0, 0.0, normal_z]);

        let ring_start = vertices.len() as u32;
        for i in 0..=segs {
            let angle = i as f32 / segs as f32 * 2.0 * PI;
            let (sin, cos) = angle.sin_cos();
            vertices.push([radius * cos, radius * sin, z]);
            normals.push([0.0, 0.0, normal_z]);
        }
        for i in 0..segs {
            if normal_z > 0.0 {
                indices.extend_from_slice(&[center, ring_start + i, ring_start + i + 1]);
            } else {
                indices.extend_from_slice(&[center, ring_start + i + 1, ring_start + i]);
            }
        }
    }

    (vertices, normals, indices)
}

/// Generate a UV sphere mesh centered at the origin.
pub fn generate_sphere_mesh(radius: f32) -> (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<u32>) {
    let rings = SPHERE_RINGS;
    let segs = SPHERE_SEGMENTS;

    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = ring as f32 / rings as f32 * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for seg in 0..=segs {
            let theta = seg as f32 / segs as f32 * 2.0 * PI;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let n = [sin_phi * cos_theta, sin_phi * sin_theta, cos_phi];
            vertices.push([radius * n[0], radius * n[1], radius * n[2]]);
            normals.push(n);
        }
    }

    let stride = segs + 1;
    for ring in 0..rings {
        for seg in 0..segs {
            let a = ring * stride + seg;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    (vertices, normals, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for v in vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        (min, max)
    }

    #[test]
    fn test_box_extent() {
        let (vertices, normals, indices) = generate_box_mesh([2.0, 4.0, 6.0]);
        assert_eq!(vertices.len(), 24);
        assert_eq!(normals.len(), 24);
        assert_eq!(indices.len(), 36);

        let (min, max) = bounds(&vertices);
        assert_eq!(min, [-1.0, -2.0, -3.0]);
        assert_eq!(max, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cylinder_extent() {
        let (vertices, normals, indices) = generate_cylinder_mesh(0.5, 2.0);
        assert_eq!(vertices.len(), normals.len());
        assert_eq!(indices.len() % 3, 0);

        let (min, max) = bounds(&vertices);
        assert!((min[2] + 1.0).abs() < 1e-6);
        assert!((max[2] - 1.0).abs() < 1e-6);
        assert!((max[0] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_normals_unit_length() {
        let (vertices, normals, _) = generate_sphere_mesh(2.0);
        assert_eq!(vertices.len(), normals.len());
        for n in &normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_indices_in_range() {
        for (vertices, _, indices) in [
            generate_box_mesh([1.0, 1.0, 1.0]),
            generate_cylinder_mesh(1.0, 1.0),
            generate_sphere_mesh(1.0),
        ] {
            for &i in &indices {
                assert!((i as usize) < vertices.len());
            }
        }
    }
}
