//! STL file loading for mesh visuals

use std::io::BufReader;
use std::path::Path;

use crate::robot::MeshGeometry;

/// STL-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum StlError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Load an STL file into mesh geometry.
///
/// STL is a triangle soup with one normal per face; corners are expanded so
/// each vertex carries its face normal, which gives the flat shading mesh
/// visuals expect.
pub fn load_stl(path: impl AsRef<Path>) -> Result<MeshGeometry, StlError> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| StlError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);

    let mesh = stl_io::read_stl(&mut reader).map_err(|e| StlError::Parse(e.to_string()))?;

    let mut vertices = Vec::with_capacity(mesh.faces.len() * 3);
    let mut normals = Vec::with_capacity(mesh.faces.len() * 3);
    let mut indices = Vec::with_capacity(mesh.faces.len() * 3);

    for face in &mesh.faces {
        let normal = [face.normal[0], face.normal[1], face.normal[2]];
        for &vertex_idx in &face.vertices {
            let v = mesh.vertices[vertex_idx];
            indices.push(vertices.len() as u32);
            vertices.push([v[0], v[1], v[2]]);
            normals.push(normal);
        }
    }

    Ok(MeshGeometry {
        vertices,
        normals,
        indices,
    })
}

/// Apply a per-axis scale to geometry in place.
pub fn apply_scale(geometry: &mut MeshGeometry, scale: [f32; 3]) {
    for vertex in &mut geometry.vertices {
        vertex[0] *= scale[0];
        vertex[1] *= scale[1];
        vertex[2] *= scale[2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_scale() {
        let mut geometry = MeshGeometry {
            vertices: vec![[1.0, 2.0, 3.0], [-1.0, 0.5, 2.0]],
            normals: vec![[0.0, 0.0, 1.0]; 2],
            indices: vec![0, 1, 0],
        };
        apply_scale(&mut geometry, [2.0, 1.0, 0.5]);
        assert_eq!(geometry.vertices[0], [2.0, 2.0, 1.5]);
        assert_eq!(geometry.vertices[1], [-2.0, 0.5, 1.0]);
    }

    #[test]
    fn test_missing_file_errors() {
        let result = load_stl("/nonexistent/mesh.stl");
        assert!(matches!(result, Err(StlError::Io(_))));
    }
}
