//! Triangle geometry shared by entities

use crate::foundation::math::Vec3;

/// Immutable indexed triangle mesh in model space
///
/// Attribute arrays are flat: three floats per vertex and normal, two per
/// texture coordinate. Entities share a geometry through `Rc` and never
/// replace it after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Vertex positions, xyz interleaved
    pub vertices: Vec<f32>,
    /// Vertex normals, xyz interleaved
    pub normals: Vec<f32>,
    /// Triangle indices
    pub indices: Vec<u16>,
    /// Texture coordinates, uv interleaved
    pub texcoords: Vec<f32>,
}

impl Geometry {
    /// Create a geometry from its attribute arrays
    pub fn new(vertices: Vec<f32>, normals: Vec<f32>, indices: Vec<u16>) -> Self {
        Self {
            vertices,
            normals,
            indices,
            texcoords: Vec::new(),
        }
    }

    /// Attach texture coordinates (builder pattern)
    pub fn with_texcoords(mut self, texcoords: Vec<f32>) -> Self {
        self.texcoords = texcoords;
        self
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of indices to draw
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Iterate vertex positions
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.chunks_exact(3).map(|v| Vec3::new(v[0], v[1], v[2]))
    }

    /// Mean of all vertex positions; the origin for an empty mesh
    pub fn center_of_gravity(&self) -> Vec3 {
        let count = self.vertex_count();
        if count == 0 {
            return Vec3::zeros();
        }
        self.positions().sum::<Vec3>() / count as f32
    }

    /// Largest distance from `center` to any vertex
    pub fn bounding_radius(&self, center: &Vec3) -> f32 {
        self.positions()
            .map(|p| (p - center).magnitude())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> Geometry {
        Geometry::new(
            vec![
                -1.0, -1.0, 0.0,
                 1.0, -1.0, 0.0,
                 1.0,  3.0, 0.0,
                -1.0,  3.0, 0.0,
            ],
            vec![0.0, 0.0, 1.0].repeat(4),
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_center_of_gravity_and_radius() {
        let geometry = quad();
        let center = geometry.center_of_gravity();
        assert_relative_eq!(center, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(geometry.bounding_radius(&center), 5.0_f32.sqrt());
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.index_count(), 6);
    }

    #[test]
    fn test_empty_geometry() {
        let geometry = Geometry::default();
        assert_eq!(geometry.center_of_gravity(), Vec3::zeros());
        assert_eq!(geometry.bounding_radius(&Vec3::zeros()), 0.0);
    }
}
