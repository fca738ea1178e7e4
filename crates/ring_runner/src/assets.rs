//! Procedural game meshes
//!
//! The game ships no model files; every mesh is generated at setup and
//! registered by name in the engine's geometry library.

use crate::config::GameSettings;
use flight_engine::assets::{AssetError, AssetSource, Geometry};
use flight_engine::foundation::math::{constants::PI, Vec3};

/// Decorative cube
pub const CUBE: &str = "cube";
/// Player cockpit
pub const COCKPIT: &str = "cockpit";
/// Asteroid rock
pub const ASTEROID: &str = "asteroid";
/// Collectible ring
pub const RING: &str = "ring";
/// Terrain tile
pub const TERRAIN: &str = "terrain";
/// Laser bolt
pub const LASER: &str = "laser";

/// Every mesh the game loads at setup
pub const ALL: [&str; 6] = [CUBE, COCKPIT, ASTEROID, RING, TERRAIN, LASER];

/// Tube radius of the ring mesh relative to its unit major radius
pub const RING_TUBE_RADIUS: f32 = 0.08;

/// Generates the game meshes on demand
#[derive(Debug, Clone)]
pub struct ProceduralAssets {
    terrain_size: f32,
    terrain_resolution: u16,
}

impl ProceduralAssets {
    /// Create a source sized from the game settings
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            terrain_size: settings.terrain_chunk_size,
            terrain_resolution: settings.terrain_chunk_resolution,
        }
    }
}

impl AssetSource for ProceduralAssets {
    fn load(&self, name: &str) -> Result<Geometry, AssetError> {
        let mesh = match name {
            CUBE => cuboid(Vec3::new(1.0, 1.0, 1.0)),
            COCKPIT => cuboid(Vec3::new(1.0, 0.5, 2.0)),
            ASTEROID => uv_sphere(1.0, 12, 16),
            RING => torus(1.0, RING_TUBE_RADIUS, 32, 8),
            TERRAIN => terrain_grid(self.terrain_size, self.terrain_resolution),
            LASER => cuboid(Vec3::new(0.1, 0.1, 1.0)),
            _ => return Err(AssetError::MissingGeometry(name.to_string())),
        };
        mesh.finish().map_err(|reason| AssetError::LoadFailed {
            name: name.to_string(),
            reason,
        })
    }
}

#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    texcoords: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = (self.vertices.len() / 3) as u32;
        self.vertices.extend_from_slice(position.as_slice());
        self.normals.extend_from_slice(normal.normalize().as_slice());
        self.texcoords.extend_from_slice(&uv);
        index
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    fn finish(self) -> Result<Geometry, String> {
        let indices = self
            .indices
            .iter()
            .map(|&index| u16::try_from(index))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| format!("{} vertices overflow 16-bit indices", self.vertices.len() / 3))?;
        Ok(Geometry::new(self.vertices, self.normals, indices).with_texcoords(self.texcoords))
    }
}

/// Box with flat-shaded faces and the given half extents
fn cuboid(half: Vec3) -> MeshBuilder {
    let mut mesh = MeshBuilder::default();
    let faces = [
        (Vec3::x(), Vec3::y(), Vec3::z()),
        (-Vec3::x(), Vec3::z(), Vec3::y()),
        (Vec3::y(), Vec3::z(), Vec3::x()),
        (-Vec3::y(), Vec3::x(), Vec3::z()),
        (Vec3::z(), Vec3::x(), Vec3::y()),
        (-Vec3::z(), Vec3::y(), Vec3::x()),
    ];
    for (normal, u, v) in faces {
        let corner = |su: f32, sv: f32| (normal + u * su + v * sv).component_mul(&half);
        let a = mesh.vertex(corner(-1.0, -1.0), normal, [0.0, 0.0]);
        let b = mesh.vertex(corner(1.0, -1.0), normal, [1.0, 0.0]);
        let c = mesh.vertex(corner(1.0, 1.0), normal, [1.0, 1.0]);
        let d = mesh.vertex(corner(-1.0, 1.0), normal, [0.0, 1.0]);
        mesh.quad(a, b, c, d);
    }
    mesh
}

fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> MeshBuilder {
    let mut mesh = MeshBuilder::default();
    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        for slice in 0..=slices {
            let theta = 2.0 * PI * slice as f32 / slices as f32;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            let uv = [slice as f32 / slices as f32, stack as f32 / stacks as f32];
            mesh.vertex(normal * radius, normal, uv);
        }
    }
    grid_indices(&mut mesh, stacks, slices);
    mesh
}

/// Torus around the Z axis, so it faces along Z
fn torus(major: f32, minor: f32, segments: u32, sides: u32) -> MeshBuilder {
    let mut mesh = MeshBuilder::default();
    for segment in 0..=segments {
        let theta = 2.0 * PI * segment as f32 / segments as f32;
        let around = Vec3::new(theta.cos(), theta.sin(), 0.0);
        for side in 0..=sides {
            let phi = 2.0 * PI * side as f32 / sides as f32;
            let normal = around * phi.cos() + Vec3::z() * phi.sin();
            let uv = [segment as f32 / segments as f32, side as f32 / sides as f32];
            mesh.vertex(around * major + normal * minor, normal, uv);
        }
    }
    grid_indices(&mut mesh, segments, sides);
    mesh
}

/// Square tile in the XZ plane with gentle deterministic hills
fn terrain_grid(size: f32, resolution: u16) -> MeshBuilder {
    let mut mesh = MeshBuilder::default();
    let cells = u32::from(resolution.max(1));
    let step = size / cells as f32;
    let height = |x: f32, z: f32| (x * 0.02).sin() * (z * 0.03).cos() * 4.0;

    for row in 0..=cells {
        for column in 0..=cells {
            let x = column as f32 * step - size * 0.5;
            let z = row as f32 * step - size * 0.5;
            let y = height(x, z);
            let normal = Vec3::new(height(x - step, z) - height(x + step, z), 2.0 * step, height(x, z - step) - height(x, z + step));
            mesh.vertex(Vec3::new(x, y, z), normal, [column as f32 / cells as f32, row as f32 / cells as f32]);
        }
    }
    grid_indices(&mut mesh, cells, cells);
    mesh
}

/// Index a `(rows + 1) x (columns + 1)` vertex lattice as quads
fn grid_indices(mesh: &mut MeshBuilder, rows: u32, columns: u32) {
    let stride = columns + 1;
    for row in 0..rows {
        for column in 0..columns {
            let a = row * stride + column;
            let b = a + stride;
            mesh.quad(a, b, b + 1, a + 1);
        }
    }
}
