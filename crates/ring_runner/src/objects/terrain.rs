//! Scrolling terrain tiles and the ground volume

use crate::config::GameSettings;
use flight_engine::assets::Geometry;
use flight_engine::ecs::{Entity, EntityKind, GameObject, Updatable, UpdateContext};
use flight_engine::foundation::math::Vec3;
use flight_engine::physics::{Axis, Circle, Collider};
use std::rc::Rc;

/// Gap between the lowest flight altitude and the terrain surface
const GROUND_CLEARANCE: f32 = 2.0;

/// Height of the terrain surface
pub fn ground_level(settings: &GameSettings) -> f32 {
    -settings.max_half_y - GROUND_CLEARANCE
}

/// Flat volume standing in for the terrain in collision tests
///
/// Wide enough to cover the whole flight box; anything that dips to the
/// bottom of the box touches it.
pub fn ground_collider(settings: &GameSettings) -> Collider {
    let center = Vec3::new(0.0, ground_level(settings), 0.0);
    Circle::new(center, settings.max_half_x * 2.0, Axis::Y)
        .with_depth_tolerance(GROUND_CLEARANCE)
        .into()
}

/// One terrain chunk; tiles scroll toward the player and wrap to the back
pub struct TerrainTile {
    entity: Entity,
    speed: f32,
    game_speed: f32,
    chunk_size: f32,
    rows: u32,
}

impl TerrainTile {
    /// Create the tile at grid cell (`column`, `row`)
    pub fn new(geometry: Rc<Geometry>, column: i32, row: u32, settings: &GameSettings) -> Self {
        let size = settings.terrain_chunk_size;
        let position = Vec3::new(column as f32 * size, ground_level(settings), row as f32 * size);
        Self {
            entity: Entity::new(geometry)
                .with_position(position)
                .with_color(Vec3::new(0.3, 0.55, 0.3)),
            speed: settings.terrain_speed,
            game_speed: settings.game_speed,
            chunk_size: size,
            rows: settings.number_terrain_chunks_rows.max(1),
        }
    }

    /// Every tile of the grid
    pub fn grid(geometry: &Rc<Geometry>, settings: &GameSettings) -> Vec<Self> {
        let half = settings.half_number_terrain_chunks_columns;
        (-half..half)
            .flat_map(|column| (0..settings.number_terrain_chunks_rows).map(move |row| (column, row)))
            .map(|(column, row)| Self::new(Rc::clone(geometry), column, row, settings))
            .collect()
    }
}

impl GameObject for TerrainTile {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Terrain
    }

    fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for TerrainTile {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let z = &mut self.entity.position.z;
        *z -= self.speed * self.game_speed * ctx.dt;
        if *z < -self.chunk_size {
            *z += self.rows as f32 * self.chunk_size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use flight_engine::ecs::Spawner;
    use flight_engine::input::Intent;
    use flight_engine::physics::Sphere;

    #[test]
    fn test_grid_layout() {
        let settings = GameSettings::default();
        let tiles = TerrainTile::grid(&Rc::new(Geometry::default()), &settings);
        assert_eq!(tiles.len(), 4 * 3);
        assert_relative_eq!(tiles[0].entity().position, Vec3::new(-1000.0, -52.0, 0.0));
    }

    #[test]
    fn test_tile_wraps_behind_to_front() {
        let settings = GameSettings {
            terrain_chunk_size: 10.0,
            terrain_speed: 10.0,
            ..GameSettings::default()
        };
        let mut tile = TerrainTile::new(Rc::new(Geometry::default()), 0, 0, &settings);
        let mut spawner = Spawner::new();
        let mut ctx = UpdateContext::new(1.5, 1, Intent::empty(), &mut spawner);
        tile.update(&mut ctx);
        assert_relative_eq!(tile.entity().position.z, 15.0);
    }

    #[test]
    fn test_ground_touches_bottom_of_flight_box() {
        let settings = GameSettings::default();
        let ground = ground_collider(&settings);
        let low = Collider::from(Sphere::new(Vec3::new(80.0, -50.0, 2.0), 1.0));
        let high = Collider::from(Sphere::new(Vec3::new(0.0, -40.0, 2.0), 1.0));
        assert!(low.intersects(&ground));
        assert!(!high.intersects(&ground));
    }
}
