//! Game configuration
//!
//! Every gameplay number lives here. Rates are per second of game time and are
//! scaled by `game_speed`; the engine steps at `fps_limit`.

use flight_engine::config::{Config, ConfigError, EngineConfig};
use serde::{Deserialize, Serialize};

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Horizontal flight limit either side of centre
    pub max_half_x: f32,
    /// Vertical flight limit either side of centre
    pub max_half_y: f32,
    /// Farthest depth objects are placed at or fly to
    pub max_z: f32,
    /// Target passes per second
    pub fps_limit: f64,
    /// Multiplier on every rate below
    pub game_speed: f32,

    /// Asteroids alive at once
    pub number_of_asteroids: usize,
    /// Asteroid scale range
    pub asteroid_scale_range: [f32; 2],
    /// Asteroid approach speed range
    pub asteroid_speed_range: [f32; 2],
    /// Asteroid spin range in degrees per second
    pub asteroid_rotation_speed_range: [f32; 2],
    /// Laser hits an asteroid takes
    pub asteroid_health: u32,

    /// Rings per course
    pub number_of_rings: usize,
    /// Distance between consecutive rings
    pub ring_spacing: f32,
    /// Middle of each ring course
    pub ring_course_center: [f32; 3],
    /// Ring scale range
    pub ring_scale_range: [f32; 2],
    /// Ring approach speed range
    pub ring_speed_range: [f32; 2],

    /// Edge length of one terrain tile
    pub terrain_chunk_size: f32,
    /// Grid cells per tile edge
    pub terrain_chunk_resolution: u16,
    /// Tile columns either side of centre
    pub half_number_terrain_chunks_columns: i32,
    /// Tile rows ahead of the player
    pub number_terrain_chunks_rows: u32,
    /// Terrain scroll speed
    pub terrain_speed: f32,

    /// Cockpit steering speed
    pub cockpit_speed: f32,
    /// Laser magazine size
    pub max_lasers: u32,
    /// Laser flight speed
    pub laser_speed: f32,
    /// Seconds to restore one laser
    pub laser_reload_seconds: f32,
    /// Seconds between shots
    pub laser_cooldown_seconds: f32,

    /// Points for flying through a ring
    pub ring_points: f32,
    /// Health restored by a ring
    pub ring_restore_health: f32,
    /// Points lost on an asteroid hit
    pub asteroid_points: f32,
    /// Health lost on an asteroid hit
    pub asteroid_damage: f32,
    /// Points gained per second of flight
    pub points_per_second: f32,
    /// Health drained per second of flight
    pub damage_per_second: f32,
    /// Health lost when scraping the ground
    pub terrain_damage: f32,
    /// Points lost when scraping the ground
    pub terrain_points: f32,

    /// Seed for every random placement
    pub seed: u64,
    /// End the run when health reaches zero
    pub stop_on_death: bool,
    /// Headless run length in seconds
    pub run_seconds: f64,
    /// Simulated display refresh rate
    pub display_refresh_hz: f64,
    /// Maximum refresh jitter in milliseconds
    pub refresh_jitter_ms: f64,

    /// Engine settings
    pub engine: EngineConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_half_x: 100.0,
            max_half_y: 50.0,
            max_z: 500.0,
            fps_limit: 60.0,
            game_speed: 1.0,

            number_of_asteroids: 20,
            asteroid_scale_range: [2.0, 4.0],
            asteroid_speed_range: [20.0, 40.0],
            asteroid_rotation_speed_range: [0.0, 30.0],
            asteroid_health: 2,

            number_of_rings: 15,
            ring_spacing: 40.0,
            ring_course_center: [0.0, 1.0, 344.0],
            ring_scale_range: [12.0, 12.0],
            ring_speed_range: [20.0, 20.0],

            terrain_chunk_size: 500.0,
            terrain_chunk_resolution: 32,
            half_number_terrain_chunks_columns: 2,
            number_terrain_chunks_rows: 3,
            terrain_speed: 60.0,

            cockpit_speed: 80.0,
            max_lasers: 10,
            laser_speed: 300.0,
            laser_reload_seconds: 1.0,
            laser_cooldown_seconds: 2.0,

            ring_points: 1000.0,
            ring_restore_health: 25.0,
            asteroid_points: 100.0,
            asteroid_damage: 10.0,
            points_per_second: 50.0,
            damage_per_second: 1.0,
            terrain_damage: 5.0,
            terrain_points: 100.0,

            seed: 0x5eed,
            stop_on_death: true,
            run_seconds: 10.0,
            display_refresh_hz: 144.0,
            refresh_jitter_ms: 2.0,

            engine: EngineConfig::default(),
        }
    }
}

impl Config for GameSettings {}

impl GameSettings {
    /// Engine configuration with the game's frame rate and depth range applied
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = self.engine.clone().with_fps_limit(self.fps_limit);
        config.projection.far = config.projection.far.max(self.max_z * 2.0);
        config
    }

    /// Game-time seconds covered by one pass
    pub fn step_seconds(&self) -> f32 {
        self.game_speed / self.fps_limit as f32
    }

    /// Reject settings the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine_config().validate()?;
        if self.max_half_x <= 0.0 || self.max_half_y <= 0.0 || self.max_z <= 0.0 {
            return Err(ConfigError::Invalid("flight limits must be positive".to_string()));
        }
        if self.game_speed <= 0.0 {
            return Err(ConfigError::Invalid(format!("game_speed must be positive, got {}", self.game_speed)));
        }
        if self.max_lasers == 0 {
            return Err(ConfigError::Invalid("max_lasers must be at least 1".to_string()));
        }
        if self.terrain_chunk_resolution == 0 || self.terrain_chunk_size <= 0.0 {
            return Err(ConfigError::Invalid("terrain chunks need a positive size and resolution".to_string()));
        }
        let ranges = [
            ("asteroid_scale_range", self.asteroid_scale_range),
            ("asteroid_speed_range", self.asteroid_speed_range),
            ("asteroid_rotation_speed_range", self.asteroid_rotation_speed_range),
            ("ring_scale_range", self.ring_scale_range),
            ("ring_speed_range", self.ring_speed_range),
        ];
        for (name, [low, high]) in ranges {
            if low > high {
                return Err(ConfigError::Invalid(format!("{name} is inverted: [{low}, {high}]")));
            }
        }
        if self.display_refresh_hz <= 0.0 {
            return Err(ConfigError::Invalid("display_refresh_hz must be positive".to_string()));
        }
        Ok(())
    }
}
