//! Ring Runner application
//!
//! Sets the scene up, keeps the field stocked with rings and asteroids, and
//! ends the run when the player's health runs out.

use crate::assets::{self, ProceduralAssets};
use crate::autopilot::Autopilot;
use crate::config::GameSettings;
use crate::objects::{ground_collider, ring_course, Asteroid, Cockpit, Cube, PlayerStats, SharedStats, TerrainTile};
use flight_engine::ecs::EntityList;
use flight_engine::foundation::math::Vec3;
use flight_engine::{AppError, Application, Engine, FrameControl, PassReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

/// Where the decorative cube floats
const CUBE_POSITION: [f32; 3] = [0.0, -7.0, 10.0];

/// The game
pub struct RingRunner {
    settings: Rc<GameSettings>,
    stats: SharedStats,
    rng: StdRng,
    rings: EntityList,
    asteroids: EntityList,
    autopilot: Option<Autopilot>,
    courses: u32,
}

impl RingRunner {
    /// Create the game from its settings
    pub fn new(settings: GameSettings) -> Self {
        Self {
            stats: PlayerStats::shared(settings.max_lasers),
            rng: StdRng::seed_from_u64(settings.seed),
            rings: EntityList::new(),
            asteroids: EntityList::new(),
            autopilot: None,
            courses: 0,
            settings: Rc::new(settings),
        }
    }

    /// Let a scripted pilot hold the controls (builder pattern)
    pub fn with_autopilot(mut self, autopilot: Autopilot) -> Self {
        self.autopilot = Some(autopilot);
        self
    }

    /// Player health and score
    pub fn stats(&self) -> &SharedStats {
        &self.stats
    }

    /// Rings still in flight
    pub fn rings(&self) -> &EntityList {
        &self.rings
    }

    /// Asteroids still in flight
    pub fn asteroids(&self) -> &EntityList {
        &self.asteroids
    }

    /// Ring courses spawned so far
    pub fn courses(&self) -> u32 {
        self.courses
    }

    fn spawn_course(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let geometry = engine.geometry().get(assets::RING)?;
        for ring in ring_course(&geometry, &self.settings, &mut self.rng) {
            let id = engine.instantiate(Box::new(ring));
            engine.registry_mut().track(id, &self.rings);
        }
        self.courses += 1;
        log::info!("Ring course {} spawned with {} rings", self.courses, self.rings.len());
        Ok(())
    }

    fn top_up_asteroids(&mut self, engine: &mut Engine) -> Result<usize, AppError> {
        let missing = self.settings.number_of_asteroids.saturating_sub(self.asteroids.len());
        if missing == 0 {
            return Ok(0);
        }
        let geometry = engine.geometry().get(assets::ASTEROID)?;
        for _ in 0..missing {
            let asteroid = Asteroid::new(Rc::clone(&geometry), Rc::clone(&self.settings), self.rng.gen());
            let id = engine.instantiate(Box::new(asteroid));
            engine.registry_mut().track(id, &self.asteroids);
        }
        log::debug!("Spawned {} asteroids", missing);
        Ok(missing)
    }
}

impl Application for RingRunner {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Initializing Ring Runner...");
        let source = ProceduralAssets::new(&self.settings);
        engine.geometry_mut().load_all(&source, &assets::ALL)?;

        let cockpit = Cockpit::new(
            engine.geometry().get(assets::COCKPIT)?,
            engine.geometry().get(assets::LASER)?,
            Rc::clone(&self.settings),
            Rc::clone(&self.stats),
        );
        let player = engine.instantiate(Box::new(cockpit));
        engine.set_player(player);

        let terrain = engine.geometry().get(assets::TERRAIN)?;
        for tile in TerrainTile::grid(&terrain, &self.settings) {
            engine.instantiate(Box::new(tile));
        }
        engine.set_ground_collider(Some(ground_collider(&self.settings)));

        self.top_up_asteroids(engine)?;
        self.spawn_course(engine)?;

        let cube = Cube::new(engine.geometry().get(assets::CUBE)?, Vec3::from(CUBE_POSITION));
        engine.instantiate(Box::new(cube));

        log::info!("Ring Runner ready with {} entities", engine.registry().len());
        Ok(())
    }

    fn on_frame(&mut self, engine: &mut Engine, report: &PassReport) -> Result<FrameControl, AppError> {
        if let (Some(autopilot), Some(player)) = (self.autopilot, engine.player()) {
            let intents = autopilot.intents(engine.registry(), player);
            engine.input_mut().set(intents);
        }

        if self.rings.is_empty() {
            self.spawn_course(engine)?;
        }
        self.top_up_asteroids(engine)?;

        let stats = self.stats.borrow();
        let fps = self.settings.fps_limit.round().max(1.0) as u64;
        if report.frame % fps == 0 {
            log::info!(
                "Frame {}: score {} health {:.0}% lasers {}/{}",
                report.frame,
                stats.score_display(),
                stats.health,
                stats.lasers,
                stats.max_lasers
            );
        }

        if stats.is_dead() && self.settings.stop_on_death {
            log::warn!("Game over at frame {} with score {}", report.frame, stats.score_display());
            return Ok(FrameControl::Stop);
        }
        Ok(FrameControl::Continue)
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let stats = self.stats.borrow();
        log::info!(
            "Final score {} after {} frames ({} rings, {} asteroid hits)",
            stats.score_display(),
            engine.scheduler().clock().frame_count,
            stats.rings_collected,
            stats.asteroid_hits
        );
    }
}
