//! Core engine implementation
//!
//! The engine owns every subsystem and runs one simulation pass per
//! scheduler step:
//!
//! 1. retire entities destroyed during the previous pass, add queued spawns
//! 2. update every object in registry order with the fixed step
//! 3. detect collisions and run their hooks
//! 4. move the camera and refresh the point lights
//! 5. render
//! 6. hand the pass report to the application

use crate::{
    application::{AppError, Application, FrameControl},
    assets::{AssetError, GeometryLibrary},
    config::{ConfigError, EngineConfig},
    ecs::{EntityId, EntityKind, EntityRegistry, GameObject, Spawner, UpdateContext},
    input::InputState,
    physics::{Collider, CollisionReport, CollisionSystem},
    render::{Camera, FrameStats, GraphicsDevice, LightError, LightSlots, RenderError, Renderer, ShaderSources},
    scheduler::{FrameScheduler, Host, Poll},
};
use thiserror::Error;

/// What one pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Frame number of the pass
    pub frame: u64,
    /// Entities retired at the start of the pass
    pub retired: usize,
    /// Queued spawns added at the start of the pass
    pub spawned: usize,
    /// Collision results
    pub collisions: CollisionReport,
    /// Rendering totals
    pub render: FrameStats,
    /// Application decision after the pass
    pub control: FrameControl,
}

/// Result of handing a host tick to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Too early for a pass; the next tick was requested
    Skipped,
    /// A pass ran
    Stepped(PassReport),
    /// The scheduler is stopped; no tick was requested
    Stopped,
}

/// Main engine struct
///
/// The engine coordinates all subsystems. The host drives it by calling
/// [`Engine::on_host_tick`] whenever the tick it requested arrives.
pub struct Engine {
    config: EngineConfig,
    device: Box<dyn GraphicsDevice>,
    registry: EntityRegistry,
    geometry: GeometryLibrary,
    renderer: Renderer,
    collisions: CollisionSystem,
    camera: Camera,
    lights: LightSlots,
    scheduler: FrameScheduler,
    input: InputState,
    spawner: Spawner,
    player: Option<EntityId>,
}

impl Engine {
    /// Create a new engine instance drawing through `device`
    pub fn new(config: EngineConfig, device: Box<dyn GraphicsDevice>) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate()?;

        let device_limit = device.max_point_lights();
        let light_count = config.lighting.max_point_lights.min(device_limit);
        if light_count < config.lighting.max_point_lights {
            log::warn!(
                "Device supports {} point lights, {} requested",
                device_limit,
                config.lighting.max_point_lights
            );
        }
        if light_count == 0 {
            return Err(EngineError::InitializationFailed("device exposes no point-light slots".to_string()));
        }

        let renderer = Renderer::new(&config);
        let mut registry = EntityRegistry::new();
        registry.watch(renderer.live_set());

        Ok(Self {
            renderer,
            camera: Camera::from_config(&config.camera),
            lights: LightSlots::new(light_count),
            scheduler: FrameScheduler::new(config.fps_limit),
            registry,
            geometry: GeometryLibrary::new(),
            collisions: CollisionSystem::new(),
            input: InputState::new(),
            spawner: Spawner::new(),
            player: None,
            device,
            config,
        })
    }

    /// Compile shaders and prepare the device; failures here are fatal
    pub fn initialize(&mut self, shaders: &ShaderSources) -> Result<(), EngineError> {
        self.renderer.initialize(self.device.as_mut(), shaders)?;
        log::info!("Engine initialized");
        Ok(())
    }

    /// Register an object for updates, collisions and drawing
    pub fn instantiate(&mut self, object: Box<dyn GameObject>) -> EntityId {
        self.registry.add(object)
    }

    /// Queue an object for insertion at the start of the next pass
    pub fn spawn(&mut self, object: Box<dyn GameObject>) {
        self.spawner.spawn(object);
    }

    /// Designate the player; the camera starts following it
    pub fn set_player(&mut self, id: EntityId) {
        if self.registry.get(id).map(|object| object.kind()) != Some(EntityKind::Player) {
            log::warn!("Player {:?} is not a Player entity", id);
        }
        self.player = Some(id);
        self.camera.follow(Some(id));
    }

    /// Current player, if still alive in the registry
    pub fn player(&self) -> Option<EntityId> {
        self.player.filter(|id| self.registry.contains(*id))
    }

    /// Designate the ground volume the player is tested against
    pub fn set_ground_collider(&mut self, ground: Option<Collider>) {
        self.collisions.set_ground(ground);
    }

    /// Start the schedule and request the first tick
    pub fn start(&mut self, host: &mut dyn Host) {
        self.scheduler.start(host.now_ms());
        host.request_next_tick();
    }

    /// Stop requesting ticks
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Whether the scheduler still requests ticks
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Handle one host tick: run at most one pass, then re-arm
    ///
    /// A failed pass stops the scheduler and is returned without re-arming.
    pub fn on_host_tick<A>(&mut self, host: &mut dyn Host, app: &mut A) -> Result<TickOutcome, EngineError>
    where
        A: Application + ?Sized,
    {
        let frame = match self.scheduler.poll(host.now_ms()) {
            Poll::Stopped => return Ok(TickOutcome::Stopped),
            Poll::Skip => {
                host.request_next_tick();
                return Ok(TickOutcome::Skipped);
            }
            Poll::Step(frame) => frame,
        };

        if !self.scheduler.begin_step() {
            host.request_next_tick();
            return Ok(TickOutcome::Skipped);
        }
        let result = self.run_pass(frame, app);
        self.scheduler.end_step();

        match result {
            Ok(report) => {
                if report.control == FrameControl::Stop {
                    self.scheduler.stop();
                }
                if self.scheduler.is_running() {
                    host.request_next_tick();
                }
                Ok(TickOutcome::Stepped(report))
            }
            Err(err) => {
                log::error!("Pass {} failed: {}", frame, err);
                self.scheduler.stop();
                Err(err)
            }
        }
    }

    /// Run one full pass
    pub fn run_pass<A>(&mut self, frame: u64, app: &mut A) -> Result<PassReport, EngineError>
    where
        A: Application + ?Sized,
    {
        let retired = self.registry.retire_destroyed();
        let spawned = self.apply_spawns();

        self.update_objects(frame);
        let collisions = self.collisions.detect(&mut self.registry, self.player);

        self.camera.update(&self.registry);
        self.refresh_lights()?;

        let render = self
            .renderer
            .draw(self.device.as_mut(), &self.registry, &self.camera, &self.lights)?;

        let mut report = PassReport {
            frame,
            retired,
            spawned,
            collisions,
            render,
            control: FrameControl::Continue,
        };
        report.control = app.on_frame(self, &report)?;
        log::trace!("Pass {} done: {} draws", frame, report.render.draw_calls);
        Ok(report)
    }

    /// Run the application's cleanup and stop the scheduler
    pub fn shutdown<A>(&mut self, app: &mut A)
    where
        A: Application + ?Sized,
    {
        self.scheduler.stop();
        app.cleanup(self);
        log::info!(
            "Engine shutdown complete after {} frames",
            self.scheduler.clock().frame_count
        );
    }

    fn apply_spawns(&mut self) -> usize {
        let pending = self.spawner.drain();
        let count = pending.len();
        for object in pending {
            self.instantiate(object);
        }
        count
    }

    fn update_objects(&mut self, frame: u64) {
        let dt = self.scheduler.clock().step_seconds();
        let intents = self.input.intents();
        let player_position = self
            .player
            .and_then(|id| self.registry.get(id))
            .map(|object| object.entity().position);

        for id in self.registry.ids() {
            let Some(object) = self.registry.get_mut(id) else {
                continue;
            };
            if let Some(updatable) = object.as_updatable_mut() {
                let mut ctx = UpdateContext::new(dt, frame, intents, &mut self.spawner)
                    .with_player_position(player_position);
                updatable.update(&mut ctx);
            }
        }
    }

    fn refresh_lights(&mut self) -> Result<(), LightError> {
        match self.player().and_then(|id| self.registry.get(id)) {
            Some(player) => self
                .lights
                .set_light_position(LightSlots::PLAYER_SLOT, player.entity().position)?,
            None => self.lights.disable_light(LightSlots::PLAYER_SLOT)?,
        }

        let projectiles: Vec<_> = self
            .registry
            .ids_of(EntityKind::Projectile)
            .into_iter()
            .filter_map(|id| self.registry.get(id))
            .filter(|object| {
                object.entity().is_alive() && object.as_collidable().map_or(true, |hooks| hooks.collision_active())
            })
            .map(|object| object.entity().position)
            .collect();
        self.lights.mirror_projectiles(&projectiles);
        Ok(())
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Entity registry
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Mutable entity registry
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    /// Geometry loaded at setup
    pub fn geometry(&self) -> &GeometryLibrary {
        &self.geometry
    }

    /// Mutable geometry library
    pub fn geometry_mut(&mut self) -> &mut GeometryLibrary {
        &mut self.geometry
    }

    /// Graphics device
    pub fn device(&self) -> &dyn GraphicsDevice {
        self.device.as_ref()
    }

    /// Mutable graphics device
    pub fn device_mut(&mut self) -> &mut dyn GraphicsDevice {
        self.device.as_mut()
    }

    /// Graphics device as its concrete type, if it is a `T`
    pub fn device_as<T: std::any::Any>(&self) -> Option<&T> {
        self.device.as_any().downcast_ref()
    }

    /// Mutable graphics device as its concrete type, if it is a `T`
    pub fn device_as_mut<T: std::any::Any>(&mut self) -> Option<&mut T> {
        self.device.as_any_mut().downcast_mut()
    }

    /// Camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Point-light bank
    pub fn lights(&self) -> &LightSlots {
        &self.lights
    }

    /// Renderer
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Held input
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Mutable held input
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Frame scheduler
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("renderer", &self.renderer)
            .field("scheduler", &self.scheduler)
            .field("player", &self.player)
            .finish_non_exhaustive()
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine initialization failed
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Rendering error
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Light bank error
    #[error("Lighting error: {0}")]
    Light(#[from] LightError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Asset error
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Application error
    #[error("Application error: {0}")]
    Application(String),
}

impl From<AppError> for EngineError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Engine(inner) => inner,
            other => Self::Application(other.to_string()),
        }
    }
}
