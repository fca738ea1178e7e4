//! Whole-pass tests driving the engine through a manual host

use crate::prelude::*;
use crate::render::{RenderError, ShaderStage};
use std::rc::Rc;

/// Host whose clock only moves when told to
#[derive(Default)]
struct ManualHost {
    now: f64,
    requests: usize,
}

impl ManualHost {
    fn advance(&mut self, ms: f64) {
        self.now += ms;
    }
}

impl Clock for ManualHost {
    fn now_ms(&self) -> f64 {
        self.now
    }
}

impl Host for ManualHost {
    fn request_next_tick(&mut self) {
        self.requests += 1;
    }
}

fn triangle() -> Rc<Geometry> {
    Rc::new(Geometry::new(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        vec![0, 1, 2],
    ))
}

/// Player sliding one unit towards -X every pass
struct Glider {
    entity: Entity,
    hits: usize,
}

impl Glider {
    fn at(position: Vec3) -> Self {
        Self {
            entity: Entity::new(triangle())
                .with_position(position)
                .with_collider(Sphere::new(position, 1.0)),
            hits: 0,
        }
    }
}

impl GameObject for Glider {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        Some(self)
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        Some(self)
    }
}

impl Updatable for Glider {
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.entity.position.x -= 1.0;
        self.entity.sync_collider(Vec3::zeros());
    }
}

impl Collidable for Glider {
    fn on_collision(&mut self, _other: &dyn GameObject) {
        self.hits += 1;
    }
}

/// Static hazard, optionally destroyed by its first hit
struct Rock {
    entity: Entity,
    fragile: bool,
}

impl Rock {
    fn new(fragile: bool) -> Self {
        Self {
            entity: Entity::new(triangle()).with_collider(Sphere::new(Vec3::zeros(), 2.0)),
            fragile,
        }
    }
}

impl GameObject for Rock {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Hazard
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        Some(self)
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        Some(self)
    }
}

impl Collidable for Rock {
    fn on_collision(&mut self, _other: &dyn GameObject) {
        if self.fragile {
            self.entity.destroy();
        }
    }
}

/// Decoration that fires one projectile on its first update
struct Launcher {
    entity: Entity,
    fired: bool,
}

impl GameObject for Launcher {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Decoration
    }

    fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for Launcher {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if !self.fired {
            self.fired = true;
            ctx.spawn(Box::new(Bolt(Entity::new(triangle()).with_position(Vec3::new(0.0, 0.0, 7.0)))));
        }
    }
}

struct Bolt(Entity);

impl GameObject for Bolt {
    fn entity(&self) -> &Entity {
        &self.0
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.0
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }
}

/// Application that records reports and can stop or fail on a given frame
#[derive(Default)]
struct Recorder {
    reports: Vec<PassReport>,
    stop_at: Option<u64>,
    fail_at: Option<u64>,
}

impl Application for Recorder {
    fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        Ok(())
    }

    fn on_frame(&mut self, _engine: &mut Engine, report: &PassReport) -> Result<FrameControl, AppError> {
        if self.fail_at == Some(report.frame) {
            return Err(AppError::GameLogic(format!("failure at frame {}", report.frame)));
        }
        self.reports.push(report.clone());
        if self.stop_at == Some(report.frame) {
            return Ok(FrameControl::Stop);
        }
        Ok(FrameControl::Continue)
    }
}

/// 50 passes per second gives an exact 20 ms interval
fn engine() -> Engine {
    let config = EngineConfig::default().with_fps_limit(50.0);
    let mut engine = Engine::new(config, Box::new(HeadlessDevice::new(640, 480))).unwrap();
    engine.initialize(&ShaderSources::default()).unwrap();
    engine
}

fn step(engine: &mut Engine, host: &mut ManualHost, app: &mut Recorder) -> PassReport {
    host.advance(20.0);
    match engine.on_host_tick(host, app).unwrap() {
        TickOutcome::Stepped(report) => report,
        other => panic!("expected a pass, got {other:?}"),
    }
}

#[test]
fn test_first_contact_on_second_pass() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder::default();

    engine.instantiate(Box::new(Rock::new(false)));
    let player = engine.instantiate(Box::new(Glider::at(Vec3::new(5.0, 0.0, 0.0))));
    engine.set_player(player);
    engine.start(&mut host);

    let first = step(&mut engine, &mut host, &mut app);
    assert_eq!(first.frame, 1);
    assert_eq!(first.collisions.hazard_hits, 0);

    let second = step(&mut engine, &mut host, &mut app);
    assert_eq!(second.frame, 2);
    assert_eq!(second.collisions.hazard_hits, 1);
    assert_eq!(second.collisions.pairs[0].first, player);
    assert_eq!(engine.registry().get(player).unwrap().entity().position, Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(app.reports.len(), 2);
}

#[test]
fn test_destroyed_hazard_is_drawn_then_retired_everywhere() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder::default();

    let rock = engine.instantiate(Box::new(Rock::new(true)));
    let player = engine.instantiate(Box::new(Glider::at(Vec3::new(5.0, 0.0, 0.0))));
    engine.set_player(player);
    let watched = EntityList::new();
    assert!(engine.registry_mut().track(rock, &watched));
    engine.start(&mut host);

    step(&mut engine, &mut host, &mut app);
    let hit = step(&mut engine, &mut host, &mut app);
    assert_eq!(hit.collisions.hazard_hits, 1);
    assert_eq!(hit.render.draw_calls, 2);
    assert!(engine.registry().contains(rock));
    assert!(!engine.registry().get(rock).unwrap().entity().is_alive());

    let after = step(&mut engine, &mut host, &mut app);
    assert_eq!(after.retired, 1);
    assert_eq!(after.render.draw_calls, 1);
    assert!(!engine.registry().contains(rock));
    assert!(engine.registry().ids_of(EntityKind::Hazard).is_empty());
    assert!(!engine.renderer().live_set().contains(rock));
    assert!(watched.is_empty());
}

#[test]
fn test_early_tick_skips_and_rearms() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder::default();
    engine.start(&mut host);
    assert_eq!(host.requests, 1);

    host.advance(10.0);
    assert_eq!(engine.on_host_tick(&mut host, &mut app).unwrap(), TickOutcome::Skipped);
    assert_eq!(host.requests, 2);
    assert!(app.reports.is_empty());
}

#[test]
fn test_failed_pass_is_not_rearmed() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder {
        fail_at: Some(1),
        ..Recorder::default()
    };
    engine.start(&mut host);

    host.advance(20.0);
    let result = engine.on_host_tick(&mut host, &mut app);
    assert!(matches!(result, Err(EngineError::Application(_))));
    assert_eq!(host.requests, 1);
    assert!(!engine.is_running());

    host.advance(20.0);
    assert_eq!(engine.on_host_tick(&mut host, &mut app).unwrap(), TickOutcome::Stopped);
}

#[test]
fn test_stop_request_ends_the_loop() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder {
        stop_at: Some(2),
        ..Recorder::default()
    };
    engine.start(&mut host);

    step(&mut engine, &mut host, &mut app);
    let last = step(&mut engine, &mut host, &mut app);
    assert_eq!(last.control, FrameControl::Stop);
    assert_eq!(host.requests, 2);

    host.advance(20.0);
    assert_eq!(engine.on_host_tick(&mut host, &mut app).unwrap(), TickOutcome::Stopped);
    assert_eq!(engine.scheduler().clock().frame_count, 2);
}

#[test]
fn test_spawns_join_on_the_next_pass() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder::default();
    engine.instantiate(Box::new(Launcher {
        entity: Entity::new(triangle()),
        fired: false,
    }));
    engine.start(&mut host);

    let first = step(&mut engine, &mut host, &mut app);
    assert_eq!(first.spawned, 0);
    assert_eq!(engine.registry().len(), 1);
    assert_eq!(first.render.draw_calls, 1);

    let second = step(&mut engine, &mut host, &mut app);
    assert_eq!(second.spawned, 1);
    assert_eq!(engine.registry().ids_of(EntityKind::Projectile).len(), 1);
    assert_eq!(second.render.draw_calls, 2);
    assert_eq!(engine.lights().light(1), Some(Vec3::new(0.0, 0.0, 7.0)));
}

#[test]
fn test_player_light_tracks_player() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder::default();
    let player = engine.instantiate(Box::new(Glider::at(Vec3::new(5.0, 0.0, 0.0))));
    engine.set_player(player);
    engine.start(&mut host);

    step(&mut engine, &mut host, &mut app);
    assert_eq!(engine.lights().light(LightSlots::PLAYER_SLOT), Some(Vec3::new(4.0, 0.0, 0.0)));
    assert_eq!(engine.camera().eye, Vec3::new(4.0, 2.0, -8.0));

    engine.registry_mut().get_mut(player).unwrap().entity_mut().destroy();
    step(&mut engine, &mut host, &mut app);
    assert_eq!(engine.player(), None);
    assert_eq!(engine.lights().light(LightSlots::PLAYER_SLOT), None);
}

#[test]
fn test_initialize_rejects_broken_shader() {
    let mut engine = Engine::new(EngineConfig::default(), Box::new(HeadlessDevice::new(64, 64))).unwrap();
    let result = engine.initialize(&ShaderSources::new("garbage", "garbage"));
    assert!(matches!(
        result,
        Err(EngineError::Render(RenderError::ShaderCompilation {
            stage: ShaderStage::Vertex,
            ..
        }))
    ));
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = EngineConfig::default().with_fps_limit(-1.0);
    let result = Engine::new(config, Box::new(HeadlessDevice::new(64, 64)));
    assert!(matches!(result, Err(EngineError::Config(ConfigError::Invalid(_)))));
}

#[test]
fn test_objects_added_straight_to_the_registry_are_drawn() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder::default();
    engine.instantiate(Box::new(Rock::new(false)));
    engine.registry_mut().add(Box::new(Rock::new(false)));
    engine.start(&mut host);

    let report = step(&mut engine, &mut host, &mut app);
    assert_eq!(engine.renderer().live_set().len(), 2);
    assert_eq!(report.render.draw_calls, engine.registry().len());
}

#[test]
fn test_overlapping_hazards_accumulate_in_one_pass() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder::default();
    let player = engine.instantiate(Box::new(Glider::at(Vec3::new(1.0, 0.0, 0.0))));
    engine.set_player(player);
    engine.instantiate(Box::new(Rock::new(false)));
    engine.instantiate(Box::new(Rock::new(false)));
    engine.start(&mut host);

    let report = step(&mut engine, &mut host, &mut app);
    assert_eq!(report.collisions.hazard_hits, 2);
}

/// Application whose frame hook reports a lost graphics context
struct LostContext;

impl Application for LostContext {
    fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        Ok(())
    }

    fn on_frame(&mut self, _engine: &mut Engine, _report: &PassReport) -> Result<FrameControl, AppError> {
        Err(AppError::Engine(EngineError::Render(RenderError::MissingContext)))
    }
}

#[test]
fn test_engine_error_from_frame_hook_keeps_its_variant() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    engine.start(&mut host);

    host.advance(20.0);
    let result = engine.on_host_tick(&mut host, &mut LostContext);
    assert!(matches!(result, Err(EngineError::Render(RenderError::MissingContext))));
    assert!(!engine.is_running());
}

#[test]
fn test_concrete_device_is_reachable() {
    let mut engine = engine();
    let mut host = ManualHost::default();
    let mut app = Recorder::default();
    engine.instantiate(Box::new(Rock::new(false)));
    engine.start(&mut host);
    step(&mut engine, &mut host, &mut app);

    let device = engine.device_as::<HeadlessDevice>().unwrap();
    assert_eq!(device.stats().frames, 1);
    assert_eq!(device.stats().draw_calls, 1);

    engine.device_as_mut::<HeadlessDevice>().unwrap().set_display_size(320, 200);
    assert_eq!(engine.device().display_size(), (320, 200));
}
