//! # Flight Engine
//!
//! A small fixed-rate simulation core for arcade flight games.
//!
//! ## Features
//!
//! - **Frame Scheduling**: Host-driven ticks throttled to a target frame rate
//! - **Entity Registry**: Ordered entity storage with destruction notifications
//! - **Collision Passes**: Sphere and thin-circle proximity tests every frame
//! - **Render Pipeline**: Immediate-mode upload and draw behind a device trait
//! - **Headless Device**: In-memory device for tests and windowless runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flight_engine::prelude::*;
//!
//! struct MyGame;
//!
//! impl Application for MyGame {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         // Spawn entities, pick the player
//!         Ok(())
//!     }
//!
//!     fn on_frame(&mut self, engine: &mut Engine, report: &PassReport) -> Result<FrameControl, AppError> {
//!         Ok(FrameControl::Continue)
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let device = HeadlessDevice::new(1280, 720);
//!     let mut engine = Engine::new(EngineConfig::default(), Box::new(device))?;
//!     engine.initialize(&ShaderSources::default())?;
//!     let mut game = MyGame;
//!     game.initialize(&mut engine)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod events;
pub mod ecs;
pub mod physics;
pub mod scheduler;
pub mod render;
pub mod input;
pub mod assets;

mod application;
mod engine;

#[cfg(test)]
mod engine_tests;

pub use application::{AppError, Application, FrameControl};
pub use engine::{Engine, EngineError, PassReport, TickOutcome};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, Application, FrameControl,
        Engine, EngineError, PassReport, TickOutcome,
        assets::{AssetError, AssetSource, Geometry, GeometryLibrary},
        config::{Config, ConfigError, EngineConfig},
        ecs::{
            Collidable, Entity, EntityId, EntityKind, EntityList, EntityRegistry,
            GameObject, Scale, Spawner, Updatable, UpdateContext,
        },
        events::Signal,
        foundation::{
            math::{Mat4, Vec3},
            time::{Clock, Countdown, SystemClock},
        },
        input::{InputState, Intent},
        physics::{Axis, Circle, Collider, CollisionReport, CollisionSystem, Sphere},
        render::{
            Camera, DirectionalLight, GraphicsDevice, HeadlessDevice, LightSlots,
            RenderError, Renderer, ShaderSources,
        },
        scheduler::{FrameClock, FrameScheduler, Host, Poll},
    };
}
