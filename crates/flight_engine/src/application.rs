//! Application trait and lifecycle management

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::engine::{Engine, EngineError, PassReport};
use thiserror::Error;

/// What the engine should do after a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameControl {
    /// Keep requesting host ticks
    #[default]
    Continue,
    /// Stop the scheduler after this pass
    Stop,
}

/// Application lifecycle trait
///
/// Implement this trait to build a game on the engine. Game objects do their
/// own per-pass work through [`Updatable`](crate::ecs::Updatable); the
/// application only sets the scene up and observes finished passes.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Use this to load
    /// geometry, instantiate the starting entities and pick the player.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Observe a finished pass
    ///
    /// Called at the end of every pass, after rendering.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `report` - What happened during the pass
    fn on_frame(&mut self, engine: &mut Engine, report: &PassReport) -> Result<FrameControl, AppError> {
        let _ = (engine, report);
        Ok(FrameControl::Continue)
    }

    /// Cleanup the application
    ///
    /// Called once when the run ends.
    fn cleanup(&mut self, engine: &mut Engine) {
        let _ = engine;
    }
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
