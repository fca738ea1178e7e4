//! # Ring Runner
//!
//! Fly the cockpit through rings, dodge or shoot the asteroids, and keep
//! your health up for as long as possible. Built on `flight_engine`.

pub mod assets;
pub mod autopilot;
pub mod config;
pub mod game;
pub mod host;
pub mod objects;

pub use autopilot::Autopilot;
pub use config::GameSettings;
pub use game::RingRunner;
pub use host::HeadlessHost;
