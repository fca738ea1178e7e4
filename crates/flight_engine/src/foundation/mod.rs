//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and matrix builders
//! - Time sources and countdown timers
//! - Logging setup

pub mod math;
pub mod time;
pub mod logging;
