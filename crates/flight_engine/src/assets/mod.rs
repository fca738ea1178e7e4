//! Asset management
//!
//! Geometry is produced by an [`AssetSource`] collaborator (file parsing is
//! not the engine's concern) and cached in a [`GeometryLibrary`] at setup.
//! Entities then share the cached meshes.

pub mod geometry;

pub use geometry::Geometry;

use std::collections::HashMap;
use std::rc::Rc;

/// Asset loading errors
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// Nothing registered under the requested name
    #[error("Missing geometry: {0}")]
    MissingGeometry(String),

    /// The source failed to produce the asset
    #[error("Failed to load {name}: {reason}")]
    LoadFailed {
        /// Asset name
        name: String,
        /// Source-specific explanation
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Producer of geometry by name
pub trait AssetSource {
    /// Build or load the geometry called `name`
    fn load(&self, name: &str) -> Result<Geometry, AssetError>;
}

/// Named geometry cache populated during setup
#[derive(Debug, Default)]
pub struct GeometryLibrary {
    meshes: HashMap<String, Rc<Geometry>>,
}

impl GeometryLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a geometry under `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, geometry: Geometry) -> Rc<Geometry> {
        let name = name.into();
        let shared = Rc::new(geometry);
        log::debug!("Registered geometry '{}' ({} vertices)", name, shared.vertex_count());
        self.meshes.insert(name, Rc::clone(&shared));
        shared
    }

    /// Load every name from `source` and register it
    pub fn load_all<S: AssetSource + ?Sized>(&mut self, source: &S, names: &[&str]) -> Result<(), AssetError> {
        for name in names {
            let geometry = source.load(name)?;
            self.register(*name, geometry);
        }
        log::info!("Loaded {} geometries", names.len());
        Ok(())
    }

    /// Shared handle to a registered geometry
    pub fn get(&self, name: &str) -> Result<Rc<Geometry>, AssetError> {
        self.meshes
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::MissingGeometry(name.to_string()))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.meshes.contains_key(name)
    }

    /// Number of registered geometries
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
