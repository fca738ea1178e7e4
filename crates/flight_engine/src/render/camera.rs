//! # Chase Camera
//!
//! A yaw/pitch camera that can trail an entity at a fixed offset.
//!
//! ## Conventions
//! - Angles are in degrees
//! - `angle` turns about world Y, `elevation` tilts about the camera's X
//! - With `angle = -180` the camera looks down world +Z

use crate::config::CameraConfig;
use crate::ecs::{EntityId, EntityRegistry};
use crate::foundation::math::{make_view, Mat4, Vec3};

/// Camera with an optional followed entity
///
/// The view matrix is recomputed once per pass in [`Camera::update`], after
/// all objects have moved, so every draw in a frame sees the same view.
///
/// # Following
/// While following, the eye sits at the entity position plus
/// `follow_offset`. If the followed entity disappears the camera stays where
/// it last was and stops following.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position in world space
    pub eye: Vec3,

    /// Pitch in degrees
    pub elevation: f32,

    /// Yaw in degrees
    pub angle: f32,

    /// Eye offset from the followed entity
    pub follow_offset: Vec3,

    follow: Option<EntityId>,
    view: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    /// Create a camera at `eye` with the given pitch and yaw
    ///
    /// # Arguments
    /// * `eye` - Camera position in world space
    /// * `elevation` - Pitch in degrees
    /// * `angle` - Yaw in degrees
    pub fn new(eye: Vec3, elevation: f32, angle: f32) -> Self {
        Self {
            eye,
            elevation,
            angle,
            follow_offset: Vec3::zeros(),
            follow: None,
            view: make_view(&eye, elevation, angle),
        }
    }

    /// Create a camera from its configuration section
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(Vec3::from(config.eye), config.elevation_deg, config.angle_deg)
            .with_follow_offset(Vec3::from(config.follow_offset))
    }

    /// Set the follow offset (builder pattern)
    pub fn with_follow_offset(mut self, offset: Vec3) -> Self {
        self.follow_offset = offset;
        self
    }

    /// Start or stop following an entity
    pub fn follow(&mut self, target: Option<EntityId>) {
        self.follow = target;
        log::debug!("Camera following {:?}", target);
    }

    /// Entity currently followed
    pub fn target(&self) -> Option<EntityId> {
        self.follow
    }

    /// Move the eye directly; has no lasting effect while following
    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
        log::trace!("Camera eye updated to: {:?}", eye);
    }

    /// Recompute the view from the followed entity's current position
    pub fn update(&mut self, registry: &EntityRegistry) {
        if let Some(id) = self.follow {
            match registry.get(id) {
                Some(object) => self.eye = object.entity().position + self.follow_offset,
                None => {
                    log::debug!("Followed entity {:?} is gone, camera holds position", id);
                    self.follow = None;
                }
            }
        }
        self.view = make_view(&self.eye, self.elevation, self.angle);
    }

    /// View matrix as of the last update
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Geometry;
    use crate::ecs::{Entity, EntityKind, GameObject};
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;
    use std::rc::Rc;

    struct Marker(Entity);

    impl GameObject for Marker {
        fn entity(&self) -> &Entity {
            &self.0
        }

        fn entity_mut(&mut self) -> &mut Entity {
            &mut self.0
        }

        fn kind(&self) -> EntityKind {
            EntityKind::Player
        }
    }

    #[test]
    fn test_default_camera_looks_down_positive_z() {
        let camera = Camera::new(Vec3::zeros(), 0.0, -180.0);
        let ahead = camera.view_matrix().transform_point(&Point3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(ahead.coords, Vec3::new(0.0, 0.0, -10.0), epsilon = 1e-4);
    }

    #[test]
    fn test_follow_tracks_entity_with_offset() {
        let mut registry = EntityRegistry::new();
        let entity = Entity::new(Rc::new(Geometry::default())).with_position(Vec3::new(5.0, 1.0, 0.0));
        let id = registry.add(Box::new(Marker(entity)));

        let mut camera = Camera::new(Vec3::zeros(), 0.0, -180.0).with_follow_offset(Vec3::new(0.0, 2.0, -8.0));
        camera.follow(Some(id));
        camera.update(&registry);
        assert_eq!(camera.eye, Vec3::new(5.0, 3.0, -8.0));

        registry.remove(id);
        camera.update(&registry);
        assert_eq!(camera.eye, Vec3::new(5.0, 3.0, -8.0));
        assert_eq!(camera.target(), None);
    }
}
