//! Lighting system
//!
//! One directional light bound at initialization, plus a fixed bank of point
//! lights whose positions are refreshed every pass. Slot 0 follows the
//! player; the remaining slots mirror visible projectiles one-to-one.

use crate::config::LightingConfig;
use crate::foundation::math::{utils, Vec3};

use super::device::{DeviceResult, GraphicsDevice, Uniform};

/// Errors raised by the light manager
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LightError {
    /// Slot index beyond the configured bank
    #[error("Light slot {slot} out of range (max {max})")]
    SlotOutOfRange {
        /// Requested slot
        slot: usize,
        /// Number of slots available
        max: usize,
    },
}

/// Directional light (like sunlight)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels
    pub direction: Vec3,
    /// Light colour
    pub color: Vec3,
}

impl DirectionalLight {
    /// Direction from elevation `alpha` and azimuth `beta`, both in degrees
    pub fn from_angles(alpha_deg: f32, beta_deg: f32, color: Vec3) -> Self {
        let alpha = utils::deg_to_rad(alpha_deg);
        let beta = utils::deg_to_rad(beta_deg);
        Self {
            direction: Vec3::new(alpha.cos() * beta.cos(), alpha.sin(), alpha.cos() * beta.sin()),
            color,
        }
    }

    /// Light described by the lighting configuration
    pub fn from_config(config: &LightingConfig) -> Self {
        Self::from_angles(
            config.directional_alpha_deg,
            config.directional_beta_deg,
            Vec3::from(config.directional_color),
        )
    }

    /// Bind direction and colour
    pub fn upload(&self, device: &mut dyn GraphicsDevice) -> DeviceResult<()> {
        device.set_uniform_vec3(Uniform::LightDirection, &self.direction)?;
        device.set_uniform_vec3(Uniform::LightColor, &self.color)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::from_config(&LightingConfig::default())
    }
}

/// Fixed bank of point-light slots
#[derive(Debug, Clone, PartialEq)]
pub struct LightSlots {
    slots: Vec<Option<Vec3>>,
}

impl LightSlots {
    /// Slot reserved for the player light
    pub const PLAYER_SLOT: usize = 0;

    /// Create `count` disabled slots
    pub fn new(count: usize) -> Self {
        Self { slots: vec![None; count] }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots at all
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Enable `slot` at `position`
    pub fn set_light_position(&mut self, slot: usize, position: Vec3) -> Result<(), LightError> {
        *self.slot_mut(slot)? = Some(position);
        Ok(())
    }

    /// Disable `slot`
    pub fn disable_light(&mut self, slot: usize) -> Result<(), LightError> {
        *self.slot_mut(slot)? = None;
        Ok(())
    }

    /// Position of `slot` if enabled
    pub fn light(&self, slot: usize) -> Option<Vec3> {
        self.slots.get(slot).copied().flatten()
    }

    /// Number of enabled slots
    pub fn enabled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Put projectile lights in slots 1.. and disable the rest
    ///
    /// Projectiles beyond the bank size get no light. Returns how many were lit.
    pub fn mirror_projectiles(&mut self, positions: &[Vec3]) -> usize {
        let available = self.slots.len().saturating_sub(1);
        for (index, slot) in self.slots.iter_mut().enumerate().skip(1) {
            *slot = positions.get(index - 1).copied();
        }
        positions.len().min(available)
    }

    /// Bind every slot; disabled slots get a zero position and the enabled flag cleared
    pub fn upload(&self, device: &mut dyn GraphicsDevice) -> DeviceResult<()> {
        for (index, slot) in self.slots.iter().enumerate() {
            let position = slot.unwrap_or_else(Vec3::zeros);
            device.set_uniform_vec3(Uniform::PointLightPosition(index), &position)?;
            device.set_uniform_i32(Uniform::PointLightEnabled(index), i32::from(slot.is_some()))?;
        }
        Ok(())
    }

    fn slot_mut(&mut self, slot: usize) -> Result<&mut Option<Vec3>, LightError> {
        let max = self.slots.len();
        self.slots.get_mut(slot).ok_or(LightError::SlotOutOfRange { slot, max })
    }
}
