//! Weapon geometry component

use bevy::prelude::*;

use crate::config::ComboWeaponConfig;

/// Combo weapon orbiting its wielder.
///
/// Хранит только геометрию и weak back-reference на wielder (`Entity`, не
/// владение). Состояние атаки и facing хранит `WeaponMotionController`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    /// Wielder entity (may already be despawned; systems check)
    pub wielder: Entity,
    /// Idle distance from the pivot to the grip point
    pub rest_radius: f32,
    /// Pivot relative to the wielder center
    pub pivot_offset: Vec2,
    /// Distance from the visual center back to the grip point, along the weapon axis
    pub center_to_handle: f32,
}

impl Weapon {
    pub fn from_config(wielder: Entity, config: &ComboWeaponConfig) -> Self {
        Self {
            wielder,
            rest_radius: config.rest_radius,
            pivot_offset: config.pivot_offset,
            center_to_handle: config.center_to_handle,
        }
    }

    /// Pivot point the polar motion is computed around.
    pub fn pivot(&self, wielder_center: Vec2) -> Vec2 {
        wielder_center + self.pivot_offset
    }
}
