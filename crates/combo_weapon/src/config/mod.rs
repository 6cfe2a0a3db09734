//! Combo weapon configuration.
//!
//! Один `ComboWeaponConfig` описывает и геометрию оружия, и тайминги трёх
//! атак, и правила контактного урона. Конфиг можно собрать в коде
//! (`ComboWeaponConfig::short_sword()`) или прочитать из RON.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::physics::COLLISION_LAYER_TARGETS;

/// Config loading / validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config field `{field}` = {value}: {reason}")]
    InvalidField {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

/// Timing and reach of one attack motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackTiming {
    /// Motion length (seconds). Values ≤ 0 are clamped to `MIN_MOTION_DURATION`.
    pub duration: f32,
    /// Radial reach added on top of `rest_radius`.
    pub extra_reach: f32,
    /// Skill cooldown started when the attack is admitted (seconds).
    pub cooldown: f32,
}

/// Full combo weapon configuration.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboWeaponConfig {
    // === Geometry ===
    /// Idle distance from pivot to the grip point
    pub rest_radius: f32,
    /// Pivot offset relative to the wielder center (visual calibration)
    pub pivot_offset: Vec2,
    /// Distance from the weapon's visual center back to its grip point
    pub center_to_handle: f32,
    /// Angle between the sprite's drawn "forward" and +X (degrees)
    pub sprite_forward_offset_deg: f32,
    /// Half extents of the sensor collider built by `weapon_sensor_body`
    pub blade_half_extents: Vec2,

    // === Motions ===
    pub thrust: AttackTiming,
    pub sweep: AttackTiming,
    /// Half width of the sweep arc (degrees)
    pub sweep_half_width_deg: f32,
    pub spin: AttackTiming,
    /// Full revolutions per spin
    pub spin_turns: u32,

    // === Contact damage ===
    /// Collision categories that can be damaged
    pub target_mask: u32,
    /// Damage used when the target has no attacker-relative hit resolution
    pub flat_damage: u32,
    /// Re-hit protection per target (seconds)
    pub per_target_cooldown: f32,
    /// Contacts are ignored this long after the weapon spawns (seconds)
    pub startup_debounce: f32,

    // === Cooldowns ===
    /// Quantization step of cooldown progress notifications (seconds)
    pub cooldown_step: f32,
    /// Cooldown refund applied to every combo skill on a kill (0 = off)
    pub kill_refund_secs: f32,
}

impl Default for ComboWeaponConfig {
    fn default() -> Self {
        Self::short_sword()
    }
}

impl ComboWeaponConfig {
    /// Короткий меч: быстрый thrust, широкий sweep, один оборот spin.
    pub fn short_sword() -> Self {
        Self {
            rest_radius: 0.9,
            pivot_offset: Vec2::new(0.0, -0.1),
            center_to_handle: 0.35,
            sprite_forward_offset_deg: -45.0,
            blade_half_extents: Vec2::new(0.4, 0.08),

            thrust: AttackTiming {
                duration: 0.18,
                extra_reach: 0.6,
                cooldown: 0.35,
            },
            sweep: AttackTiming {
                duration: 0.25,
                extra_reach: 0.2,
                cooldown: 0.6,
            },
            sweep_half_width_deg: 60.0,
            spin: AttackTiming {
                duration: 0.45,
                extra_reach: 0.3,
                cooldown: 2.0,
            },
            spin_turns: 1,

            target_mask: COLLISION_LAYER_TARGETS,
            flat_damage: 10,
            per_target_cooldown: 0.5,
            startup_debounce: 0.1,

            cooldown_step: 0.05,
            kill_refund_secs: 0.0,
        }
    }

    /// Тяжёлый молот: медленнее, дальше, два оборота spin.
    pub fn heavy_hammer() -> Self {
        Self {
            rest_radius: 1.1,
            center_to_handle: 0.55,
            blade_half_extents: Vec2::new(0.6, 0.2),
            thrust: AttackTiming {
                duration: 0.3,
                extra_reach: 0.4,
                cooldown: 0.8,
            },
            sweep: AttackTiming {
                duration: 0.4,
                extra_reach: 0.3,
                cooldown: 1.2,
            },
            sweep_half_width_deg: 75.0,
            spin: AttackTiming {
                duration: 0.9,
                extra_reach: 0.5,
                cooldown: 4.0,
            },
            spin_turns: 2,
            flat_damage: 25,
            per_target_cooldown: 0.9,
            ..Self::short_sword()
        }
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    /// Longest configured attack motion (seconds).
    pub fn longest_motion(&self) -> f32 {
        self.thrust
            .duration
            .max(self.sweep.duration)
            .max(self.spin.duration)
    }

    /// Rejects values that would make the motion math undefined.
    ///
    /// Zero durations are allowed (clamped at runtime), non-finite numbers
    /// and negative lengths are not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("rest_radius", self.rest_radius),
            ("pivot_offset.x", self.pivot_offset.x),
            ("pivot_offset.y", self.pivot_offset.y),
            ("center_to_handle", self.center_to_handle),
            ("sprite_forward_offset_deg", self.sprite_forward_offset_deg),
            ("thrust.duration", self.thrust.duration),
            ("thrust.extra_reach", self.thrust.extra_reach),
            ("sweep.duration", self.sweep.duration),
            ("sweep.extra_reach", self.sweep.extra_reach),
            ("sweep_half_width_deg", self.sweep_half_width_deg),
            ("spin.duration", self.spin.duration),
            ("spin.extra_reach", self.spin.extra_reach),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidField {
                    field,
                    value,
                    reason: "must be finite",
                });
            }
        }

        let non_negative = [
            ("rest_radius", self.rest_radius),
            ("blade_half_extents.x", self.blade_half_extents.x),
            ("blade_half_extents.y", self.blade_half_extents.y),
            ("thrust.cooldown", self.thrust.cooldown),
            ("sweep.cooldown", self.sweep.cooldown),
            ("spin.cooldown", self.spin.cooldown),
            ("per_target_cooldown", self.per_target_cooldown),
            ("startup_debounce", self.startup_debounce),
            ("kill_refund_secs", self.kill_refund_secs),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidField {
                    field,
                    value,
                    reason: "must be a finite non-negative number",
                });
            }
        }

        if !(self.cooldown_step > 0.0) || !self.cooldown_step.is_finite() {
            return Err(ConfigError::InvalidField {
                field: "cooldown_step",
                value: self.cooldown_step,
                reason: "must be positive",
            });
        }

        if self.per_target_cooldown < self.longest_motion() {
            crate::log_warning(&format!(
                "per_target_cooldown ({:.3}s) is shorter than the longest attack ({:.3}s): \
                 a target may be hit twice by one attack",
                self.per_target_cooldown,
                self.longest_motion()
            ));
        }

        Ok(())
    }
}
