//! Weapon motion state machine: idle orbit, thrust, sweep, spin.
//!
//! # State machine
//!
//! ```text
//!          request_thrust ──► Thrust ──┐
//!        ╱                             │ a ≥ 1
//! Idle ──── request_sweep_toward ► Sweep ─┤──────► Idle (facing updated)
//!        ╲                             │
//!          request_spin ──► Spin ──────┘
//! ```
//!
//! Все три атаки взаимоисключающие: новая атака допускается только из Idle и
//! только если соответствующий skill cooldown готов. Запущенную атаку нельзя
//! отменить, она всегда доигрывает до конца (детерминированные hit windows).
//!
//! # Geometry
//!
//! Каждый тик вычисляется пара (angle, radius) вокруг pivot:
//! - grip point: `pivot + radius·(cos, sin)`
//! - visual center: `grip − center_to_handle·(cos, sin)`
//! - render angle: `angle + sprite_forward_offset_deg`

use bevy::prelude::*;

use super::cooldown::CooldownManager;
use crate::components::Weapon;
use crate::config::{AttackTiming, ComboWeaponConfig};

pub const THRUST_SKILL: &str = "thrust";
pub const SWEEP_SKILL: &str = "sweep";
pub const SPIN_SKILL: &str = "spin";

/// Motion durations are clamped up to this (seconds) so progress stays defined.
pub const MIN_MOTION_DURATION: f32 = 0.001;

/// Aim vectors shorter than this have no well-defined angle.
const MIN_AIM_LENGTH: f32 = 1e-4;

/// Attack kinds, one per named skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AttackKind {
    Thrust,
    Sweep,
    Spin,
}

impl AttackKind {
    pub const ALL: [AttackKind; 3] = [AttackKind::Thrust, AttackKind::Sweep, AttackKind::Spin];

    /// Cooldown skill name.
    pub fn skill(&self) -> &'static str {
        match self {
            AttackKind::Thrust => THRUST_SKILL,
            AttackKind::Sweep => SWEEP_SKILL,
            AttackKind::Spin => SPIN_SKILL,
        }
    }
}

/// Angular direction (math convention: counter-clockwise = increasing angle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum RotationDirection {
    CounterClockwise,
    Clockwise,
}

impl RotationDirection {
    pub fn from_ccw(counter_clockwise: bool) -> Self {
        if counter_clockwise {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }

    pub fn sign(&self) -> f32 {
        match self {
            Self::CounterClockwise => 1.0,
            Self::Clockwise => -1.0,
        }
    }
}

/// Active motion. Exactly one variant at a time.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum AttackState {
    Idle,
    Thrust {
        angle_deg: f32,
        elapsed: f32,
    },
    Sweep {
        base_deg: f32,
        direction: RotationDirection,
        elapsed: f32,
    },
    Spin {
        start_deg: f32,
        direction: RotationDirection,
        turns: u32,
        elapsed: f32,
    },
}

impl Default for AttackState {
    fn default() -> Self {
        Self::Idle
    }
}

impl AttackState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AttackState::Idle)
    }

    pub fn kind(&self) -> Option<AttackKind> {
        match self {
            AttackState::Idle => None,
            AttackState::Thrust { .. } => Some(AttackKind::Thrust),
            AttackState::Sweep { .. } => Some(AttackKind::Sweep),
            AttackState::Spin { .. } => Some(AttackKind::Spin),
        }
    }
}

/// Motion parameters extracted from `ComboWeaponConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    pub thrust: AttackTiming,
    pub sweep: AttackTiming,
    pub sweep_half_width_deg: f32,
    pub spin: AttackTiming,
    pub spin_turns: u32,
    pub sprite_forward_offset_deg: f32,
}

impl MotionProfile {
    pub fn from_config(config: &ComboWeaponConfig) -> Self {
        Self {
            thrust: config.thrust,
            sweep: config.sweep,
            sweep_half_width_deg: config.sweep_half_width_deg,
            spin: config.spin,
            spin_turns: config.spin_turns,
            sprite_forward_offset_deg: config.sprite_forward_offset_deg,
        }
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::from_config(&ComboWeaponConfig::default())
    }
}

/// Weapon transform for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponPose {
    /// Grip point
    pub handle: Vec2,
    /// Visual center (where the weapon entity is placed)
    pub center: Vec2,
    /// Polar working angle (degrees)
    pub angle_deg: f32,
    /// Working radius (pivot → grip)
    pub radius: f32,
    /// Render rotation (working angle + sprite forward offset, degrees)
    pub rotation_deg: f32,
}

impl WeaponPose {
    /// Writes position and Z rotation; keeps the transform's depth and scale.
    pub fn apply(&self, transform: &mut Transform) {
        transform.translation.x = self.center.x;
        transform.translation.y = self.center.y;
        transform.rotation = Quat::from_rotation_z(self.rotation_deg.to_radians());
    }
}

/// Result of one `update` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    pub pose: WeaponPose,
    /// Attack that completed during this update
    pub finished: Option<AttackKind>,
}

/// Weapon motion state machine (lives on the weapon entity).
#[derive(Component, Debug, Clone)]
pub struct WeaponMotionController {
    pub profile: MotionProfile,
    state: AttackState,
    facing_deg: f32,
}

impl Default for WeaponMotionController {
    fn default() -> Self {
        Self::new(MotionProfile::default(), 0.0)
    }
}

impl WeaponMotionController {
    pub fn new(profile: MotionProfile, facing_deg: f32) -> Self {
        Self {
            profile,
            state: AttackState::Idle,
            facing_deg,
        }
    }

    pub fn state(&self) -> AttackState {
        self.state
    }

    /// Resting heading (degrees, not normalized).
    pub fn facing_deg(&self) -> f32 {
        self.facing_deg
    }

    /// Единственный сигнал для ContactDamageResolver.
    pub fn is_attacking(&self) -> bool {
        !self.state.is_idle()
    }

    /// Thrust toward `target`. Returns `true` if admitted.
    pub fn request_thrust(
        &mut self,
        pivot: Vec2,
        target: Vec2,
        cooldowns: &mut CooldownManager,
    ) -> bool {
        if !self.admits(AttackKind::Thrust, cooldowns) {
            return false;
        }
        let Some(angle_deg) = aim_angle_deg(pivot, target) else {
            crate::log("combo: thrust rejected (zero-length aim)");
            return false;
        };

        self.state = AttackState::Thrust {
            angle_deg,
            elapsed: 0.0,
        };
        cooldowns.trigger(THRUST_SKILL);
        true
    }

    /// Arc sweep centered on the aim angle toward `target`. Returns `true` if admitted.
    pub fn request_sweep_toward(
        &mut self,
        pivot: Vec2,
        target: Vec2,
        cooldowns: &mut CooldownManager,
    ) -> bool {
        if !self.admits(AttackKind::Sweep, cooldowns) {
            return false;
        }
        let Some(base_deg) = aim_angle_deg(pivot, target) else {
            crate::log("combo: sweep rejected (zero-length aim)");
            return false;
        };

        self.state = AttackState::Sweep {
            base_deg,
            direction: sweep_direction(self.facing_deg, base_deg),
            elapsed: 0.0,
        };
        cooldowns.trigger(SWEEP_SKILL);
        true
    }

    /// Full rotation starting from the current facing. Returns `true` if admitted.
    pub fn request_spin(&mut self, counter_clockwise: bool, cooldowns: &mut CooldownManager) -> bool {
        if !self.admits(AttackKind::Spin, cooldowns) {
            return false;
        }

        self.state = AttackState::Spin {
            start_deg: self.facing_deg,
            direction: RotationDirection::from_ccw(counter_clockwise),
            turns: self.profile.spin_turns.max(1),
            elapsed: 0.0,
        };
        cooldowns.trigger(SPIN_SKILL);
        true
    }

    fn admits(&self, kind: AttackKind, cooldowns: &CooldownManager) -> bool {
        if let Some(active) = self.state.kind() {
            crate::log(&format!("combo: {:?} rejected ({:?} in progress)", kind, active));
            return false;
        }
        if !cooldowns.is_ready(kind.skill()) {
            crate::log(&format!(
                "combo: {:?} rejected (cooldown {:.2}s)",
                kind,
                cooldowns.remaining(kind.skill())
            ));
            return false;
        }
        true
    }

    /// Advances the active motion by `delta_secs` and returns the new pose.
    pub fn update(&mut self, delta_secs: f32, pivot: Vec2, weapon: &Weapon) -> MotionStep {
        let delta = if delta_secs.is_finite() { delta_secs.max(0.0) } else { 0.0 };
        let rest = weapon.rest_radius;
        let profile = self.profile;

        // (working angle, radius, facing после завершения)
        let (angle_deg, radius, completed_facing) = match &mut self.state {
            AttackState::Idle => (self.facing_deg, rest, None),

            AttackState::Thrust { angle_deg, elapsed } => {
                *elapsed += delta;
                let a = motion_progress(*elapsed, profile.thrust.duration);
                let radius = rest + thrust_bump(a) * profile.thrust.extra_reach;
                let done = (a >= 1.0).then_some(*angle_deg);
                (*angle_deg, radius, done)
            }

            AttackState::Sweep {
                base_deg,
                direction,
                elapsed,
            } => {
                *elapsed += delta;
                let a = motion_progress(*elapsed, profile.sweep.duration);
                let half = profile.sweep_half_width_deg;
                let relative = -half + a * 2.0 * half;
                let angle = *base_deg + direction.sign() * relative;
                let done = (a >= 1.0).then(|| *base_deg + direction.sign() * half);
                (angle, rest + profile.sweep.extra_reach, done)
            }

            AttackState::Spin {
                start_deg,
                direction,
                turns,
                elapsed,
            } => {
                *elapsed += delta;
                let a = motion_progress(*elapsed, profile.spin.duration);
                let sweep = 360.0 * *turns as f32;
                let angle = *start_deg + direction.sign() * a * sweep;
                // Без нормализации в [0, 360): 10° + 1 оборот CCW = 370°
                let done = (a >= 1.0).then(|| *start_deg + direction.sign() * sweep);
                (angle, rest + profile.spin.extra_reach, done)
            }
        };

        let mut finished = None;
        if let Some(facing) = completed_facing {
            finished = self.state.kind();
            self.facing_deg = facing;
            self.state = AttackState::Idle;
        }

        MotionStep {
            pose: polar_pose(
                pivot,
                angle_deg,
                radius,
                weapon.center_to_handle,
                profile.sprite_forward_offset_deg,
            ),
            finished,
        }
    }
}

/// `min(elapsed / duration, 1)` with the duration clamped to `MIN_MOTION_DURATION`.
pub fn motion_progress(elapsed: f32, duration: f32) -> f32 {
    let duration = if duration.is_finite() {
        duration.max(MIN_MOTION_DURATION)
    } else {
        MIN_MOTION_DURATION
    };
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Symmetric parabola: 0 at a=0 and a=1, peak 1.0 at a=0.5.
pub fn thrust_bump(a: f32) -> f32 {
    4.0 * a * (1.0 - a)
}

/// Aim angle from `pivot` toward `target` (degrees), `None` for a degenerate vector.
pub fn aim_angle_deg(pivot: Vec2, target: Vec2) -> Option<f32> {
    let aim = target - pivot;
    if !aim.is_finite() || aim.length() < MIN_AIM_LENGTH {
        return None;
    }
    Some(aim.y.atan2(aim.x).to_degrees())
}

/// Signed delta from `from_deg` to `to_deg` used to pick the sweep direction.
///
/// Reduced modulo 360 (truncating, keeps the dividend's sign), then deltas
/// above 180 are folded back by one turn. Deltas below −180 are NOT folded:
/// the rule is asymmetric and is not the shortest signed arc
/// (facing 350°, aim 10° gives −340°, i.e. a clockwise sweep).
pub fn sweep_delta_deg(from_deg: f32, to_deg: f32) -> f32 {
    let mut delta = (to_deg - from_deg) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

pub fn sweep_direction(facing_deg: f32, base_deg: f32) -> RotationDirection {
    if sweep_delta_deg(facing_deg, base_deg) >= 0.0 {
        RotationDirection::CounterClockwise
    } else {
        RotationDirection::Clockwise
    }
}

/// Converts a polar (angle, radius) around `pivot` into a weapon pose.
pub fn polar_pose(
    pivot: Vec2,
    angle_deg: f32,
    radius: f32,
    center_to_handle: f32,
    sprite_forward_offset_deg: f32,
) -> WeaponPose {
    let direction = Vec2::from_angle(angle_deg.to_radians());
    let handle = pivot + direction * radius;

    WeaponPose {
        handle,
        center: handle - direction * center_to_handle,
        angle_deg,
        radius,
        rotation_deg: angle_deg + sprite_forward_offset_deg,
    }
}
