//! Attack intents and weapon pose update.
//!
//! Input/AI слой пишет `ComboAttackIntent`, дальше всё решает ECS:
//! admission check → cooldown trigger → motion → pose.

use bevy::prelude::*;

use crate::combat::{AttackKind, CooldownManager, WeaponMotionController};
use crate::components::{ComboSession, Weapon, Wielder};

/// Requested attack with its aim input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackRequest {
    /// Thrust toward a world point
    Thrust { target: Vec2 },
    /// Arc sweep centered on the aim toward a world point
    Sweep { target: Vec2 },
    Spin { counter_clockwise: bool },
}

impl AttackRequest {
    pub fn kind(&self) -> AttackKind {
        match self {
            AttackRequest::Thrust { .. } => AttackKind::Thrust,
            AttackRequest::Sweep { .. } => AttackKind::Sweep,
            AttackRequest::Spin { .. } => AttackKind::Spin,
        }
    }
}

/// Event: wielder ХОЧЕТ атаковать (fire-and-forget)
///
/// Отклонение (busy / cooldown / вырожденный aim): не ошибка, просто no-op.
#[derive(Event, Debug, Clone, Copy)]
pub struct ComboAttackIntent {
    pub wielder: Entity,
    pub request: AttackRequest,
}

/// Event: атака допущена (cooldown уже запущен)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackStarted {
    pub wielder: Entity,
    pub weapon: Entity,
    pub kind: AttackKind,
}

/// Event: атака доиграла, weapon снова Idle
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackFinished {
    pub wielder: Entity,
    pub weapon: Entity,
    pub kind: AttackKind,
    /// Resting heading after the attack (not normalized)
    pub facing_deg: f32,
}

/// System: ComboAttackIntent → admission check → AttackStarted
pub fn process_attack_intents(
    mut intents: EventReader<ComboAttackIntent>,
    mut wielders: Query<(&Transform, &mut CooldownManager, &ComboSession), With<Wielder>>,
    mut weapons: Query<(&Weapon, &mut WeaponMotionController)>,
    mut started_events: EventWriter<AttackStarted>,
) {
    for intent in intents.read() {
        let Ok((transform, mut cooldowns, session)) = wielders.get_mut(intent.wielder) else {
            crate::log(&format!("combo: intent from {:?} ignored (not a wielder)", intent.wielder));
            continue;
        };
        let Some(weapon_entity) = session.weapon else {
            crate::log(&format!("combo: intent from {:?} ignored (no active session)", intent.wielder));
            continue;
        };
        let Ok((weapon, mut controller)) = weapons.get_mut(weapon_entity) else {
            crate::log_warning(&format!(
                "combo: session weapon {:?} of {:?} has no motion controller",
                weapon_entity, intent.wielder
            ));
            continue;
        };

        let pivot = weapon.pivot(transform.translation.truncate());
        let admitted = match intent.request {
            AttackRequest::Thrust { target } => controller.request_thrust(pivot, target, &mut cooldowns),
            AttackRequest::Sweep { target } => controller.request_sweep_toward(pivot, target, &mut cooldowns),
            AttackRequest::Spin { counter_clockwise } => {
                controller.request_spin(counter_clockwise, &mut cooldowns)
            }
        };

        if admitted {
            let kind = intent.request.kind();
            crate::log(&format!("⚔️ {:?} starts {:?} (weapon {:?})", intent.wielder, kind, weapon_entity));
            started_events.write(AttackStarted {
                wielder: intent.wielder,
                weapon: weapon_entity,
                kind,
            });
        }
    }
}

/// System: шаг motion state machine + запись pose в Transform оружия
///
/// Единственное место, где меняется Transform оружия. Weapon, чей wielder
/// исчез, деспавнится вместе с незавершённой атакой.
pub fn update_weapon_motion(
    mut commands: Commands,
    wielders: Query<&Transform, (With<Wielder>, Without<Weapon>)>,
    mut weapons: Query<(Entity, &Weapon, &mut WeaponMotionController, &mut Transform)>,
    mut finished_events: EventWriter<AttackFinished>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (weapon_entity, weapon, mut controller, mut transform) in weapons.iter_mut() {
        let Ok(wielder_transform) = wielders.get(weapon.wielder) else {
            // Weapon живёт не дольше combo session своего wielder
            crate::log_warning(&format!(
                "combo: wielder {:?} gone, despawning weapon {:?} (state {:?})",
                weapon.wielder,
                weapon_entity,
                controller.state()
            ));
            commands.entity(weapon_entity).despawn();
            continue;
        };

        let pivot = weapon.pivot(wielder_transform.translation.truncate());
        let step = controller.update(delta, pivot, weapon);
        step.pose.apply(&mut transform);

        if let Some(kind) = step.finished {
            let facing_deg = controller.facing_deg();
            crate::log(&format!(
                "⚔️ {:?} finished {:?} (facing {:.1}°)",
                weapon.wielder, kind, facing_deg
            ));
            finished_events.write(AttackFinished {
                wielder: weapon.wielder,
                weapon: weapon_entity,
                kind,
                facing_deg,
            });
        }
    }
}
