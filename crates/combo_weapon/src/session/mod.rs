//! Combo session lifecycle
//!
//! Weapon entity создаёт caller (со своим rigid body / collider), session
//! только связывает его с wielder и вешает state machine компоненты.
//! Cooldown'ы живут на wielder и переживают session.

use bevy::prelude::*;
use bevy_rapier2d::prelude::RigidBody;
use thiserror::Error;

use crate::combat::{
    polar_pose, ContactDamageResolver, CooldownManager, KillRefund, MotionProfile, WeaponMotionController, SPIN_SKILL,
    SWEEP_SKILL, THRUST_SKILL,
};
use crate::components::{ComboSession, Weapon, Wielder};
use crate::config::{ComboWeaponConfig, ConfigError};

/// Fatal setup error: session can't start with these collaborators.
#[derive(Debug, Error)]
pub enum ComboSetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{role} entity {entity:?} does not exist")]
    UnknownEntity { role: &'static str, entity: Entity },

    #[error("weapon and wielder are the same entity {0:?}")]
    WeaponIsWielder(Entity),

    #[error("wielder {0:?} has no Transform")]
    MissingTransform(Entity),

    #[error("weapon {0:?} has no rigid body")]
    MissingRigidBody(Entity),

    #[error("wielder {wielder:?} already has an active session (weapon {weapon:?})")]
    SessionActive { wielder: Entity, weapon: Entity },
}

/// Binds `weapon` to `wielder` and starts a combo session.
///
/// Wielder получает `Wielder` (+ required components, существующие не
/// перезаписываются), skill totals и step квантования из `config`.
/// Weapon получает `Weapon`, `WeaponMotionController`, `ContactDamageResolver`
/// и сразу ставится в idle pose.
pub fn begin_combo_session(
    world: &mut World,
    wielder: Entity,
    weapon: Entity,
    config: &ComboWeaponConfig,
) -> Result<(), ComboSetupError> {
    config.validate()?;

    if world.get_entity(wielder).is_err() {
        return Err(ComboSetupError::UnknownEntity {
            role: "wielder",
            entity: wielder,
        });
    }
    if world.get_entity(weapon).is_err() {
        return Err(ComboSetupError::UnknownEntity {
            role: "weapon",
            entity: weapon,
        });
    }
    if wielder == weapon {
        return Err(ComboSetupError::WeaponIsWielder(wielder));
    }

    let Some(wielder_transform) = world.get::<Transform>(wielder).copied() else {
        return Err(ComboSetupError::MissingTransform(wielder));
    };
    if world.get::<RigidBody>(weapon).is_none() {
        return Err(ComboSetupError::MissingRigidBody(weapon));
    }

    if let Some(active) = world.get::<ComboSession>(wielder).and_then(|s| s.weapon) {
        if world.get_entity(active).is_ok() {
            return Err(ComboSetupError::SessionActive {
                wielder,
                weapon: active,
            });
        }
    }

    // === Wielder ===
    let mut wielder_entity = world.entity_mut(wielder);
    wielder_entity.insert(Wielder);

    if let Some(mut cooldowns) = wielder_entity.get_mut::<CooldownManager>() {
        configure_cooldowns(&mut cooldowns, config);
    }

    wielder_entity.insert(ComboSession { weapon: Some(weapon) });
    if config.kill_refund_secs > 0.0 {
        wielder_entity.insert(KillRefund {
            seconds: config.kill_refund_secs,
        });
    } else {
        wielder_entity.remove::<KillRefund>();
    }

    // === Weapon ===
    let geometry = Weapon::from_config(wielder, config);
    let controller = WeaponMotionController::new(MotionProfile::from_config(config), 0.0);

    let mut weapon_entity = world.entity_mut(weapon);
    let mut transform = weapon_entity.get::<Transform>().copied().unwrap_or_default();
    polar_pose(
        geometry.pivot(wielder_transform.translation.truncate()),
        controller.facing_deg(),
        geometry.rest_radius,
        geometry.center_to_handle,
        config.sprite_forward_offset_deg,
    )
    .apply(&mut transform);

    weapon_entity.insert((
        geometry,
        controller,
        ContactDamageResolver::from_config(config).with_owner(wielder),
        transform,
    ));

    crate::log_info(&format!(
        "combo: session started (wielder {:?}, weapon {:?})",
        wielder, weapon
    ));
    Ok(())
}

/// Ends the wielder's session and despawns its weapon.
///
/// Returns `false` if there was no active session. Cooldowns are kept.
pub fn end_combo_session(world: &mut World, wielder: Entity) -> bool {
    let Some(mut session) = world.get_mut::<ComboSession>(wielder) else {
        return false;
    };
    let Some(weapon) = session.weapon.take() else {
        return false;
    };

    // Weapon мог быть деспавнен снаружи
    world.despawn(weapon);

    crate::log_info(&format!(
        "combo: session ended (wielder {:?}, weapon {:?})",
        wielder, weapon
    ));
    true
}

fn configure_cooldowns(cooldowns: &mut CooldownManager, config: &ComboWeaponConfig) {
    cooldowns.set_notify_step(config.cooldown_step);
    cooldowns.set_total(THRUST_SKILL, config.thrust.cooldown);
    cooldowns.set_total(SWEEP_SKILL, config.sweep.cooldown);
    cooldowns.set_total(SPIN_SKILL, config.spin.cooldown);
}
