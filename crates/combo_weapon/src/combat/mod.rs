//! Combo weapon combat module
//!
//! Три state machine на двух entity:
//! - wielder: `CooldownManager` (named skill cooldowns)
//! - weapon: `WeaponMotionController` (idle / thrust / sweep / spin) и
//!   `ContactDamageResolver` (hit gate + per-target debounce)
//!
//! Physics слой (rapier или любой другой) только сообщает `ContactBegan`,
//! spatial queries здесь не делаются.

use bevy::prelude::*;

pub mod components;
pub mod damage;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use damage::{mitigated_damage, resolve_hit, ArmoredTarget, DamageDealt, Dead, EntityDied, HitReceiver};
pub use systems::*;

/// Combat Plugin
///
/// Регистрирует combo системы в FixedUpdate (60Hz).
///
/// Порядок выполнения:
/// 1. tick_skill_cooldowns: обновление cooldown таймеров
/// 2. process_attack_intents: admission check, cooldown trigger
/// 3. update_weapon_motion: pose оружия
/// 4. resolve_weapon_contacts: ContactBegan → damage
/// 5. tick_hit_records: startup debounce + per-target records
/// 6. refund_cooldowns_on_kill: EntityDied → CooldownManager::reduce
/// 7. publish_cooldown_notices: буфер уведомлений → events
///
/// Physics adapter (`RapierContactFeedPlugin`) встраивается перед шагом 4.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<ComboAttackIntent>()
            .add_event::<AttackStarted>()
            .add_event::<AttackFinished>()
            .add_event::<ContactBegan>()
            .add_event::<CooldownChanged>()
            .add_event::<SkillReady>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.register_type::<KillRefund>();

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: Cooldowns
                tick_skill_cooldowns,
                // Фаза 2: Intents → motion
                process_attack_intents,
                update_weapon_motion,
                // Фаза 3: Contacts → damage
                resolve_weapon_contacts,
                tick_hit_records,
                // Фаза 4: Kill refund + HUD notifications
                refund_cooldowns_on_kill,
                publish_cooldown_notices,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
