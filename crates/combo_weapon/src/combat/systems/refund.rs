//! On-kill cooldown refund.

use bevy::prelude::*;

use crate::combat::{CooldownManager, EntityDied, SPIN_SKILL, SWEEP_SKILL, THRUST_SKILL};
use crate::components::Weapon;

/// Wielder perk: every kill shortens all combo cooldowns by `seconds`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct KillRefund {
    pub seconds: f32,
}

/// System: EntityDied (killer = wielder или его weapon) → CooldownManager::reduce
pub fn refund_cooldowns_on_kill(
    mut death_events: EventReader<EntityDied>,
    weapons: Query<&Weapon>,
    mut wielders: Query<(&KillRefund, &mut CooldownManager)>,
) {
    for event in death_events.read() {
        let Some(killer) = event.killer else {
            continue;
        };

        // Resolver без owner'а атакует от имени weapon entity
        let wielder = weapons.get(killer).map(|w| w.wielder).unwrap_or(killer);

        let Ok((refund, mut cooldowns)) = wielders.get_mut(wielder) else {
            continue;
        };
        if !(refund.seconds > 0.0) {
            continue;
        }

        for skill in [THRUST_SKILL, SWEEP_SKILL, SPIN_SKILL] {
            cooldowns.reduce(skill, refund.seconds);
        }

        crate::log(&format!(
            "⏱️ {:?}: kill refund {:.2}s ({:?} died)",
            wielder, refund.seconds, event.entity
        ));
    }
}
