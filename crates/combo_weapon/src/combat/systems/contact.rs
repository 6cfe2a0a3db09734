//! Weapon contact → damage systems.

use bevy::prelude::*;

use crate::combat::{
    resolve_hit, ArmoredTarget, ContactBegan, ContactDamageResolver, ContactVerdict, DamageDealt, Dead,
    EntityDied, WeaponMotionController,
};
use crate::components::{CombatStats, Health};
use crate::physics::{get_layer_name, ContactPayload};

/// System: ContactBegan → gate → damage
///
/// 1. Находим weapon (self_shape или его ContactPayload)
/// 2. `ContactDamageResolver::evaluate` (attacking / mask / hit record / debounce)
/// 3. Цель решает урон через `HitReceiver` (armor или flat)
/// 4. Hit record + DamageDealt (+ EntityDied / Dead)
pub fn resolve_weapon_contacts(
    mut commands: Commands,
    mut contacts: EventReader<ContactBegan>,
    mut weapons: Query<(&mut ContactDamageResolver, &WeaponMotionController)>,
    payloads: Query<&ContactPayload>,
    attackers: Query<&CombatStats>,
    mut targets: Query<(&mut Health, Option<&CombatStats>, Has<Dead>)>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for contact in contacts.read() {
        let weapon = payloads.get(contact.self_shape).map(|p| p.0).unwrap_or(contact.self_shape);
        let Ok((mut resolver, controller)) = weapons.get_mut(weapon) else {
            continue;
        };

        let target = match resolver.evaluate(weapon, contact, controller.is_attacking()) {
            ContactVerdict::Accept(target) => target,
            ContactVerdict::NotAttacking | ContactVerdict::SelfContact => continue,
            ContactVerdict::FilteredCategory => {
                crate::log(&format!(
                    "combo: contact {:?} → {:?} filtered ({})",
                    weapon,
                    contact.target(),
                    get_layer_name(contact.other_category_bits)
                ));
                continue;
            }
            verdict => {
                crate::log(&format!(
                    "combo: contact {:?} → {:?} ignored ({:?})",
                    weapon,
                    contact.target(),
                    verdict
                ));
                continue;
            }
        };

        let Ok((mut health, target_stats, is_dead)) = targets.get_mut(target) else {
            // Без Health цель не damageable: ни урона, ни hit record
            crate::log(&format!("combo: {:?} has no Health, hit dropped", target));
            continue;
        };
        if is_dead || !health.is_alive() {
            continue;
        }

        let attacker = resolver.attacker(weapon);
        let attacker_stats = attackers.get(attacker).ok();

        let damage = match target_stats {
            Some(stats) => resolve_hit(
                &mut ArmoredTarget {
                    health: &mut *health,
                    stats,
                },
                attacker_stats,
                resolver.flat_damage,
            ),
            None => resolve_hit(&mut *health, attacker_stats, resolver.flat_damage),
        };
        resolver.record_hit(target);

        let target_died = !health.is_alive();

        crate::log(&format!(
            "💥 {:?} hits {:?} for {} (health: {}/{})",
            attacker, target, damage, health.current, health.max
        ));

        damage_dealt_events.write(DamageDealt {
            attacker,
            target,
            damage,
            target_died,
        });

        if target_died {
            crate::log_info(&format!("💀 {:?} killed by {:?}", target, attacker));
            commands.entity(target).insert(Dead);
            entity_died_events.write(EntityDied {
                entity: target,
                killer: Some(attacker),
            });
        }
    }
}

/// System: decay startup debounce + hit records
pub fn tick_hit_records(mut resolvers: Query<&mut ContactDamageResolver>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut resolver in resolvers.iter_mut() {
        resolver.tick(delta);
    }
}
