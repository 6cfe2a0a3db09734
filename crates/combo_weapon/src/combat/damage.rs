//! Damage resolution
//!
//! Цель решает, сколько урона она получает:
//! - `take_hit(&CombatStats)`: attacker-relative расчёт (опционально)
//! - `take_flat_damage(u32)`: fallback, обязателен для любой цели
//!
//! Выбор делается статически через impl `HitReceiver`, без runtime lookup.

use bevy::prelude::*;
use crate::components::{CombatStats, Health};

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Событие: entity умер (health дошёл до 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health == 0)
///
/// Мёртвые цели игнорируются resolver'ом. Деспавн не автоматический.
#[derive(Component, Debug)]
pub struct Dead;

/// Stat collaborator on the receiving side of a hit.
pub trait HitReceiver {
    /// Applies a fixed amount. Returns the damage actually taken.
    fn take_flat_damage(&mut self, amount: u32) -> u32;

    /// Attacker-relative hit. `None` means "not supported, use flat damage".
    fn take_hit(&mut self, _attacker: &CombatStats) -> Option<u32> {
        None
    }
}

impl HitReceiver for Health {
    fn take_flat_damage(&mut self, amount: u32) -> u32 {
        self.take_damage(amount)
    }
}

/// Target with its own stat record: armor mitigates attacker damage.
pub struct ArmoredTarget<'a> {
    pub health: &'a mut Health,
    pub stats: &'a CombatStats,
}

impl HitReceiver for ArmoredTarget<'_> {
    fn take_flat_damage(&mut self, amount: u32) -> u32 {
        self.health.take_damage(amount)
    }

    fn take_hit(&mut self, attacker: &CombatStats) -> Option<u32> {
        Some(self.health.take_damage(mitigated_damage(attacker, self.stats)))
    }
}

/// `max(1, base_damage − armor)`: a landed hit always deals something.
pub fn mitigated_damage(attacker: &CombatStats, target: &CombatStats) -> u32 {
    attacker.base_damage.saturating_sub(target.armor).max(1)
}

/// Resolves one hit: attacker-relative when both sides support it, flat otherwise.
pub fn resolve_hit(target: &mut dyn HitReceiver, attacker: Option<&CombatStats>, flat_damage: u32) -> u32 {
    if let Some(stats) = attacker {
        if let Some(applied) = target.take_hit(stats) {
            return applied;
        }
    }
    target.take_flat_damage(flat_damage)
}
