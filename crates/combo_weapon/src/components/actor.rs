//! Actor components: Wielder, Health, CombatStats, ComboSession

use bevy::prelude::*;

use crate::combat::CooldownManager;

/// Актор, который держит combo-оружие.
///
/// Required Components добавляют всё, что нужно для combo session:
/// статы, здоровье, реестр cooldown'ов и слот под оружие.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, CombatStats, CooldownManager, ComboSession)]
pub struct Wielder;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Returns the damage actually removed (never more than `current`).
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

/// Stat record used on both sides of a hit.
///
/// Attacker side reads `base_damage`, armored targets subtract `armor`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CombatStats {
    pub base_damage: u32,
    pub armor: u32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            base_damage: 20,
            armor: 0,
        }
    }
}

impl CombatStats {
    pub fn new(base_damage: u32, armor: u32) -> Self {
        Self { base_damage, armor }
    }
}

/// Combo session slot: zero or one active weapon per wielder.
///
/// Weapon entity живёт ровно столько же, сколько session
/// (`begin_combo_session` / `end_combo_session`).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ComboSession {
    pub weapon: Option<Entity>,
}

impl ComboSession {
    pub fn is_active(&self) -> bool {
        self.weapon.is_some()
    }
}
