//! Contact damage gate: attack window, category mask, per-target re-hit
//! protection and startup debounce.

use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::config::ComboWeaponConfig;

/// Contact-begin report from the physics layer.
///
/// `self_shape` is the collider on the weapon side, `other_shape` the collider that
/// was touched. `other_payload` points at the game entity behind a child
/// collider (hurtbox → actor).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ContactBegan {
    pub self_shape: Entity,
    pub other_shape: Entity,
    pub other_category_bits: u32,
    pub other_payload: Option<Entity>,
}

impl ContactBegan {
    /// Entity that takes the hit: payload if supplied, else the touched shape.
    pub fn target(&self) -> Entity {
        self.other_payload.unwrap_or(self.other_shape)
    }
}

/// Outcome of `ContactDamageResolver::evaluate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactVerdict {
    /// Fresh contact, apply damage to this target
    Accept(Entity),
    NotAttacking,
    FilteredCategory,
    /// Contact with the weapon itself or its owner
    SelfContact,
    /// Target still inside its re-hit window
    AlreadyHit,
    StartupDebounce,
}

/// Contact damage rules of one weapon.
///
/// Инвариант: цель с активным hit record не получает урон повторно, даже если
/// она всё ещё внутри collider'а оружия. Records живут по своим таймерам,
/// а не до конца атаки.
#[derive(Component, Debug, Clone)]
pub struct ContactDamageResolver {
    /// Actor whose stats drive damage (`None` → the weapon entity itself)
    pub owner: Option<Entity>,
    /// Damageable collision categories
    pub target_mask: u32,
    /// Damage for targets without attacker-relative hit resolution
    pub flat_damage: u32,
    /// Re-hit protection per target (seconds)
    pub per_target_cooldown: f32,
    startup_debounce: f32,
    // BTreeMap: детерминированный порядок GC
    hit_records: BTreeMap<Entity, f32>,
}

impl Default for ContactDamageResolver {
    fn default() -> Self {
        Self::from_config(&ComboWeaponConfig::default())
    }
}

impl ContactDamageResolver {
    pub fn from_config(config: &ComboWeaponConfig) -> Self {
        Self {
            owner: None,
            target_mask: config.target_mask,
            flat_damage: config.flat_damage,
            per_target_cooldown: config.per_target_cooldown.max(0.0),
            startup_debounce: config.startup_debounce.max(0.0),
            hit_records: BTreeMap::new(),
        }
    }

    pub fn with_owner(mut self, owner: Entity) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Entity whose stats are used for the hit.
    pub fn attacker(&self, weapon: Entity) -> Entity {
        self.owner.unwrap_or(weapon)
    }

    /// Remaining startup debounce (seconds).
    pub fn startup_debounce(&self) -> f32 {
        self.startup_debounce
    }

    /// Classifies a contact. Pure: does not record anything.
    pub fn evaluate(&self, weapon: Entity, contact: &ContactBegan, attacking: bool) -> ContactVerdict {
        if !attacking {
            return ContactVerdict::NotAttacking;
        }
        if contact.other_category_bits & self.target_mask == 0 {
            return ContactVerdict::FilteredCategory;
        }

        let target = contact.target();
        if target == weapon || Some(target) == self.owner {
            return ContactVerdict::SelfContact;
        }
        if self.is_protected(target) {
            return ContactVerdict::AlreadyHit;
        }
        if self.startup_debounce > 0.0 {
            return ContactVerdict::StartupDebounce;
        }

        ContactVerdict::Accept(target)
    }

    /// Starts (or restarts) the re-hit window for `target`.
    pub fn record_hit(&mut self, target: Entity) {
        self.hit_records.insert(target, self.per_target_cooldown);
    }

    pub fn is_protected(&self, target: Entity) -> bool {
        self.hit_records.contains_key(&target)
    }

    /// Remaining protection for `target` (0 when unrecorded).
    pub fn protection_remaining(&self, target: Entity) -> f32 {
        self.hit_records.get(&target).copied().unwrap_or(0.0)
    }

    pub fn active_records(&self) -> usize {
        self.hit_records.len()
    }

    /// Decays startup debounce and hit records; drops records reaching ≤ 0.
    pub fn tick(&mut self, delta_secs: f32) {
        if !(delta_secs > 0.0) {
            return;
        }

        self.startup_debounce = (self.startup_debounce - delta_secs).max(0.0);

        for remaining in self.hit_records.values_mut() {
            *remaining -= delta_secs;
        }
        self.hit_records.retain(|_, remaining| *remaining > 0.0);
    }
}
