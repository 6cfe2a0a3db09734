//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: wielder и цели (Wielder, Health, CombatStats, ComboSession)
//! - weapon: геометрия оружия и weak back-reference на wielder (Weapon)
//!
//! Боевые state machine компоненты (CooldownManager, WeaponMotionController,
//! ContactDamageResolver) живут в `crate::combat::components`.

pub mod actor;
pub mod weapon;

// Re-exports для удобного импорта
pub use actor::*;
pub use weapon::*;
