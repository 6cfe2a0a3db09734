//! Collision category constants.
//!
//! - **Layer (memberships):** на каком слое находится collider
//! - **Mask (filters):** с какими слоями collider пересекается
//!
//! `ContactDamageResolver` сравнивает `other_category_bits` контакта со своим
//! `target_mask`, поэтому урон получают только коллайдеры из целевых слоёв.

/// Layer 1: Wielders (персонажи с оружием)
pub const COLLISION_LAYER_WIELDERS: u32 = 0b10; // 2

/// Layer 2: Environment (стены, препятствия)
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100; // 4

/// Layer 3: Targets (враги, манекены, разрушаемые объекты)
pub const COLLISION_LAYER_TARGETS: u32 = 0b1000; // 8

/// Layer 4: Weapons (sensor colliders оружия)
pub const COLLISION_LAYER_WEAPONS: u32 = 0b10000; // 16

/// Mask: weapon sensor reports overlaps with targets + environment.
///
/// Environment контакты отсекаются `target_mask`, но остаются видны
/// внешним наблюдателям (искры, звук).
pub const COLLISION_MASK_WEAPONS: u32 = COLLISION_LAYER_TARGETS | COLLISION_LAYER_ENVIRONMENT;

/// Название слоя для debug логов
pub fn get_layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        COLLISION_LAYER_WIELDERS => "Wielders",
        COLLISION_LAYER_ENVIRONMENT => "Environment",
        COLLISION_LAYER_TARGETS => "Targets",
        COLLISION_LAYER_WEAPONS => "Weapons",
        _ => "Unknown",
    }
}
