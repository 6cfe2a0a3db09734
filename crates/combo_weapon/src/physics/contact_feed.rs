//! Rapier → ECS contact feed.
//!
//! Translates `CollisionEvent::Started` pairs that involve a combo weapon into
//! `ContactBegan` events for `resolve_weapon_contacts`.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::collision_layers::{COLLISION_LAYER_WEAPONS, COLLISION_MASK_WEAPONS};
use crate::combat::{resolve_weapon_contacts, update_weapon_motion, ContactBegan, ContactDamageResolver};
use crate::config::ComboWeaponConfig;

/// Points a collider entity at the game entity it belongs to.
///
/// Put it on child colliders (hurtboxes, blade shapes) so contacts resolve to
/// the actor / weapon instead of the shape.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ContactPayload(pub Entity);

/// Adds the rapier contact adapter in front of the damage resolver.
///
/// Requires `RapierPhysicsPlugin` for real contacts; without it the adapter
/// simply never sees an event.
pub struct RapierContactFeedPlugin;

impl Plugin for RapierContactFeedPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>().add_systems(
            FixedUpdate,
            feed_rapier_contacts
                .after(update_weapon_motion)
                .before(resolve_weapon_contacts),
        );
    }
}

/// System: CollisionEvent::Started → ContactBegan (one per weapon side).
pub fn feed_rapier_contacts(
    mut collisions: EventReader<CollisionEvent>,
    weapons: Query<(), With<ContactDamageResolver>>,
    payloads: Query<&ContactPayload>,
    groups: Query<&CollisionGroups>,
    mut contacts: EventWriter<ContactBegan>,
) {
    for event in collisions.read() {
        // Stopped не интересен: повторный удар гейтится hit records, не выходом из overlap
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };

        for (self_shape, other_shape) in [(*a, *b), (*b, *a)] {
            let weapon = payloads.get(self_shape).map(|p| p.0).unwrap_or(self_shape);
            if !weapons.contains(weapon) {
                continue;
            }

            // Collider без CollisionGroups в rapier пересекается со всеми слоями
            let other_category_bits = groups
                .get(other_shape)
                .map(|g| g.memberships.bits())
                .unwrap_or(u32::MAX);

            contacts.write(ContactBegan {
                self_shape,
                other_shape,
                other_category_bits,
                other_payload: payloads.get(other_shape).ok().map(|p| p.0),
            });
        }
    }
}

/// Kinematic sensor body for a combo weapon.
///
/// Callers that build their own body only need *some* `RigidBody` on the
/// weapon entity; this is the default shape.
pub fn weapon_sensor_body(config: &ComboWeaponConfig) -> impl Bundle {
    (
        RigidBody::KinematicPositionBased,
        Collider::cuboid(config.blade_half_extents.x, config.blade_half_extents.y),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default()
            | ActiveCollisionTypes::KINEMATIC_KINEMATIC
            | ActiveCollisionTypes::KINEMATIC_STATIC,
        CollisionGroups::new(
            Group::from_bits_truncate(COLLISION_LAYER_WEAPONS),
            Group::from_bits_truncate(COLLISION_MASK_WEAPONS | config.target_mask),
        ),
    )
}
