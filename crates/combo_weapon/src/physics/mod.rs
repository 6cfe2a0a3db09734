//! Physics glue (bevy_rapier2d)
//!
//! Симуляция не делает spatial queries сама: physics layer сообщает контакты,
//! оружие: kinematic sensor body, которое двигает `update_weapon_motion`.

pub mod collision_layers;
pub mod contact_feed;

// Re-export основных типов
pub use collision_layers::*;
pub use contact_feed::{feed_rapier_contacts, weapon_sensor_body, ContactPayload, RapierContactFeedPlugin};
