//! Headless combo weapon симуляция
//!
//! Wielder в кольце тренировочных манекенов, seeded RNG выбирает атаки.
//! Вместо rapier контакты даёт distance probe (тот же `ContactBegan` контракт).
//!
//! Usage: `combo_weapon [seed] [config.ron]`

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::{CollisionGroups, Group};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use combo_weapon::combat::{process_attack_intents, resolve_weapon_contacts, update_weapon_motion};
use combo_weapon::physics::{COLLISION_LAYER_TARGETS, COLLISION_MASK_WEAPONS};
use combo_weapon::{
    begin_combo_session, create_headless_app, weapon_sensor_body, AttackRequest, AttackStarted,
    ComboAttackIntent, ComboSession, ComboWeaponConfig, ContactBegan, ContactDamageResolver, DamageDealt,
    DeterministicRng, EntityDied, Health, Weapon, Wielder,
};

const TICKS: u32 = 1200;
const DUMMY_COUNT: usize = 6;
const DUMMY_RING_RADIUS: f32 = 1.3;
/// Weapon center ↔ dummy center distance that counts as overlap
const PROBE_RADIUS: f32 = 0.6;
/// Chance per tick that the wielder tries an attack
const INTENT_CHANCE: f64 = 0.15;

#[derive(Component)]
struct Dummy;

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let config = match args.next() {
        Some(path) => match ComboWeaponConfig::load_ron(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                std::process::exit(1);
            }
        },
        None => ComboWeaponConfig::short_sword(),
    };

    println!("Starting combo weapon headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_systems(
            FixedUpdate,
            (
                script_intents.before(process_attack_intents),
                probe_weapon_contacts
                    .after(update_weapon_motion)
                    .before(resolve_weapon_contacts),
            ),
        );

    let wielder = app.world_mut().spawn(Transform::default()).id();
    let weapon = app.world_mut().spawn(weapon_sensor_body(&config)).id();
    for i in 0..DUMMY_COUNT {
        let angle = i as f32 / DUMMY_COUNT as f32 * std::f32::consts::TAU;
        let position = Vec2::from_angle(angle) * DUMMY_RING_RADIUS;
        app.world_mut().spawn((
            Dummy,
            Health::new(60),
            Transform::from_translation(position.extend(0.0)),
            CollisionGroups::new(
                Group::from_bits_truncate(COLLISION_LAYER_TARGETS),
                Group::from_bits_truncate(COLLISION_MASK_WEAPONS),
            ),
        ));
    }

    if let Err(err) = begin_combo_session(app.world_mut(), wielder, weapon, &config) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }

    let mut started: BTreeMap<&'static str, u32> = BTreeMap::new();
    let mut hits = 0u32;
    let mut total_damage = 0u32;
    let mut kills = 0u32;

    for tick in 0..TICKS {
        app.update();

        let world = app.world_mut();
        for event in world.resource_mut::<Events<AttackStarted>>().drain() {
            *started.entry(event.kind.skill()).or_default() += 1;
        }
        for event in world.resource_mut::<Events<DamageDealt>>().drain() {
            hits += 1;
            total_damage += event.damage;
        }
        kills += world.resource_mut::<Events<EntityDied>>().drain().count() as u32;

        if tick % 200 == 0 {
            println!("Tick {}: {} hits, {} kills", tick, hits, kills);
        }
    }

    println!("Simulation complete!");
    println!("  attacks: {:?}", started);
    println!("  hits: {} (total damage {})", hits, total_damage);
    println!("  kills: {}/{}", kills, DUMMY_COUNT);

    let world = app.world_mut();
    let mut dummies = world.query_filtered::<(Entity, &Health), With<Dummy>>();
    for (entity, health) in dummies.iter(world) {
        println!("  {:?}: {}/{}", entity, health.current, health.max);
    }
}

/// Seeded "AI": случайная атака в сторону случайного живого манекена.
fn script_intents(
    mut rng: ResMut<DeterministicRng>,
    wielders: Query<(Entity, &ComboSession), With<Wielder>>,
    dummies: Query<(&Transform, &Health), With<Dummy>>,
    mut intents: EventWriter<ComboAttackIntent>,
) {
    let alive: Vec<Vec2> = dummies
        .iter()
        .filter(|(_, health)| health.is_alive())
        .map(|(transform, _)| transform.translation.truncate())
        .collect();
    if alive.is_empty() {
        return;
    }

    for (wielder, session) in wielders.iter() {
        if !session.is_active() || !rng.rng.gen_bool(INTENT_CHANCE) {
            continue;
        }

        let target = alive[rng.rng.gen_range(0..alive.len())];
        let request = match rng.rng.gen_range(0..3) {
            0 => AttackRequest::Thrust { target },
            1 => AttackRequest::Sweep { target },
            _ => AttackRequest::Spin {
                counter_clockwise: rng.rng.gen_bool(0.5),
            },
        };
        intents.write(ComboAttackIntent { wielder, request });
    }
}

/// Stand-in physics: reports overlap begin between weapon center and dummies.
fn probe_weapon_contacts(
    weapons: Query<(Entity, &Transform), (With<Weapon>, With<ContactDamageResolver>)>,
    targets: Query<(Entity, &Transform, &CollisionGroups), With<Dummy>>,
    mut overlapping: Local<BTreeSet<(Entity, Entity)>>,
    mut contacts: EventWriter<ContactBegan>,
) {
    for (weapon, weapon_transform) in weapons.iter() {
        let blade = weapon_transform.translation.truncate();

        for (target, target_transform, groups) in targets.iter() {
            let inside = blade.distance(target_transform.translation.truncate()) < PROBE_RADIUS;
            let pair = (weapon, target);

            if !inside {
                overlapping.remove(&pair);
                continue;
            }
            // Как rapier: только на входе в overlap
            if overlapping.insert(pair) {
                contacts.write(ContactBegan {
                    self_shape: weapon,
                    other_shape: target,
                    other_category_bits: groups.memberships.bits(),
                    other_payload: None,
                });
            }
        }
    }
}
