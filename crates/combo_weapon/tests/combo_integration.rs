//! Integration тесты combo weapon (full plugin, stepped time)
//!
//! Проверяем весь pipeline: intent → admission → motion → contact → damage.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{CollisionEvent, CollisionGroups, Group};
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
use combo_weapon::physics::COLLISION_LAYER_TARGETS;
use combo_weapon::{
    begin_combo_session, create_stepped_app, end_combo_session, run_fixed_tick, weapon_sensor_body, AttackKind,
    AttackRequest, AttackStarted, CombatStats, ComboAttackIntent, ComboSession, ComboSetupError, ComboWeaponConfig,
    ContactBegan, ContactPayload, CooldownChanged, CooldownManager, DamageDealt, EntityDied, Health,
    RapierContactFeedPlugin, SkillReady, WeaponMotionController, SPIN_SKILL, THRUST_SKILL,
};

const DT: f32 = 1.0 / 60.0;

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn intent(app: &mut App, wielder: Entity, request: AttackRequest) {
    app.world_mut().send_event(ComboAttackIntent { wielder, request });
}

fn touch(app: &mut App, weapon: Entity, target: Entity) {
    app.world_mut().send_event(ContactBegan {
        self_shape: weapon,
        other_shape: target,
        other_category_bits: COLLISION_LAYER_TARGETS,
        other_payload: None,
    });
}

fn ticks(app: &mut App, count: usize) {
    for _ in 0..count {
        run_fixed_tick(app, DT);
    }
}

/// Wielder (base damage 20) + weapon с sensor body, debounce выключен
fn arena(config: &ComboWeaponConfig) -> (App, Entity, Entity) {
    let mut app = create_stepped_app(7);
    let wielder = app
        .world_mut()
        .spawn((Transform::default(), CombatStats::new(20, 0)))
        .id();
    let weapon = app.world_mut().spawn(weapon_sensor_body(config)).id();
    begin_combo_session(app.world_mut(), wielder, weapon, config).expect("session");
    (app, wielder, weapon)
}

fn quick_config() -> ComboWeaponConfig {
    let mut config = ComboWeaponConfig::short_sword();
    config.startup_debounce = 0.0;
    config
}

#[test]
fn test_weapon_without_rigid_body_fails_setup() {
    let mut app = create_stepped_app(1);
    let wielder = app.world_mut().spawn(Transform::default()).id();
    let weapon = app.world_mut().spawn(Transform::default()).id();

    let result = begin_combo_session(app.world_mut(), wielder, weapon, &ComboWeaponConfig::default());

    assert!(matches!(result, Err(ComboSetupError::MissingRigidBody(_))));
    assert!(app.world().get::<WeaponMotionController>(weapon).is_none());
}

#[test]
fn test_thrust_then_sweep_combo() {
    let (mut app, wielder, weapon) = arena(&quick_config());
    let front = app.world_mut().spawn(Health::new(100)).id();
    let side = app.world_mut().spawn(Health::new(100)).id();

    intent(&mut app, wielder, AttackRequest::Thrust { target: Vec2::X });
    touch(&mut app, weapon, front);
    ticks(&mut app, 30);

    // Thrust доиграл → sweep (другой skill, свой cooldown)
    intent(&mut app, wielder, AttackRequest::Sweep { target: Vec2::Y });
    touch(&mut app, weapon, side);
    ticks(&mut app, 30);

    let started: Vec<AttackKind> = drain::<AttackStarted>(&mut app).iter().map(|e| e.kind).collect();
    assert_eq!(started, vec![AttackKind::Thrust, AttackKind::Sweep]);

    let hits = drain::<DamageDealt>(&mut app);
    assert_eq!(hits.len(), 2);
    assert_eq!(app.world().get::<Health>(front).map(|h| h.current), Some(90));
    assert_eq!(app.world().get::<Health>(side).map(|h| h.current), Some(90));
}

#[test]
fn test_continuous_overlap_hits_once_per_attack() {
    let (mut app, wielder, weapon) = arena(&quick_config());
    let dummy = app.world_mut().spawn(Health::new(100)).id();

    intent(&mut app, wielder, AttackRequest::Spin { counter_clockwise: true });
    for _ in 0..40 {
        touch(&mut app, weapon, dummy);
        run_fixed_tick(&mut app, DT);
    }

    assert_eq!(drain::<DamageDealt>(&mut app).len(), 1);
}

#[test]
fn test_consecutive_frame_thrusts_single_notice() {
    let (mut app, wielder, _weapon) = arena(&quick_config());

    intent(&mut app, wielder, AttackRequest::Thrust { target: Vec2::X });
    run_fixed_tick(&mut app, DT);
    intent(&mut app, wielder, AttackRequest::Thrust { target: Vec2::X });
    run_fixed_tick(&mut app, DT);

    assert_eq!(drain::<AttackStarted>(&mut app).len(), 1);
    let changed: Vec<CooldownChanged> = drain::<CooldownChanged>(&mut app)
        .into_iter()
        .filter(|e| e.skill == THRUST_SKILL)
        .collect();
    assert_eq!(changed.len(), 1);
}

#[test]
fn test_end_session_mid_attack() {
    let config = quick_config();
    let (mut app, wielder, weapon) = arena(&config);

    intent(&mut app, wielder, AttackRequest::Spin { counter_clockwise: false });
    ticks(&mut app, 3);

    assert!(end_combo_session(app.world_mut(), wielder));
    assert!(app.world().get_entity(weapon).is_err());
    assert_eq!(app.world().get::<ComboSession>(wielder).and_then(|s| s.weapon), None);

    // Intent без session: тихий no-op; cooldown дотикивает до ready
    intent(&mut app, wielder, AttackRequest::Thrust { target: Vec2::X });
    let mut ready = Vec::new();
    for _ in 0..150 {
        run_fixed_tick(&mut app, DT);
        ready.extend(drain::<SkillReady>(&mut app));
    }
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].skill, SPIN_SKILL);
    assert_eq!(drain::<AttackStarted>(&mut app).len(), 1);

    // Новая session с новым weapon
    let next = app.world_mut().spawn(weapon_sensor_body(&config)).id();
    begin_combo_session(app.world_mut(), wielder, next, &config).expect("second session");
    intent(&mut app, wielder, AttackRequest::Spin { counter_clockwise: true });
    run_fixed_tick(&mut app, DT);
    assert_eq!(drain::<AttackStarted>(&mut app)[0].weapon, next);
}

#[test]
fn test_despawned_wielder_takes_weapon_with_it() {
    let (mut app, wielder, weapon) = arena(&quick_config());

    intent(&mut app, wielder, AttackRequest::Thrust { target: Vec2::X });
    run_fixed_tick(&mut app, DT);
    assert!(app
        .world()
        .get::<WeaponMotionController>(weapon)
        .is_some_and(|c| c.is_attacking()));
    app.world_mut().despawn(wielder);

    ticks(&mut app, 600);
    // Контакт от осиротевшего weapon не должен наносить урон
    let dummy = app.world_mut().spawn(Health::new(100)).id();
    touch(&mut app, weapon, dummy);
    ticks(&mut app, 1);

    assert!(app.world().get_entity(weapon).is_err());
    assert_eq!(app.world().get::<Health>(dummy).map(|h| h.current), Some(100));
    assert!(drain::<DamageDealt>(&mut app).is_empty());
}

#[test]
fn test_kill_refund_end_to_end() {
    let mut config = quick_config();
    config.kill_refund_secs = 0.5;
    let (mut app, wielder, weapon) = arena(&config);
    let mut health = Health::new(100);
    health.current = 10;
    let victim = app.world_mut().spawn(health).id();

    intent(&mut app, wielder, AttackRequest::Spin { counter_clockwise: true });
    touch(&mut app, weapon, victim);
    run_fixed_tick(&mut app, DT);

    let deaths = drain::<EntityDied>(&mut app);
    assert_eq!(deaths.len(), 1);
    assert_eq!(deaths[0].killer, Some(wielder));

    let cooldowns = app.world().get::<CooldownManager>(wielder).expect("cooldowns");
    assert!((cooldowns.remaining(SPIN_SKILL) - (config.spin.cooldown - 0.5)).abs() < 1e-4);

    // Refund виден HUD'у в том же тике: trigger + refund
    let spin_changes = drain::<CooldownChanged>(&mut app)
        .into_iter()
        .filter(|e| e.skill == SPIN_SKILL)
        .count();
    assert_eq!(spin_changes, 2);
}

#[test]
fn test_rapier_events_drive_damage() {
    let config = quick_config();
    let (mut app, wielder, weapon) = arena(&config);
    app.add_plugins(RapierContactFeedPlugin);

    let actor = app.world_mut().spawn(Health::new(100)).id();
    let hurtbox = app
        .world_mut()
        .spawn((
            ContactPayload(actor),
            CollisionGroups::new(Group::from_bits_truncate(COLLISION_LAYER_TARGETS), Group::ALL),
        ))
        .id();

    intent(&mut app, wielder, AttackRequest::Thrust { target: Vec2::X });
    app.world_mut()
        .send_event(CollisionEvent::Started(weapon, hurtbox, CollisionEventFlags::SENSOR));
    run_fixed_tick(&mut app, DT);

    let hits = drain::<DamageDealt>(&mut app);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].target, actor);
    assert_eq!(app.world().get::<Health>(actor).map(|h| h.current), Some(90));
}

#[test]
fn test_ron_config_session() {
    let config = ComboWeaponConfig::from_ron_str(
        "(rest_radius: 2.0, pivot_offset: (0.0, 0.0), center_to_handle: 0.0, startup_debounce: 0.0)",
    )
    .expect("config");
    let (mut app, _wielder, weapon) = arena(&config);

    run_fixed_tick(&mut app, DT);

    let transform = app.world().get::<Transform>(weapon).expect("transform");
    assert!((transform.translation.truncate() - Vec2::new(2.0, 0.0)).length() < 1e-4);
}
