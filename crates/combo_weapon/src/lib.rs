//! Combo Weapon Core
//!
//! Melee combo оружие на Bevy 0.16 ECS (headless, 2D):
//! - CooldownManager: named skill cooldowns с квантованными уведомлениями
//! - WeaponMotionController: idle orbit / thrust / sweep / spin вокруг wielder
//! - ContactDamageResolver: contact gate + per-target debounce + damage
//!
//! Physics (bevy_rapier2d) только доставляет контакты; рендер, input и AI
//! снаружи, через events (`ComboAttackIntent` → ... → `DamageDealt`).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod physics;
pub mod session;

// Re-export базовых типов для удобства
pub use combat::{
    AttackFinished, AttackKind, AttackRequest, AttackStarted, AttackState, CombatPlugin, ComboAttackIntent,
    ContactBegan, ContactDamageResolver, CooldownChanged, CooldownManager, DamageDealt, Dead, EntityDied,
    HitReceiver, KillRefund, SkillReady, WeaponMotionController, SPIN_SKILL, SWEEP_SKILL, THRUST_SKILL,
};
pub use components::*;
pub use config::{AttackTiming, ComboWeaponConfig, ConfigError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use physics::{weapon_sensor_body, ContactPayload, RapierContactFeedPlugin};
pub use session::{begin_combo_session, end_combo_session, ComboSetupError};

/// Главный plugin (combo systems + fixed timestep + RNG)
///
/// Physics не включён: добавьте `RapierPhysicsPlugin` и
/// `RapierContactFeedPlugin`, если контакты должен давать rapier.
pub struct ComboWeaponPlugin;

impl Plugin for ComboWeaponPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_plugins(CombatPlugin);

        // Seed задаёт caller (create_headless_app); иначе дефолтный
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(ComboWeaponPlugin);

    app
}

/// App без TimePlugin: время двигает только `run_fixed_tick`.
///
/// Для тестов: каждый вызов `run_fixed_tick` даёт ровно один FixedUpdate с
/// заданным delta, без зависимости от wall clock.
pub fn create_stepped_app(seed: u64) -> App {
    let mut app = App::new();
    app.add_plugins(bevy::app::TaskPoolPlugin::default())
        .init_resource::<Time>()
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(ComboWeaponPlugin);

    app
}

/// Один FixedUpdate тик длиной `delta_secs` (для `create_stepped_app`).
pub fn run_fixed_tick(app: &mut App, delta_secs: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(delta_secs.max(0.0)));
    app.world_mut().run_schedule(FixedUpdate);
}

/// Байтовый snapshot всех `T` (entity index + Debug), порядок по index.
///
/// Debug формат f32 печатает точное значение, этого хватает для сравнения
/// двух прогонов с одним seed.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
