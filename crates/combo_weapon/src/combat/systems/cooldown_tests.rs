//! Tests for cooldown systems.

#[cfg(test)]
mod tests {
    use crate::combat::{
        AttackRequest, ComboAttackIntent, CooldownChanged, CooldownManager, SkillReady, SPIN_SKILL, THRUST_SKILL,
    };
    use crate::config::{AttackTiming, ComboWeaponConfig};
    use crate::{begin_combo_session, create_stepped_app, run_fixed_tick};
    use bevy::prelude::*;
    use bevy_rapier2d::prelude::RigidBody;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (App, Entity) {
        let mut config = ComboWeaponConfig::short_sword();
        config.thrust = AttackTiming {
            duration: 0.2,
            extra_reach: 0.8,
            cooldown: 0.5,
        };

        let mut app = create_stepped_app(1);
        let wielder = app.world_mut().spawn(Transform::default()).id();
        let weapon = app.world_mut().spawn(RigidBody::KinematicPositionBased).id();
        begin_combo_session(app.world_mut(), wielder, weapon, &config).expect("session");

        (app, wielder)
    }

    fn drain<E: Event>(app: &mut App) -> Vec<E> {
        app.world_mut().resource_mut::<Events<E>>().drain().collect()
    }

    fn thrust(app: &mut App, wielder: Entity) {
        app.world_mut().send_event(ComboAttackIntent {
            wielder,
            request: AttackRequest::Thrust {
                target: Vec2::new(5.0, 0.0),
            },
        });
    }

    #[test]
    fn test_trigger_published_same_tick() {
        let (mut app, wielder) = setup();

        thrust(&mut app, wielder);
        run_fixed_tick(&mut app, DT);

        let changed = drain::<CooldownChanged>(&mut app);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].owner, wielder);
        assert_eq!(changed[0].skill, THRUST_SKILL);
        assert_eq!(changed[0].remaining, 0.5);
        assert_eq!(changed[0].progress, 0.0);
    }

    #[test]
    fn test_quantized_until_ready() {
        let (mut app, wielder) = setup();

        thrust(&mut app, wielder);
        let mut ticks = 0;
        let mut changed = Vec::new();
        let mut ready = Vec::new();
        while ticks < 120 {
            run_fixed_tick(&mut app, DT);
            ticks += 1;
            changed.extend(drain::<CooldownChanged>(&mut app));
            ready.extend(drain::<SkillReady>(&mut app));
            if !ready.is_empty() {
                break;
            }
        }

        // 0.5s / (1/60) ≈ 30 тиков, но уведомлений ~ 0.5 / 0.05 + 1
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].skill, THRUST_SKILL);
        assert!(changed.len() < ticks, "changed = {}, ticks = {}", changed.len(), ticks);
        assert!(changed.len() >= 10, "changed = {}", changed.len());

        // Monotonic до нуля, последний: forced emit с progress 1
        for pair in changed.windows(2) {
            assert!(pair[1].remaining <= pair[0].remaining);
        }
        let last = changed.last().expect("changed events");
        assert_eq!(last.remaining, 0.0);
        assert_eq!(last.progress, 1.0);

        // Дальше тишина
        for _ in 0..30 {
            run_fixed_tick(&mut app, DT);
        }
        assert!(drain::<CooldownChanged>(&mut app).is_empty());
        assert!(drain::<SkillReady>(&mut app).is_empty());
    }

    #[test]
    fn test_tick_without_running_cooldowns_is_silent() {
        let (mut app, wielder) = setup();

        for _ in 0..10 {
            run_fixed_tick(&mut app, DT);
        }

        assert!(drain::<CooldownChanged>(&mut app).is_empty());
        let cooldowns = app.world().get::<CooldownManager>(wielder).expect("cooldowns");
        assert!(cooldowns.is_ready(THRUST_SKILL));
        assert!(cooldowns.is_ready(SPIN_SKILL));
    }

    #[test]
    fn test_external_reduce_published() {
        let (mut app, wielder) = setup();

        thrust(&mut app, wielder);
        run_fixed_tick(&mut app, DT);
        drain::<CooldownChanged>(&mut app);

        app.world_mut()
            .get_mut::<CooldownManager>(wielder)
            .expect("cooldowns")
            .reduce(THRUST_SKILL, 10.0);
        run_fixed_tick(&mut app, DT);

        assert_eq!(drain::<SkillReady>(&mut app).len(), 1);
        let changed = drain::<CooldownChanged>(&mut app);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].remaining, 0.0);
    }
}
