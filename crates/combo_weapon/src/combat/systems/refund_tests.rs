//! Tests for kill refund system.

#[cfg(test)]
mod tests {
    use crate::combat::{
        AttackRequest, ComboAttackIntent, ContactBegan, CooldownManager, EntityDied, KillRefund, SkillReady,
        SPIN_SKILL, THRUST_SKILL,
    };
    use crate::components::Health;
    use crate::config::ComboWeaponConfig;
    use crate::physics::COLLISION_LAYER_TARGETS;
    use crate::{begin_combo_session, create_stepped_app, run_fixed_tick};
    use bevy::prelude::*;
    use bevy_rapier2d::prelude::RigidBody;

    const DT: f32 = 1.0 / 60.0;

    fn setup(kill_refund_secs: f32) -> (App, Entity, Entity) {
        let mut config = ComboWeaponConfig::short_sword();
        config.startup_debounce = 0.0;
        config.kill_refund_secs = kill_refund_secs;

        let mut app = create_stepped_app(1);
        let wielder = app.world_mut().spawn(Transform::default()).id();
        let weapon = app.world_mut().spawn(RigidBody::KinematicPositionBased).id();
        begin_combo_session(app.world_mut(), wielder, weapon, &config).expect("session");
        (app, wielder, weapon)
    }

    fn spin_remaining(app: &App, wielder: Entity) -> f32 {
        app.world()
            .get::<CooldownManager>(wielder)
            .expect("cooldowns")
            .remaining(SPIN_SKILL)
    }

    #[test]
    fn test_kill_shortens_running_cooldowns() {
        let (mut app, wielder, weapon) = setup(1.5);
        let mut health = Health::new(100);
        health.current = 1;
        let dummy = app.world_mut().spawn(health).id();

        app.world_mut().send_event(ComboAttackIntent {
            wielder,
            request: AttackRequest::Spin { counter_clockwise: true },
        });
        app.world_mut().send_event(ContactBegan {
            self_shape: weapon,
            other_shape: dummy,
            other_category_bits: COLLISION_LAYER_TARGETS,
            other_payload: None,
        });
        run_fixed_tick(&mut app, DT);

        // spin cooldown 2.0 → 2.0 - 1.5 (refund) в том же тике
        assert!((spin_remaining(&app, wielder) - 0.5).abs() < 1e-4);
        // Thrust не был запущен, refund его не трогает
        assert!(app
            .world()
            .get::<CooldownManager>(wielder)
            .expect("cooldowns")
            .is_ready(THRUST_SKILL));
    }

    #[test]
    fn test_refund_to_zero_publishes_ready() {
        let (mut app, wielder, _weapon) = setup(5.0);
        let victim = app.world_mut().spawn(Health::new(10)).id();

        app.world_mut().send_event(ComboAttackIntent {
            wielder,
            request: AttackRequest::Spin { counter_clockwise: false },
        });
        run_fixed_tick(&mut app, DT);
        app.world_mut().resource_mut::<Events<SkillReady>>().clear();

        app.world_mut().send_event(EntityDied {
            entity: victim,
            killer: Some(wielder),
        });
        run_fixed_tick(&mut app, DT);

        let ready: Vec<SkillReady> = app.world_mut().resource_mut::<Events<SkillReady>>().drain().collect();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].skill, SPIN_SKILL);
        assert_eq!(spin_remaining(&app, wielder), 0.0);
    }

    #[test]
    fn test_weapon_killer_maps_to_wielder() {
        let (mut app, wielder, weapon) = setup(1.0);
        let victim = app.world_mut().spawn(Health::new(10)).id();

        app.world_mut()
            .get_mut::<CooldownManager>(wielder)
            .expect("cooldowns")
            .trigger(SPIN_SKILL);
        app.world_mut().send_event(EntityDied {
            entity: victim,
            killer: Some(weapon),
        });
        run_fixed_tick(&mut app, DT);

        assert!((spin_remaining(&app, wielder) - (1.0 - DT)).abs() < 1e-3);
    }

    #[test]
    fn test_no_refund_component_no_change() {
        let (mut app, wielder, _weapon) = setup(0.0);
        let victim = app.world_mut().spawn(Health::new(10)).id();
        assert!(app.world().get::<KillRefund>(wielder).is_none());

        app.world_mut()
            .get_mut::<CooldownManager>(wielder)
            .expect("cooldowns")
            .trigger(SPIN_SKILL);
        app.world_mut().send_event(EntityDied {
            entity: victim,
            killer: Some(wielder),
        });
        run_fixed_tick(&mut app, DT);

        assert!((spin_remaining(&app, wielder) - (2.0 - DT)).abs() < 1e-3);
    }
}
