//! Cooldown tick + notification publishing.

use bevy::prelude::*;

use crate::combat::{CooldownManager, CooldownNotice};

/// Event: прогресс cooldown'а изменился (trigger или пересечение шага квантования)
///
/// Для HUD: `progress` 0 → только что запущен, 1 → готов.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CooldownChanged {
    pub owner: Entity,
    pub skill: String,
    pub remaining: f32,
    pub total: f32,
    pub progress: f32,
}

/// Event: skill снова готов (ровно один раз на переход >0 → 0)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SkillReady {
    pub owner: Entity,
    pub skill: String,
}

/// System: обновление всех skill cooldown'ов
pub fn tick_skill_cooldowns(mut managers: Query<&mut CooldownManager>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut cooldowns in managers.iter_mut() {
        cooldowns.tick(delta);
    }
}

/// System: буфер уведомлений CooldownManager → events
///
/// Идёт последним в цепочке: trigger из `process_attack_intents` и refund
/// из `refund_cooldowns_on_kill` видны наблюдателям в том же тике.
pub fn publish_cooldown_notices(
    mut managers: Query<(Entity, &mut CooldownManager)>,
    mut changed_events: EventWriter<CooldownChanged>,
    mut ready_events: EventWriter<SkillReady>,
) {
    for (owner, mut cooldowns) in managers.iter_mut() {
        // Не трогаем Mut без нужды (change detection)
        if !cooldowns.has_pending_notices() {
            continue;
        }

        for notice in cooldowns.drain_notices() {
            match notice {
                CooldownNotice::Changed {
                    skill,
                    remaining,
                    total,
                    progress,
                } => {
                    changed_events.write(CooldownChanged {
                        owner,
                        skill,
                        remaining,
                        total,
                        progress,
                    });
                }
                CooldownNotice::Ready { skill } => {
                    crate::log(&format!("⏱️ {:?}: '{}' ready", owner, skill));
                    ready_events.write(SkillReady { owner, skill });
                }
            }
        }
    }
}
