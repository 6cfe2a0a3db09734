//! Named skill cooldowns with quantized progress notifications.
//!
//! # Notifications
//!
//! HUD не должен получать событие каждый тик, поэтому прогресс квантуется:
//!
//! ```text
//! trigger("sweep")        → Changed (немедленно, в тот же тик)
//! tick: crossed 0.05s step → Changed
//! tick: remaining → 0      → Changed (forced) + Ready
//! ```
//!
//! Уведомления буферизуются внутри компонента; `publish_cooldown_notices`
//! переносит их в `CooldownChanged` / `SkillReady` events.

use bevy::prelude::*;
use std::collections::BTreeMap;

/// Default quantization step of progress notifications (seconds).
pub const DEFAULT_NOTIFY_STEP: f32 = 0.05;

/// Cooldown state of one skill.
///
/// Инвариант: 0 ≤ remaining ≤ total; remaining == 0 ⇒ ready.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkillCooldown {
    pub remaining: f32,
    pub total: f32,
    last_emitted_quantum: u32,
}

impl SkillCooldown {
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Completed fraction in [0, 1] (1.0 for an unconfigured / zero-length cooldown).
    pub fn progress(&self) -> f32 {
        if self.total <= 0.0 {
            1.0
        } else {
            (1.0 - self.remaining / self.total).clamp(0.0, 1.0)
        }
    }
}

/// Buffered cooldown notification.
#[derive(Debug, Clone, PartialEq)]
pub enum CooldownNotice {
    Changed {
        skill: String,
        remaining: f32,
        total: f32,
        progress: f32,
    },
    Ready {
        skill: String,
    },
}

/// Per-actor registry of named skill cooldowns.
///
/// Skills are created lazily on first `set_total` / `trigger` and persist for
/// the actor's lifetime. Unconfigured skills are always ready.
#[derive(Component, Debug, Clone)]
pub struct CooldownManager {
    // BTreeMap: порядок событий не зависит от hash seed (детерминизм)
    skills: BTreeMap<String, SkillCooldown>,
    notify_step: f32,
    pending: Vec<CooldownNotice>,
}

impl Default for CooldownManager {
    fn default() -> Self {
        Self::with_notify_step(DEFAULT_NOTIFY_STEP)
    }
}

impl CooldownManager {
    pub fn with_notify_step(step: f32) -> Self {
        Self {
            skills: BTreeMap::new(),
            notify_step: sanitize_step(step),
            pending: Vec::new(),
        }
    }

    pub fn notify_step(&self) -> f32 {
        self.notify_step
    }

    pub fn set_notify_step(&mut self, step: f32) {
        self.notify_step = sanitize_step(step);
        for cooldown in self.skills.values_mut() {
            cooldown.last_emitted_quantum = quantum(cooldown.remaining, self.notify_step);
        }
    }

    /// Configures a skill's cooldown length without starting it.
    ///
    /// A running cooldown longer than the new total is clamped down and
    /// notified like a tick: `Changed`, plus `Ready` if it hits 0.
    pub fn set_total(&mut self, skill: &str, total_secs: f32) {
        let total = sanitize_secs(total_secs);
        let step = self.notify_step;
        let cooldown = self.skills.entry(skill.to_owned()).or_default();

        cooldown.total = total;
        if cooldown.remaining <= total {
            return;
        }

        if total <= 0.0 {
            // Clamp до нуля = тот же >0 → 0 переход, что и в tick
            let remaining = cooldown.remaining;
            advance(skill, cooldown, remaining, step, &mut self.pending);
            return;
        }

        cooldown.remaining = total;
        cooldown.last_emitted_quantum = quantum(total, step);
        self.pending.push(changed_notice(skill, cooldown));
    }

    /// Starts the cooldown and queues one `Changed` notice immediately.
    ///
    /// Unconfigured skills are created with `total = 0` (stay ready).
    pub fn trigger(&mut self, skill: &str) {
        let step = self.notify_step;
        let cooldown = self.skills.entry(skill.to_owned()).or_default();

        cooldown.remaining = cooldown.total;
        cooldown.last_emitted_quantum = quantum(cooldown.remaining, step);

        self.pending.push(changed_notice(skill, cooldown));
    }

    pub fn is_ready(&self, skill: &str) -> bool {
        self.skills.get(skill).map_or(true, SkillCooldown::is_ready)
    }

    pub fn get(&self, skill: &str) -> Option<&SkillCooldown> {
        self.skills.get(skill)
    }

    pub fn remaining(&self, skill: &str) -> f32 {
        self.skills.get(skill).map_or(0.0, |c| c.remaining)
    }

    pub fn skills(&self) -> impl Iterator<Item = (&str, &SkillCooldown)> {
        self.skills.iter().map(|(name, cooldown)| (name.as_str(), cooldown))
    }

    /// Shortens a running cooldown (on-kill refund etc.), clamped at 0.
    pub fn reduce(&mut self, skill: &str, delta_secs: f32) {
        let Some(cooldown) = self.skills.get_mut(skill) else {
            return;
        };
        if cooldown.is_ready() || !(delta_secs > 0.0) {
            return;
        }

        advance(skill, cooldown, delta_secs, self.notify_step, &mut self.pending);
    }

    /// Decrements every running cooldown.
    pub fn tick(&mut self, delta_secs: f32) {
        if !(delta_secs > 0.0) {
            return;
        }

        for (skill, cooldown) in self.skills.iter_mut() {
            if !cooldown.is_ready() {
                advance(skill, cooldown, delta_secs, self.notify_step, &mut self.pending);
            }
        }
    }

    pub fn has_pending_notices(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn drain_notices(&mut self) -> std::vec::Drain<'_, CooldownNotice> {
        self.pending.drain(..)
    }
}

fn advance(
    skill: &str,
    cooldown: &mut SkillCooldown,
    delta_secs: f32,
    step: f32,
    sink: &mut Vec<CooldownNotice>,
) {
    cooldown.remaining = (cooldown.remaining - delta_secs).max(0.0);

    if cooldown.remaining <= 0.0 {
        // >0 → 0: forced emit + ready, ровно один раз
        cooldown.remaining = 0.0;
        cooldown.last_emitted_quantum = 0;
        sink.push(changed_notice(skill, cooldown));
        sink.push(CooldownNotice::Ready {
            skill: skill.to_owned(),
        });
        return;
    }

    let current = quantum(cooldown.remaining, step);
    if current != cooldown.last_emitted_quantum {
        cooldown.last_emitted_quantum = current;
        sink.push(changed_notice(skill, cooldown));
    }
}

fn changed_notice(skill: &str, cooldown: &SkillCooldown) -> CooldownNotice {
    CooldownNotice::Changed {
        skill: skill.to_owned(),
        remaining: cooldown.remaining,
        total: cooldown.total,
        progress: cooldown.progress(),
    }
}

/// Index of the step bucket `remaining` falls into (0 only when remaining == 0).
fn quantum(remaining: f32, step: f32) -> u32 {
    (remaining / step).ceil() as u32
}

fn sanitize_secs(secs: f32) -> f32 {
    if secs.is_finite() {
        secs.max(0.0)
    } else {
        0.0
    }
}

fn sanitize_step(step: f32) -> f32 {
    if step.is_finite() && step > 0.0 {
        step
    } else {
        DEFAULT_NOTIFY_STEP
    }
}
