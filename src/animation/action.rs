//! Action engine: at most one in-flight animation per window, advanced on a
//! fixed tick.
//!
//! The engine writes transform fields and paint modes but never allocates or
//! frees paint resources. Terminal completions are handed back to the caller
//! after the whole tick has been applied, so a completion that tears a record
//! down can never be observed half-way through the tick.

use std::collections::BTreeMap;

use crate::{
    animation::effect::Curve,
    foundation::core::{Millis, Size},
    render::damage::DamageAccumulator,
    window::{record::Window, stack::WindowKey, stack::WindowStack},
};

/// Default tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 3;

/// What the owner of a window does once its action ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    None,
    /// Release paint resources of a window that was unmapped.
    FinishUnmap,
    /// Remove the record and release everything it owns.
    FinishDestroy,
}

/// An action that ended, with the completion its owner must now run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Finished {
    pub key: WindowKey,
    pub completion: Completion,
    /// The display already destroyed the window.
    pub gone: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct ActionRequest {
    /// Progress for a freshly created action; ignored when one is already running.
    pub start: f64,
    pub end: f64,
    /// Per-tick magnitude; the sign is derived from the direction of travel.
    pub step: f64,
    pub curve: Curve,
    pub completion: Completion,
    pub gone: bool,
    /// Run the displaced action's completion instead of dropping it.
    pub fire_outgoing: bool,
}

#[derive(Clone, Copy, Debug)]
struct Action {
    progress: f64,
    end: f64,
    step: f64,
    curve: Curve,
    completion: Completion,
    gone: bool,
}

impl Action {
    fn reached_end(&self) -> bool {
        if self.step > 0.0 {
            self.progress >= self.end
        } else if self.step < 0.0 {
            self.progress <= self.end
        } else {
            true
        }
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[derive(Debug)]
pub struct ActionEngine {
    actions: BTreeMap<WindowKey, Action>,
    tick_interval: u64,
    next_tick: Millis,
}

impl ActionEngine {
    pub fn new(tick_interval_ms: u64) -> Self {
        Self {
            actions: BTreeMap::new(),
            tick_interval: tick_interval_ms.max(1),
            next_tick: Millis(0),
        }
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_active(&self, key: WindowKey) -> bool {
        self.actions.contains_key(&key)
    }

    pub fn progress(&self, key: WindowKey) -> Option<f64> {
        self.actions.get(&key).map(|a| a.progress)
    }

    /// Completion the running action for `key` will hand back when it ends.
    pub fn completion(&self, key: WindowKey) -> Option<Completion> {
        self.actions.get(&key).map(|a| a.completion)
    }

    /// Install (or retarget) the action for `key` and apply its effect at the
    /// current progress right away.
    ///
    /// Returns the displaced action's completion when `fire_outgoing` asks for
    /// it; the caller must run it before handling anything else.
    pub fn start(
        &mut self,
        now: Millis,
        key: WindowKey,
        window: &mut Window,
        screen: Size,
        damage: &mut DamageAccumulator,
        req: ActionRequest,
    ) -> Option<Finished> {
        if self.actions.is_empty() {
            self.next_tick = now.saturating_add(self.tick_interval);
        }

        let mut outgoing = None;
        let action = self
            .actions
            .entry(key)
            .and_modify(|a| {
                if req.fire_outgoing && a.completion != Completion::None {
                    outgoing = Some(Finished {
                        key,
                        completion: a.completion,
                        gone: a.gone,
                    });
                }
            })
            .or_insert(Action {
                progress: unit(req.start),
                end: 0.0,
                step: 0.0,
                curve: req.curve,
                completion: Completion::None,
                gone: false,
            });

        action.end = unit(req.end);
        let step = req.step.abs();
        action.step = if action.progress < action.end {
            step
        } else if action.progress > action.end {
            -step
        } else {
            0.0
        };
        action.curve = req.curve;
        action.completion = req.completion;
        action.gone = req.gone;

        action.curve.apply(
            &mut window.transform,
            &window.geometry,
            screen,
            action.progress,
        );
        window.transform.needs_effect = true;
        window.animating = true;
        if let Some(extents) = window.determine_mode() {
            damage.add(extents);
        }
        window.promote_while_animating();

        tracing::trace!(
            window = window.id.0,
            progress = action.progress,
            end = action.end,
            step = action.step,
            "action started"
        );
        outgoing
    }

    /// Remove the action for `key`, returning its completion for the caller to run.
    pub fn cancel(&mut self, key: WindowKey) -> Option<Finished> {
        self.actions.remove(&key).map(|a| Finished {
            key,
            completion: a.completion,
            gone: a.gone,
        })
    }

    /// Milliseconds until the next tick is due; `None` when nothing is animating.
    pub fn next_deadline(&self, now: Millis) -> Option<u64> {
        if self.actions.is_empty() {
            return None;
        }
        Some(self.next_tick.since(now))
    }

    /// Advance every action by the ticks elapsed since the last one.
    ///
    /// A call before the scheduled tick is a no-op. Actions that reach their
    /// target are rendered once more at exactly the target value and returned;
    /// their completions have not run yet.
    #[tracing::instrument(level = "trace", skip(self, stack, damage))]
    pub fn tick(
        &mut self,
        now: Millis,
        stack: &mut WindowStack,
        screen: Size,
        damage: &mut DamageAccumulator,
    ) -> Vec<Finished> {
        if self.actions.is_empty() || now < self.next_tick {
            return Vec::new();
        }
        let steps = 1 + now.since(self.next_tick) / self.tick_interval;

        let mut finished = Vec::new();
        let mut orphaned = Vec::new();
        for (&key, action) in &mut self.actions {
            let Some(window) = stack.get_mut(key) else {
                orphaned.push(key);
                continue;
            };

            action.progress = unit(action.progress + action.step * steps as f64);
            action
                .curve
                .apply(&mut window.transform, &window.geometry, screen, action.progress);

            let done = action.reached_end();
            if done {
                action.progress = action.end;
                action
                    .curve
                    .apply(&mut window.transform, &window.geometry, screen, action.end);
            }

            window.transform.needs_effect = true;
            window.animating = !done;
            if let Some(extents) = window.determine_mode() {
                damage.add(extents);
            }
            if done {
                finished.push(Finished {
                    key,
                    completion: action.completion,
                    gone: action.gone,
                });
            } else {
                window.promote_while_animating();
            }
        }

        for key in orphaned {
            tracing::warn!(?key, "dropping action for a window that no longer exists");
            self.actions.remove(&key);
        }
        for f in &finished {
            self.actions.remove(&f.key);
        }

        self.next_tick = now.saturating_add(self.tick_interval);
        finished
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/action.rs"]
mod tests;
