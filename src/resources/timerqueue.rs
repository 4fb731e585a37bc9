//! Delayed one-shot callbacks on real time.
//!
//! Timers are not frame-gated: they keep counting while the frame bus is
//! paused. The stage drains due timers at the start of every frame, before
//! any phase is dispatched. Each timer may name an owning entity so that
//! destroying the entity cancels everything it scheduled.

use bevy_ecs::prelude::Entity;
use log::trace;

/// Handle returned by [`TimerQueue::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// Deferred callback type for a context `C`.
pub type TimerCallback<C> = Box<dyn FnOnce(&mut C)>;

struct PendingTimer<C> {
    token: TimerToken,
    owner: Option<Entity>,
    due_ms: f64,
    callback: TimerCallback<C>,
}

/// Pending timers, ordered by due time on demand.
pub struct TimerQueue<C> {
    pending: Vec<PendingTimer<C>>,
    next_token: u64,
}

impl<C> Default for TimerQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TimerQueue<C> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_token: 0,
        }
    }

    /// Run `callback` once `delay_ms` has elapsed after `now_ms`.
    pub fn schedule<F>(
        &mut self,
        now_ms: f64,
        owner: Option<Entity>,
        delay_ms: f64,
        callback: F,
    ) -> TimerToken
    where
        F: FnOnce(&mut C) + 'static,
    {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending.push(PendingTimer {
            token,
            owner,
            due_ms: now_ms + delay_ms.max(0.0),
            callback: Box::new(callback),
        });
        trace!("timer {:?} scheduled for {:.1}ms", token, now_ms + delay_ms);
        token
    }

    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.token != token);
        self.pending.len() != before
    }

    /// Cancel every timer owned by `owner`. Returns how many were dropped.
    pub fn cancel_owned_by(&mut self, owner: Entity) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.owner != Some(owner));
        before - self.pending.len()
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|t| t.token == token)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the earliest timer due at `now_ms`. Ties fire in
    /// scheduling order.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<TimerCallback<C>> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then_with(|| a.token.cmp(&b.token))
            })
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(index).callback)
    }

    /// Fire everything due at `now_ms` against `ctx`, including timers
    /// scheduled by callbacks that are themselves already due.
    pub fn run_due(ctx: &mut C, now_ms: f64, queue: impl Fn(&mut C) -> &mut TimerQueue<C>) {
        while let Some(callback) = queue(ctx).pop_due(now_ms) {
            callback(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        timers: TimerQueue<Ctx>,
        log: Vec<&'static str>,
    }

    fn ctx() -> Ctx {
        Ctx {
            timers: TimerQueue::new(),
            log: Vec::new(),
        }
    }

    fn fire(c: &mut Ctx, now: f64) {
        TimerQueue::run_due(c, now, |c| &mut c.timers);
    }

    #[test]
    fn test_fires_only_when_due_in_due_order() {
        let mut c = ctx();
        c.timers.schedule(0.0, None, 300.0, |c: &mut Ctx| c.log.push("late"));
        c.timers.schedule(0.0, None, 100.0, |c: &mut Ctx| c.log.push("early"));
        fire(&mut c, 50.0);
        assert!(c.log.is_empty());
        fire(&mut c, 400.0);
        assert_eq!(c.log, vec!["early", "late"]);
        assert!(c.timers.is_empty());
    }

    #[test]
    fn test_cancel_and_owner_cancel() {
        let mut world = bevy_ecs::world::World::new();
        let owner = world.spawn_empty().id();
        let mut c = ctx();
        let a = c.timers.schedule(0.0, None, 10.0, |c: &mut Ctx| c.log.push("a"));
        c.timers.schedule(0.0, Some(owner), 10.0, |c: &mut Ctx| c.log.push("owned"));
        c.timers.schedule(0.0, Some(owner), 20.0, |c: &mut Ctx| c.log.push("owned2"));
        assert!(c.timers.cancel(a));
        assert!(!c.timers.cancel(a));
        assert_eq!(c.timers.cancel_owned_by(owner), 2);
        fire(&mut c, 100.0);
        assert!(c.log.is_empty());
    }

    #[test]
    fn test_rescheduling_from_callback() {
        fn tick(c: &mut Ctx) {
            c.log.push("tick");
        }
        let mut c = ctx();
        c.timers.schedule(0.0, None, 10.0, |c: &mut Ctx| {
            c.log.push("first");
            c.timers.schedule(10.0, None, 50.0, tick);
        });
        fire(&mut c, 20.0);
        assert_eq!(c.log, vec!["first"]);
        fire(&mut c, 60.0);
        assert_eq!(c.log, vec!["first", "tick"]);
    }
}
