//! Frame bus: prioritized per-frame dispatch.
//!
//! Every frame runs four phases in a fixed order:
//!
//! 1. [`Phase::Update`] – entity logic
//! 2. [`Phase::Updated`] – post-update drivers (tweens)
//! 3. [`Phase::Render`] – drawing, ordered by z-index
//! 4. [`Phase::Rendered`] – presentation sync (HUD)
//!
//! Within a phase, listeners run in ascending priority; equal priorities run
//! in registration order. A trigger works on a snapshot of the listener list,
//! so listeners added mid-phase wait for the next frame and listeners removed
//! mid-phase are skipped if they have not run yet.
//!
//! Pausing gates the two update phases only; rendering keeps going so a
//! paused scene stays on screen.
//!
//! The bus does not own a clock. A [`FrameScheduler`] hands out a
//! [`FrameHandle`] for "the next frame", and the host loop calls
//! [`FrameBus::tick`] when that frame is due.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use rustc_hash::FxHashMap;

/// Dispatch phases, in frame order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Update,
    Updated,
    Render,
    Rendered,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Update, Phase::Updated, Phase::Render, Phase::Rendered];
}

/// Opaque handle returned by [`FrameBus::on`]; pass it to [`FrameBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Handle for a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// A registered callback. Shared so a trigger can hold it while the bus
/// itself is mutated by other listeners.
pub type Listener<C> = Rc<RefCell<dyn FnMut(&mut C)>>;

/// Source of "next frame" timing.
pub trait FrameScheduler {
    /// Request the next frame.
    fn schedule_next_frame(&mut self) -> FrameHandle;
    /// Drop a pending request. Unknown handles are ignored.
    fn cancel(&mut self, handle: FrameHandle);
    /// Time left until `handle` is due, or `None` if it is not pending.
    fn remaining(&self, handle: FrameHandle) -> Option<Duration>;
}

/// Display-refresh scheduling: the next frame is due as soon as the host
/// presents the current one (vsync paces the loop).
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    next: u64,
    pending: Option<FrameHandle>,
}

impl FrameScheduler for RefreshScheduler {
    fn schedule_next_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn remaining(&self, handle: FrameHandle) -> Option<Duration> {
        (self.pending == Some(handle)).then_some(Duration::ZERO)
    }
}

/// Fixed-interval fallback for hosts without a refresh signal.
#[derive(Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    next: u64,
    pending: Option<(FrameHandle, Instant)>,
}

impl IntervalScheduler {
    /// Frame interval used when the host offers no refresh signal.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_micros(16_667);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: 0,
            pending: None,
        }
    }

    pub fn from_fps(fps: u32) -> Self {
        if fps == 0 {
            return Self::default();
        }
        Self::new(Duration::from_secs_f64(1.0 / f64::from(fps)))
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl FrameScheduler for IntervalScheduler {
    fn schedule_next_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some((handle, Instant::now() + self.interval));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }

    fn remaining(&self, handle: FrameHandle) -> Option<Duration> {
        match self.pending {
            Some((pending, due)) if pending == handle => {
                Some(due.saturating_duration_since(Instant::now()))
            }
            _ => None,
        }
    }
}

struct Slot<C> {
    id: ListenerId,
    listener: Listener<C>,
}

/// Context a bus dispatches into. The bus lives inside its context so
/// listeners get full mutable access to everything, including the bus.
pub trait FrameHost: Sized + 'static {
    fn frame_bus(&mut self) -> &mut FrameBus<Self>;
    /// Wipe the drawing surface before the render phases.
    fn clear_surface(&mut self);
}

/// Prioritized publish/subscribe for the four frame phases.
pub struct FrameBus<C> {
    handlers: FxHashMap<Phase, BTreeMap<i32, Vec<Slot<C>>>>,
    /// Live listeners and where they are filed.
    index: FxHashMap<ListenerId, (Phase, i32)>,
    next_id: u64,
    paused: bool,
    running: bool,
    pending: Option<FrameHandle>,
    frames: u64,
    scheduler: Box<dyn FrameScheduler>,
}

impl<C: 'static> FrameBus<C> {
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            handlers: FxHashMap::default(),
            index: FxHashMap::default(),
            next_id: 0,
            paused: false,
            running: false,
            pending: None,
            frames: 0,
            scheduler,
        }
    }

    /// Register `callback` for `phase`. Lower priorities run first.
    pub fn on<F>(&mut self, phase: Phase, callback: F, priority: i32) -> ListenerId
    where
        F: FnMut(&mut C) + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        let listener: Listener<C> = Rc::new(RefCell::new(callback));
        self.handlers
            .entry(phase)
            .or_default()
            .entry(priority)
            .or_default()
            .push(Slot { id, listener });
        self.index.insert(id, (phase, priority));
        trace!("listener {:?} registered on {:?} at priority {}", id, phase, priority);
        id
    }

    /// Remove one registration. Returns false if it was not registered on
    /// `phase` (already removed, or registered elsewhere).
    pub fn off(&mut self, phase: Phase, id: ListenerId) -> bool {
        let Some(&(filed_phase, priority)) = self.index.get(&id) else {
            return false;
        };
        if filed_phase != phase {
            return false;
        }
        self.index.remove(&id);
        if let Some(buckets) = self.handlers.get_mut(&phase) {
            if let Some(bucket) = buckets.get_mut(&priority) {
                bucket.retain(|slot| slot.id != id);
                if bucket.is_empty() {
                    buckets.remove(&priority);
                }
            }
        }
        true
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of listeners currently registered for `phase`.
    pub fn listener_count(&self, phase: Phase) -> usize {
        self.handlers
            .get(&phase)
            .map(|buckets| buckets.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    fn snapshot(&self, phase: Phase) -> Vec<(ListenerId, Listener<C>)> {
        self.handlers
            .get(&phase)
            .map(|buckets| {
                buckets
                    .values()
                    .flatten()
                    .map(|slot| (slot.id, Rc::clone(&slot.listener)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Stop dispatching the update phases. Rendering continues.
    pub fn pause(&mut self) {
        if !self.paused {
            debug!("frame bus paused");
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            debug!("frame bus resumed");
        }
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Begin requesting frames. Idempotent.
    pub fn start(&mut self) {
        self.running = true;
        if self.pending.is_none() {
            self.pending = Some(self.scheduler.schedule_next_frame());
        }
    }

    /// Cancel the pending frame request and stop rescheduling.
    pub fn stop(&mut self) {
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// How long the host should wait before calling [`FrameBus::tick`].
    pub fn time_until_frame(&self) -> Option<Duration> {
        self.pending.and_then(|handle| self.scheduler.remaining(handle))
    }

    /// Frames dispatched so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<C: FrameHost> FrameBus<C> {
    /// Invoke every listener of `phase` in priority order.
    pub fn trigger(ctx: &mut C, phase: Phase) {
        let snapshot = ctx.frame_bus().snapshot(phase);
        for (id, listener) in snapshot {
            // removed by an earlier listener in this pass
            if !ctx.frame_bus().is_registered(id) {
                continue;
            }
            let Ok(mut callback) = listener.try_borrow_mut() else {
                warn!("listener {:?} re-entered during {:?}; skipped", id, phase);
                continue;
            };
            (&mut *callback)(ctx);
        }
    }

    /// Run one frame: clear, the two update phases unless paused, then the
    /// two render phases. Reschedules if the bus is still running.
    pub fn tick(ctx: &mut C) {
        {
            let bus = ctx.frame_bus();
            bus.pending = None;
            bus.frames += 1;
        }
        ctx.clear_surface();
        if !ctx.frame_bus().paused {
            Self::trigger(ctx, Phase::Update);
            Self::trigger(ctx, Phase::Updated);
        }
        Self::trigger(ctx, Phase::Render);
        Self::trigger(ctx, Phase::Rendered);

        let bus = ctx.frame_bus();
        if bus.running && bus.pending.is_none() {
            bus.pending = Some(bus.scheduler.schedule_next_frame());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Recorder {
        bus: FrameBus<Recorder>,
        log: Vec<&'static str>,
        clears: u32,
    }

    impl FrameHost for Recorder {
        fn frame_bus(&mut self) -> &mut FrameBus<Self> {
            &mut self.bus
        }

        fn clear_surface(&mut self) {
            self.clears += 1;
        }
    }

    fn recorder() -> Recorder {
        Recorder {
            bus: FrameBus::new(Box::new(RefreshScheduler::default())),
            log: Vec::new(),
            clears: 0,
        }
    }

    // ==================== ORDERING ====================

    #[test]
    fn test_priority_ascending_then_registration_order() {
        let mut r = recorder();
        r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("p1"), 1);
        r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("p0-a"), 0);
        r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("p0-b"), 0);
        r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("neg"), -1);
        FrameBus::trigger(&mut r, Phase::Update);
        assert_eq!(r.log, vec!["neg", "p0-a", "p0-b", "p1"]);
    }

    #[test]
    fn test_tick_runs_phases_in_order() {
        let mut r = recorder();
        r.bus.on(Phase::Rendered, |r: &mut Recorder| r.log.push("rendered"), 0);
        r.bus.on(Phase::Render, |r: &mut Recorder| r.log.push("render"), 0);
        r.bus.on(Phase::Updated, |r: &mut Recorder| r.log.push("updated"), 0);
        r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("update"), 0);
        FrameBus::tick(&mut r);
        assert_eq!(r.log, vec!["update", "updated", "render", "rendered"]);
        assert_eq!(r.clears, 1);
        assert_eq!(r.bus.frames(), 1);
    }

    // ==================== OFF ====================

    #[test]
    fn test_off_removes_single_registration() {
        let mut r = recorder();
        let a = r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("a"), 0);
        r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("b"), 0);
        assert!(r.bus.off(Phase::Update, a));
        assert!(!r.bus.off(Phase::Update, a));
        FrameBus::trigger(&mut r, Phase::Update);
        assert_eq!(r.log, vec!["b"]);
        assert_eq!(r.bus.listener_count(Phase::Update), 1);
    }

    #[test]
    fn test_off_wrong_phase_is_noop() {
        let mut r = recorder();
        let a = r.bus.on(Phase::Render, |_: &mut Recorder| {}, 0);
        assert!(!r.bus.off(Phase::Update, a));
        assert!(r.bus.is_registered(a));
    }

    #[test]
    fn test_removed_mid_trigger_is_not_invoked() {
        let mut r = recorder();
        let victim = Rc::new(Cell::new(None));
        let v = Rc::clone(&victim);
        r.bus.on(
            Phase::Update,
            move |r: &mut Recorder| {
                r.log.push("killer");
                if let Some(id) = v.get() {
                    r.bus.off(Phase::Update, id);
                }
            },
            0,
        );
        let id = r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("victim"), 1);
        victim.set(Some(id));
        FrameBus::trigger(&mut r, Phase::Update);
        assert_eq!(r.log, vec!["killer"]);
    }

    #[test]
    fn test_added_mid_trigger_waits_for_next_pass() {
        let mut r = recorder();
        let added = Rc::new(Cell::new(false));
        let flag = Rc::clone(&added);
        r.bus.on(
            Phase::Update,
            move |r: &mut Recorder| {
                if !flag.get() {
                    flag.set(true);
                    r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("late"), 5);
                }
                r.log.push("first");
            },
            0,
        );
        FrameBus::trigger(&mut r, Phase::Update);
        assert_eq!(r.log, vec!["first"]);
        FrameBus::trigger(&mut r, Phase::Update);
        assert_eq!(r.log, vec!["first", "first", "late"]);
    }

    // ==================== PAUSE / SCHEDULING ====================

    #[test]
    fn test_pause_gates_update_phases_only() {
        let mut r = recorder();
        r.bus.on(Phase::Update, |r: &mut Recorder| r.log.push("update"), 0);
        r.bus.on(Phase::Updated, |r: &mut Recorder| r.log.push("updated"), 0);
        r.bus.on(Phase::Render, |r: &mut Recorder| r.log.push("render"), 0);
        r.bus.pause();
        FrameBus::tick(&mut r);
        assert_eq!(r.log, vec!["render"]);
        r.bus.resume();
        r.log.clear();
        FrameBus::tick(&mut r);
        assert_eq!(r.log, vec!["update", "updated", "render"]);
    }

    #[test]
    fn test_start_stop_tracks_pending_frame() {
        let mut r = recorder();
        assert!(r.bus.pending_frame().is_none());
        r.bus.start();
        let first = r.bus.pending_frame();
        assert!(first.is_some());
        r.bus.start();
        assert_eq!(r.bus.pending_frame(), first);
        assert_eq!(r.bus.time_until_frame(), Some(Duration::ZERO));

        FrameBus::tick(&mut r);
        assert!(r.bus.pending_frame().is_some());
        assert_ne!(r.bus.pending_frame(), first);

        r.bus.stop();
        assert!(r.bus.pending_frame().is_none());
        assert!(r.bus.time_until_frame().is_none());
        FrameBus::tick(&mut r);
        assert!(r.bus.pending_frame().is_none());
    }

    #[test]
    fn test_interval_scheduler_cancel() {
        let mut s = IntervalScheduler::from_fps(60);
        let h = s.schedule_next_frame();
        assert!(s.remaining(h).is_some_and(|d| d <= IntervalScheduler::DEFAULT_INTERVAL));
        s.cancel(h);
        assert!(s.remaining(h).is_none());
    }
}
