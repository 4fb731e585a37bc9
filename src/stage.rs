//! The stage: everything a frame needs, in one mutable context.
//!
//! Listeners on the frame bus receive `&mut Stage`, so entity logic can read
//! and write any component, spawn and destroy entities, start tweens and
//! schedule timers without threading handles around.
//!
//! # Frame sequence
//!
//! [`Stage::run_frame`] is what the host calls when a frame is due. Nothing
//! happens unless the bus has a frame pending, so a stopped bus stays
//! stopped until [`FrameBus::start`] is called again:
//!
//! 1. advance the real-time clock
//! 2. fire due timers (timers ignore pause)
//! 3. collect finished image loads
//! 4. dispatch the frame bus (clear, update, updated, render, rendered)

use bevy_ecs::prelude::*;
use fastrand::Rng;
use log::trace;

use crate::components::sprite::Rect;
use crate::events::framebus::{FrameBus, FrameHost, FrameScheduler, Phase, RefreshScheduler};
use crate::resources::drawlist::DrawList;
use crate::resources::screensize::ScreenSize;
use crate::resources::surface::Surface;
use crate::resources::texturestore::{ImageLoader, NullLoader, TextureStore};
use crate::resources::timerqueue::{TimerQueue, TimerToken};
use crate::resources::tweenengine::TweenEngine;
use crate::resources::worldtime::WorldTime;
use crate::systems::time::update_world_time;
use crate::systems::tween::advance_tweens;

/// Nominal frame length in milliseconds.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

pub struct Stage {
    pub world: World,
    pub bus: FrameBus<Stage>,
    pub surface: DrawList,
    pub textures: TextureStore,
    pub tweens: TweenEngine,
    pub timers: TimerQueue<Stage>,
    pub rng: Rng,
}

impl FrameHost for Stage {
    fn frame_bus(&mut self) -> &mut FrameBus<Self> {
        &mut self.bus
    }

    fn clear_surface(&mut self) {
        let (w, h) = self.surface.size();
        self.surface.clear(Rect::new(0.0, 0.0, w, h));
    }
}

impl Stage {
    pub fn new(
        width: f32,
        height: f32,
        loader: Box<dyn ImageLoader>,
        scheduler: Box<dyn FrameScheduler>,
        rng: Rng,
    ) -> Self {
        let mut world = World::new();
        world.insert_resource(ScreenSize { w: width, h: height });
        world.insert_resource(WorldTime::default());

        let mut stage = Self {
            world,
            bus: FrameBus::new(scheduler),
            surface: DrawList::new(width, height),
            textures: TextureStore::new(loader),
            tweens: TweenEngine::new(),
            timers: TimerQueue::new(),
            rng,
        };
        stage.bus.on(Phase::Updated, advance_tweens, 0);
        stage
    }

    /// Stage with no pixels behind it, for tests and simulations. The bus
    /// is already started.
    pub fn headless(width: f32, height: f32, seed: u64) -> Self {
        let mut stage = Self::new(
            width,
            height,
            Box::new(NullLoader::default()),
            Box::new(RefreshScheduler::default()),
            Rng::with_seed(seed),
        );
        stage.bus.start();
        stage
    }

    /// Run the pending frame after `dt_ms` of real time. Returns false, and
    /// does nothing, if the bus has no frame pending.
    pub fn run_frame(&mut self, dt_ms: f64) -> bool {
        if self.bus.pending_frame().is_none() {
            trace!("no frame pending");
            return false;
        }
        update_world_time(&mut self.world, dt_ms);
        let now = self.now_ms();
        TimerQueue::run_due(self, now, |stage| &mut stage.timers);
        self.textures.poll();
        FrameBus::tick(self);
        true
    }

    pub fn now_ms(&self) -> f64 {
        self.world.resource::<WorldTime>().elapsed_ms
    }

    pub fn screen(&self) -> ScreenSize {
        *self.world.resource::<ScreenSize>()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world.get_entity(entity).is_ok()
    }

    /// Schedule `callback` after `delay_ms`, cancelled if `owner` dies first.
    pub fn schedule<F>(&mut self, owner: Option<Entity>, delay_ms: f64, callback: F) -> TimerToken
    where
        F: FnOnce(&mut Stage) + 'static,
    {
        let now = self.now_ms();
        self.timers.schedule(now, owner, delay_ms, callback)
    }

    /// Uniform float in `min..max`.
    pub fn random(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.f32() * (max - min)
    }

    /// Uniform integer in `min..=max`.
    pub fn irandom(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.i32(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_timers_fire_before_update_phase() {
        let mut stage = Stage::headless(100.0, 100.0, 1);
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        stage.bus.on(Phase::Update, move |_: &mut Stage| l.borrow_mut().push("update"), 0);
        let l = Rc::clone(&log);
        stage.schedule(None, 10.0, move |_| l.borrow_mut().push("timer"));
        stage.run_frame(FRAME_MS);
        assert_eq!(*log.borrow(), vec!["timer", "update"]);
    }

    #[test]
    fn test_timers_run_while_paused() {
        let mut stage = Stage::headless(100.0, 100.0, 1);
        let fired = Rc::new(RefCell::new(false));
        let f = Rc::clone(&fired);
        stage.bus.pause();
        stage.schedule(None, 20.0, move |_| *f.borrow_mut() = true);
        stage.run_frame(FRAME_MS);
        assert!(!*fired.borrow());
        stage.run_frame(FRAME_MS);
        assert!(*fired.borrow());
    }

    #[test]
    fn test_random_ranges() {
        let mut stage = Stage::headless(100.0, 100.0, 7);
        for _ in 0..200 {
            let f = stage.random(0.25, 0.75);
            assert!((0.25..0.75).contains(&f));
            let i = stage.irandom(5, 8);
            assert!((5..=8).contains(&i));
        }
        assert_eq!(stage.irandom(3, 3), 3);
    }

    #[test]
    fn test_stop_cancels_the_next_frame() {
        let mut stage = Stage::headless(100.0, 100.0, 1);
        let updates = Rc::new(RefCell::new(0));
        let u = Rc::clone(&updates);
        stage.bus.on(Phase::Update, move |_: &mut Stage| *u.borrow_mut() += 1, 0);
        assert!(stage.run_frame(FRAME_MS));
        stage.bus.stop();
        for _ in 0..3 {
            assert!(!stage.run_frame(FRAME_MS));
        }
        assert_eq!(*updates.borrow(), 1);
        assert_eq!(stage.bus.frames(), 1);
        assert!((stage.now_ms() - FRAME_MS).abs() < 1e-9);

        stage.bus.start();
        assert!(stage.run_frame(FRAME_MS));
        assert_eq!(*updates.borrow(), 2);
    }

    #[test]
    fn test_stop_from_a_listener_ends_the_loop() {
        let mut stage = Stage::headless(100.0, 100.0, 1);
        let updates = Rc::new(RefCell::new(0));
        let u = Rc::clone(&updates);
        stage.bus.on(
            Phase::Update,
            move |stage: &mut Stage| {
                *u.borrow_mut() += 1;
                stage.bus.stop();
            },
            0,
        );
        assert!(stage.run_frame(FRAME_MS));
        assert!(!stage.run_frame(FRAME_MS));
        assert_eq!(*updates.borrow(), 1);
    }

    #[test]
    fn test_unstarted_stage_runs_nothing() {
        let mut stage = Stage::new(
            100.0,
            100.0,
            Box::new(NullLoader::default()),
            Box::new(RefreshScheduler::default()),
            Rng::with_seed(1),
        );
        assert!(!stage.run_frame(FRAME_MS));
        assert_eq!(stage.bus.frames(), 0);
    }

    #[test]
    fn test_clear_happens_each_frame() {
        let mut stage = Stage::headless(100.0, 50.0, 1);
        stage.run_frame(FRAME_MS);
        stage.run_frame(FRAME_MS);
        assert_eq!(stage.surface.commands().len(), 1);
        assert_eq!(stage.bus.frames(), 2);
    }
}
