//! Tween engine driver.
//!
//! [`animate`] starts tweens; [`advance_tweens`] runs once per frame on the
//! `Updated` phase (after every entity update) and steps all of them:
//!
//! - time starts at `-delay` and advances by one tick per frame, capped at
//!   the duration
//! - the eased value is written to the target property, then `on_step` runs
//! - when time reaches the duration the exact `to` value is written and
//!   `on_complete` runs once
//!
//! Tweens on destroyed entities are dropped without calling anything.

use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::components::tween::{DEFAULT_DURATION_MS, Property, PropertyTween, Tween, TweenSettings};
use crate::error::EngineResult;
use crate::stage::Stage;

/// Tween several properties of `target` at once.
///
/// Per-property fields override `settings`, which override the defaults
/// (1000 ms, no delay, in-out cubic). An existing tween on the same property
/// is replaced; the new one starts from the current value unless `from` is
/// given. Unknown easing names fail the whole call before anything starts.
pub fn animate<I>(
    stage: &mut Stage,
    target: Entity,
    properties: I,
    settings: &TweenSettings,
) -> EngineResult<()>
where
    I: IntoIterator<Item = (Property, PropertyTween)>,
{
    if !stage.is_alive(target) {
        debug!("animate ignored: {:?} no longer exists", target);
        return Ok(());
    }

    let mut prepared = Vec::new();
    for (property, wanted) in properties {
        let Some(current) = property.read(&stage.world, target) else {
            debug!("animate: {:?} has no {:?}", target, property);
            continue;
        };
        let easing = wanted
            .easing
            .or_else(|| settings.easing.clone())
            .unwrap_or_default();
        let curve = stage.tweens.resolve(&easing)?;
        let delay = wanted.delay.or(settings.delay).unwrap_or(0.0).max(0.0);
        prepared.push(Tween {
            target,
            property,
            time: -delay,
            from: wanted.from.unwrap_or(current),
            to: wanted.to.unwrap_or(current),
            duration: wanted
                .duration
                .or(settings.duration)
                .unwrap_or(DEFAULT_DURATION_MS),
            curve,
            on_step: wanted.on_step.or_else(|| settings.on_step.clone()),
            on_complete: wanted.on_complete.or_else(|| settings.on_complete.clone()),
        });
    }

    for tween in prepared {
        stage.tweens.start(tween);
    }
    Ok(())
}

/// Shorthand for tweening a single property.
pub fn animate_one(
    stage: &mut Stage,
    target: Entity,
    property: Property,
    tween: impl Into<PropertyTween>,
    settings: &TweenSettings,
) -> EngineResult<()> {
    animate(stage, target, [(property, tween.into())], settings)
}

/// Step every active tween by one tick.
pub fn advance_tweens(stage: &mut Stage) {
    let running = stage.tweens.begin_pass();
    let mut survivors = Vec::with_capacity(running.len());

    for mut tween in running {
        let (target, property) = (tween.target, tween.property);
        // superseded or cancelled by a callback earlier in this pass
        if stage.tweens.is_animating(target, property)
            || stage.tweens.was_cancelled(target, property)
        {
            continue;
        }
        let (value, finished) = tween.step();
        if !property.write(&mut stage.world, target, value) {
            trace!("tween on {:?}.{:?} dropped: target gone", target, property);
            continue;
        }
        if let Some(on_step) = tween.on_step.clone() {
            on_step(stage, value);
        }
        if finished {
            if let Some(on_complete) = tween.on_complete.take() {
                on_complete(stage);
            }
        } else {
            survivors.push(tween);
        }
    }

    stage.tweens.end_pass(survivors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::components::mapposition::MapPosition;
    use crate::error::EngineError;
    use crate::stage::FRAME_MS;
    use crate::systems::easing::Easing;
    use crate::systems::entity::{EntityConfig, base_update, destroy, spawn_entity};

    fn setup() -> (Stage, Entity) {
        let mut stage = Stage::headless(800.0, 600.0, 1);
        let e = spawn_entity(&mut stage, EntityConfig::default(), base_update);
        (stage, e)
    }

    fn x_of(stage: &Stage, e: Entity) -> f32 {
        stage.world.get::<MapPosition>(e).unwrap().x
    }

    // ==================== TIMING ====================

    #[test]
    fn test_reaches_target_and_completes_once() {
        let (mut stage, e) = setup();
        let completed = Rc::new(Cell::new(0));
        let c = Rc::clone(&completed);
        animate_one(
            &mut stage,
            e,
            Property::X,
            PropertyTween::to(10.0).with_duration(500.0),
            &TweenSettings::default().with_on_complete(move |_| c.set(c.get() + 1)),
        )
        .unwrap();

        let mut frames = 0;
        while completed.get() == 0 {
            stage.run_frame(FRAME_MS);
            frames += 1;
            assert!(frames < 40);
        }
        assert!(frames as f64 * FRAME_MS >= 499.0);
        assert_eq!(x_of(&stage, e), 10.0);
        for _ in 0..10 {
            stage.run_frame(FRAME_MS);
        }
        assert_eq!(completed.get(), 1);
        assert!(stage.tweens.is_empty());
    }

    #[test]
    fn test_delay_holds_start_value() {
        let (mut stage, e) = setup();
        animate_one(
            &mut stage,
            e,
            Property::X,
            PropertyTween::from_to(5.0, 10.0).with_duration(500.0),
            &TweenSettings::default().with_delay(100.0),
        )
        .unwrap();
        for _ in 0..6 {
            stage.run_frame(FRAME_MS);
            assert_eq!(x_of(&stage, e), 5.0);
        }
        for _ in 0..3 {
            stage.run_frame(FRAME_MS);
        }
        assert!(x_of(&stage, e) > 5.0);
    }

    #[test]
    fn test_number_shorthand_and_settings_precedence() {
        let (mut stage, e) = setup();
        let settings = TweenSettings::default()
            .with_duration(100.0)
            .with_easing(Easing::Linear);
        animate(
            &mut stage,
            e,
            [
                (Property::X, 10.0f32.into()),
                (Property::Y, PropertyTween::to(10.0).with_duration(1000.0)),
            ],
            &settings,
        )
        .unwrap();
        stage.run_frame(FRAME_MS);
        let p = *stage.world.get::<MapPosition>(e).unwrap();
        assert!((p.x - 10.0 * FRAME_MS as f32 / 100.0).abs() < 1e-3);
        assert!((p.y - 10.0 * FRAME_MS as f32 / 1000.0).abs() < 1e-3);
    }

    // ==================== REPLACEMENT / CANCEL ====================

    #[test]
    fn test_new_tween_replaces_old_and_starts_from_live_value() {
        let (mut stage, e) = setup();
        let linear = TweenSettings::default().with_easing(Easing::Linear);
        let first_done = Rc::new(Cell::new(false));
        let f = Rc::clone(&first_done);
        animate_one(
            &mut stage,
            e,
            Property::X,
            PropertyTween::to(100.0).with_duration(100.0).with_on_complete(move |_| f.set(true)),
            &linear,
        )
        .unwrap();
        stage.run_frame(FRAME_MS);
        let midway = x_of(&stage, e);
        animate_one(&mut stage, e, Property::X, PropertyTween::to(0.0).with_duration(100.0), &linear)
            .unwrap();
        assert_eq!(stage.tweens.len(), 1);
        for _ in 0..10 {
            stage.run_frame(FRAME_MS);
        }
        assert!(midway > 0.0);
        assert_eq!(x_of(&stage, e), 0.0);
        assert!(!first_done.get());
    }

    #[test]
    fn test_chained_tween_from_completion_runs() {
        let (mut stage, e) = setup();
        let settings = TweenSettings::default()
            .with_duration(40.0)
            .with_on_complete(move |stage| {
                animate_one(
                    stage,
                    e,
                    Property::X,
                    PropertyTween::to(0.0).with_duration(40.0),
                    &TweenSettings::default(),
                )
                .unwrap();
            });
        animate_one(&mut stage, e, Property::X, 20.0f32, &settings).unwrap();
        for _ in 0..3 {
            stage.run_frame(FRAME_MS);
        }
        assert_eq!(x_of(&stage, e), 20.0);
        assert_eq!(stage.tweens.len(), 1);
        for _ in 0..4 {
            stage.run_frame(FRAME_MS);
        }
        assert_eq!(x_of(&stage, e), 0.0);
        assert!(stage.tweens.is_empty());
    }

    #[test]
    fn test_destroyed_target_drops_tween_silently() {
        let (mut stage, e) = setup();
        let called = Rc::new(Cell::new(false));
        let c = Rc::clone(&called);
        animate_one(
            &mut stage,
            e,
            Property::Opacity,
            PropertyTween::to(0.0).with_duration(50.0),
            &TweenSettings::default().with_on_complete(move |_| c.set(true)),
        )
        .unwrap();
        destroy(&mut stage, e);
        for _ in 0..5 {
            stage.run_frame(FRAME_MS);
        }
        assert!(!called.get());
        assert!(stage.tweens.is_empty());
        assert!(animate_one(&mut stage, e, Property::X, 1.0f32, &TweenSettings::default()).is_ok());
        assert!(stage.tweens.is_empty());
    }

    #[test]
    fn test_unknown_easing_is_rejected() {
        let (mut stage, e) = setup();
        let result = animate_one(
            &mut stage,
            e,
            Property::X,
            10.0f32,
            &TweenSettings::default().with_easing(Easing::Named("wobble".into())),
        );
        assert!(matches!(result, Err(EngineError::UnknownEasing(_))));
        assert!(stage.tweens.is_empty());

        fn snap(_t: f32, b: f32, c: f32, _d: f32) -> f32 {
            b + c
        }
        stage.tweens.register_easing("wobble", snap);
        animate_one(
            &mut stage,
            e,
            Property::X,
            PropertyTween::to(10.0).with_easing(Easing::Named("wobble".into())),
            &TweenSettings::default(),
        )
        .unwrap();
        stage.run_frame(FRAME_MS);
        assert_eq!(x_of(&stage, e), 10.0);
    }

    #[test]
    fn test_cancel_from_step_callback() {
        let (mut stage, e) = setup();
        let settings = TweenSettings::default().with_on_step(move |stage, _| {
            stage.tweens.cancel(e, Property::Y);
        });
        animate_one(&mut stage, e, Property::X, 10.0f32, &settings).unwrap();
        animate_one(&mut stage, e, Property::Y, 10.0f32, &TweenSettings::default()).unwrap();
        stage.run_frame(FRAME_MS);
        assert_eq!(stage.world.get::<MapPosition>(e).unwrap().y, 0.0);
        assert_eq!(stage.tweens.len(), 1);
    }
}
