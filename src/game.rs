//! The game controller.
//!
//! One listener on the `Update` phase, running before every entity, drives
//! the whole run: spawn countdowns, obstacle scrolling and scoring, the
//! collision check and the crash sequence. Its state is the [`Session`]
//! resource.
//!
//! ```text
//! not-started --primary--> started --crash--> ended --(delay, primary)--> not-started
//!                            |  ^
//!                      pause |  | resume / primary
//!                            v  |
//!                           paused
//! ```

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::bird::Bird;
use crate::events::framebus::Phase;
use crate::events::gamenotice::{GameNotice, NoticeBoard, post_notice};
use crate::resources::gameconfig::GameTuning;
use crate::resources::gamestate::{EyeTarget, FIRST_PIPE_DELAY, GamePhase, Session};
use crate::resources::input::{InputEvent, InputState};
use crate::resources::scorestore::ScoreBoard;
use crate::stage::Stage;
use crate::systems::bird::{BIRD_HEIGHT, BIRD_WIDTH, blink, flap, look_at, spawn_bird};
use crate::systems::cloud::{CLOUD_SHAPES, CLOUD_WIDTH, spawn_cloud};
use crate::systems::collision::HitboxInsets;
use crate::systems::entity::{bounds_of, destroy, place, position_of};
use crate::systems::feather::spawn_feather_burst;
use crate::systems::ghostbird::spawn_ghost_bird;
use crate::systems::pipe::{PIPE_HEIGHT, PIPE_WIDTH, set_zap, spawn_obstacle_pair};
use crate::systems::poof::spawn_poof;
use crate::systems::shockedbird::spawn_shocked_bird;

/// Clouds alive at once.
const MAX_CLOUDS: usize = 8;
/// Bird height (as a fraction of the field) below which it hovers before the start.
const HOVER_LINE: f32 = 0.55;
const HOVER_STRENGTH: f32 = 16.0;
const BOUNCE_DOWN_VY: f32 = 5.0;
const BOUNCE_UP_VY: f32 = -20.0;
const SHOCK_MS: f64 = 1000.0;
const POOF_Z: i32 = 10;
const SCREEN_LOOK_ODDS: f32 = 1.5;

/// Run `f` with the session taken out of the world, so it can be used next
/// to `&mut Stage`. `None` if there is no session (not installed, or the
/// caller is already inside one).
pub fn with_session<R>(stage: &mut Stage, f: impl FnOnce(&mut Stage, &mut Session) -> R) -> Option<R> {
    let mut session = stage.world.remove_resource::<Session>()?;
    let result = f(stage, &mut session);
    stage.world.insert_resource(session);
    Some(result)
}

/// Install the controller on `stage` and prepare the first run.
pub fn install(stage: &mut Stage, tuning: GameTuning, scores: ScoreBoard) {
    if stage.world.contains_resource::<Session>() {
        debug!("game already installed");
        return;
    }
    let mut session = Session::new(tuning, scores);
    session.listener = Some(stage.bus.on(
        Phase::Update,
        |stage: &mut Stage| {
            with_session(stage, update);
        },
        -1,
    ));
    stage.world.insert_resource(InputState::default());
    stage.world.init_resource::<NoticeBoard>();

    post_notice(&mut stage.world, GameNotice::BestScore(session.scores.best_score()));
    post_notice(&mut stage.world, GameNotice::KillCount(session.scores.kill_count()));
    reset_session(stage, &mut session);
    stage.world.insert_resource(session);
    info!("game installed");
}

/// Tear the controller down: end the run, destroy everything it spawned and
/// unregister it. Returns the final session.
pub fn teardown(stage: &mut Stage) -> Option<Session> {
    let mut session = stage.world.remove_resource::<Session>()?;
    end_session(stage, &mut session);
    clear_field(stage, &mut session);
    if let Some(token) = session.restart_timer.take() {
        stage.timers.cancel(token);
    }
    if let Some(id) = session.listener.take() {
        stage.bus.off(Phase::Update, id);
    }
    info!("game torn down at score {}", session.score);
    Some(session)
}

pub fn reset(stage: &mut Stage) {
    with_session(stage, reset_session);
}

pub fn start(stage: &mut Stage) {
    with_session(stage, start_session);
}

pub fn pause(stage: &mut Stage) {
    with_session(stage, pause_session);
}

pub fn resume(stage: &mut Stage) {
    with_session(stage, resume_session);
}

pub fn end(stage: &mut Stage) {
    with_session(stage, end_session);
}

/// Feed one input event to the game.
pub fn handle_input(stage: &mut Stage, event: InputEvent) {
    match event {
        InputEvent::Primary => {
            let now = stage.now_ms();
            let accepted = stage
                .world
                .get_resource_mut::<InputState>()
                .map(|mut input| input.press_primary(now))
                .unwrap_or(true);
            if accepted {
                primary_action(stage);
            } else {
                debug!("primary action throttled");
            }
        }
        InputEvent::ToggleSuspend => toggle_suspend(stage),
        InputEvent::FocusLost => pause(stage),
    }
}

/// Restart after a crash, otherwise start or resume and flap.
pub fn primary_action(stage: &mut Stage) {
    with_session(stage, |stage, s| {
        if s.is_ended() {
            if s.can_restart {
                s.can_restart = false;
                reset_session(stage, s);
            }
            return;
        }
        if !s.is_started() {
            start_session(stage, s);
        }
        if s.paused {
            resume_session(stage, s);
        }
        if let Some(bird) = s.bird {
            flap(stage, bird, None);
        }
    });
}

pub fn toggle_suspend(stage: &mut Stage) {
    with_session(stage, |stage, s| {
        if s.paused {
            resume_session(stage, s);
        } else {
            pause_session(stage, s);
        }
    });
}

fn post_phase(stage: &mut Stage, s: &Session) {
    post_notice(
        &mut stage.world,
        GameNotice::Phase {
            phase: s.phase,
            paused: s.paused,
        },
    );
}

fn clear_field(stage: &mut Stage, s: &mut Session) {
    for pair in s.obstacles.drain(..) {
        for e in pair.entities() {
            destroy(stage, e);
        }
    }
    for cloud in s.clouds.drain(..) {
        destroy(stage, cloud);
    }
    for e in s.debris.drain(..) {
        destroy(stage, e);
    }
    if let Some(bird) = s.bird.take() {
        destroy(stage, bird);
    }
    if let Some(remains) = s.remains.take() {
        destroy(stage, remains);
    }
}

fn reset_session(stage: &mut Stage, s: &mut Session) {
    clear_field(stage, s);
    if let Some(token) = s.restart_timer.take() {
        stage.timers.cancel(token);
    }
    stage.bus.resume();

    s.phase = GamePhase::NotStarted;
    s.paused = false;
    s.can_restart = false;
    s.score = 0;
    s.speed = s.tuning.min_speed;
    s.crash_at = None;
    s.entered = false;
    s.time_to_next_pipe = FIRST_PIPE_DELAY;
    s.time_to_next_cloud = 0;
    s.blink_counter = -1;
    s.look_counter = -1;
    s.eye_target = EyeTarget::Nothing;

    let screen = stage.screen();
    let clouds = stage.irandom(5, 8);
    for _ in 0..clouds {
        let x = stage.random(0.0, screen.w);
        let y = stage.random(0.0, screen.h);
        add_cloud(stage, s, x, y);
    }
    s.bird = Some(spawn_bird(stage, 0.2 * screen.w, -200.0));

    post_notice(&mut stage.world, GameNotice::Score(0));
    post_phase(stage, s);
    info!("new run ready, best score {}", s.scores.best_score());
}

fn start_session(stage: &mut Stage, s: &mut Session) {
    if s.phase != GamePhase::NotStarted {
        return;
    }
    s.phase = GamePhase::Started;
    post_phase(stage, s);
    info!("run started");
}

fn pause_session(stage: &mut Stage, s: &mut Session) {
    if !s.is_started() || s.paused {
        return;
    }
    s.paused = true;
    stage.bus.pause();
    post_phase(stage, s);
    info!("paused at score {}", s.score);
}

fn resume_session(stage: &mut Stage, s: &mut Session) {
    if s.is_ended() || !s.paused {
        return;
    }
    s.paused = false;
    stage.bus.resume();
    post_phase(stage, s);
    info!("resumed");
}

fn end_session(stage: &mut Stage, s: &mut Session) {
    if s.is_ended() {
        return;
    }
    s.phase = GamePhase::Ended;
    if let Some(bird) = s.bird.take() {
        if s.crash_at.is_none() {
            s.crash_at = position_of(&stage.world, bird).map(|p| (p.x, p.y));
        }
        destroy(stage, bird);
    }
    let delay = s.tuning.restart_delay_ms;
    s.restart_timer = Some(stage.schedule(None, delay, |stage| {
        with_session(stage, |_, s| {
            s.can_restart = true;
            s.restart_timer = None;
            debug!("restart allowed");
        });
    }));
    post_phase(stage, s);
    info!("run ended with score {}", s.score);
}

/// Per-frame controller logic.
fn update(stage: &mut Stage, s: &mut Session) {
    if s.paused {
        return;
    }
    if s.is_ended() {
        s.speed = 0.0;
    }
    let screen = stage.screen();

    if let Some(bird) = s.bird {
        if !s.entered {
            s.entered = position_of(&stage.world, bird).is_some_and(|p| p.y >= 0.5 * BIRD_HEIGHT);
        }
        if !s.is_started() {
            if let Some(p) = position_of(&stage.world, bird) {
                if p.y > HOVER_LINE * screen.h {
                    flap(stage, bird, Some(HOVER_STRENGTH));
                }
            }
        }

        if s.blink_counter <= 0 {
            s.blink_counter = stage.irandom(10, 300);
            blink(stage, bird);
        } else {
            s.blink_counter -= 1;
        }

        if s.is_started() && s.score > 0 {
            look_around(stage, s, bird);
        }
        if s.is_started() {
            keep_in_bounds(stage, s, bird);
        }
    }

    update_clouds(stage, s);
    update_obstacles(stage, s);
}

/// Now and then glance at the player or at a pipe, and keep tracking a
/// pipe while it scrolls.
fn look_around(stage: &mut Stage, s: &mut Session, bird: Entity) {
    if s.look_counter <= 0 {
        let mut roll = stage.random(0.0, 10.0);
        if roll <= SCREEN_LOOK_ODDS && s.eye_target == EyeTarget::Screen {
            roll += SCREEN_LOOK_ODDS;
        }
        if roll > SCREEN_LOOK_ODDS {
            let pipes: Vec<Entity> = s.obstacles.iter().flat_map(|p| [p.top, p.bottom]).collect();
            s.eye_target = if pipes.is_empty() {
                EyeTarget::Nothing
            } else {
                let pick = stage.irandom(0, pipes.len() as i32 - 1) as usize;
                EyeTarget::Pipe(pipes[pick])
            };
        } else {
            if let Some(p) = position_of(&stage.world, bird) {
                look_at(stage, bird, p.x, p.y);
            }
            s.eye_target = EyeTarget::Screen;
        }
        s.look_counter = stage.irandom(50, 300);
    } else {
        s.look_counter -= 1;
    }

    match s.eye_target {
        EyeTarget::Pipe(pipe) => {
            let top = s.obstacles.iter().any(|p| p.top == pipe);
            match position_of(&stage.world, pipe) {
                Some(p) => {
                    let edge = if top { p.y + PIPE_HEIGHT } else { p.y - PIPE_HEIGHT };
                    look_at(stage, bird, p.x, edge);
                }
                None => s.look_counter = 0,
            }
        }
        EyeTarget::Nothing => s.look_counter = 0,
        EyeTarget::Screen => {}
    }
}

fn keep_in_bounds(stage: &mut Stage, s: &mut Session, bird: Entity) {
    let Some(p) = position_of(&stage.world, bird) else {
        return;
    };
    let h = stage.screen().h;
    let half = 0.5 * BIRD_HEIGHT;
    let vy_now = stage.world.get::<Bird>(bird).map(|b| b.vy).unwrap_or(0.0);
    // above the field but never inside it: still dropping in
    let (y, vy, leaving) = if p.y < half {
        (half, BOUNCE_DOWN_VY, s.entered && vy_now < 0.0)
    } else if p.y > h - half {
        (h - half, BOUNCE_UP_VY, vy_now > 0.0)
    } else {
        return;
    };
    if s.tuning.lethal_bounds {
        if !leaving {
            return;
        }
        debug!("bird left the field at y={:.1}", p.y);
        crash(stage, s, None);
        return;
    }
    place(&mut stage.world, bird, p.x, y);
    if let Some(mut b) = stage.world.get_mut::<Bird>(bird) {
        b.vy = vy;
    }
}

fn add_cloud(stage: &mut Stage, s: &mut Session, x: f32, y: f32) {
    if s.paused || s.is_ended() {
        return;
    }
    let depth = stage.random(0.25, 1.0);
    let shape = stage.irandom(0, CLOUD_SHAPES as i32 - 1) as u32;
    s.clouds.push(spawn_cloud(stage, x, y, depth, shape));
}

fn update_clouds(stage: &mut Stage, s: &mut Session) {
    if s.time_to_next_cloud <= 0 {
        if s.clouds.len() < MAX_CLOUDS {
            s.time_to_next_cloud = stage.irandom(70, 100);
            let screen = stage.screen();
            let y = stage.random(0.0, screen.h);
            add_cloud(stage, s, screen.w + PIPE_WIDTH, y);
        }
    } else {
        s.time_to_next_cloud -= 1;
    }

    let dx = 0.5 * s.speed;
    let mut kept = Vec::with_capacity(s.clouds.len());
    for cloud in std::mem::take(&mut s.clouds) {
        let Some(p) = position_of(&stage.world, cloud) else {
            continue;
        };
        let x = p.x - dx;
        if x < -0.5 * CLOUD_WIDTH {
            destroy(stage, cloud);
        } else {
            place(&mut stage.world, cloud, x, p.y);
            kept.push(cloud);
        }
    }
    s.clouds = kept;
}

fn update_obstacles(stage: &mut Stage, s: &mut Session) {
    if s.is_started() {
        if s.time_to_next_pipe <= 0 {
            s.time_to_next_pipe = stage.irandom(100, 130);
            if !s.paused {
                let h = stage.screen().h;
                let center = stage.random(0.25, 0.75) * h;
                let gap = s.pipe_gap();
                s.obstacles.push(spawn_obstacle_pair(stage, center, gap));
            }
        } else {
            s.time_to_next_pipe -= 1;
        }
    }

    let bird_x = match s.bird.and_then(|b| position_of(&stage.world, b)) {
        Some(p) => p.x,
        None => s.crash_at.map(|(x, _)| x).unwrap_or(0.2 * stage.screen().w),
    };
    let speed = s.speed;
    let mut kept = Vec::with_capacity(s.obstacles.len());
    let mut hit = None;
    for mut pair in std::mem::take(&mut s.obstacles) {
        let Some(p) = position_of(&stage.world, pair.top) else {
            continue;
        };
        let x = p.x - speed;
        for e in pair.entities() {
            if let Some(q) = position_of(&stage.world, e) {
                place(&mut stage.world, e, x, q.y);
            }
        }

        if !pair.passed && x + 0.5 * PIPE_WIDTH < bird_x {
            pair.passed = true;
            if !s.is_ended() {
                let best_moved = s.score_point();
                post_notice(&mut stage.world, GameNotice::Score(s.score));
                if best_moved {
                    post_notice(&mut stage.world, GameNotice::BestScore(s.scores.best_score()));
                }
                debug!("score {} at speed {:.2}", s.score, s.speed);
            }
        }

        if x < -0.5 * PIPE_WIDTH {
            for e in pair.entities() {
                destroy(stage, e);
            }
            continue;
        }

        if hit.is_none() && !s.is_ended() {
            if let Some(bird) = s.bird {
                hit = [pair.top, pair.bottom]
                    .into_iter()
                    .find(|&pipe| touches(&stage.world, bird, pipe));
            }
        }
        kept.push(pair);
    }
    s.obstacles = kept;

    if let Some(pipe) = hit {
        crash(stage, s, Some(pipe));
    }
}

fn touches(world: &World, bird: Entity, pipe: Entity) -> bool {
    match (bounds_of(world, bird), bounds_of(world, pipe)) {
        (Some(b), Some(p)) => HitboxInsets::default().hits(b, BIRD_WIDTH, BIRD_HEIGHT, p, PIPE_WIDTH),
        _ => false,
    }
}

/// End the run and play the death sequence: the shocked bird sparks for a
/// second, then bursts into a poof and feathers and its ghost rises.
fn crash(stage: &mut Stage, s: &mut Session, pipe: Option<Entity>) {
    if s.is_ended() {
        return;
    }
    if let Some(bird) = s.bird {
        s.crash_at = position_of(&stage.world, bird).map(|p| (p.x, p.y));
    }
    end_session(stage, s);
    let Some((x, y)) = s.crash_at else {
        return;
    };

    let wires = pipe.and_then(|pipe| s.obstacles.iter().find_map(|pair| pair.wires_for(pipe)));
    if let Some(wires) = wires {
        set_zap(&mut stage.world, wires, true);
    }
    if let Some(old) = s.remains.take() {
        destroy(stage, old);
    }
    let shocked = spawn_shocked_bird(stage, x, y);
    s.remains = Some(shocked);

    let kills = s.scores.record_kill();
    post_notice(&mut stage.world, GameNotice::KillCount(kills));
    info!("crashed at ({:.0}, {:.0}), kill #{}", x, y, kills);

    stage.schedule(Some(shocked), SHOCK_MS, move |stage| {
        with_session(stage, |stage, s| {
            if let Some(wires) = wires {
                set_zap(&mut stage.world, wires, false);
            }
            let count = stage.irandom(8, 15) as u32;
            let poof = spawn_poof(stage, x, y, POOF_Z);
            let feathers = spawn_feather_burst(stage, x, y, count);
            s.debris.retain(|&e| stage.is_alive(e));
            s.debris.push(poof);
            s.debris.extend(feathers);
            if let Some(remains) = s.remains.take() {
                destroy(stage, remains);
            }
            s.remains = Some(spawn_ghost_bird(stage, x + 15.0, y + 10.0));
        });
    });
}
