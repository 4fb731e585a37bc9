//! Game progression integration tests: scoring, speed cap, persistence and
//! the crash/restart cycle seen through the HUD.

use std::path::PathBuf;

use zapbird::components::bird::Bird;
use zapbird::game::{self, handle_input, with_session};
use zapbird::host::{build_stage, launch, open_scoreboard};
use zapbird::resources::gameconfig::{GameConfig, GameTuning};
use zapbird::resources::gamestate::{GamePhase, Session};
use zapbird::resources::input::{InputEvent, RawInput};
use zapbird::resources::presentation::RecordingPresentation;
use zapbird::resources::scorestore::ScoreBoard;
use zapbird::resources::texturestore::NullLoader;
use zapbird::stage::{FRAME_MS, Stage};
use zapbird::systems::entity::place;
use zapbird::systems::pipe::spawn_obstacle_pair;

fn run(stage: &mut Stage, frames: usize) {
    for _ in 0..frames {
        stage.run_frame(FRAME_MS);
    }
}

fn temp_store(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("zapbird-it-{}-{}.json", name, std::process::id()))
}

/// Start a run with a wide-open pair already on its way.
fn start_with_open_pair(stage: &mut Stage) {
    with_session(stage, |stage, s| {
        s.tuning.lethal_bounds = false;
        s.time_to_next_pipe = 100_000;
        let pair = spawn_obstacle_pair(stage, 900.0, 2000.0);
        s.obstacles.push(pair);
    });
    handle_input(stage, InputEvent::Primary);
}

fn crash_into_ceiling(stage: &mut Stage) {
    let bird = stage.world.resource::<Session>().bird.unwrap();
    place(&mut stage.world, bird, 320.0, 10.0);
    stage.world.get_mut::<Bird>(bird).unwrap().vy = -5.0;
    run(stage, 1);
}

#[test]
fn test_speed_never_exceeds_cap() {
    let mut stage = Stage::headless(1600.0, 1800.0, 4);
    let tuning = GameTuning {
        speed_step: 0.5,
        ..GameTuning::default()
    };
    game::install(&mut stage, tuning, ScoreBoard::in_memory());
    with_session(&mut stage, |_, s| {
        for _ in 0..5 {
            s.score_point();
        }
        assert_eq!(s.speed, s.tuning.max_speed);
        assert_eq!(s.score, 5);
    });
}

#[test]
fn test_best_score_survives_a_new_session() {
    let path = temp_store("best");
    let _ = std::fs::remove_file(&path);
    let mut config = GameConfig::new();
    config.seed = Some(8);
    config.store_path = path.clone();

    {
        let mut stage = build_stage(&config, Box::new(NullLoader::default()));
        launch(&mut stage, &config, open_scoreboard(&config), Box::new(RecordingPresentation::new()));
        run(&mut stage, 30);
        start_with_open_pair(&mut stage);
        run(&mut stage, 320);
        assert_eq!(stage.world.resource::<Session>().score, 1);
        game::teardown(&mut stage);
    }

    let board = open_scoreboard(&config);
    assert_eq!(board.best_score(), 1);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_crash_and_restart_through_the_hud() {
    let mut config = GameConfig::new();
    config.seed = Some(12);
    config.tuning.kill_count_threshold = 1;
    let mut stage = build_stage(&config, Box::new(NullLoader::default()));
    let sink = RecordingPresentation::new();
    let values = sink.values();
    launch(&mut stage, &config, ScoreBoard::in_memory(), Box::new(sink));

    run(&mut stage, 30);
    handle_input(&mut stage, RawInput::TouchStart.into());
    run(&mut stage, 1);
    assert_eq!(values.borrow().status.as_deref(), Some("started"));

    crash_into_ceiling(&mut stage);
    assert_eq!(stage.world.resource::<Session>().phase, GamePhase::Ended);
    assert_eq!(values.borrow().status.as_deref(), Some("ended"));
    assert_eq!(values.borrow().kill_count, Some(1));

    // too early: the restart delay has not passed
    run(&mut stage, 30);
    handle_input(&mut stage, RawInput::PointerDown.into());
    assert_eq!(stage.world.resource::<Session>().phase, GamePhase::Ended);

    run(&mut stage, 180);
    handle_input(&mut stage, RawInput::KeyDown { escape: false }.into());
    run(&mut stage, 1);
    let s = stage.world.resource::<Session>();
    assert_eq!(s.phase, GamePhase::NotStarted);
    assert_eq!(s.score, 0);
    assert_eq!(values.borrow().status.as_deref(), Some("not-started"));
}

#[test]
fn test_escape_suspends_and_resumes() {
    let mut stage = Stage::headless(1600.0, 1800.0, 2);
    game::install(&mut stage, GameTuning::default(), ScoreBoard::in_memory());
    run(&mut stage, 60);
    handle_input(&mut stage, InputEvent::Primary);

    handle_input(&mut stage, RawInput::KeyDown { escape: true }.into());
    assert!(stage.world.resource::<Session>().paused);
    let frames_before = stage.world.resource::<Session>().time_to_next_pipe;
    run(&mut stage, 20);
    assert_eq!(stage.world.resource::<Session>().time_to_next_pipe, frames_before);

    handle_input(&mut stage, RawInput::KeyDown { escape: true }.into());
    assert!(!stage.world.resource::<Session>().paused);
    run(&mut stage, 1);
    assert_eq!(stage.world.resource::<Session>().time_to_next_pipe, frames_before - 1);
}
