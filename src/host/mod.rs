//! Hosts: what turns a [`Stage`] into a running game.
//!
//! - [`headless`] – fixed-step simulation with an optional autopilot, used
//!   by tests and `--headless`
//! - `window` – raylib window replaying the draw list (feature `window`)
//!
//! Both share the setup here: build the stage from a [`GameConfig`], open
//! the score store, install the HUD and start the game once every sprite
//! sheet has settled.

pub mod headless;
#[cfg(feature = "window")]
pub mod window;

use std::cell::Cell;
use std::rc::Rc;

use fastrand::Rng;
use log::{debug, info};

use crate::events::framebus::{FrameScheduler, IntervalScheduler, ListenerId, Phase, RefreshScheduler};
use crate::game;
use crate::resources::debugmode::DebugMode;
use crate::resources::gameconfig::GameConfig;
use crate::resources::presentation::Presentation;
use crate::resources::scorestore::{JsonFileStore, ScoreBoard};
use crate::resources::texturestore::ImageLoader;
use crate::stage::Stage;
use crate::systems::bird::BIRD_SHEET;
use crate::systems::cloud::CLOUD_SHEET;
use crate::systems::ghostbird::GHOST_SHEET;
use crate::systems::hud::{HudAdapter, install_hud, install_progress_reporter};
use crate::systems::shockedbird::SHOCKED_SHEET;

/// Every image the game draws, requested up front for progress reporting.
pub const SPRITE_SHEETS: [&str; 8] = [
    BIRD_SHEET,
    SHOCKED_SHEET,
    GHOST_SHEET,
    CLOUD_SHEET,
    "pipes-top.png",
    "pipes-bottom.png",
    "wires-top.png",
    "wires-bottom.png",
];

/// Build a stage sized to the configured play field.
pub fn build_stage(config: &GameConfig, loader: Box<dyn ImageLoader>) -> Stage {
    let (w, h) = config.field_size();
    let scheduler: Box<dyn FrameScheduler> = if config.vsync {
        Box::new(RefreshScheduler::default())
    } else {
        Box::new(IntervalScheduler::from_fps(config.target_fps))
    };
    let rng = match config.seed {
        Some(seed) => Rng::with_seed(seed),
        None => Rng::new(),
    };
    let mut stage = Stage::new(w, h, loader, scheduler, rng);
    if config.show_bounds || config.show_origin {
        stage.world.insert_resource(DebugMode {
            show_origin: config.show_origin,
            show_bounds: config.show_bounds,
        });
    }
    stage.textures.preload(SPRITE_SHEETS);
    stage
}

pub fn open_scoreboard(config: &GameConfig) -> ScoreBoard {
    let store = JsonFileStore::open(&config.store_path);
    let board = ScoreBoard::new(Box::new(store));
    info!(
        "scores from {:?}: best {}, kills {}",
        config.store_path,
        board.best_score(),
        board.kill_count()
    );
    board
}

/// Runs ahead of the progress reporter, so the first HUD pass after loading
/// already carries the game's notices.
const GAME_START_PRIORITY: i32 = -2;

/// Install the progress reporter and the HUD, start the bus, and install the
/// game on the first frame where preloading is complete.
pub fn launch(stage: &mut Stage, config: &GameConfig, scores: ScoreBoard, sink: Box<dyn Presentation>) {
    install_progress_reporter(stage);
    install_hud(stage, HudAdapter::new(sink, config.tuning.kill_count_threshold));

    let tuning = config.tuning;
    let mut scores = Some(scores);
    let own_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
    let id_slot = Rc::clone(&own_id);
    let id = stage.bus.on(
        Phase::Rendered,
        move |stage: &mut Stage| {
            if stage.textures.progress() < 100 {
                return;
            }
            if let Some(scores) = scores.take() {
                debug!("sprite sheets settled after {} frames", stage.bus.frames());
                game::install(stage, tuning, scores);
            }
            if let Some(id) = id_slot.take() {
                stage.bus.off(Phase::Rendered, id);
            }
        },
        GAME_START_PRIORITY,
    );
    own_id.set(Some(id));
    stage.bus.start();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::gamestate::Session;
    use crate::resources::presentation::RecordingPresentation;
    use crate::resources::texturestore::{DirectoryLoader, ImageLoaded, NullLoader};
    use crate::stage::FRAME_MS;

    #[test]
    fn test_build_stage_uses_config() {
        let mut config = GameConfig::new();
        config.render_width = 400;
        config.render_height = 300;
        config.seed = Some(3);
        config.show_bounds = true;
        let stage = build_stage(&config, Box::new(NullLoader::default()));
        assert_eq!(stage.screen().w, 400.0);
        assert_eq!(stage.screen().h, 300.0);
        assert!(stage.world.resource::<DebugMode>().show_bounds);
        assert_eq!(stage.textures.progress(), 0);
    }

    #[test]
    fn test_launch_installs_everything() {
        let mut config = GameConfig::new();
        config.seed = Some(5);
        let mut stage = build_stage(&config, Box::new(NullLoader::default()));
        let sink = RecordingPresentation::new();
        let values = sink.values();
        launch(&mut stage, &config, ScoreBoard::in_memory(), Box::new(sink));
        assert!(stage.bus.is_running());
        assert!(!stage.world.contains_resource::<Session>());
        let rendered = stage.bus.listener_count(Phase::Rendered);
        stage.run_frame(FRAME_MS);
        assert!(stage.world.contains_resource::<Session>());
        assert_eq!(stage.bus.listener_count(Phase::Rendered), rendered - 1);
        let values = values.borrow();
        assert_eq!(values.progress, Some(100));
        assert_eq!(values.score, Some(0));
        assert_eq!(values.status.as_deref(), Some("not-started"));
    }

    /// Settles one sprite sheet per poll, after a few empty polls.
    struct TrickleLoader {
        queued: Vec<String>,
        idle_polls: u32,
    }

    impl ImageLoader for TrickleLoader {
        fn request(&mut self, key: &str) {
            self.queued.push(key.to_string());
        }

        fn poll(&mut self) -> Vec<ImageLoaded> {
            if self.idle_polls > 0 {
                self.idle_polls -= 1;
                return Vec::new();
            }
            if self.queued.is_empty() {
                return Vec::new();
            }
            let key = self.queued.remove(0);
            vec![ImageLoaded { key, result: Ok(()) }]
        }
    }

    #[test]
    fn test_game_waits_for_preloading() {
        let mut config = GameConfig::new();
        config.seed = Some(6);
        let loader = TrickleLoader {
            queued: Vec::new(),
            idle_polls: 3,
        };
        let mut stage = build_stage(&config, Box::new(loader));
        let sink = RecordingPresentation::new();
        let values = sink.values();
        launch(&mut stage, &config, ScoreBoard::in_memory(), Box::new(sink));

        // three idle polls, then one sheet per frame
        let loading_frames = 3 + SPRITE_SHEETS.len() - 1;
        for _ in 0..loading_frames {
            stage.run_frame(FRAME_MS);
            assert!(!stage.world.contains_resource::<Session>());
            assert!(values.borrow().progress.is_some_and(|p| p < 100));
            assert_eq!(values.borrow().status, None);
        }
        stage.run_frame(FRAME_MS);
        assert!(stage.world.contains_resource::<Session>());
        assert_eq!(values.borrow().progress, Some(100));
        assert_eq!(values.borrow().status.as_deref(), Some("not-started"));
    }

    #[test]
    fn test_failed_sheets_still_let_the_game_start() {
        let config = GameConfig::new();
        let loader = DirectoryLoader::new(std::env::temp_dir().join("zapbird-no-assets"));
        let mut stage = build_stage(&config, Box::new(loader));
        let sink = Box::new(RecordingPresentation::new());
        launch(&mut stage, &config, ScoreBoard::in_memory(), sink);
        stage.run_frame(FRAME_MS);
        assert!(stage.world.contains_resource::<Session>());
    }
}
