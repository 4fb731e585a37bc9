//! Game configuration resource.
//!
//! Settings are read from an INI file. Every key is optional: whatever the
//! file does not mention keeps its default, and a missing or broken file
//! leaves the whole configuration at its defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 900
//! target_fps = 60
//! vsync = true
//! fullscreen = false
//!
//! [render]
//! width = 1600
//! height = 1800
//!
//! [game]
//! min_speed = 6
//! max_speed = 6.7
//! speed_step = 0.04
//! base_gap = 440
//! gap_per_speed = 50
//! restart_delay_ms = 3000
//! lethal_bounds = true
//! kill_count_threshold = 3
//! seed = 42
//!
//! [storage]
//! path = ./scores.json
//!
//! [assets]
//! dir = ./assets
//!
//! [debug]
//! show_bounds = false
//! show_origin = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 900;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_RENDER_WIDTH: u32 = 1600;
const DEFAULT_RENDER_HEIGHT: u32 = 1800;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";
const DEFAULT_STORE_PATH: &str = "./scores.json";
const DEFAULT_ASSETS_DIR: &str = "./assets";

/// Speed, gap and pacing rules for one play session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameTuning {
    /// Obstacle speed in pixels per update at the start of a run.
    pub min_speed: f32,
    pub max_speed: f32,
    /// Speed gained per scored obstacle.
    pub speed_step: f32,
    /// Gap between pipes halfway through the speed range.
    pub base_gap: f32,
    /// Gap change per unit of speed away from either end of the range.
    pub gap_per_speed: f32,
    pub restart_delay_ms: f64,
    /// Leaving the field through the top or bottom ends the run; otherwise
    /// the bird bounces off the edges.
    pub lethal_bounds: bool,
    /// Kill count is shown once it reaches this value.
    pub kill_count_threshold: u32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            min_speed: 6.0,
            max_speed: 6.7,
            speed_step: 0.04,
            base_gap: 440.0,
            gap_per_speed: 50.0,
            restart_delay_ms: 3000.0,
            lethal_bounds: true,
            kill_count_threshold: 3,
        }
    }
}

impl GameTuning {
    /// Pipe gap at `speed`: wider when slow, narrower when fast.
    pub fn gap_at(&self, speed: f32) -> f32 {
        self.base_gap + self.gap_per_speed * (self.max_speed - speed)
            - self.gap_per_speed * (speed - self.min_speed)
    }
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Present frames in step with the display refresh.
    pub vsync: bool,
    pub fullscreen: bool,
    /// Play-field width in pixels.
    pub render_width: u32,
    /// Play-field height in pixels.
    pub render_height: u32,
    pub tuning: GameTuning,
    /// Fixed RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
    /// JSON file holding the best score and kill count.
    pub store_path: PathBuf,
    pub assets_dir: PathBuf,
    pub show_bounds: bool,
    pub show_origin: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            fullscreen: DEFAULT_FULLSCREEN,
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            tuning: GameTuning::default(),
            seed: None,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            show_bounds: false,
            show_origin: false,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Defaults overlaid with whatever `path` provides. Failures are logged
    /// and leave the defaults in place.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let mut config = Self::with_path(path);
        if let Err(err) = config.load_from_file() {
            warn!("{}; using defaults", err);
        }
        config
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> EngineResult<()> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| EngineError::Config(format!("failed to load {:?}: {}", self.config_path, e)))?;
        self.apply(&ini);

        info!(
            "Loaded config: {}x{} field, {}x{} window, fps={}, vsync={}, speed {}..{}",
            self.render_width,
            self.render_height,
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.tuning.min_speed,
            self.tuning.max_speed
        );
        Ok(())
    }

    /// Overlay the values present in `ini`.
    pub fn apply(&mut self, ini: &Ini) {
        let uint = |section: &str, key: &str| ini.getuint(section, key).ok().flatten();
        let float = |section: &str, key: &str| ini.getfloat(section, key).ok().flatten();
        let boolean = |section: &str, key: &str| ini.getbool(section, key).ok().flatten();

        // [window] section
        if let Some(width) = uint("window", "width") {
            self.window_width = width as u32;
        }
        if let Some(height) = uint("window", "height") {
            self.window_height = height as u32;
        }
        if let Some(fps) = uint("window", "target_fps") {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = boolean("window", "vsync") {
            self.vsync = vsync;
        }
        if let Some(fullscreen) = boolean("window", "fullscreen") {
            self.fullscreen = fullscreen;
        }

        // [render] section
        if let Some(width) = uint("render", "width") {
            self.render_width = width as u32;
        }
        if let Some(height) = uint("render", "height") {
            self.render_height = height as u32;
        }

        // [game] section
        let t = &mut self.tuning;
        if let Some(v) = float("game", "min_speed") {
            t.min_speed = v as f32;
        }
        if let Some(v) = float("game", "max_speed") {
            t.max_speed = v as f32;
        }
        if let Some(v) = float("game", "speed_step") {
            t.speed_step = v as f32;
        }
        if let Some(v) = float("game", "base_gap") {
            t.base_gap = v as f32;
        }
        if let Some(v) = float("game", "gap_per_speed") {
            t.gap_per_speed = v as f32;
        }
        if let Some(v) = float("game", "restart_delay_ms") {
            t.restart_delay_ms = v;
        }
        if let Some(v) = boolean("game", "lethal_bounds") {
            t.lethal_bounds = v;
        }
        if let Some(v) = uint("game", "kill_count_threshold") {
            t.kill_count_threshold = v as u32;
        }
        if t.max_speed < t.min_speed {
            warn!("max_speed {} below min_speed {}; clamping", t.max_speed, t.min_speed);
            t.max_speed = t.min_speed;
        }
        if let Some(seed) = uint("game", "seed") {
            self.seed = Some(seed);
        }

        // [storage] and [assets] sections
        if let Some(path) = ini.get("storage", "path") {
            self.store_path = PathBuf::from(path);
        }
        if let Some(dir) = ini.get("assets", "dir") {
            self.assets_dir = PathBuf::from(dir);
        }

        // [debug] section
        if let Some(v) = boolean("debug", "show_bounds") {
            self.show_bounds = v;
        }
        if let Some(v) = boolean("debug", "show_origin") {
            self.show_origin = v;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> EngineResult<()> {
        self.save_to(&self.config_path)
    }

    pub fn save_to(&self, path: &Path) -> EngineResult<()> {
        let mut ini = Ini::new();
        let mut set = |section: &str, key: &str, value: String| {
            ini.set(section, key, Some(value));
        };

        set("window", "width", self.window_width.to_string());
        set("window", "height", self.window_height.to_string());
        set("window", "target_fps", self.target_fps.to_string());
        set("window", "vsync", self.vsync.to_string());
        set("window", "fullscreen", self.fullscreen.to_string());

        set("render", "width", self.render_width.to_string());
        set("render", "height", self.render_height.to_string());

        let t = &self.tuning;
        set("game", "min_speed", t.min_speed.to_string());
        set("game", "max_speed", t.max_speed.to_string());
        set("game", "speed_step", t.speed_step.to_string());
        set("game", "base_gap", t.base_gap.to_string());
        set("game", "gap_per_speed", t.gap_per_speed.to_string());
        set("game", "restart_delay_ms", t.restart_delay_ms.to_string());
        set("game", "lethal_bounds", t.lethal_bounds.to_string());
        set("game", "kill_count_threshold", t.kill_count_threshold.to_string());
        if let Some(seed) = self.seed {
            set("game", "seed", seed.to_string());
        }

        set("storage", "path", self.store_path.display().to_string());
        set("assets", "dir", self.assets_dir.display().to_string());

        set("debug", "show_bounds", self.show_bounds.to_string());
        set("debug", "show_origin", self.show_origin.to_string());

        ini.write(path)?;
        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Play-field size in pixels.
    pub fn field_size(&self) -> (f32, f32) {
        (self.render_width as f32, self.render_height as f32)
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> GameConfig {
        let mut ini = Ini::new();
        ini.read(text.to_string()).unwrap();
        let mut config = GameConfig::new();
        config.apply(&ini);
        config
    }

    #[test]
    fn test_defaults_match_reference_tuning() {
        let t = GameTuning::default();
        assert!((t.gap_at(t.min_speed) - 475.0).abs() < 1e-3);
        assert!((t.gap_at(t.max_speed) - 405.0).abs() < 1e-3);
        assert_eq!(GameConfig::new().field_size(), (1600.0, 1800.0));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse(
            "[game]\nmin_speed = 5\nlethal_bounds = false\nseed = 9\n[render]\nwidth = 1000\n",
        );
        assert_eq!(config.tuning.min_speed, 5.0);
        assert!(!config.tuning.lethal_bounds);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.render_width, 1000);
        assert_eq!(config.render_height, DEFAULT_RENDER_HEIGHT);
        assert_eq!(config.tuning.max_speed, 6.7);
    }

    #[test]
    fn test_inverted_speed_range_is_clamped() {
        let config = parse("[game]\nmin_speed = 8\nmax_speed = 7\n");
        assert_eq!(config.tuning.max_speed, 8.0);
    }

    #[test]
    fn test_missing_file_degrades_to_defaults() {
        let config = GameConfig::load_or_default("/definitely/not/here.ini");
        assert_eq!(config.target_fps, DEFAULT_TARGET_FPS);
        assert!(GameConfig::with_path("/definitely/not/here.ini").load_from_file().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("zapbird-config-{}.ini", std::process::id()));
        let mut config = GameConfig::with_path(&path);
        config.tuning.speed_step = 0.5;
        config.show_bounds = true;
        config.save_to_file().unwrap();

        let loaded = GameConfig::load_or_default(&path);
        assert_eq!(loaded.tuning.speed_step, 0.5);
        assert!(loaded.show_bounds);
        let _ = std::fs::remove_file(&path);
    }
}
