//! Persistent numbers: best score and lifetime kill count.
//!
//! [`ScalarStore`] is the storage capability. [`JsonFileStore`] keeps a flat
//! JSON object on disk and rewrites it on every set, keeping entries it
//! does not understand; [`MemoryStore`] is for tests and throwaway runs. [`ScoreBoard`] is what the game talks to.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::{EngineError, EngineResult};

pub const BEST_SCORE_KEY: &str = "best_score";
pub const KILL_COUNT_KEY: &str = "kill_count";

/// Number storage keyed by name. Absent keys read as `None`.
pub trait ScalarStore: Send + Sync {
    fn get_number(&self, key: &str) -> Option<f64>;
    fn set_number(&mut self, key: &str, value: f64) -> EngineResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScalarStore for MemoryStore {
    fn get_number(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    fn set_number(&mut self, key: &str, value: f64) -> EngineResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON object on disk, e.g. `{"best_score": 12, "kill_count": 40}`.
/// Each key is read on its own: a value that is not a number reads as
/// absent and is written back untouched.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl JsonFileStore {
    /// Open `path`. A missing file is an empty store; an unreadable one is
    /// reported and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("score store {:?} unreadable ({}); starting empty", path, err);
                Map::new()
            }
        };
        Self { path, entries }
    }

    fn read(path: &Path) -> EngineResult<Map<String, Value>> {
        if !path.exists() {
            debug!("score store {:?} does not exist yet", path);
            return Ok(Map::new());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScalarStore for JsonFileStore {
    fn get_number(&self, key: &str) -> Option<f64> {
        let value = self.entries.get(key)?;
        let number = value.as_f64();
        if number.is_none() {
            debug!("score store key '{}' holds {}, not a number", key, value);
        }
        number
    }

    fn set_number(&mut self, key: &str, value: f64) -> EngineResult<()> {
        if !value.is_finite() {
            return Err(EngineError::Store(format!("refusing to store {} under '{}'", value, key)));
        }
        self.entries.insert(key.to_string(), Value::from(value));
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Best score and kill count on top of a [`ScalarStore`]. Write failures
/// are logged and the in-memory values stay authoritative for the run.
pub struct ScoreBoard {
    store: Box<dyn ScalarStore>,
    best: u32,
    kills: u32,
}

fn as_count(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v as u32,
        _ => 0,
    }
}

impl ScoreBoard {
    pub fn new(store: Box<dyn ScalarStore>) -> Self {
        let best = as_count(store.get_number(BEST_SCORE_KEY));
        let kills = as_count(store.get_number(KILL_COUNT_KEY));
        Self { store, best, kills }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn best_score(&self) -> u32 {
        self.best
    }

    pub fn kill_count(&self) -> u32 {
        self.kills
    }

    /// Persist `score` if it beats the best. Returns true if it did.
    pub fn submit_score(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(err) = self.store.set_number(BEST_SCORE_KEY, f64::from(score)) {
            warn!("could not persist best score: {}", err);
        }
        true
    }

    /// Count one more death and return the new total.
    pub fn record_kill(&mut self) -> u32 {
        self.kills += 1;
        if let Err(err) = self.store.set_number(KILL_COUNT_KEY, f64::from(self.kills)) {
            warn!("could not persist kill count: {}", err);
        }
        self.kills
    }
}

impl std::fmt::Debug for ScoreBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreBoard")
            .field("best", &self.best)
            .field("kills", &self.kills)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("zapbird-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_best_score_never_decreases() {
        let mut board = ScoreBoard::in_memory();
        assert_eq!(board.best_score(), 0);
        assert!(board.submit_score(5));
        assert!(!board.submit_score(5));
        assert!(!board.submit_score(3));
        assert_eq!(board.best_score(), 5);
        assert!(board.submit_score(6));
        assert_eq!(board.best_score(), 6);
    }

    #[test]
    fn test_kill_count_accumulates() {
        let mut board = ScoreBoard::in_memory();
        assert_eq!(board.record_kill(), 1);
        assert_eq!(board.record_kill(), 2);
        assert_eq!(board.kill_count(), 2);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);
        {
            let mut board = ScoreBoard::new(Box::new(JsonFileStore::open(&path)));
            board.submit_score(12);
            board.record_kill();
        }
        let board = ScoreBoard::new(Box::new(JsonFileStore::open(&path)));
        assert_eq!(board.best_score(), 12);
        assert_eq!(board.kill_count(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_garbage_file_reads_as_zero() {
        let path = temp_path("garbage");
        fs::write(&path, "not json at all").unwrap();
        let store = JsonFileStore::open(&path);
        assert_eq!(store.get_number(BEST_SCORE_KEY), None);
        assert_eq!(ScoreBoard::new(Box::new(store)).best_score(), 0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_one_bad_key_spares_the_others() {
        let path = temp_path("badkey");
        fs::write(&path, r#"{"best_score": "oops", "kill_count": 40, "volume": [1, 2]}"#).unwrap();
        let mut board = ScoreBoard::new(Box::new(JsonFileStore::open(&path)));
        assert_eq!(board.best_score(), 0);
        assert_eq!(board.kill_count(), 40);

        assert!(board.submit_score(1));
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["best_score"].as_f64(), Some(1.0));
        assert_eq!(written["kill_count"].as_f64(), Some(40.0));
        assert_eq!(written["volume"], serde_json::json!([1, 2]));

        let board = ScoreBoard::new(Box::new(JsonFileStore::open(&path)));
        assert_eq!(board.best_score(), 1);
        assert_eq!(board.kill_count(), 40);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_negative_or_fractional_values_are_sanitised() {
        let mut store = MemoryStore::new();
        store.set_number(BEST_SCORE_KEY, -4.0).unwrap();
        store.set_number(KILL_COUNT_KEY, 7.9).unwrap();
        let board = ScoreBoard::new(Box::new(store));
        assert_eq!(board.best_score(), 0);
        assert_eq!(board.kill_count(), 7);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let path = temp_path("nan");
        let mut store = JsonFileStore::open(&path);
        assert!(matches!(store.set_number("x", f64::NAN), Err(EngineError::Store(_))));
        let _ = fs::remove_file(&path);
    }
}
