//! Image status cache and loaders.
//!
//! Sprites refer to images by key. The first time a key is seen the
//! [`TextureStore`] asks its [`ImageLoader`] for it and reports it as
//! pending; entities skip their blit until the load resolves. Completions are
//! collected once per frame by [`TextureStore::poll`]. A failed load logs one
//! warning and the key stays undrawn for the rest of the session.

use std::path::PathBuf;

use log::{debug, warn};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Pending,
    Ready,
    Failed,
}

/// Completion report from a loader.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLoaded {
    pub key: String,
    pub result: Result<(), String>,
}

/// Asynchronous image source.
pub trait ImageLoader {
    /// Begin loading `key`. Called at most once per key.
    fn request(&mut self, key: &str);
    /// Drain loads that finished since the last poll.
    fn poll(&mut self) -> Vec<ImageLoaded>;
}

/// Loader for hosts that never draw pixels: every request succeeds on the
/// next poll.
#[derive(Debug, Default)]
pub struct NullLoader {
    queued: Vec<String>,
}

impl ImageLoader for NullLoader {
    fn request(&mut self, key: &str) {
        self.queued.push(key.to_string());
    }

    fn poll(&mut self) -> Vec<ImageLoaded> {
        self.queued
            .drain(..)
            .map(|key| ImageLoaded { key, result: Ok(()) })
            .collect()
    }
}

/// Resolves keys as file names under an asset directory. The windowed host
/// uploads the pixels itself once a key reports ready.
#[derive(Debug)]
pub struct DirectoryLoader {
    root: PathBuf,
    queued: Vec<String>,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            queued: Vec::new(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ImageLoader for DirectoryLoader {
    fn request(&mut self, key: &str) {
        self.queued.push(key.to_string());
    }

    fn poll(&mut self) -> Vec<ImageLoaded> {
        let queued = std::mem::take(&mut self.queued);
        queued
            .into_iter()
            .map(|key| {
                let path = self.path_for(&key);
                let result = if path.is_file() {
                    Ok(())
                } else {
                    Err(format!("no such file: {}", path.display()))
                };
                ImageLoaded { key, result }
            })
            .collect()
    }
}

/// Per-key load state plus an optional preload set for progress reporting.
pub struct TextureStore {
    loader: Box<dyn ImageLoader>,
    status: FxHashMap<String, ImageStatus>,
    preload: Vec<String>,
}

impl TextureStore {
    pub fn new(loader: Box<dyn ImageLoader>) -> Self {
        Self {
            loader,
            status: FxHashMap::default(),
            preload: Vec::new(),
        }
    }

    /// Current status of `key`, requesting it on first encounter.
    pub fn status(&mut self, key: &str) -> ImageStatus {
        if let Some(status) = self.status.get(key) {
            return *status;
        }
        debug!("requesting image '{}'", key);
        self.loader.request(key);
        self.status.insert(key.to_string(), ImageStatus::Pending);
        ImageStatus::Pending
    }

    /// Status without triggering a load.
    pub fn peek(&self, key: &str) -> Option<ImageStatus> {
        self.status.get(key).copied()
    }

    /// Request every key up front and track them for [`Self::progress`].
    pub fn preload<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref();
            self.status(key);
            if !self.preload.iter().any(|k| k == key) {
                self.preload.push(key.to_string());
            }
        }
    }

    /// Percentage of preloaded keys that have settled (ready or failed).
    pub fn progress(&self) -> u32 {
        if self.preload.is_empty() {
            return 100;
        }
        let settled = self
            .preload
            .iter()
            .filter(|k| self.peek(k).is_some_and(|s| s != ImageStatus::Pending))
            .count();
        (settled * 100 / self.preload.len()) as u32
    }

    /// Apply finished loads. Returns how many settled.
    pub fn poll(&mut self) -> usize {
        let loaded = self.loader.poll();
        let count = loaded.len();
        for ImageLoaded { key, result } in loaded {
            let status = match result {
                Ok(()) => ImageStatus::Ready,
                Err(reason) => {
                    warn!("image '{}' failed to load: {}", key, reason);
                    ImageStatus::Failed
                }
            };
            self.status.insert(key, status);
        }
        count
    }
}
