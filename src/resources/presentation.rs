//! Presentation sinks: where score text ends up.
//!
//! The simulation never writes text itself. It posts notices, and the HUD
//! adapter forwards them to one of these sinks once per frame.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;

/// Numeric text outputs of the game.
pub trait Presentation {
    fn show_score(&mut self, score: u32);
    fn show_best_score(&mut self, best: u32);
    fn show_kill_count(&mut self, kills: u32);
    /// Asset loading progress in percent.
    fn show_progress(&mut self, percent: u32);
    /// Phase label and pause flag, for hosts that style by state.
    fn show_status(&mut self, _status: &str) {}
}

/// Writes everything to the log.
#[derive(Debug, Default)]
pub struct LogPresentation;

impl Presentation for LogPresentation {
    fn show_score(&mut self, score: u32) {
        info!("score: {}", score);
    }

    fn show_best_score(&mut self, best: u32) {
        info!("best score: {}", best);
    }

    fn show_kill_count(&mut self, kills: u32) {
        info!("kill count: {}", kills);
    }

    fn show_progress(&mut self, percent: u32) {
        info!("loading: {}%", percent);
    }

    fn show_status(&mut self, status: &str) {
        info!("status: {}", status);
    }
}

/// Latest value written to each sink.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentedValues {
    pub score: Option<u32>,
    pub best_score: Option<u32>,
    pub kill_count: Option<u32>,
    pub progress: Option<u32>,
    pub status: Option<String>,
    /// Number of writes of any kind.
    pub writes: usize,
}

/// Keeps the latest values where a test (or a host) can read them.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    values: Rc<RefCell<PresentedValues>>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the recorded values.
    pub fn values(&self) -> Rc<RefCell<PresentedValues>> {
        Rc::clone(&self.values)
    }

    fn record(&self, f: impl FnOnce(&mut PresentedValues)) {
        let mut values = self.values.borrow_mut();
        f(&mut values);
        values.writes += 1;
    }
}

impl Presentation for RecordingPresentation {
    fn show_score(&mut self, score: u32) {
        self.record(|v| v.score = Some(score));
    }

    fn show_best_score(&mut self, best: u32) {
        self.record(|v| v.best_score = Some(best));
    }

    fn show_kill_count(&mut self, kills: u32) {
        self.record(|v| v.kill_count = Some(kills));
    }

    fn show_progress(&mut self, percent: u32) {
        self.record(|v| v.progress = Some(percent));
    }

    fn show_status(&mut self, status: &str) {
        self.record(|v| v.status = Some(status.to_string()));
    }
}
