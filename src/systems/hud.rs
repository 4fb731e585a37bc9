//! HUD adapter: forwards game notices to a [`Presentation`] sink.
//!
//! Runs on the `Rendered` phase, after the frame is drawn, so text updates
//! never interleave with simulation or drawing. Repeated values are not
//! rewritten.

use log::debug;

use crate::events::framebus::{ListenerId, Phase};
use crate::events::gamenotice::{GameNotice, NoticeBoard, post_notice};
use crate::resources::presentation::Presentation;
use crate::stage::Stage;

pub struct HudAdapter {
    sink: Box<dyn Presentation>,
    kill_count_threshold: u32,
    last: LastShown,
}

#[derive(Default)]
struct LastShown {
    score: Option<u32>,
    best: Option<u32>,
    kills: Option<u32>,
    progress: Option<u32>,
    status: Option<String>,
}

fn changed<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        return false;
    }
    *slot = Some(value);
    true
}

impl HudAdapter {
    pub fn new(sink: Box<dyn Presentation>, kill_count_threshold: u32) -> Self {
        Self {
            sink,
            kill_count_threshold,
            last: LastShown::default(),
        }
    }

    pub fn present(&mut self, notice: GameNotice) {
        match notice {
            GameNotice::Score(score) => {
                if changed(&mut self.last.score, score) {
                    self.sink.show_score(score);
                }
            }
            GameNotice::BestScore(best) => {
                if changed(&mut self.last.best, best) {
                    self.sink.show_best_score(best);
                }
            }
            GameNotice::KillCount(kills) => {
                if kills >= self.kill_count_threshold && changed(&mut self.last.kills, kills) {
                    self.sink.show_kill_count(kills);
                }
            }
            GameNotice::LoadProgress(percent) => {
                if changed(&mut self.last.progress, percent) {
                    self.sink.show_progress(percent);
                }
            }
            GameNotice::Phase { phase, paused } => {
                let status = if paused {
                    format!("{} paused", phase.label())
                } else {
                    phase.label().to_string()
                };
                if changed(&mut self.last.status, status.clone()) {
                    self.sink.show_status(&status);
                }
            }
        }
    }
}

/// Register `adapter` on the `Rendered` phase of `stage`.
pub fn install_hud(stage: &mut Stage, mut adapter: HudAdapter) -> ListenerId {
    debug!("hud installed");
    stage.bus.on(
        Phase::Rendered,
        move |stage: &mut Stage| {
            let notices = match stage.world.get_resource_mut::<NoticeBoard>() {
                Some(mut board) => board.drain(),
                None => return,
            };
            for notice in notices {
                adapter.present(notice);
            }
        },
        0,
    )
}

/// Post image preload progress as it changes, just before the HUD drains
/// the board. Stops reporting once everything has settled.
pub fn install_progress_reporter(stage: &mut Stage) -> ListenerId {
    let mut last = None;
    stage.bus.on(
        Phase::Rendered,
        move |stage: &mut Stage| {
            if last == Some(100) {
                return;
            }
            let percent = stage.textures.progress();
            if last != Some(percent) {
                last = Some(percent);
                post_notice(&mut stage.world, GameNotice::LoadProgress(percent));
            }
        },
        -1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::gamestate::GamePhase;
    use crate::resources::presentation::RecordingPresentation;
    use crate::stage::FRAME_MS;

    #[test]
    fn test_notices_reach_the_sink_after_render() {
        let mut stage = Stage::headless(100.0, 100.0, 1);
        let sink = RecordingPresentation::new();
        let values = sink.values();
        install_hud(&mut stage, HudAdapter::new(Box::new(sink), 3));

        post_notice(&mut stage.world, GameNotice::Score(4));
        post_notice(&mut stage.world, GameNotice::BestScore(9));
        assert_eq!(values.borrow().score, None);
        stage.run_frame(FRAME_MS);
        assert_eq!(values.borrow().score, Some(4));
        assert_eq!(values.borrow().best_score, Some(9));
    }

    #[test]
    fn test_progress_reaches_hundred() {
        let mut stage = Stage::headless(100.0, 100.0, 1);
        let sink = RecordingPresentation::new();
        let values = sink.values();
        install_progress_reporter(&mut stage);
        install_hud(&mut stage, HudAdapter::new(Box::new(sink), 3));
        stage.textures.preload(["a.png", "b.png"]);
        assert_eq!(stage.textures.progress(), 0);
        stage.run_frame(FRAME_MS);
        assert_eq!(values.borrow().progress, Some(100));
    }

    #[test]
    fn test_kill_count_waits_for_threshold() {
        let sink = RecordingPresentation::new();
        let values = sink.values();
        let mut hud = HudAdapter::new(Box::new(sink), 3);
        hud.present(GameNotice::KillCount(2));
        assert_eq!(values.borrow().kill_count, None);
        hud.present(GameNotice::KillCount(3));
        assert_eq!(values.borrow().kill_count, Some(3));
    }

    #[test]
    fn test_repeats_are_not_rewritten() {
        let sink = RecordingPresentation::new();
        let values = sink.values();
        let mut hud = HudAdapter::new(Box::new(sink), 3);
        hud.present(GameNotice::Score(0));
        hud.present(GameNotice::Score(0));
        hud.present(GameNotice::Phase {
            phase: GamePhase::Started,
            paused: true,
        });
        assert_eq!(values.borrow().writes, 2);
        assert_eq!(values.borrow().status.as_deref(), Some("started paused"));
    }
}
