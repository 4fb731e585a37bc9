//! Headless host: run the game for a fixed number of frames at the nominal
//! frame rate, with no window and no real-time pacing. Every pending frame
//! is treated as due; the loop ends early if the frame bus is stopped.
//!
//! The [`Autopilot`] plays by steering the bird towards the centre of the
//! next gap, which makes long unattended runs possible.

use log::{debug, info};
use serde::Serialize;

use crate::components::bird::Bird;
use crate::game::handle_input;
use crate::resources::gamestate::{GamePhase, Session};
use crate::resources::input::InputEvent;
use crate::stage::{FRAME_MS, Stage};
use crate::systems::entity::position_of;
use crate::systems::pipe::PIPE_WIDTH;

/// How far below the gap centre the bird may sink before flapping.
const SINK_MARGIN: f32 = 40.0;
/// Frames to let the bird settle before the first start.
const WARMUP_FRAMES: u64 = 60;

/// Outcome of a headless run, printed as JSON by the binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub elapsed_ms: f64,
    /// Runs started.
    pub runs: u32,
    pub crashes: u32,
    /// Score of the run in progress (or the last one) when the loop stopped.
    pub final_score: u32,
    pub best_score: u32,
    pub kill_count: u32,
    pub phase: String,
}

/// Simple input script.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Restarts allowed after a crash; `None` restarts forever.
    pub restarts: Option<u32>,
}

impl Autopilot {
    /// Pick the input for this frame, if any.
    pub fn decide(&mut self, stage: &Stage, frame: u64) -> Option<InputEvent> {
        let session = stage.world.get_resource::<Session>()?;
        match session.phase {
            GamePhase::NotStarted => (frame >= WARMUP_FRAMES).then_some(InputEvent::Primary),
            GamePhase::Ended => {
                if !session.can_restart {
                    return None;
                }
                match self.restarts.as_mut() {
                    None => Some(InputEvent::Primary),
                    Some(0) => None,
                    Some(left) => {
                        *left -= 1;
                        Some(InputEvent::Primary)
                    }
                }
            }
            GamePhase::Started => {
                let bird = session.bird?;
                let position = position_of(&stage.world, bird)?;
                let vy = stage.world.get::<Bird>(bird).map(|b| b.vy).unwrap_or(0.0);
                let target = next_gap_center(stage, session, position.x).unwrap_or(0.5 * stage.screen().h);
                (position.y > target + SINK_MARGIN && vy >= 0.0).then_some(InputEvent::Primary)
            }
        }
    }
}

fn next_gap_center(stage: &Stage, session: &Session, bird_x: f32) -> Option<f32> {
    session
        .obstacles
        .iter()
        .filter_map(|pair| {
            let top = position_of(&stage.world, pair.top)?;
            let bottom = position_of(&stage.world, pair.bottom)?;
            (top.x + 0.5 * PIPE_WIDTH >= bird_x).then_some((top.x, 0.5 * (top.y + bottom.y)))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, center)| center)
}

/// Run up to `frames` frames of `FRAME_MS` each.
pub fn run_headless(stage: &mut Stage, frames: u64, mut autopilot: Option<Autopilot>) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut previous = current_phase(stage);

    for frame in 0..frames {
        if let Some(pilot) = autopilot.as_mut() {
            if let Some(event) = pilot.decide(stage, frame) {
                handle_input(stage, event);
            }
        }
        if !stage.run_frame(FRAME_MS) {
            info!("frame bus stopped after {} frames", summary.frames);
            break;
        }

        let phase = current_phase(stage);
        if phase != previous {
            match phase {
                Some(GamePhase::Started) => summary.runs += 1,
                Some(GamePhase::Ended) => summary.crashes += 1,
                _ => {}
            }
            debug!("frame {}: {:?} -> {:?}", frame, previous, phase);
            previous = phase;
        }
        summary.frames += 1;
    }

    summary.elapsed_ms = stage.now_ms();
    if let Some(session) = stage.world.get_resource::<Session>() {
        summary.final_score = session.score;
        summary.best_score = session.scores.best_score();
        summary.kill_count = session.scores.kill_count();
        summary.phase = session.phase.label().to_string();
    }
    info!(
        "headless run: {} frames, {} runs, {} crashes, best {}",
        summary.frames, summary.runs, summary.crashes, summary.best_score
    );
    summary
}

fn current_phase(stage: &Stage) -> Option<GamePhase> {
    stage.world.get_resource::<Session>().map(|s| s.phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game;
    use crate::resources::gameconfig::GameTuning;
    use crate::resources::scorestore::ScoreBoard;

    fn stage() -> Stage {
        let mut stage = Stage::headless(1600.0, 1800.0, 21);
        game::install(&mut stage, GameTuning::default(), ScoreBoard::in_memory());
        stage
    }

    #[test]
    fn test_idle_run_never_starts() {
        let mut stage = stage();
        let summary = run_headless(&mut stage, 120, None);
        assert_eq!(summary.frames, 120);
        assert_eq!(summary.runs, 0);
        assert_eq!(summary.phase, "not-started");
        assert!((summary.elapsed_ms - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn test_autopilot_starts_a_run() {
        let mut stage = stage();
        let summary = run_headless(&mut stage, 300, Some(Autopilot::default()));
        assert!(summary.runs >= 1);
        assert_ne!(summary.phase, "not-started");
    }

    #[test]
    fn test_autopilot_without_restarts_stays_ended() {
        let mut stage = stage();
        game::start(&mut stage);
        game::end(&mut stage);
        let pilot = Autopilot { restarts: Some(0) };
        let summary = run_headless(&mut stage, 400, Some(pilot));
        assert_eq!(summary.phase, "ended");
        assert_eq!(summary.runs, 0);
    }

    #[test]
    fn test_stopped_bus_ends_the_run_early() {
        let mut stage = stage();
        stage.bus.on(
            crate::events::framebus::Phase::Update,
            |stage: &mut Stage| {
                if stage.bus.frames() == 10 {
                    stage.bus.stop();
                }
            },
            5,
        );
        let summary = run_headless(&mut stage, 100, None);
        assert_eq!(summary.frames, 10);
        assert!(!stage.bus.is_running());
    }

    #[test]
    fn test_summary_serialises() {
        let summary = RunSummary {
            frames: 3,
            phase: "ended".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"frames\":3"));
        assert!(json.contains("\"phase\":\"ended\""));
    }
}
