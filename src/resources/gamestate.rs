//! Game session state.
//!
//! The controller's whole state lives in the [`Session`] resource: the
//! phase machine, score and speed, spawn countdowns, live obstacles and
//! clouds, and the entities of the current death sequence.

use bevy_ecs::prelude::*;

use crate::events::framebus::ListenerId;
use crate::resources::gameconfig::GameTuning;
use crate::resources::scorestore::ScoreBoard;
use crate::resources::timerqueue::TimerToken;

/// Where a run is. `paused` is tracked separately on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Started,
    Ended,
}

impl GamePhase {
    pub fn label(self) -> &'static str {
        match self {
            GamePhase::NotStarted => "not-started",
            GamePhase::Started => "started",
            GamePhase::Ended => "ended",
        }
    }
}

/// Top and bottom pipe plus their wires. Scored once, when the pair's
/// trailing edge passes the bird.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstaclePair {
    pub top: Entity,
    pub bottom: Entity,
    pub top_wires: Entity,
    pub bottom_wires: Entity,
    pub passed: bool,
}

impl ObstaclePair {
    pub fn entities(&self) -> [Entity; 4] {
        [self.top, self.bottom, self.top_wires, self.bottom_wires]
    }

    pub fn wires_for(&self, pipe: Entity) -> Option<Entity> {
        if pipe == self.top {
            Some(self.top_wires)
        } else if pipe == self.bottom {
            Some(self.bottom_wires)
        } else {
            None
        }
    }
}

/// What the bird is looking at once the run is under way.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EyeTarget {
    #[default]
    Nothing,
    /// Straight at the player.
    Screen,
    /// The gap edge of this pipe.
    Pipe(Entity),
}

/// Updates before the first pipe pair of a run.
pub const FIRST_PIPE_DELAY: i32 = 200;

#[derive(Resource, Debug)]
pub struct Session {
    pub phase: GamePhase,
    pub paused: bool,
    pub can_restart: bool,
    pub score: u32,
    pub speed: f32,
    pub tuning: GameTuning,
    pub scores: ScoreBoard,

    pub bird: Option<Entity>,
    /// The bird has been fully inside the field at least once this run.
    pub entered: bool,
    /// Shocked bird, then ghost, of the last crash.
    pub remains: Option<Entity>,
    /// Where the bird died, for the rest of the death sequence.
    pub crash_at: Option<(f32, f32)>,
    /// Poof and feathers of the last crash.
    pub debris: Vec<Entity>,
    pub obstacles: Vec<ObstaclePair>,
    pub clouds: Vec<Entity>,

    pub time_to_next_pipe: i32,
    pub time_to_next_cloud: i32,
    pub blink_counter: i32,
    pub look_counter: i32,
    pub eye_target: EyeTarget,

    /// Update listener of the controller itself.
    pub listener: Option<ListenerId>,
    pub restart_timer: Option<TimerToken>,
}

impl Session {
    pub fn new(tuning: GameTuning, scores: ScoreBoard) -> Self {
        Self {
            phase: GamePhase::NotStarted,
            paused: false,
            can_restart: false,
            score: 0,
            speed: tuning.min_speed,
            tuning,
            scores,
            bird: None,
            entered: false,
            remains: None,
            crash_at: None,
            debris: Vec::new(),
            obstacles: Vec::new(),
            clouds: Vec::new(),
            time_to_next_pipe: FIRST_PIPE_DELAY,
            time_to_next_cloud: 0,
            blink_counter: -1,
            look_counter: -1,
            eye_target: EyeTarget::Nothing,
            listener: None,
            restart_timer: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.phase == GamePhase::Started
    }

    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    /// Score one obstacle: bump the score, persist a new best and speed up.
    /// Returns true if the best score moved.
    pub fn score_point(&mut self) -> bool {
        self.score += 1;
        self.speed = (self.speed + self.tuning.speed_step).min(self.tuning.max_speed);
        self.scores.submit_score(self.score)
    }

    pub fn pipe_gap(&self) -> f32 {
        self.tuning.gap_at(self.speed)
    }
}
