//! State-change notices posted by the game for the presentation layer.
//!
//! The game pushes a [`GameNotice`] into the [`NoticeBoard`] resource
//! whenever something visible changes. The HUD adapter drains the board on
//! the `Rendered` phase, so presentation never runs inside the simulation.

use bevy_ecs::prelude::*;

use crate::resources::gamestate::GamePhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameNotice {
    Score(u32),
    BestScore(u32),
    KillCount(u32),
    Phase { phase: GamePhase, paused: bool },
    LoadProgress(u32),
}

/// Outbox of notices not yet presented.
#[derive(Resource, Debug, Default)]
pub struct NoticeBoard {
    pending: Vec<GameNotice>,
}

impl NoticeBoard {
    pub fn post(&mut self, notice: GameNotice) {
        self.pending.push(notice);
    }

    pub fn drain(&mut self) -> Vec<GameNotice> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Post `notice`, creating the board on first use.
pub fn post_notice(world: &mut World, notice: GameNotice) {
    world.get_resource_or_insert_with(NoticeBoard::default).post(notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_creates_board_and_drain_empties_it() {
        let mut world = World::new();
        post_notice(&mut world, GameNotice::Score(1));
        post_notice(&mut world, GameNotice::BestScore(1));
        let mut board = world.resource_mut::<NoticeBoard>();
        assert_eq!(board.drain(), vec![GameNotice::Score(1), GameNotice::BestScore(1)]);
        assert!(board.is_empty());
    }
}
