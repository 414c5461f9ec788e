use serde::{Deserialize, Serialize};

use crate::constants::SCORE_MAX;
use crate::level::{BallLevelConfig, GameLevel};
use crate::paddle::Side;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Result of [`GameManager::add_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOutcome {
    Scored(Score),
    /// The scoring side was already at the cap; the game is now over.
    GameOver(Score),
    /// The game had already ended; nothing changed.
    Ignored,
}

/// Score bookkeeping and the idle → started → game-over state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameManager {
    score: Score,
    is_started: bool,
    is_game_over: bool,
    level: GameLevel,
    score_max: u32,
    /// Paddle bounces since the last reset
    rally: u32,
}

impl Default for GameManager {
    fn default() -> Self {
        Self::new(GameLevel::default(), SCORE_MAX)
    }
}

impl GameManager {
    pub fn new(level: GameLevel, score_max: u32) -> Self {
        Self {
            score: Score::default(),
            is_started: false,
            is_game_over: false,
            level,
            score_max,
            rally: 0,
        }
    }

    pub fn start_game(&mut self) {
        self.is_started = true;
        self.is_game_over = false;
        self.reset();
    }

    pub fn end_game(&mut self) {
        self.is_started = false;
        self.is_game_over = true;
    }

    /// Switch difficulty; restarts the rally and the score.
    pub fn set_level(&mut self, level: GameLevel) {
        self.level = level;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.score = Score::default();
        self.rally = 0;
    }

    /// Credit a point to `side`. At the cap this ends the game instead.
    pub fn add_score(&mut self, side: Side) -> ScoreOutcome {
        if self.is_game_over {
            return ScoreOutcome::Ignored;
        }
        if self.score.get(side) >= self.score_max {
            self.end_game();
            return ScoreOutcome::GameOver(self.score);
        }
        *self.score.get_mut(side) += 1;
        self.rally = 0;
        ScoreOutcome::Scored(self.score)
    }

    /// Overwrite the score from an authoritative source.
    pub fn set_score(&mut self, score: Score) {
        self.score = score;
    }

    pub fn record_bounce(&mut self) -> u32 {
        self.rally += 1;
        self.rally
    }

    /// Side with the higher score once the game is over; `None` on a tie or
    /// while the game is still running.
    pub fn winner(&self) -> Option<Side> {
        if !self.is_game_over {
            return None;
        }
        match self.score.left.cmp(&self.score.right) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn level(&self) -> GameLevel {
        self.level
    }

    pub fn level_config(&self) -> BallLevelConfig {
        self.level.config()
    }

    pub fn score_max(&self) -> u32 {
        self.score_max
    }

    pub fn rally(&self) -> u32 {
        self.rally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let gm = GameManager::default();
        assert!(!gm.is_started());
        assert!(!gm.is_game_over());
        assert_eq!(gm.score(), Score::default());
        assert_eq!(gm.level(), GameLevel::Easy);
    }

    #[test]
    fn start_resets_previous_match() {
        let mut gm = GameManager::new(GameLevel::Medium, 3);
        gm.start_game();
        gm.add_score(Side::Left);
        gm.record_bounce();
        gm.end_game();
        gm.start_game();
        assert!(gm.is_started());
        assert!(!gm.is_game_over());
        assert_eq!(gm.score(), Score::default());
        assert_eq!(gm.rally(), 0);
    }

    #[test]
    fn reaching_cap_keeps_playing_then_scoring_at_cap_ends() {
        let mut gm = GameManager::new(GameLevel::Easy, 3);
        gm.start_game();
        gm.add_score(Side::Right);
        gm.add_score(Side::Right);
        assert_eq!(gm.score().right, 2);

        let outcome = gm.add_score(Side::Right);
        assert_eq!(outcome, ScoreOutcome::Scored(Score { left: 0, right: 3 }));
        assert!(!gm.is_game_over());

        let outcome = gm.add_score(Side::Right);
        assert_eq!(outcome, ScoreOutcome::GameOver(Score { left: 0, right: 3 }));
        assert_eq!(gm.score().right, 3);
        assert!(gm.is_game_over());
        assert!(!gm.is_started());
        assert_eq!(gm.winner(), Some(Side::Right));
    }

    #[test]
    fn scoring_after_game_over_is_ignored() {
        let mut gm = GameManager::new(GameLevel::Easy, 1);
        gm.start_game();
        gm.add_score(Side::Left);
        gm.add_score(Side::Left);
        assert!(gm.is_game_over());
        assert_eq!(gm.add_score(Side::Right), ScoreOutcome::Ignored);
        assert_eq!(gm.score(), Score { left: 1, right: 0 });
    }

    #[test]
    fn level_change_restarts_rally() {
        let mut gm = GameManager::default();
        gm.start_game();
        gm.add_score(Side::Left);
        gm.record_bounce();
        gm.set_level(GameLevel::Hard);
        assert_eq!(gm.level(), GameLevel::Hard);
        assert_eq!(gm.level_config(), GameLevel::Hard.config());
        assert_eq!(gm.score(), Score::default());
        assert_eq!(gm.rally(), 0);
        assert!(gm.is_started());
    }

    #[test]
    fn no_winner_while_running() {
        let mut gm = GameManager::default();
        gm.start_game();
        gm.add_score(Side::Left);
        assert_eq!(gm.winner(), None);
    }
}
