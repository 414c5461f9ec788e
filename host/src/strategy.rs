//! Per-frame advance policies.
//!
//! A session runs exactly one strategy per frame. Local simulation and
//! server-authoritative playback never share a frame.

use pong_core::{
    Ball, BallEvent, BallLevelConfig, CourtBounds, GameEvent, GameManager, Paddle, ScoreOutcome,
    ServerSnapshot, Side,
};
use rand::rngs::StdRng;

use crate::feed::FeedRx;
use crate::input::{InputState, Intent};
use crate::session::Mode;

/// Mutable game state owned by a session for its whole lifetime.
pub struct World {
    pub bounds: CourtBounds,
    pub level: BallLevelConfig,
    pub ball: Ball,
    pub paddles: [Paddle; 2],
    pub manager: GameManager,
    pub input: InputState,
    pub rng: StdRng,
    pub feed: Option<FeedRx>,
    /// Events produced since the session last flushed
    pub events: Vec<GameEvent>,
}

impl World {
    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    /// Credit `side` with a point and queue the resulting notification.
    pub fn score_point(&mut self, side: Side) {
        match self.manager.add_score(side) {
            ScoreOutcome::Scored(score) => {
                self.events.push(GameEvent::ScoreChanged { score });
            }
            ScoreOutcome::GameOver(score) => {
                self.events.push(GameEvent::GameOver {
                    score,
                    winner: self.manager.winner(),
                });
            }
            ScoreOutcome::Ignored => {}
        }
    }

    /// Overwrite ball and paddle transient fields from a server snapshot.
    /// Ball color and paddle geometry are left alone.
    pub fn apply_snapshot(&mut self, snap: &ServerSnapshot) {
        self.ball.x = snap.ball.x;
        self.ball.y = snap.ball.y;
        self.ball.vx = snap.ball.velocity_x;
        self.ball.vy = snap.ball.velocity_y;
        self.ball.size = snap.ball.size;
        self.paddles[Side::Left.index()].set_y(snap.paddles.left.y, &self.bounds);
        self.paddles[Side::Right.index()].set_y(snap.paddles.right.y, &self.bounds);

        let score = snap.score();
        if score != self.manager.score() {
            self.manager.set_score(score);
            self.events.push(GameEvent::ScoreChanged { score });
        }
    }
}

pub trait FrameStrategy: Send {
    fn mode(&self) -> Mode;

    fn advance(&mut self, world: &mut World, dt: f64);
}

/// Moves paddles from held intents and steps the ball physics.
#[derive(Debug, Default)]
pub struct LocalSimulation;

impl FrameStrategy for LocalSimulation {
    fn mode(&self) -> Mode {
        Mode::Local
    }

    fn advance(&mut self, w: &mut World, dt: f64) {
        for paddle in w.paddles.iter_mut() {
            match w.input.get(paddle.side()) {
                Some(Intent::Up) => paddle.move_up(dt, &w.bounds),
                Some(Intent::Down) => paddle.move_down(dt, &w.bounds),
                None => {}
            }
        }

        if !w.manager.is_started() {
            return;
        }

        match w.ball.update_position(dt, &w.bounds, &w.paddles, &w.level, &mut w.rng) {
            Some(BallEvent::PaddleBounce { side, speed }) => {
                let rally = w.manager.record_bounce();
                tracing::trace!("Bounce off {} paddle, speed {:.3}, rally {}", side, speed, rally);
                w.events.push(GameEvent::PaddleBounce { side, speed, rally });
            }
            Some(BallEvent::Exited { side }) => {
                tracing::debug!("Ball exited through {} edge", side);
                w.score_point(side.opposite());
            }
            None => {}
        }
    }
}

/// Copies the newest server snapshot into the world; never simulates.
#[derive(Debug, Default)]
pub struct ServerAuthoritative;

impl FrameStrategy for ServerAuthoritative {
    fn mode(&self) -> Mode {
        Mode::ServerAuthoritative
    }

    fn advance(&mut self, w: &mut World, _dt: f64) {
        // No snapshot this frame: keep drawing the last good state.
        let Some(snap) = w.feed.as_ref().and_then(FeedRx::latest) else {
            return;
        };
        w.apply_snapshot(&snap);
    }
}
