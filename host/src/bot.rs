use pong_core::{Ball, CourtBounds, Paddle};

use crate::input::Intent;

/// Computer player that tracks the ball once it comes within reach.
#[derive(Debug, Clone, Copy)]
pub struct TrackingBot {
    /// Ignore offsets smaller than this (pixels) to avoid jitter
    pub dead_zone: f64,
    /// Fraction of the court width, measured from the bot's paddle, inside
    /// which the bot reacts to an approaching ball
    pub reach: f64,
}

impl Default for TrackingBot {
    fn default() -> Self {
        Self {
            dead_zone: 4.0,
            reach: 0.4,
        }
    }
}

impl TrackingBot {
    pub fn decide(&self, paddle: &Paddle, ball: &Ball, bounds: &CourtBounds) -> Option<Intent> {
        let dir = paddle.side().direction();
        let approaching = ball.vx * dir > 0.0;
        let distance = (paddle.x() - ball.x).abs();

        let target = if approaching && distance <= self.reach * bounds.width() {
            ball.y
        } else {
            bounds.center().1
        };

        let offset = target - paddle.center_y();
        if offset < -self.dead_zone {
            Some(Intent::Up)
        } else if offset > self.dead_zone {
            Some(Intent::Down)
        } else {
            None
        }
    }
}
