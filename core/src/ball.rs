use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bounds::CourtBounds;
use crate::level::BallLevelConfig;
use crate::paddle::{Paddle, Side};

/// Something the caller must react to after a ball step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BallEvent {
    /// The ball rebounded off `side`'s paddle and now travels at `speed`.
    PaddleBounce { side: Side, speed: f64 },
    /// The ball left the court through `side`'s edge and was re-served.
    Exited { side: Side },
}

/// Square ball, `(x, y)` is its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub color: String,
}

impl Ball {
    /// A resting ball at court center. Call [`Ball::serve`] to put it in flight.
    pub fn new(bounds: &CourtBounds, size: f64, color: impl Into<String>) -> Self {
        let (x, y) = bounds.center();
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size,
            color: color.into(),
        }
    }

    pub fn half(&self) -> f64 {
        self.size / 2.0
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    /// Place the ball at court center moving toward `toward` at the level's
    /// minimum speed, with a random angle within the level's bounce cone.
    pub fn serve<R: Rng>(
        &mut self,
        bounds: &CourtBounds,
        level: &BallLevelConfig,
        toward: Side,
        rng: &mut R,
    ) {
        let (cx, cy) = bounds.center();
        let angle = if level.max_bounce_angle > 0.0 {
            rng.gen_range(-level.max_bounce_angle..=level.max_bounce_angle)
        } else {
            0.0
        };
        self.x = cx;
        self.y = cy;
        self.vx = toward.direction() * (level.min_speed * angle.cos()).abs();
        self.vy = level.min_speed * angle.sin();
    }

    /// Advance the ball by one frame of `dt` simulated time units.
    ///
    /// Order: paddle collision (first paddle in `paddles` wins), out-of-bounds
    /// respawn, wall reflection, then explicit Euler integration. A respawn
    /// ends the step with the ball resting at center for this frame.
    pub fn update_position<R: Rng>(
        &mut self,
        dt: f64,
        bounds: &CourtBounds,
        paddles: &[Paddle],
        level: &BallLevelConfig,
        rng: &mut R,
    ) -> Option<BallEvent> {
        let mut event = None;

        if let Some(paddle) = paddles.iter().find(|p| self.overlaps(p)) {
            let speed = self.bounce_off(paddle, level);
            event = Some(BallEvent::PaddleBounce {
                side: paddle.side(),
                speed,
            });
        }

        if let Some(side) = self.exited_side(bounds) {
            // Serve toward the side that kept the ball in play.
            self.serve(bounds, level, side.opposite(), rng);
            return Some(BallEvent::Exited { side });
        }

        self.reflect_walls(bounds);

        self.x += self.vx * dt;
        self.y += self.vy * dt;
        event
    }

    fn overlaps(&self, paddle: &Paddle) -> bool {
        let h = self.half();
        self.x - h < paddle.x() + paddle.width()
            && self.x + h > paddle.x()
            && self.y - h < paddle.y() + paddle.height()
            && self.y + h > paddle.y()
    }

    /// Rebound off `paddle`; returns the new speed.
    fn bounce_off(&mut self, paddle: &Paddle, level: &BallLevelConfig) -> f64 {
        let h = self.half();
        // Push the ball out to the paddle face so it cannot stick or tunnel.
        let away = match paddle.side() {
            Side::Left => {
                self.x = paddle.x() + paddle.width() + h;
                1.0
            }
            Side::Right => {
                self.x = paddle.x() - h;
                -1.0
            }
        };

        let half_height = paddle.height() / 2.0;
        let normalized = ((self.y - paddle.center_y()) / half_height).clamp(-1.0, 1.0);
        let angle = normalized * level.max_bounce_angle;

        let speed = (self.speed() * level.speed_ratchet)
            .min(level.max_speed)
            .max(level.min_speed);
        self.vx = away * (speed * angle.cos()).abs();
        self.vy = speed * angle.sin();
        speed
    }

    fn exited_side(&self, bounds: &CourtBounds) -> Option<Side> {
        let h = self.half();
        if self.x - h < bounds.left {
            Some(Side::Left)
        } else if self.x + h > bounds.right {
            Some(Side::Right)
        } else {
            None
        }
    }

    fn reflect_walls(&mut self, bounds: &CourtBounds) {
        let h = self.half();
        if self.y - h < bounds.top {
            self.y = bounds.top + h;
            self.vy = self.vy.abs();
        } else if self.y + h > bounds.bottom {
            self.y = bounds.bottom - h;
            self.vy = -self.vy.abs();
        }
    }
}
