use serde::{Deserialize, Serialize};

use crate::bounds::CourtBounds;

/// Player slot. The left paddle is slot 0, the right paddle slot 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Horizontal direction pointing toward this side of the court.
    pub fn direction(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "LEFT"),
            Side::Right => write!(f, "RIGHT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    side: Side,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    /// Distance between the court edge and the paddle's outer side
    gap: f64,
    speed: f64,
}

impl Paddle {
    /// Create a paddle for `side`, vertically centered in `bounds`.
    pub fn new(side: Side, bounds: &CourtBounds, width: f64, height: f64, gap: f64, speed: f64) -> Self {
        let mut paddle = Self {
            side,
            x: 0.0,
            y: 0.0,
            width,
            height,
            gap,
            speed,
        };
        paddle.relayout(bounds);
        paddle.reset_position(bounds);
        paddle
    }

    pub fn move_up(&mut self, dt: f64, bounds: &CourtBounds) {
        self.y = (self.y - self.speed * dt).max(bounds.top);
    }

    pub fn move_down(&mut self, dt: f64, bounds: &CourtBounds) {
        self.y = (self.y + self.speed * dt).min(bounds.bottom - self.height);
    }

    pub fn reset_position(&mut self, bounds: &CourtBounds) {
        self.y = (bounds.top + bounds.bottom) / 2.0 - self.height / 2.0;
    }

    /// Recompute `x` for new bounds and pull `y` back inside them.
    pub fn relayout(&mut self, bounds: &CourtBounds) {
        self.x = match self.side {
            Side::Left => bounds.left + self.gap,
            Side::Right => bounds.right - self.gap - self.width,
        };
        self.y = self.clamp_y(self.y, bounds);
    }

    /// Overwrite `y` from an authoritative source, still clamped to the court.
    pub fn set_y(&mut self, y: f64, bounds: &CourtBounds) {
        self.y = self.clamp_y(y, bounds);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    fn clamp_y(&self, y: f64, bounds: &CourtBounds) -> f64 {
        y.max(bounds.top).min(bounds.bottom - self.height)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::approx;

    fn court() -> CourtBounds {
        CourtBounds::compute(800.0, 480.0, 0.02, 0.03)
    }

    #[test]
    fn slots_sit_inside_their_edges() {
        let b = court();
        let left = Paddle::new(Side::Left, &b, 10.0, 80.0, 16.0, 6.0);
        let right = Paddle::new(Side::Right, &b, 10.0, 80.0, 16.0, 6.0);
        assert!(approx(left.x(), 32.0));
        assert!(approx(right.x(), 758.0));
        assert!(approx(left.center_y(), 240.0));
        assert!(approx(right.center_y(), 240.0));
    }

    #[test]
    fn move_up_stops_at_top() {
        let b = court();
        let mut p = Paddle::new(Side::Left, &b, 10.0, 80.0, 16.0, 6.0);
        for _ in 0..200 {
            p.move_up(1.0, &b);
            assert!(p.y() >= b.top);
        }
        assert_eq!(p.y(), b.top);
        p.move_up(1.0, &b);
        assert_eq!(p.y(), b.top);
    }

    #[test]
    fn move_down_stops_at_bottom() {
        let b = court();
        let mut p = Paddle::new(Side::Right, &b, 10.0, 80.0, 16.0, 6.0);
        for _ in 0..200 {
            p.move_down(1.0, &b);
        }
        assert_eq!(p.y(), b.bottom - 80.0);
    }

    #[test]
    fn movement_scales_with_dt() {
        let b = court();
        let mut p = Paddle::new(Side::Left, &b, 10.0, 80.0, 16.0, 6.0);
        let y0 = p.y();
        p.move_down(0.5, &b);
        assert!(approx(p.y(), y0 + 3.0));
    }

    #[test]
    fn relayout_follows_resized_court() {
        let mut b = court();
        let mut p = Paddle::new(Side::Right, &b, 10.0, 80.0, 16.0, 6.0);
        for _ in 0..200 {
            p.move_down(1.0, &b);
        }
        b = CourtBounds::compute(400.0, 240.0, 0.02, 0.03);
        p.relayout(&b);
        assert!(approx(p.x(), b.right - 26.0));
        assert!(approx(p.y(), b.bottom - 80.0));
    }

    #[test]
    fn side_helpers() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.index(), 1);
        assert_eq!(Side::Left.direction(), -1.0);
    }
}
