// Court and gameplay defaults.
// All distances are virtual-canvas pixels; speeds are pixels per frame (dt = 1).

/// Virtual canvas width (pixels)
pub const CANVAS_WIDTH: f64 = 800.0;

/// Virtual canvas height (pixels)
pub const CANVAS_HEIGHT: f64 = 480.0;

/// Horizontal court inset as a fraction of canvas width
pub const MARGIN_X_RATIO: f64 = 0.02;

/// Vertical court inset as a fraction of canvas height
pub const MARGIN_Y_RATIO: f64 = 0.03;

/// Paddle width (pixels)
pub const PADDLE_WIDTH: f64 = 10.0;

/// Paddle height (pixels)
pub const PADDLE_HEIGHT: f64 = 80.0;

/// Gap between the court edge and the paddle's outer side (pixels)
pub const PADDLE_GAP: f64 = 16.0;

/// Ball edge length (pixels); the ball is a square
pub const BALL_SIZE: f64 = 12.0;

/// Ball fill color
pub const BALL_COLOR: &str = "#ffffff";

/// Score cap; scoring again at the cap ends the game
pub const SCORE_MAX: u32 = 5;

/// Speed multiplier applied on every paddle bounce
pub const SPEED_RATCHET: f64 = 1.1;
