//! Physics core for a two-player Pong court.
//!
//! Everything here is plain state plus pure functions: the loop driver in
//! `host` owns the instances and decides when each step runs.

pub mod ball;
pub mod bounds;
pub mod constants;
pub mod events;
pub mod level;
pub mod manager;
pub mod paddle;
pub mod snapshot;

pub use ball::{Ball, BallEvent};
pub use bounds::CourtBounds;
pub use events::{compute_event_log_hash, GameEvent};
pub use level::{BallLevelConfig, GameLevel};
pub use manager::{GameManager, Score, ScoreOutcome};
pub use paddle::{Paddle, Side};
pub use snapshot::{BallSnapshot, PaddleSnapshot, PaddlesSnapshot, ServerSnapshot};
