//! Wire shape of the state a multiplayer server pushes to clients.
//!
//! ```json
//! {"ball":{"x":400,"y":240,"velocityX":4,"velocityY":0,"size":12},
//!  "paddles":{"left":{"y":200,"score":0},"right":{"y":200,"score":1}}}
//! ```

use serde::{Deserialize, Serialize};

use crate::manager::Score;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallSnapshot {
    pub x: f64,
    pub y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleSnapshot {
    pub y: f64,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddlesSnapshot {
    pub left: PaddleSnapshot,
    pub right: PaddleSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    pub ball: BallSnapshot,
    pub paddles: PaddlesSnapshot,
}

impl ServerSnapshot {
    /// Finite coordinates and a positive ball size.
    pub fn is_well_formed(&self) -> bool {
        let b = &self.ball;
        [b.x, b.y, b.velocity_x, b.velocity_y, b.size, self.paddles.left.y, self.paddles.right.y]
            .iter()
            .all(|v| v.is_finite())
            && b.size > 0.0
    }

    pub fn score(&self) -> Score {
        Score {
            left: self.paddles.left.score,
            right: self.paddles.right.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"ball":{"x":400,"y":240,"velocityX":-4.5,"velocityY":1,"size":12},
        "paddles":{"left":{"y":200,"score":2},"right":{"y":180.5,"score":1}}}"#;

    #[test]
    fn parses_server_json() {
        let snap: ServerSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(snap.ball.velocity_x, -4.5);
        assert_eq!(snap.paddles.right.y, 180.5);
        assert_eq!(snap.score(), Score { left: 2, right: 1 });
        assert!(snap.is_well_formed());
    }

    #[test]
    fn serializes_with_wire_names() {
        let snap: ServerSnapshot = serde_json::from_str(SAMPLE).unwrap();
        let json = serde_json::to_value(snap).unwrap();
        assert_eq!(json["ball"]["velocityY"], 1.0);
        assert!(json["ball"].get("velocity_y").is_none());
    }

    #[test]
    fn rejects_degenerate_ball() {
        let mut snap: ServerSnapshot = serde_json::from_str(SAMPLE).unwrap();
        snap.ball.size = 0.0;
        assert!(!snap.is_well_formed());
        snap.ball.size = 12.0;
        snap.ball.x = f64::NAN;
        assert!(!snap.is_well_formed());
    }
}
