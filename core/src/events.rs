use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::manager::Score;
use crate::paddle::Side;

/// Notifications the simulation publishes to its collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PaddleBounce { side: Side, speed: f64, rally: u32 },
    ScoreChanged { score: Score },
    GameOver { score: Score, winner: Option<Side> },
}

/// Compute SHA-256 digest of a game event log.
///
/// Format: "PONGEVTv1" || per event: tag (1 byte) || fields little-endian.
/// Two runs with the same seed and inputs produce the same digest.
pub fn compute_event_log_hash(events: &[GameEvent]) -> [u8; 32] {
    // Version prefix (9 bytes) + at most 14 bytes per event
    let mut buf = Vec::with_capacity(9 + events.len() * 14);
    buf.extend_from_slice(b"PONGEVTv1");

    for ev in events {
        match *ev {
            GameEvent::PaddleBounce { side, speed, rally } => {
                buf.push(0);
                buf.push(side.index() as u8);
                buf.extend_from_slice(&speed.to_bits().to_le_bytes());
                buf.extend_from_slice(&rally.to_le_bytes());
            }
            GameEvent::ScoreChanged { score } => {
                buf.push(1);
                buf.extend_from_slice(&score.left.to_le_bytes());
                buf.extend_from_slice(&score.right.to_le_bytes());
            }
            GameEvent::GameOver { score, winner } => {
                buf.push(2);
                buf.extend_from_slice(&score.left.to_le_bytes());
                buf.extend_from_slice(&score.right.to_le_bytes());
                buf.push(winner.map_or(0xff, |s| s.index() as u8));
            }
        }
    }

    let out = Sha256::digest(&buf);
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}
