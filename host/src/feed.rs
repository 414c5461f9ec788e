//! Buffer for server snapshots arriving off the frame loop.
//!
//! The network side pushes raw JSON text; the loop drains without blocking
//! and keeps only the newest well-formed snapshot.

use std::sync::mpsc::{self, Receiver, Sender};

use pong_core::ServerSnapshot;

#[derive(Clone)]
pub struct FeedTx(Sender<String>);
pub struct FeedRx(Receiver<String>);

/// Create a sender/receiver pair. The underlying channel is unbounded.
#[must_use]
pub fn snapshot_feed() -> (FeedTx, FeedRx) {
    let (s, r) = mpsc::channel();
    (FeedTx(s), FeedRx(r))
}

impl FeedTx {
    /// Try to send; returns false if the receiver is dropped.
    #[must_use]
    pub fn push(&self, json: impl Into<String>) -> bool {
        self.0.send(json.into()).is_ok()
    }

    /// Serialize and send a snapshot.
    #[must_use]
    pub fn push_snapshot(&self, snap: &ServerSnapshot) -> bool {
        match serde_json::to_string(snap) {
            Ok(json) => self.push(json),
            Err(_) => false,
        }
    }
}

impl FeedRx {
    /// Drain all queued messages and return the newest one that parses and
    /// is well formed. Malformed messages are logged and skipped.
    pub fn latest(&self) -> Option<ServerSnapshot> {
        let mut newest = None;
        while let Ok(raw) = self.0.try_recv() {
            match serde_json::from_str::<ServerSnapshot>(&raw) {
                Ok(snap) if snap.is_well_formed() => newest = Some(snap),
                Ok(_) => tracing::warn!("Dropping snapshot with non-finite or degenerate values"),
                Err(e) => tracing::warn!("Dropping malformed snapshot: {}", e),
            }
        }
        newest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pong_core::{BallSnapshot, PaddleSnapshot, PaddlesSnapshot};

    fn snap(x: f64) -> ServerSnapshot {
        ServerSnapshot {
            ball: BallSnapshot { x, y: 100.0, velocity_x: 4.0, velocity_y: 0.0, size: 12.0 },
            paddles: PaddlesSnapshot {
                left: PaddleSnapshot { y: 50.0, score: 0 },
                right: PaddleSnapshot { y: 60.0, score: 0 },
            },
        }
    }

    #[test]
    fn keeps_newest_good_snapshot() {
        let (tx, rx) = snapshot_feed();
        assert!(tx.push_snapshot(&snap(1.0)));
        assert!(tx.push_snapshot(&snap(2.0)));
        assert!(tx.push("{not json"));
        assert_eq!(rx.latest().map(|s| s.ball.x), Some(2.0));
        assert_eq!(rx.latest(), None);
    }

    #[test]
    fn push_fails_after_receiver_drops() {
        let (tx, rx) = snapshot_feed();
        drop(rx);
        assert!(!tx.push("{}"));
    }
}
