//! Frame-loop driver around the `pong_core` physics.
//!
//! A [`Session`] owns ball, paddles and score for one game. Each
//! [`Session::tick`] runs a single strategy: local simulation, or playback
//! of the newest snapshot pushed by an authoritative server.

pub mod bot;
pub mod config;
pub mod context;
pub mod error;
pub mod feed;
pub mod input;
pub mod render;
pub mod session;
pub mod strategy;

pub use bot::TrackingBot;
pub use config::GameConfig;
pub use context::{ContextStore, JsonFileStore, MemoryStore, SessionContext};
pub use error::{ConfigError, ContextError, SessionError};
pub use feed::{snapshot_feed, FeedRx, FeedTx};
pub use input::{InputState, Intent, KeyBindings, OutboundIntent};
pub use render::{FrameView, HeadlessRenderer, Renderer, Viewport};
pub use session::{Mode, Session, SessionEvent};
pub use strategy::{FrameStrategy, LocalSimulation, ServerAuthoritative, World};

use pong_core::{compute_event_log_hash, GameEvent, GameLevel, Score, Side};
use serde::{Deserialize, Serialize};

/// Result of a headless bot-vs-bot match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub level: GameLevel,
    pub seed: u64,
    /// Frame budget the match was run with
    pub max_frames: u64,
    pub frames: u64,
    pub score: Score,
    pub winner: Option<Side>,
    pub finished: bool,
    pub bounces: u32,
    /// Hex SHA-256 of the event log
    pub events_hash: String,
}

/// Play `config` bot-vs-bot for at most `max_frames` frames of `dt = 1`.
///
/// # Arguments
/// * `config` - Session configuration; `level` and `seed` select the match
/// * `max_frames` - Frame budget; the match stops early on game over
///
/// # Returns
/// * `Ok(MatchSummary)` - Final score and the digest of every event
/// * `Err` - If the config is invalid
pub fn run_headless_match(config: &GameConfig, max_frames: u64) -> Result<MatchSummary, SessionError> {
    tracing::info!(
        "Running headless match: level {}, seed {}, max {} frames",
        config.level,
        config.seed,
        max_frames
    );

    let renderer = HeadlessRenderer::new(config.canvas_width, config.canvas_height);
    let mut session = Session::new(config.clone(), renderer, MemoryStore::default())?;
    let events = session.subscribe();
    let bot = TrackingBot::default();

    session.start_game();
    while session.frame() < max_frames && !session.manager().is_game_over() {
        for side in Side::BOTH {
            let intent = bot.decide(&session.paddles()[side.index()], session.ball(), session.bounds());
            session.set_intent(side, intent);
        }
        session.tick(1.0);
    }

    let log: Vec<GameEvent> = events
        .try_iter()
        .filter_map(|ev| match ev {
            SessionEvent::Game(ev) => Some(ev),
            SessionEvent::Outbound(_) => None,
        })
        .collect();
    let bounces = log
        .iter()
        .filter(|ev| matches!(ev, GameEvent::PaddleBounce { .. }))
        .count() as u32;

    let summary = MatchSummary {
        level: config.level,
        seed: config.seed,
        max_frames,
        frames: session.frame(),
        score: session.manager().score(),
        winner: session.manager().winner(),
        finished: session.manager().is_game_over(),
        bounces,
        events_hash: hex::encode(compute_event_log_hash(&log)),
    };
    session.teardown();

    tracing::info!(
        "Match finished after {} frames: {}-{}",
        summary.frames,
        summary.score.left,
        summary.score.right
    );
    Ok(summary)
}
