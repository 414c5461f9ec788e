use std::sync::mpsc::{self, Receiver, Sender};

use pong_core::{Ball, CourtBounds, GameEvent, GameLevel, GameManager, Paddle, ServerSnapshot, Side};
use pong_core::{BallSnapshot, PaddleSnapshot, PaddlesSnapshot};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::context::{ContextStore, SessionContext};
use crate::error::SessionError;
use crate::feed::FeedRx;
use crate::input::{InputState, Intent, KeyBindings, OutboundIntent};
use crate::render::{FrameView, Renderer};
use crate::strategy::{FrameStrategy, LocalSimulation, ServerAuthoritative, World};

/// Which side of the wire owns the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Local,
    ServerAuthoritative,
}

impl Mode {
    fn strategy(self) -> Box<dyn FrameStrategy> {
        match self {
            Mode::Local => Box::new(LocalSimulation),
            Mode::ServerAuthoritative => Box::new(ServerAuthoritative),
        }
    }
}

/// What subscribers receive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionEvent {
    Game(GameEvent),
    Outbound(OutboundIntent),
}

/// Owns all state for one game session and drives it frame by frame.
pub struct Session<R: Renderer> {
    config: GameConfig,
    renderer: R,
    world: World,
    strategy: Box<dyn FrameStrategy>,
    /// Applied at the start of the next tick so a frame never mixes modes
    pending: Option<Box<dyn FrameStrategy>>,
    bindings: KeyBindings,
    subscribers: Vec<Sender<SessionEvent>>,
    store: Box<dyn ContextStore>,
    context: SessionContext,
    frame: u64,
    running: bool,
}

impl<R: Renderer> Session<R> {
    /// Build a session in local mode.
    ///
    /// Fails when the config is invalid or the renderer has no usable
    /// viewport. A store that cannot be read falls back to a fresh context.
    pub fn new(
        config: GameConfig,
        renderer: R,
        store: impl ContextStore + 'static,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let viewport = renderer.viewport().ok_or(SessionError::ContextUnavailable)?;
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            return Err(SessionError::ContextUnavailable);
        }

        let context = match store.load() {
            Ok(Some(ctx)) => ctx,
            Ok(None) => SessionContext {
                level: config.level,
                ..SessionContext::default()
            },
            Err(e) => {
                tracing::warn!("Could not load session context, starting fresh: {}", e);
                SessionContext {
                    level: config.level,
                    ..SessionContext::default()
                }
            }
        };

        let level = context.level;
        let level_cfg = config.level_config(level);
        let bounds = config.bounds_for(viewport.width, viewport.height);
        let paddles = Side::BOTH.map(|side| {
            Paddle::new(
                side,
                &bounds,
                config.paddle_width,
                config.paddle_height,
                config.paddle_gap,
                level_cfg.paddle_speed,
            )
        });

        let world = World {
            bounds,
            level: level_cfg,
            ball: Ball::new(&bounds, config.ball_size, config.ball_color.clone()),
            paddles,
            manager: GameManager::new(level, config.score_max),
            input: InputState::default(),
            rng: StdRng::seed_from_u64(config.seed),
            feed: None,
            events: Vec::new(),
        };

        tracing::info!(
            "Session created: {}x{} canvas, level {}, seed {}",
            viewport.width,
            viewport.height,
            level,
            config.seed
        );

        Ok(Self {
            config,
            renderer,
            world,
            strategy: Mode::Local.strategy(),
            pending: None,
            bindings: KeyBindings::default(),
            subscribers: Vec::new(),
            store: Box::new(store),
            context,
            frame: 0,
            running: true,
        })
    }

    /// Run one frame: apply a pending mode switch, advance, publish, render.
    ///
    /// A non-positive or non-finite `dt` skips the advance but still renders.
    pub fn tick(&mut self, dt: f64) {
        if !self.running {
            return;
        }
        if let Some(next) = self.pending.take() {
            tracing::info!("Switching mode {:?} -> {:?}", self.strategy.mode(), next.mode());
            self.strategy = next;
            if self.mode() == Mode::ServerAuthoritative {
                self.announce_held_intents();
            }
        }
        if dt.is_finite() && dt > 0.0 {
            self.strategy.advance(&mut self.world, dt);
        }
        self.frame += 1;
        self.flush_events();
        self.render();
    }

    /// Queue a mode switch for the start of the next tick.
    pub fn request_mode(&mut self, mode: Mode) {
        if self.pending_mode().unwrap_or(self.mode()) == mode {
            return;
        }
        self.pending = Some(mode.strategy());
    }

    /// Connect the snapshot stream read in server-authoritative mode.
    pub fn attach_feed(&mut self, feed: FeedRx) {
        self.world.feed = Some(feed);
    }

    /// Receive score, bounce, game-over and outbound-intent notifications.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Start a match. While the server owns the simulation only the
    /// manager's bookkeeping changes; ball, paddles and score stay as pushed.
    pub fn start_game(&mut self) {
        if self.server_owned() {
            let score = self.world.manager.score();
            self.world.manager.start_game();
            self.world.manager.set_score(score);
            tracing::info!("Game started at level {} (server-owned)", self.world.manager.level());
            return;
        }
        self.world.manager.start_game();
        self.reset_rally();
        tracing::info!("Game started at level {}", self.world.manager.level());
        self.world.events.push(GameEvent::ScoreChanged {
            score: self.world.manager.score(),
        });
        self.flush_events();
    }

    pub fn end_game(&mut self) {
        if self.world.manager.is_game_over() {
            return;
        }
        self.world.manager.end_game();
        self.world.events.push(GameEvent::GameOver {
            score: self.world.manager.score(),
            winner: self.world.manager.winner(),
        });
        self.flush_events();
    }

    /// Change difficulty. Restarts the rally; the choice is kept in the context.
    ///
    /// In server-authoritative mode the rally and score belong to the server,
    /// so only the level itself changes locally.
    pub fn set_level(&mut self, level: GameLevel) {
        let server_owned = self.server_owned();
        let score = self.world.manager.score();
        self.world.manager.set_level(level);
        self.world.level = self.config.level_config(level);
        for paddle in self.world.paddles.iter_mut() {
            paddle.set_speed(self.world.level.paddle_speed);
        }
        self.context.level = level;
        tracing::info!("Level set to {}", level);
        if server_owned {
            self.world.manager.set_score(score);
            return;
        }
        self.reset_rally();
        self.world.events.push(GameEvent::ScoreChanged {
            score: self.world.manager.score(),
        });
        self.flush_events();
    }

    /// Recompute the court for a new canvas size.
    pub fn resize(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            tracing::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        let bounds = self.config.bounds_for(width, height);
        for paddle in self.world.paddles.iter_mut() {
            paddle.relayout(&bounds);
        }
        let ball = &mut self.world.ball;
        let h = ball.half();
        ball.x = ball.x.clamp(bounds.left + h, (bounds.right - h).max(bounds.left + h));
        ball.y = ball.y.clamp(bounds.top + h, (bounds.bottom - h).max(bounds.top + h));
        self.world.bounds = bounds;
        tracing::debug!("Resized court to {:?}", bounds);
    }

    /// Handle a key press. Unbound keys are ignored.
    pub fn key_down(&mut self, key: &str) {
        if let Some((side, intent)) = self.bindings.lookup(key) {
            self.set_intent(side, Some(intent));
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some((side, intent)) = self.bindings.lookup(key) {
            if self.world.input.release(side, intent) {
                self.intent_changed(side, None);
            }
        }
    }

    /// Set a slot's intent directly (bots, remote players).
    pub fn set_intent(&mut self, side: Side, intent: Option<Intent>) {
        if self.world.input.set(side, intent) {
            self.intent_changed(side, intent);
        }
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    /// Current state in the wire shape servers push to clients.
    pub fn snapshot(&self) -> ServerSnapshot {
        let w = &self.world;
        let score = w.manager.score();
        ServerSnapshot {
            ball: BallSnapshot {
                x: w.ball.x,
                y: w.ball.y,
                velocity_x: w.ball.vx,
                velocity_y: w.ball.vy,
                size: w.ball.size,
            },
            paddles: PaddlesSnapshot {
                left: PaddleSnapshot {
                    y: w.paddle(Side::Left).y(),
                    score: score.left,
                },
                right: PaddleSnapshot {
                    y: w.paddle(Side::Right).y(),
                    score: score.right,
                },
            },
        }
    }

    /// Stop ticking, detach subscribers, input and feed, and persist the
    /// context. Safe to call more than once.
    pub fn teardown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.pending = None;
        self.subscribers.clear();
        self.bindings.clear();
        self.world.input.clear();
        self.world.feed = None;
        self.world.events.clear();
        if let Err(e) = self.store.save(&self.context) {
            tracing::error!("Failed to save session context: {}", e);
        }
        tracing::info!("Session torn down after {} frames", self.frame);
    }

    pub fn mode(&self) -> Mode {
        self.strategy.mode()
    }

    pub fn pending_mode(&self) -> Option<Mode> {
        self.pending.as_ref().map(|s| s.mode())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn ball(&self) -> &Ball {
        &self.world.ball
    }

    pub fn paddles(&self) -> &[Paddle; 2] {
        &self.world.paddles
    }

    pub fn bounds(&self) -> &CourtBounds {
        &self.world.bounds
    }

    pub fn manager(&self) -> &GameManager {
        &self.world.manager
    }

    pub fn input(&self) -> &InputState {
        &self.world.input
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn reset_rally(&mut self) {
        let w = &mut self.world;
        for paddle in w.paddles.iter_mut() {
            paddle.reset_position(&w.bounds);
        }
        if w.manager.is_started() {
            w.ball.serve(&w.bounds, &w.level, Side::Right, &mut w.rng);
        } else {
            w.ball = Ball::new(&w.bounds, self.config.ball_size, self.config.ball_color.clone());
        }
    }

    /// True when server-authoritative mode is active or about to be.
    fn server_owned(&self) -> bool {
        self.pending_mode().unwrap_or(self.mode()) == Mode::ServerAuthoritative
    }

    /// Intents held across a switch into server mode were never sent.
    fn announce_held_intents(&mut self) {
        for side in Side::BOTH {
            if let Some(intent) = self.world.input.get(side) {
                self.publish(SessionEvent::Outbound(OutboundIntent::from_intent(
                    side,
                    Some(intent),
                )));
            }
        }
    }

    fn intent_changed(&mut self, side: Side, intent: Option<Intent>) {
        // Remote paddles move on the server; tell the network layer.
        if self.mode() == Mode::ServerAuthoritative {
            self.publish(SessionEvent::Outbound(OutboundIntent::from_intent(side, intent)));
        }
    }

    fn flush_events(&mut self) {
        let events = std::mem::take(&mut self.world.events);
        for event in events {
            if let GameEvent::GameOver { score, winner } = event {
                self.context.games_played += 1;
                tracing::info!(
                    "Game over {}-{}, winner: {}",
                    score.left,
                    score.right,
                    winner.map_or("none".to_string(), |s| s.to_string())
                );
                if let Err(e) = self.store.save(&self.context) {
                    tracing::error!("Failed to save session context: {}", e);
                }
            }
            self.publish(SessionEvent::Game(event));
        }
    }

    fn publish(&mut self, event: SessionEvent) {
        // Drop subscribers whose receiver is gone.
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    fn render(&mut self) {
        let view = FrameView {
            bounds: &self.world.bounds,
            ball: &self.world.ball,
            paddles: &self.world.paddles,
            score: self.world.manager.score(),
            mode: self.strategy.mode(),
            frame: self.frame,
        };
        self.renderer.draw(&view);
    }
}

impl<R: Renderer> Drop for Session<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
