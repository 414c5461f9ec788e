//! Per-player session state that outlives a single game.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use pong_core::GameLevel;
use serde::{Deserialize, Serialize};

use crate::error::ContextError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionContext {
    /// Level selected last time; restored when a session opens
    pub level: GameLevel,
    pub player_names: [String; 2],
    pub games_played: u32,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            level: GameLevel::default(),
            player_names: ["Player 1".to_string(), "Player 2".to_string()],
            games_played: 0,
        }
    }
}

/// Load/save hooks for [`SessionContext`].
pub trait ContextStore: Send {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SessionContext>, ContextError>;
    fn save(&self, ctx: &SessionContext) -> Result<(), ContextError>;
}

/// Stores the context as pretty JSON in a single file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContextStore for JsonFileStore {
    fn load(&self) -> Result<Option<SessionContext>, ContextError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&self, ctx: &SessionContext) -> Result<(), ContextError> {
        let json = serde_json::to_string_pretty(ctx)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store; clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<SessionContext>>>,
}

impl MemoryStore {
    pub fn with(ctx: SessionContext) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(ctx))),
        }
    }

    /// Stored context, or `None` when empty or unreadable.
    pub fn get(&self) -> Option<SessionContext> {
        self.load().ok().flatten()
    }
}

impl ContextStore for MemoryStore {
    fn load(&self) -> Result<Option<SessionContext>, ContextError> {
        let slot = self.slot.lock().map_err(|_| ContextError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, ctx: &SessionContext) -> Result<(), ContextError> {
        let mut slot = self.slot.lock().map_err(|_| ContextError::Poisoned)?;
        *slot = Some(ctx.clone());
        Ok(())
    }
}
