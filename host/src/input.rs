use std::collections::HashMap;

use pong_core::Side;
use serde::{Deserialize, Serialize};

/// Direction a player is holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Up,
    Down,
}

/// Paddle intents sent to the network layer in server-authoritative mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundIntent {
    PaddleMove { side: Side, intent: Intent },
    PaddleStop { side: Side },
}

impl OutboundIntent {
    pub fn from_intent(side: Side, intent: Option<Intent>) -> Self {
        match intent {
            Some(intent) => OutboundIntent::PaddleMove { side, intent },
            None => OutboundIntent::PaddleStop { side },
        }
    }
}

/// Key name → (slot, direction).
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<String, (Side, Intent)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut b = Self::empty();
        b.bind("w", Side::Left, Intent::Up);
        b.bind("s", Side::Left, Intent::Down);
        b.bind("ArrowUp", Side::Right, Intent::Up);
        b.bind("ArrowDown", Side::Right, Intent::Down);
        b
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self { map: HashMap::new() }
    }

    pub fn bind(&mut self, key: impl Into<String>, side: Side, intent: Intent) {
        self.map.insert(key.into(), (side, intent));
    }

    pub fn lookup(&self, key: &str) -> Option<(Side, Intent)> {
        self.map.get(key).copied()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Current intent per slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    intents: [Option<Intent>; 2],
}

impl InputState {
    pub fn get(&self, side: Side) -> Option<Intent> {
        self.intents[side.index()]
    }

    /// Returns true when the slot's intent changed.
    pub fn set(&mut self, side: Side, intent: Option<Intent>) -> bool {
        let slot = &mut self.intents[side.index()];
        let changed = *slot != intent;
        *slot = intent;
        changed
    }

    /// Releasing a key only clears the slot if that key's direction is still held.
    pub fn release(&mut self, side: Side, intent: Intent) -> bool {
        if self.get(side) == Some(intent) {
            self.set(side, None)
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.intents = [None; 2];
    }
}
