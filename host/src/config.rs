use std::fs;
use std::path::Path;

use pong_core::constants::*;
use pong_core::{BallLevelConfig, CourtBounds, GameLevel};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Reject config files above this size before reading them.
pub const MAX_CONFIG_SIZE: u64 = 1024 * 1024; // 1 MB

/// Session configuration. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub margin_x_ratio: f64,
    pub margin_y_ratio: f64,
    pub paddle_width: f64,
    pub paddle_height: f64,
    pub paddle_gap: f64,
    pub ball_size: f64,
    pub ball_color: String,
    pub level: GameLevel,
    pub score_max: u32,
    pub speed_ratchet: f64,
    /// Seed for serve angles; equal seeds replay identically
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            margin_x_ratio: MARGIN_X_RATIO,
            margin_y_ratio: MARGIN_Y_RATIO,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_gap: PADDLE_GAP,
            ball_size: BALL_SIZE,
            ball_color: BALL_COLOR.to_string(),
            level: GameLevel::default(),
            score_max: SCORE_MAX,
            speed_ratchet: SPEED_RATCHET,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let size = fs::metadata(path)?.len();
        if size > MAX_CONFIG_SIZE {
            return Err(ConfigError::TooLarge {
                size,
                max: MAX_CONFIG_SIZE,
            });
        }
        let raw = fs::read_to_string(path)?;
        let config = Self::from_json(&raw)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return invalid(format!(
                "canvas must have a positive size, got {}x{}",
                self.canvas_width, self.canvas_height
            ));
        }
        for (name, ratio) in [("margin_x_ratio", self.margin_x_ratio), ("margin_y_ratio", self.margin_y_ratio)] {
            if !(0.0..0.5).contains(&ratio) {
                return invalid(format!("{} must be in [0, 0.5), got {}", name, ratio));
            }
        }
        if !(self.paddle_width > 0.0 && self.paddle_height > 0.0) || self.paddle_gap < 0.0 {
            return invalid("paddle dimensions must be positive".into());
        }
        if self.paddle_height >= self.bounds().height() {
            return invalid(format!(
                "paddle height {} does not fit the court height {}",
                self.paddle_height,
                self.bounds().height()
            ));
        }
        if !(self.ball_size > 0.0) {
            return invalid(format!("ball_size must be positive, got {}", self.ball_size));
        }
        if self.score_max == 0 {
            return invalid("score_max must be at least 1".into());
        }
        if !(self.speed_ratchet >= 1.0) {
            return invalid(format!("speed_ratchet must be >= 1, got {}", self.speed_ratchet));
        }
        Ok(())
    }

    /// Court bounds for the configured canvas size.
    pub fn bounds(&self) -> CourtBounds {
        self.bounds_for(self.canvas_width, self.canvas_height)
    }

    pub fn bounds_for(&self, width: f64, height: f64) -> CourtBounds {
        CourtBounds::compute(width, height, self.margin_x_ratio, self.margin_y_ratio)
    }

    /// Level tuning with this config's ratchet applied.
    pub fn level_config(&self, level: GameLevel) -> BallLevelConfig {
        BallLevelConfig {
            speed_ratchet: self.speed_ratchet,
            ..level.config()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = GameConfig::from_json(r#"{"level":"HARD","seed":7}"#).unwrap();
        assert_eq!(cfg.level, GameLevel::Hard);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.paddle_height, PADDLE_HEIGHT);
        assert_eq!(cfg.level_config(GameLevel::Hard).speed_ratchet, SPEED_RATCHET);
    }

    #[test]
    fn rejects_bad_values() {
        for raw in [
            r#"{"canvas_width":0}"#,
            r#"{"margin_y_ratio":0.5}"#,
            r#"{"paddle_height":1000}"#,
            r#"{"ball_size":-1}"#,
            r#"{"score_max":0}"#,
            r#"{"speed_ratchet":0.9}"#,
        ] {
            assert!(
                matches!(GameConfig::from_json(raw), Err(ConfigError::Invalid(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{level:"),
            Err(ConfigError::Json(_))
        ));
    }
}
