use serde::{Deserialize, Serialize};

use crate::constants::SPEED_RATCHET;

/// Difficulty preset
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameLevel {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Per-level ball and paddle tuning.
///
/// Speeds are in virtual pixels per frame, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallLevelConfig {
    /// Serve speed and the lower speed bound while in flight
    pub min_speed: f64,
    /// Ceiling for the bounce ratchet
    pub max_speed: f64,
    /// Largest angle off the horizontal for bounces and serves
    pub max_bounce_angle: f64,
    pub paddle_speed: f64,
    /// Multiplier applied to the ball speed on every paddle contact
    pub speed_ratchet: f64,
}

impl GameLevel {
    pub const ALL: [GameLevel; 3] = [GameLevel::Easy, GameLevel::Medium, GameLevel::Hard];

    pub fn config(self) -> BallLevelConfig {
        let (min_speed, max_speed, angle_deg, paddle_speed) = match self {
            GameLevel::Easy => (4.0, 8.0, 45.0_f64, 6.0),
            GameLevel::Medium => (5.0, 11.0, 55.0, 7.0),
            GameLevel::Hard => (7.0, 15.0, 65.0, 9.0),
        };
        BallLevelConfig {
            min_speed,
            max_speed,
            max_bounce_angle: angle_deg.to_radians(),
            paddle_speed,
            speed_ratchet: SPEED_RATCHET,
        }
    }
}

impl std::str::FromStr for GameLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(GameLevel::Easy),
            "medium" => Ok(GameLevel::Medium),
            "hard" => Ok(GameLevel::Hard),
            _ => Err(format!(
                "Invalid level: '{}'. Must be 'easy', 'medium', or 'hard'",
                s
            )),
        }
    }
}

impl std::fmt::Display for GameLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameLevel::Easy => write!(f, "EASY"),
            GameLevel::Medium => write!(f, "MEDIUM"),
            GameLevel::Hard => write!(f, "HARD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_ranges_are_ordered() {
        for level in GameLevel::ALL {
            let cfg = level.config();
            assert!(cfg.min_speed > 0.0);
            assert!(cfg.min_speed < cfg.max_speed, "{level}");
            assert!(cfg.max_bounce_angle < std::f64::consts::FRAC_PI_2);
            assert_eq!(cfg.speed_ratchet, SPEED_RATCHET);
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HARD".parse::<GameLevel>().unwrap(), GameLevel::Hard);
        assert_eq!("Medium".parse::<GameLevel>().unwrap(), GameLevel::Medium);
        assert!("impossible".parse::<GameLevel>().is_err());
    }

    #[test]
    fn serializes_uppercase() {
        let json = serde_json::to_string(&GameLevel::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
        let back: GameLevel = serde_json::from_str("\"HARD\"").unwrap();
        assert_eq!(back, GameLevel::Hard);
        assert_eq!(GameLevel::Medium.to_string(), "MEDIUM");
    }
}
