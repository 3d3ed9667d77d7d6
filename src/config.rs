//! Table configuration.
//!
//! Everything a hand needs (blinds, ante) is carried explicitly in
//! [`Stakes`] and copied into each hand's state; there are no
//! process-wide defaults.

use crate::agents::Difficulty;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 9;

/// Forced bets for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakes {
    pub small_blind: u64,
    pub big_blind: u64,
    #[serde(default)]
    pub ante: u64,
}

impl Stakes {
    pub const fn new(small_blind: u64, big_blind: u64) -> Self {
        Self { small_blind, big_blind, ante: 0 }
    }

    pub const fn with_ante(mut self, ante: u64) -> Self {
        self.ante = ante;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.big_blind == 0 {
            return Err(ConfigError::ZeroBigBlind);
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::SmallBlindAboveBigBlind {
                small: self.small_blind,
                big: self.big_blind,
            });
        }
        Ok(())
    }
}

impl Default for Stakes {
    fn default() -> Self {
        Self::new(5, 10)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("a table needs 2 to 9 seats, got {0}")]
    SeatCount(usize),
    #[error("big blind must be positive")]
    ZeroBigBlind,
    #[error("small blind {small} exceeds big blind {big}")]
    SmallBlindAboveBigBlind { small: u64, big: u64 },
    #[error("starting stack {stack} is smaller than the big blind {big_blind}")]
    StackBelowBigBlind { stack: u64, big_blind: u64 },
    #[error("human seat {seat} is out of range for {seats} seats")]
    HumanSeatOutOfRange { seat: usize, seats: usize },
    #[error("cannot read config: {0}")]
    Io(String),
    #[error("invalid config JSON: {0}")]
    Json(String),
}

/// Settings for one table session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub num_players: usize,
    pub starting_stack: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    pub ante: u64,
    /// Seat controlled from the UI; `None` for an all-bot table.
    pub human_seat: Option<usize>,
    pub bot_difficulty: Difficulty,
    pub bot_delay_ms: u64,
    /// Fixed shuffle seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            num_players: 6,
            starting_stack: 1000,
            small_blind: 5,
            big_blind: 10,
            ante: 0,
            human_seat: Some(0),
            bot_difficulty: Difficulty::Medium,
            bot_delay_ms: 400,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn stakes(&self) -> Stakes {
        Stakes::new(self.small_blind, self.big_blind).with_ante(self.ante)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.num_players) {
            return Err(ConfigError::SeatCount(self.num_players));
        }
        self.stakes().validate()?;
        if self.starting_stack < self.big_blind {
            return Err(ConfigError::StackBelowBigBlind {
                stack: self.starting_stack,
                big_blind: self.big_blind,
            });
        }
        if let Some(seat) = self.human_seat {
            if seat >= self.num_players {
                return Err(ConfigError::HumanSeatOutOfRange { seat, seats: self.num_players });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take defaults.
    ///
    /// ```
    /// use holdem_engine::config::TableConfig;
    ///
    /// let cfg = TableConfig::from_json_str(r#"{ "num_players": 3, "ante": 1 }"#).unwrap();
    /// assert_eq!(cfg.num_players, 3);
    /// assert_eq!(cfg.stakes().ante, 1);
    /// ```
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: TableConfig =
            serde_json::from_str(s).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(TableConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_seat_counts_and_blinds() {
        let cfg = TableConfig { num_players: 1, ..TableConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::SeatCount(1)));
        let cfg = TableConfig { num_players: 10, ..TableConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::SeatCount(10)));
        let cfg = TableConfig { big_blind: 0, small_blind: 0, ..TableConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroBigBlind));
        let cfg = TableConfig { small_blind: 20, big_blind: 10, ..TableConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::SmallBlindAboveBigBlind { .. })));
    }

    #[test]
    fn rejects_short_stacks_and_bad_human_seat() {
        let cfg = TableConfig { starting_stack: 5, ..TableConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::StackBelowBigBlind { .. })));
        let cfg = TableConfig { human_seat: Some(6), ..TableConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::HumanSeatOutOfRange { seat: 6, seats: 6 }));
    }

    #[test]
    fn json_round_trip_and_errors() {
        let cfg = TableConfig { seed: Some(9), bot_difficulty: Difficulty::Hard, ..Default::default() };
        let text = cfg.to_json_pretty().unwrap();
        assert_eq!(TableConfig::from_json_str(&text), Ok(cfg));
        assert!(matches!(TableConfig::from_json_str("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            TableConfig::from_json_str(r#"{"num_players": 12}"#),
            Err(ConfigError::SeatCount(12))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = TableConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
