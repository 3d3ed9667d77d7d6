//! JSON snapshots of a hand.
//!
//! A snapshot is the [`GameState`] field for field, mid-hand included
//! (hole cards, partial street bets, remaining deck order). Restored
//! states are validated before they are handed back.

use crate::state::{GameState, InvariantViolation};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PersistError {
    #[error("serialization failed: {0}")]
    Encode(String),
    #[error("malformed snapshot: {0}")]
    Decode(String),
    #[error("snapshot violates game invariants: {0}")]
    Invalid(#[from] InvariantViolation),
}

pub fn to_json(state: &GameState) -> Result<String, PersistError> {
    serde_json::to_string(state).map_err(|e| PersistError::Encode(e.to_string()))
}

pub fn to_json_pretty(state: &GameState) -> Result<String, PersistError> {
    serde_json::to_string_pretty(state).map_err(|e| PersistError::Encode(e.to_string()))
}

/// Restore a snapshot and check it is a state the engine could reach.
pub fn from_json(json: &str) -> Result<GameState, PersistError> {
    let state: GameState =
        serde_json::from_str(json).map_err(|e| PersistError::Decode(e.to_string()))?;
    state.validate()?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betting::Action;
    use crate::config::Stakes;
    use crate::deck::Deck;
    use crate::evaluator::StandardEvaluator;
    use crate::flow::{act, start_hand};
    use crate::player::{Player, PlayerId};

    fn mid_hand() -> GameState {
        let players =
            (0..3).map(|i| Player::new(PlayerId(i), format!("P{i}"), 500, i == 0)).collect();
        let mut deck = Deck::standard();
        deck.shuffle_seeded(11);
        let s = start_hand(players, 0, Stakes::new(5, 10), deck, 3, &StandardEvaluator).unwrap();
        act(&s, PlayerId(0), Action::Raise(30), &StandardEvaluator).unwrap()
    }

    #[test]
    fn snapshot_round_trips_exactly() {
        let s = mid_hand();
        let json = to_json(&s).unwrap();
        assert_eq!(from_json(&json).unwrap(), s);
    }

    #[test]
    fn tampered_snapshot_is_rejected() {
        let s = mid_hand();
        let mut value: serde_json::Value = serde_json::from_str(&to_json(&s).unwrap()).unwrap();
        value["players"][1]["stack"] = serde_json::json!(10_000);
        let err = from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, PersistError::Invalid(InvariantViolation::ChipsNotConserved { .. })));
        assert!(matches!(from_json("{}"), Err(PersistError::Decode(_))));
    }
}
