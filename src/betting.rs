//! Betting round state machine.
//!
//! [`apply_action`] validates a decision from the player on turn against
//! [`legal_actions`] and returns the resulting state. Validation happens in
//! full before anything is copied, so a rejected action leaves the caller's
//! state untouched.
//!
//! Raise rules:
//! - a raise must reach `highest_bet + min_raise`, unless it puts the
//!   player all-in;
//! - a full raise resets `min_raise` to its size and reopens action for
//!   every other active player;
//! - an all-in short of a full raise lifts the bet to call but does not
//!   reopen action, so players who already acted may only call or fold.

use crate::history::HistoryVerb;
use crate::player::PlayerId;
use crate::pot::Pot;
use crate::sequencer;
use crate::state::GameState;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decision for the player on turn. `Raise` carries the raise-to total
/// for the street, not the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise(u64),
    AllIn,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("fold"),
            Action::Check => f.write_str("check"),
            Action::Call => f.write_str("call"),
            Action::Raise(to) => write!(f, "raise to {to}"),
            Action::AllIn => f.write_str("all-in"),
        }
    }
}

/// Inclusive raise-to bounds for the street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaiseBounds {
    pub min_to: u64,
    /// The player's whole stack plus what they already bet this street.
    pub max_to: u64,
}

/// Everything the player on turn may do, with amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct LegalActions {
    pub player: PlayerId,
    pub can_fold: bool,
    pub can_check: bool,
    /// Chips a call costs; capped at the stack.
    pub call: Option<u64>,
    pub raise: Option<RaiseBounds>,
    /// Chips an all-in moves.
    pub all_in: Option<u64>,
}

impl LegalActions {
    /// Whether `action` is in the legal set, amount bounds included.
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Fold => self.can_fold,
            Action::Check => self.can_check,
            Action::Call => self.call.is_some(),
            Action::Raise(to) => self.raise.is_some_and(|b| (b.min_to..=b.max_to).contains(&to)),
            Action::AllIn => self.all_in.is_some(),
        }
    }

    /// Cheapest way to stay in the hand.
    pub fn passive(&self) -> Action {
        if self.can_check {
            Action::Check
        } else if self.call.is_some() {
            Action::Call
        } else {
            Action::Fold
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("not {got}'s turn")]
    NotPlayersTurn { expected: Option<PlayerId>, got: PlayerId },
    #[error("cannot {action}: {reason}")]
    IllegalAction { action: Action, reason: &'static str },
    #[error("amount {amount} outside {min}..={max}")]
    InvalidAmount { amount: u64, min: u64, max: u64 },
    #[error("hand is already complete")]
    GameAlreadyComplete,
    #[error(transparent)]
    Flow(#[from] crate::flow::FlowError),
}

/// Compute the legal-action set for the player at `seat`.
pub fn legal_actions(state: &GameState, seat: usize) -> LegalActions {
    let p = &state.players[seat];
    let highest = state.highest_bet;
    let to_call = highest.saturating_sub(p.street_bet);
    let max_to = p.stack + p.street_bet;
    // only players who have not acted since the last full raise may raise
    let reopened = !p.has_acted;

    let raise = (p.is_active() && reopened && max_to > highest).then(|| RaiseBounds {
        min_to: (highest + state.min_raise).min(max_to),
        max_to,
    });
    LegalActions {
        player: p.id,
        can_fold: p.is_active(),
        can_check: p.is_active() && to_call == 0,
        call: (p.is_active() && to_call > 0 && p.stack > 0).then(|| to_call.min(p.stack)),
        raise,
        all_in: (p.is_active() && p.stack > 0 && (reopened || p.stack <= to_call)).then_some(p.stack),
    }
}

/// Apply `action` for `player` and return the new state.
///
/// The returned state has `current_player_index` set to the next player
/// owing a decision, or `None` once the round is complete; dealing the next
/// street and paying out are left to [`crate::flow`].
pub fn apply_action(
    state: &GameState,
    player: PlayerId,
    action: Action,
) -> Result<GameState, ActionError> {
    if state.is_complete() {
        return Err(ActionError::GameAlreadyComplete);
    }
    let expected = state.current_player().map(|p| p.id);
    let seat = match state.current_player_index {
        Some(i) if expected == Some(player) => i,
        _ => return Err(ActionError::NotPlayersTurn { expected, got: player }),
    };
    let legal = legal_actions(state, seat);
    let target = validate(&legal, state, seat, action)?;

    let mut next = state.clone();
    let street = next.street;
    let verb = match action {
        Action::Fold => {
            let p = &mut next.players[seat];
            p.status = crate::player::PlayerStatus::Folded;
            p.has_acted = true;
            if let Some(hole) = p.hole.take() {
                next.discards.extend(hole.as_array());
            }
            next.highest_bet = next
                .players
                .iter()
                .filter(|p| !p.is_folded())
                .map(|p| p.street_bet)
                .max()
                .unwrap_or(0);
            next.history.record(Some(player), HistoryVerb::Fold, None, street);
            HistoryVerb::Fold
        }
        Action::Check => {
            next.players[seat].has_acted = true;
            next.history.record(Some(player), HistoryVerb::Check, None, street);
            HistoryVerb::Check
        }
        Action::Call | Action::Raise(_) | Action::AllIn => {
            let verb = place_to(&mut next, seat, target, action);
            let amount = match verb {
                HistoryVerb::Call => legal.call,
                _ => Some(next.players[seat].street_bet),
            };
            next.history.record(Some(player), verb, amount, street);
            verb
        }
    };

    next.pot = Pot::from_players(&next.players);
    next.current_player_index = if sequencer::is_round_complete(&next) {
        None
    } else {
        sequencer::next_pending(&next, seat)
    };
    debug!(
        "hand {} {}: {} {} -> bet {} pot {}",
        next.hand_number,
        street.label(),
        player,
        verb.label(),
        next.highest_bet,
        next.pot.total()
    );
    Ok(next)
}

/// Check `action` against the legal set; returns the street total the
/// player ends at for chip-moving actions.
fn validate(
    legal: &LegalActions,
    state: &GameState,
    seat: usize,
    action: Action,
) -> Result<u64, ActionError> {
    let p = &state.players[seat];
    let illegal = |reason| Err(ActionError::IllegalAction { action, reason });
    match action {
        Action::Fold if legal.can_fold => Ok(p.street_bet),
        Action::Fold => illegal("player cannot act"),
        Action::Check if legal.can_check => Ok(p.street_bet),
        Action::Check => illegal("facing a bet"),
        Action::Call => match legal.call {
            Some(amount) => Ok(p.street_bet + amount),
            None => illegal("nothing to call"),
        },
        Action::Raise(to) => {
            let Some(bounds) = legal.raise else {
                return illegal("action has not been reopened or stack cannot cover a raise");
            };
            if to < bounds.min_to || to > bounds.max_to {
                return Err(ActionError::InvalidAmount {
                    amount: to,
                    min: bounds.min_to,
                    max: bounds.max_to,
                });
            }
            Ok(to)
        }
        Action::AllIn => match legal.all_in {
            Some(stack) => Ok(p.street_bet + stack),
            None => illegal("action has not been reopened"),
        },
    }
}

/// Move chips so the player's street bet reaches `target` and update the
/// raise bookkeeping. Returns the verb the action is recorded as.
fn place_to(state: &mut GameState, seat: usize, target: u64, action: Action) -> HistoryVerb {
    let prior_highest = state.highest_bet;
    let p = &mut state.players[seat];
    let need = target.saturating_sub(p.street_bet);
    p.commit(need);
    p.has_acted = true;
    let new_bet = p.street_bet;
    let all_in = p.is_all_in();

    if new_bet > prior_highest {
        let raise_size = new_bet - prior_highest;
        if raise_size >= state.min_raise {
            state.min_raise = raise_size;
            for (i, other) in state.players.iter_mut().enumerate() {
                if i != seat && other.is_active() {
                    other.has_acted = false;
                }
            }
        }
        state.highest_bet = new_bet;
    }

    match action {
        _ if all_in => HistoryVerb::AllIn,
        Action::Call => HistoryVerb::Call,
        _ if prior_highest == 0 => HistoryVerb::Bet,
        _ if new_bet <= prior_highest => HistoryVerb::Call,
        _ => HistoryVerb::RaiseTo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Stakes;
    use crate::deck::Deck;
    use crate::evaluator::StandardEvaluator;
    use crate::flow::start_hand;
    use crate::player::{Player, PlayerStatus};

    fn hand(stacks: &[u64]) -> GameState {
        let players = stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| Player::new(PlayerId(i as u32), format!("P{i}"), s, false))
            .collect();
        start_hand(players, 0, Stakes::new(5, 10), Deck::standard(), 1, &StandardEvaluator)
            .unwrap()
    }

    fn on_turn(s: &GameState) -> PlayerId {
        s.current_player().map(|p| p.id()).unwrap()
    }

    #[test]
    fn preflop_legal_actions_for_utg() {
        let s = hand(&[1000, 1000, 1000, 1000]);
        let legal = s.legal_actions().unwrap();
        assert_eq!(legal.player, PlayerId(3));
        assert!(legal.can_fold && !legal.can_check);
        assert_eq!(legal.call, Some(10));
        assert_eq!(legal.raise, Some(RaiseBounds { min_to: 20, max_to: 1000 }));
        assert_eq!(legal.all_in, Some(1000));
    }

    #[test]
    fn out_of_turn_is_rejected_without_change() {
        let s = hand(&[1000, 1000, 1000]);
        let err = apply_action(&s, PlayerId(1), Action::Call).unwrap_err();
        assert_eq!(err, ActionError::NotPlayersTurn { expected: Some(PlayerId(0)), got: PlayerId(1) });
    }

    #[test]
    fn raise_below_minimum_is_invalid_amount() {
        let s = hand(&[1000, 1000, 1000]);
        let err = apply_action(&s, PlayerId(0), Action::Raise(15)).unwrap_err();
        assert_eq!(err, ActionError::InvalidAmount { amount: 15, min: 20, max: 1000 });
        let err = apply_action(&s, PlayerId(0), Action::Raise(5000)).unwrap_err();
        assert!(matches!(err, ActionError::InvalidAmount { amount: 5000, .. }));
        assert!(matches!(
            apply_action(&s, PlayerId(0), Action::Check),
            Err(ActionError::IllegalAction { action: Action::Check, .. })
        ));
    }

    #[test]
    fn full_raise_updates_min_raise_and_reopens() {
        let s = hand(&[1000, 1000, 1000]);
        let s = apply_action(&s, PlayerId(0), Action::Raise(40)).unwrap();
        assert_eq!(s.highest_bet(), 40);
        assert_eq!(s.min_raise(), 30);
        let legal = s.legal_actions().unwrap();
        assert_eq!(legal.player, PlayerId(1));
        assert_eq!(legal.call, Some(35));
        assert_eq!(legal.raise.map(|b| b.min_to), Some(70));
    }

    #[test]
    fn short_stack_raise_is_reclassified_as_all_in() {
        let s = hand(&[1000, 1000, 15]);
        // seat 2 is the big blind with 5 behind; seat 0 is first to act
        let s = apply_action(&s, PlayerId(0), Action::Call).unwrap();
        let s = apply_action(&s, PlayerId(1), Action::Call).unwrap();
        let legal = s.legal_actions().unwrap();
        assert_eq!(legal.player, PlayerId(2));
        assert_eq!(legal.raise, Some(RaiseBounds { min_to: 15, max_to: 15 }));
        let s = apply_action(&s, PlayerId(2), Action::Raise(15)).unwrap();
        assert_eq!(s.players()[2].status(), PlayerStatus::AllIn);
        assert_eq!(s.highest_bet(), 15);
        assert_eq!(s.min_raise(), 10, "incomplete raise leaves min raise alone");
        // earlier callers may only call or fold
        let legal = s.legal_actions().unwrap();
        assert_eq!(legal.player, PlayerId(0));
        assert_eq!(legal.call, Some(5));
        assert!(legal.raise.is_none());
        assert!(legal.all_in.is_none());
    }

    #[test]
    fn fold_discards_hole_cards_and_keeps_chips_in_pot() {
        let s = hand(&[1000, 1000, 1000]);
        let s = apply_action(&s, PlayerId(0), Action::Fold).unwrap();
        assert!(s.players()[0].hole().is_none());
        assert_eq!(s.discards().len(), 2);
        assert_eq!(s.pot().total(), 15);
        assert_eq!(on_turn(&s), PlayerId(1));
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn call_that_empties_stack_is_all_in() {
        let s = hand(&[8, 1000, 1000]);
        let s = apply_action(&s, PlayerId(0), Action::Call).unwrap();
        let p = &s.players()[0];
        assert!(p.is_all_in());
        assert_eq!(p.street_bet(), 8);
        assert_eq!(s.highest_bet(), 10);
        let last = s.history().recent(1)[0].clone();
        assert_eq!(last.verb, HistoryVerb::AllIn);
    }

    #[test]
    fn allows_checks_amount_bounds() {
        let legal = LegalActions {
            player: PlayerId(0),
            can_fold: true,
            can_check: false,
            call: Some(10),
            raise: Some(RaiseBounds { min_to: 20, max_to: 100 }),
            all_in: Some(90),
        };
        assert!(legal.allows(Action::Raise(20)));
        assert!(!legal.allows(Action::Raise(19)));
        assert!(!legal.allows(Action::Check));
        assert_eq!(legal.passive(), Action::Call);
    }
}
