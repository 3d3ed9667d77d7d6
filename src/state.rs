//! The per-hand aggregate and its read-only projections.
//!
//! A [`GameState`] is a plain value: every transition in [`crate::betting`]
//! and [`crate::flow`] takes `&GameState` and returns a new one, so callers
//! can keep old states for undo or audit and persist any of them.

use crate::betting::{self, LegalActions};
use crate::cards::Card;
use crate::config::Stakes;
use crate::deck::Deck;
use crate::hand::{Board, HoleCards};
use crate::history::HandHistory;
use crate::player::{Player, PlayerId, PlayerStatus};
use crate::pot::{Pot, PotTier};
use crate::showdown::HandOutcome;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub fn label(self) -> &'static str {
        match self {
            Street::Preflop => "Pre-flop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
            Street::Showdown => "Showdown",
        }
    }

    /// Community cards dealt on entering this street.
    pub(crate) fn cards_dealt(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }

    /// Board size while betting on this street; `None` at showdown,
    /// which can be reached from any street.
    pub(crate) fn board_len(self) -> Option<usize> {
        match self {
            Street::Preflop => Some(0),
            Street::Flop => Some(3),
            Street::Turn => Some(4),
            Street::River => Some(5),
            Street::Showdown => None,
        }
    }

    pub(crate) fn next(self) -> Street {
        match self {
            Street::Preflop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River | Street::Showdown => Street::Showdown,
        }
    }
}

/// Where the hand stands from a caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    AwaitingAction(PlayerId),
    /// Betting on this street is over; the flow controller deals next.
    RoundComplete,
    HandComplete,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("chips not conserved: expected {expected}, found {found}")]
    ChipsNotConserved { expected: u64, found: u64 },
    #[error("pot does not match player contributions")]
    PotMismatch,
    #[error("highest bet is {recorded} but largest live street bet is {actual}")]
    HighestBetMismatch { recorded: u64, actual: u64 },
    #[error("player {0} is all-in with chips behind")]
    AllInWithChips(PlayerId),
    #[error("player {0} folded but still holds cards")]
    FoldedWithCards(PlayerId),
    #[error("player {0} is sitting out but was dealt in")]
    SittingOutDealtIn(PlayerId),
    #[error("current seat {0} is out of range")]
    CurrentOutOfRange(usize),
    #[error("current player {0} cannot act")]
    CurrentCannotAct(PlayerId),
    #[error("expected 52 distinct cards across deck, hands, board and discards; found {found} ({distinct} distinct)")]
    CardPartition { found: usize, distinct: usize },
    #[error("duplicate player id {0}")]
    DuplicatePlayer(PlayerId),
    #[error("{street:?} with {found} board cards")]
    BoardSize { street: Street, found: usize },
    #[error("minimum raise must be positive")]
    ZeroMinRaise,
}

/// Complete state of one hand in progress (or just finished).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct GameState {
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) board: Board,
    pub(crate) discards: Vec<Card>,
    pub(crate) pot: Pot,
    pub(crate) current_player_index: Option<usize>,
    pub(crate) dealer_index: usize,
    pub(crate) small_blind_index: Option<usize>,
    pub(crate) big_blind_index: Option<usize>,
    pub(crate) street: Street,
    pub(crate) highest_bet: u64,
    pub(crate) min_raise: u64,
    pub(crate) stakes: Stakes,
    /// Chips on the table when the hand started.
    pub(crate) total_chips: u64,
    pub(crate) hand_number: u64,
    pub(crate) history: HandHistory,
    pub(crate) outcome: Option<HandOutcome>,
}

impl GameState {
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Burned cards and folded hands.
    pub fn discards(&self) -> &[Card] {
        &self.discards
    }

    pub fn pot(&self) -> &Pot {
        &self.pot
    }

    pub fn current_player_index(&self) -> Option<usize> {
        self.current_player_index
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_index.and_then(|i| self.players.get(i))
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer_index
    }

    pub fn small_blind_index(&self) -> Option<usize> {
        self.small_blind_index
    }

    pub fn big_blind_index(&self) -> Option<usize> {
        self.big_blind_index
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn highest_bet(&self) -> u64 {
        self.highest_bet
    }

    pub fn min_raise(&self) -> u64 {
        self.min_raise
    }

    pub fn stakes(&self) -> Stakes {
        self.stakes
    }

    pub fn total_chips(&self) -> u64 {
        self.total_chips
    }

    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    pub fn history(&self) -> &HandHistory {
        &self.history
    }

    /// Set once the pot has been paid out.
    pub fn outcome(&self) -> Option<&HandOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn status(&self) -> RoundStatus {
        if self.is_complete() {
            return RoundStatus::HandComplete;
        }
        match self.current_player() {
            Some(p) => RoundStatus::AwaitingAction(p.id),
            None => RoundStatus::RoundComplete,
        }
    }

    pub fn to_call(&self, seat: usize) -> u64 {
        self.players.get(seat).map_or(0, |p| self.highest_bet.saturating_sub(p.street_bet))
    }

    /// Players still holding cards (active or all-in).
    pub fn live_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_live()).count()
    }

    /// Players who can still make decisions.
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Legal actions for the player on turn.
    pub fn legal_actions(&self) -> Option<LegalActions> {
        if self.is_complete() {
            return None;
        }
        self.current_player_index.map(|i| betting::legal_actions(self, i))
    }

    /// What `player` is allowed to see: their own hole cards, public
    /// information, and their legal actions when it is their turn. Other
    /// players' cards appear only once they are shown down.
    pub fn view_for(&self, player: PlayerId) -> Option<PlayerView> {
        let seat = self.seat_of(player)?;
        let me = &self.players[seat];
        let revealed = self.outcome.as_ref().is_some_and(|o| o.showdown);
        let seats = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| SeatView {
                id: p.id,
                name: p.name.clone(),
                stack: p.stack,
                street_bet: p.street_bet,
                total_contribution: p.total_contribution,
                status: p.status,
                is_dealer: i == self.dealer_index,
                hole: if i == seat || (revealed && p.is_live()) { p.hole } else { None },
            })
            .collect();
        let legal = match self.current_player_index {
            Some(i) if i == seat && !self.is_complete() => Some(betting::legal_actions(self, i)),
            _ => None,
        };
        Some(PlayerView {
            player,
            seat,
            hole: me.hole,
            board: self.board.as_slice().to_vec(),
            seats,
            pot_total: self.pot.total(),
            pot_tiers: self.pot.tiers().to_vec(),
            street: self.street,
            dealer_index: self.dealer_index,
            current_seat: self.current_player_index,
            highest_bet: self.highest_bet,
            min_raise: self.min_raise,
            to_call: self.to_call(seat),
            big_blind: self.stakes.big_blind,
            legal,
        })
    }

    /// Check every structural invariant of the hand.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut ids = HashSet::with_capacity(self.players.len());
        for p in &self.players {
            if !ids.insert(p.id) {
                return Err(InvariantViolation::DuplicatePlayer(p.id));
            }
        }

        let stacks: u64 = self.players.iter().map(|p| p.stack).sum();
        let found = stacks + self.pot.total();
        if found != self.total_chips {
            return Err(InvariantViolation::ChipsNotConserved { expected: self.total_chips, found });
        }
        if Pot::from_players(&self.players) != self.pot {
            return Err(InvariantViolation::PotMismatch);
        }

        let actual =
            self.players.iter().filter(|p| !p.is_folded()).map(|p| p.street_bet).max().unwrap_or(0);
        if actual != self.highest_bet {
            return Err(InvariantViolation::HighestBetMismatch {
                recorded: self.highest_bet,
                actual,
            });
        }

        if self.min_raise == 0 {
            return Err(InvariantViolation::ZeroMinRaise);
        }
        let found = self.board.len();
        if self.street.board_len().map_or(found > 5, |want| want != found) {
            return Err(InvariantViolation::BoardSize { street: self.street, found });
        }

        for p in &self.players {
            if p.is_folded() && p.hole.is_some() {
                return Err(InvariantViolation::FoldedWithCards(p.id));
            }
            if matches!(p.status, PlayerStatus::SittingOut)
                && (p.hole.is_some() || p.total_contribution > 0)
            {
                return Err(InvariantViolation::SittingOutDealtIn(p.id));
            }
            // winners keep their status after payout
            if !self.is_complete() && p.is_all_in() && p.stack != 0 {
                return Err(InvariantViolation::AllInWithChips(p.id));
            }
        }

        if let Some(i) = self.current_player_index {
            let p = self.players.get(i).ok_or(InvariantViolation::CurrentOutOfRange(i))?;
            if !p.is_active() {
                return Err(InvariantViolation::CurrentCannotAct(p.id));
            }
        }

        let mut cards: Vec<Card> = Vec::with_capacity(52);
        cards.extend_from_slice(self.deck.as_slice());
        cards.extend(self.players.iter().filter_map(|p| p.hole).flat_map(|h| h.as_array()));
        cards.extend_from_slice(self.board.as_slice());
        cards.extend_from_slice(&self.discards);
        let distinct = cards.iter().collect::<HashSet<_>>().len();
        if cards.len() != 52 || distinct != 52 {
            return Err(InvariantViolation::CardPartition { found: cards.len(), distinct });
        }
        Ok(())
    }
}

/// Public information about one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub stack: u64,
    pub street_bet: u64,
    pub total_contribution: u64,
    pub status: PlayerStatus,
    pub is_dealer: bool,
    pub hole: Option<HoleCards>,
}

/// Read-only snapshot handed to a decision source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct PlayerView {
    pub player: PlayerId,
    pub seat: usize,
    pub hole: Option<HoleCards>,
    pub board: Vec<Card>,
    pub seats: Vec<SeatView>,
    pub pot_total: u64,
    pub pot_tiers: Vec<PotTier>,
    pub street: Street,
    pub dealer_index: usize,
    pub current_seat: Option<usize>,
    pub highest_bet: u64,
    pub min_raise: u64,
    pub to_call: u64,
    pub big_blind: u64,
    /// Present only when it is this player's turn.
    pub legal: Option<LegalActions>,
}

impl PlayerView {
    pub fn my_seat(&self) -> &SeatView {
        &self.seats[self.seat]
    }

    pub fn num_players(&self) -> usize {
        self.seats.len()
    }

    /// Other seats still holding cards.
    pub fn live_opponents(&self) -> usize {
        self.seats
            .iter()
            .enumerate()
            .filter(|(i, s)| {
                *i != self.seat && matches!(s.status, PlayerStatus::Active | PlayerStatus::AllIn)
            })
            .count()
    }
}
