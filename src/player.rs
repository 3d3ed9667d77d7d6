use crate::hand::HoleCards;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a seat's occupant, independent of seat order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlayerStatus {
    /// Dealt in and still able to act.
    Active,
    Folded,
    /// Whole stack committed; no further decisions this hand.
    AllIn,
    /// Not dealt in (no chips at hand start).
    SittingOut,
}

/// One seat's record for the current hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) stack: u64,
    pub(crate) street_bet: u64,
    pub(crate) total_contribution: u64,
    pub(crate) hole: Option<HoleCards>,
    pub(crate) status: PlayerStatus,
    pub(crate) is_human: bool,
    /// Acted since the last full raise on this street.
    pub(crate) has_acted: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, stack: u64, is_human: bool) -> Self {
        Self {
            id,
            name: name.into(),
            stack,
            street_bet: 0,
            total_contribution: 0,
            hole: None,
            status: PlayerStatus::Active,
            is_human,
            has_acted: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stack(&self) -> u64 {
        self.stack
    }

    /// Chips put in on the current street.
    pub fn street_bet(&self) -> u64 {
        self.street_bet
    }

    /// Chips put in this hand, antes and blinds included.
    pub fn total_contribution(&self) -> u64 {
        self.total_contribution
    }

    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_human(&self) -> bool {
        self.is_human
    }

    pub fn has_acted(&self) -> bool {
        self.has_acted
    }

    pub fn is_folded(&self) -> bool {
        matches!(self.status, PlayerStatus::Folded)
    }

    pub fn is_all_in(&self) -> bool {
        matches!(self.status, PlayerStatus::AllIn)
    }

    /// Can still make decisions this hand.
    pub fn is_active(&self) -> bool {
        matches!(self.status, PlayerStatus::Active)
    }

    /// Still holding cards and eligible for the pot.
    pub fn is_live(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Move up to `amount` chips from the stack into the current street's bet.
    /// Returns what was actually paid; the player goes all-in when the stack runs out.
    pub(crate) fn commit(&mut self, amount: u64) -> u64 {
        let pay = self.stack.min(amount);
        self.stack -= pay;
        self.street_bet += pay;
        self.total_contribution += pay;
        if self.stack == 0 && pay > 0 {
            self.status = PlayerStatus::AllIn;
        }
        pay
    }

    /// Dead money (antes): counts toward the pot but not toward calling.
    pub(crate) fn commit_dead(&mut self, amount: u64) -> u64 {
        let pay = self.stack.min(amount);
        self.stack -= pay;
        self.total_contribution += pay;
        if self.stack == 0 && pay > 0 {
            self.status = PlayerStatus::AllIn;
        }
        pay
    }

    /// Clear per-hand fields; seats with no chips sit the hand out.
    pub(crate) fn reset_for_hand(&mut self) {
        self.street_bet = 0;
        self.total_contribution = 0;
        self.hole = None;
        self.has_acted = false;
        self.status = if self.stack == 0 { PlayerStatus::SittingOut } else { PlayerStatus::Active };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_caps_at_stack_and_marks_all_in() {
        let mut p = Player::new(PlayerId(1), "P1", 30, false);
        assert_eq!(p.commit(20), 20);
        assert!(p.is_active());
        assert_eq!(p.commit(50), 10);
        assert_eq!(p.stack(), 0);
        assert_eq!(p.street_bet(), 30);
        assert_eq!(p.total_contribution(), 30);
        assert!(p.is_all_in());
        assert!(p.is_live());
    }

    #[test]
    fn antes_do_not_count_as_street_bet() {
        let mut p = Player::new(PlayerId(1), "P1", 100, false);
        assert_eq!(p.commit_dead(5), 5);
        assert_eq!(p.street_bet(), 0);
        assert_eq!(p.total_contribution(), 5);
    }

    #[test]
    fn busted_players_sit_out() {
        let mut p = Player::new(PlayerId(2), "P2", 0, true);
        p.reset_for_hand();
        assert_eq!(p.status(), PlayerStatus::SittingOut);
        assert!(!p.is_live());
    }
}
