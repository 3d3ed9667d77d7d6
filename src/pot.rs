//! Pot ledger: splits hand contributions into tiers by all-in caps.
//!
//! The pot is never edited directly. It is derived from each player's
//! `total_contribution` and recomputed after every chip movement, so the
//! tier amounts always sum to exactly the chips wagered.

use crate::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One slice of the pot and the players who can win it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotTier {
    pub amount: u64,
    pub eligible: BTreeSet<PlayerId>,
}

/// One player's input to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub player: PlayerId,
    pub amount: u64,
    /// Folded players feed the pot but can never win it.
    pub folded: bool,
}

impl From<&Player> for Contribution {
    fn from(p: &Player) -> Self {
        Self { player: p.id(), amount: p.total_contribution(), folded: !p.is_live() }
    }
}

/// Main pot plus side pots, ordered from the lowest cap upward.
///
/// The highest tier is the main pot; every lower tier exists because an
/// all-in player capped out there and is a side pot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    tiers: Vec<PotTier>,
}

impl Pot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_players(players: &[Player]) -> Self {
        Self::from_contributions(players.iter().map(Contribution::from))
    }

    /// Partition contributions into tiers.
    ///
    /// For each distinct contribution level `T`, the tier collects
    /// `(T - previous) * count(contributed >= T)`. Adjacent tiers with the
    /// same eligible set are merged, so levels set only by folded players
    /// do not create extra pots. A tier nobody can win (every contributor
    /// folded) is folded into the tier below it.
    ///
    /// ```
    /// use holdem_engine::player::PlayerId;
    /// use holdem_engine::pot::{Contribution, Pot};
    ///
    /// let pot = Pot::from_contributions([
    ///     Contribution { player: PlayerId(1), amount: 50, folded: false },
    ///     Contribution { player: PlayerId(2), amount: 100, folded: false },
    ///     Contribution { player: PlayerId(3), amount: 100, folded: false },
    /// ]);
    /// assert_eq!(pot.main(), 100);
    /// assert_eq!(pot.side_pots()[0].amount, 150);
    /// assert_eq!(pot.total(), 250);
    /// ```
    pub fn from_contributions<I>(contributions: I) -> Self
    where
        I: IntoIterator<Item = Contribution>,
    {
        let contribs: Vec<Contribution> =
            contributions.into_iter().filter(|c| c.amount > 0).collect();
        let mut levels: Vec<u64> = contribs.iter().map(|c| c.amount).collect();
        levels.sort_unstable();
        levels.dedup();

        let mut tiers: Vec<PotTier> = Vec::new();
        let mut prev = 0u64;
        for lvl in levels {
            let contributors = contribs.iter().filter(|c| c.amount >= lvl);
            let count = contributors.clone().count() as u64;
            let eligible: BTreeSet<PlayerId> =
                contributors.filter(|c| !c.folded).map(|c| c.player).collect();
            let amount = (lvl - prev) * count;
            prev = lvl;

            match tiers.last_mut() {
                Some(last) if last.eligible == eligible || eligible.is_empty() => {
                    last.amount += amount;
                }
                _ => tiers.push(PotTier { amount, eligible }),
            }
        }
        // an unwinnable bottom tier (only possible if nobody live contributed
        // at that level) rolls up into the next winnable one
        if tiers.len() > 1 && tiers[0].eligible.is_empty() {
            let dead = tiers.remove(0);
            tiers[0].amount += dead.amount;
        }
        Self { tiers }
    }

    /// Every tier, lowest cap first; the last one is the main pot.
    pub fn tiers(&self) -> &[PotTier] {
        &self.tiers
    }

    pub fn main(&self) -> u64 {
        self.tiers.last().map_or(0, |t| t.amount)
    }

    pub fn side_pots(&self) -> &[PotTier] {
        match self.tiers.len() {
            0 => &[],
            n => &self.tiers[..n - 1],
        }
    }

    pub fn total(&self) -> u64 {
        self.tiers.iter().map(|t| t.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
