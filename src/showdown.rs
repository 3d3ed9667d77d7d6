//! Showdown and payout.
//!
//! Pot tiers are paid lowest cap first (side pots, then the main pot). A
//! tier with one eligible player is awarded without looking at cards;
//! otherwise the best [`HandRank`] among its eligible players wins, ties
//! split evenly and odd chips go one at a time to the tied winners in seat
//! order starting left of the dealer.

use crate::evaluator::{Category, HandEvaluator, HandRank};
use crate::flow::FlowError;
use crate::history::HistoryVerb;
use crate::player::PlayerId;
use crate::pot::Pot;
use crate::state::{GameState, Street};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How one pot tier was paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct PotAward {
    pub amount: u64,
    pub eligible: BTreeSet<PlayerId>,
    /// Winners in odd-chip order.
    pub winners: Vec<PlayerId>,
    /// Winning rank; `None` when the tier was uncontested.
    pub rank: Option<HandRank>,
}

/// Result of a finished hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct HandOutcome {
    pub awards: Vec<PotAward>,
    /// Net chips won or lost this hand, per dealt-in player in seat order.
    pub winnings: Vec<(PlayerId, i64)>,
    /// Whether cards were compared.
    pub showdown: bool,
    /// Hand categories of players whose cards were shown.
    pub reveals: Vec<(PlayerId, Category)>,
}

impl HandOutcome {
    pub fn total_awarded(&self) -> u64 {
        self.awards.iter().map(|a| a.amount).sum()
    }

    /// Everyone who won at least one tier, in first-award order.
    pub fn winners(&self) -> Vec<PlayerId> {
        let mut out: Vec<PlayerId> = Vec::new();
        for id in self.awards.iter().flat_map(|a| a.winners.iter()) {
            if !out.contains(id) {
                out.push(*id);
            }
        }
        out
    }

    pub fn net(&self, player: PlayerId) -> i64 {
        self.winnings.iter().find(|(id, _)| *id == player).map_or(0, |(_, v)| *v)
    }
}

/// Pay out the pot and finish the hand.
///
/// Expects betting to be over: either one player still holds cards, or the
/// board has been run out. Every live player is ranked once when any tier
/// is contested.
pub fn settle<E: HandEvaluator + ?Sized>(
    state: &GameState,
    evaluator: &E,
) -> Result<GameState, FlowError> {
    let mut s = state.clone();
    let pot = Pot::from_players(&s.players);
    let n = s.players.len();
    let start = (s.dealer_index + 1) % n.max(1);
    // seat order for odd chips: first seat left of the dealer comes first
    let seat_order = |seat: usize| (seat + n - start) % n;

    let contested = pot.tiers().iter().any(|t| t.eligible.len() > 1);
    let mut ranks: BTreeMap<PlayerId, HandRank> = BTreeMap::new();
    if contested {
        for p in s.players.iter().filter(|p| p.is_live()) {
            if let Some(hole) = p.hole {
                let rank = evaluator.rank(&s.board.with_hole(&hole))?;
                ranks.insert(p.id, rank);
            }
        }
    }

    let mut won: BTreeMap<PlayerId, u64> = BTreeMap::new();
    let mut awards = Vec::with_capacity(pot.tiers().len());
    for tier in pot.tiers() {
        let mut contenders: Vec<usize> = s
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| tier.eligible.contains(&p.id))
            .map(|(i, _)| i)
            .collect();
        if contenders.is_empty() {
            // only reachable when no live player put chips in at all
            contenders = s.players.iter().enumerate().filter(|(_, p)| p.is_live()).map(|(i, _)| i).collect();
        }
        let best = contenders.iter().filter_map(|&i| ranks.get(&s.players[i].id)).max().copied();
        let mut winners: Vec<usize> = match (contenders.len(), best) {
            (1, _) | (_, None) => contenders.clone(),
            (_, Some(b)) => contenders
                .iter()
                .copied()
                .filter(|&i| ranks.get(&s.players[i].id) == Some(&b))
                .collect(),
        };
        winners.sort_by_key(|&i| seat_order(i));
        if winners.is_empty() {
            continue;
        }

        let share = tier.amount / winners.len() as u64;
        let mut odd = tier.amount % winners.len() as u64;
        let verb = if winners.len() > 1 { HistoryVerb::Split } else { HistoryVerb::Win };
        for &i in &winners {
            let mut amount = share;
            if odd > 0 {
                amount += 1;
                odd -= 1;
            }
            let p = &mut s.players[i];
            p.stack += amount;
            *won.entry(p.id).or_default() += amount;
            let id = p.id;
            s.history.record(Some(id), verb, Some(amount), Street::Showdown);
        }
        awards.push(PotAward {
            amount: tier.amount,
            eligible: tier.eligible.clone(),
            winners: winners.iter().map(|&i| s.players[i].id).collect(),
            rank: if contenders.len() > 1 { best } else { None },
        });
    }

    let winnings = s
        .players
        .iter()
        .filter(|p| p.total_contribution > 0 || won.contains_key(&p.id))
        .map(|p| {
            let gained = won.get(&p.id).copied().unwrap_or(0);
            (p.id, gained as i64 - p.total_contribution as i64)
        })
        .collect();
    let reveals = ranks.iter().map(|(id, r)| (*id, r.category())).collect();

    for p in &mut s.players {
        p.street_bet = 0;
        p.total_contribution = 0;
    }
    s.pot = Pot::empty();
    s.highest_bet = 0;
    s.min_raise = s.stakes.big_blind;
    s.current_player_index = None;
    s.street = Street::Showdown;
    let outcome = HandOutcome { awards, winnings, showdown: contested, reveals };
    info!(
        "hand {} complete: {} chips to {:?}{}",
        s.hand_number,
        outcome.total_awarded(),
        outcome.winners(),
        if contested { " at showdown" } else { "" }
    );
    s.outcome = Some(outcome);
    Ok(s)
}
