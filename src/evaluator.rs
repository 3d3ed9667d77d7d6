//! Hand ranking for showdown.
//!
//! The betting engine only needs a totally ordered [`HandRank`] per player;
//! it reaches the ranking through the [`HandEvaluator`] trait so callers can
//! plug in a different algorithm. [`StandardEvaluator`] picks the best five
//! of up to seven cards by checking every five-card subset.

use crate::cards::{Card, Rank};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    const fn from_ordinal(v: u32) -> Category {
        match v {
            0 => Category::HighCard,
            1 => Category::Pair,
            2 => Category::TwoPair,
            3 => Category::ThreeOfAKind,
            4 => Category::Straight,
            5 => Category::Flush,
            6 => Category::FullHouse,
            7 => Category::FourOfAKind,
            _ => Category::StraightFlush,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

/// Comparable hand strength. Higher is better; equal values split the pot.
///
/// Layout: category in bits 20..24, then five 4-bit tiebreak ranks with the
/// most significant tiebreaker highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandRank(u32);

impl HandRank {
    const CAT_SHIFT: u32 = 20;

    fn from_parts(category: Category, tiebreaks: &[Rank]) -> Self {
        let mut v = u32::from(category.ordinal()) << Self::CAT_SHIFT;
        for (i, r) in tiebreaks.iter().take(5).enumerate() {
            v |= u32::from(r.value()) << (16 - 4 * i as u32);
        }
        HandRank(v)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn category(self) -> Category {
        Category::from_ordinal(self.0 >> Self::CAT_SHIFT)
    }
}

/// Detailed evaluation result. `rank` drives ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Evaluation {
    pub category: Category,
    /// The cards that make the hand, strongest first (five unless fewer were given).
    pub best: Vec<Card>,
    pub rank: HandRank,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("no cards to evaluate")]
    NoCards,
    #[error("at most 7 cards can be evaluated, got {0}")]
    TooManyCards(usize),
    #[error("duplicate card: {0}")]
    DuplicateCard(Card),
}

/// Ranks a player's cards (hole + board) for showdown comparison.
pub trait HandEvaluator {
    fn rank(&self, cards: &[Card]) -> Result<HandRank, EvalError>;
}

/// Exhaustive best-five-of-seven evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEvaluator;

impl HandEvaluator for StandardEvaluator {
    fn rank(&self, cards: &[Card]) -> Result<HandRank, EvalError> {
        evaluate(cards).map(|ev| ev.rank)
    }
}

/// Evaluate one to seven distinct cards.
///
/// ```
/// use holdem_engine::cards::parse_cards;
/// use holdem_engine::evaluator::{evaluate, Category};
///
/// let cards = parse_cards("As Ah Kc Qd Jh 3s 2c").unwrap();
/// let eval = evaluate(&cards).unwrap();
/// assert_eq!(eval.category, Category::Pair);
/// assert_eq!(eval.best.len(), 5);
/// ```
pub fn evaluate(cards: &[Card]) -> Result<Evaluation, EvalError> {
    if cards.is_empty() {
        return Err(EvalError::NoCards);
    }
    if cards.len() > 7 {
        return Err(EvalError::TooManyCards(cards.len()));
    }
    let mut seen = HashSet::with_capacity(cards.len());
    if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
        return Err(EvalError::DuplicateCard(*dup));
    }

    if cards.len() <= 5 {
        return Ok(score(cards));
    }
    let mut best: Option<Evaluation> = None;
    for_each_five(cards.len(), |idx| {
        let five: Vec<Card> = idx.iter().map(|&i| cards[i]).collect();
        let ev = score(&five);
        if best.as_ref().map_or(true, |b| ev.rank > b.rank) {
            best = Some(ev);
        }
    });
    best.ok_or(EvalError::NoCards)
}

fn for_each_five(n: usize, mut f: impl FnMut([usize; 5])) {
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        f([a, b, c, d, e]);
                    }
                }
            }
        }
    }
}

/// Score at most five cards directly.
fn score(cards: &[Card]) -> Evaluation {
    let mut counts = [0u8; 15];
    for c in cards {
        counts[usize::from(c.rank().value())] += 1;
    }
    // (count, rank) groups: bigger groups first, then higher rank
    let mut groups: Vec<(u8, Rank)> = Rank::ALL
        .iter()
        .rev()
        .filter(|r| counts[usize::from(r.value())] > 0)
        .map(|&r| (counts[usize::from(r.value())], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));
    let group_ranks: Vec<Rank> = groups.iter().map(|&(_, r)| r).collect();

    let five = cards.len() == 5;
    let flush = five && cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight_high = if five && groups.len() == 5 { straight_top(&group_ranks) } else { None };

    let (category, tiebreaks) = match (straight_high, flush, groups[0].0) {
        (Some(top), true, _) => (Category::StraightFlush, vec![top]),
        (_, _, 4) => (Category::FourOfAKind, group_ranks),
        (_, _, 3) if groups.get(1).is_some_and(|g| g.0 >= 2) => (Category::FullHouse, group_ranks),
        (_, true, _) => (Category::Flush, group_ranks),
        (Some(top), false, _) => (Category::Straight, vec![top]),
        (_, _, 3) => (Category::ThreeOfAKind, group_ranks),
        (_, _, 2) if groups.get(1).is_some_and(|g| g.0 == 2) => (Category::TwoPair, group_ranks),
        (_, _, 2) => (Category::Pair, group_ranks),
        _ => (Category::HighCard, group_ranks),
    };

    let mut best = cards.to_vec();
    // order by group size then rank so the deciding cards come first
    best.sort_by(|a, b| {
        let ka = (counts[usize::from(a.rank().value())], a.rank());
        let kb = (counts[usize::from(b.rank().value())], b.rank());
        kb.cmp(&ka).then(b.suit().cmp(&a.suit()))
    });
    if straight_high == Some(Rank::Five) {
        best.rotate_left(1);
    }
    Evaluation { category, best, rank: HandRank::from_parts(category, &tiebreaks) }
}

/// Highest card of a five-distinct-rank straight; `ranks` must be descending.
fn straight_top(ranks: &[Rank]) -> Option<Rank> {
    let hi = ranks[0].value();
    let lo = ranks[4].value();
    if hi - lo == 4 {
        return Some(ranks[0]);
    }
    let wheel = [Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two];
    (ranks == &wheel[..]).then_some(Rank::Five)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn eval(s: &str) -> Evaluation {
        evaluate(&parse_cards(s).unwrap()).unwrap()
    }

    #[test]
    fn detects_every_category() {
        assert_eq!(eval("As Ks Qs Js Ts 2c 3d").category, Category::StraightFlush);
        assert_eq!(eval("9c 9d 9h 9s Kd 2c 3d").category, Category::FourOfAKind);
        assert_eq!(eval("9c 9d 9h Ks Kd 2c 3d").category, Category::FullHouse);
        assert_eq!(eval("2h 7h 9h Jh Kh As 3d").category, Category::Flush);
        assert_eq!(eval("5c 6d 7h 8s 9d Ac Kd").category, Category::Straight);
        assert_eq!(eval("7c 7d 7h Ks 2d 4c 9d").category, Category::ThreeOfAKind);
        assert_eq!(eval("7c 7d Kh Ks 2d 4c 9d").category, Category::TwoPair);
        assert_eq!(eval("7c 7d Kh Qs 2d 4c 9d").category, Category::Pair);
        assert_eq!(eval("7c 3d Kh Qs 2d 4c 9d").category, Category::HighCard);
    }

    #[test]
    fn wheel_is_lowest_straight() {
        let wheel = eval("Ac 2d 3h 4s 5d");
        let six_high = eval("2d 3h 4s 5d 6c");
        assert_eq!(wheel.category, Category::Straight);
        assert!(six_high.rank > wheel.rank);
        assert_eq!(wheel.best[0].rank(), Rank::Five);
    }

    #[test]
    fn kickers_break_ties() {
        let ak = eval("Ac Ad Kh 7s 2d");
        let aq = eval("As Ah Qh 7c 2c");
        assert!(ak.rank > aq.rank);
        let same = eval("As Ah Kd 7c 2c");
        assert_eq!(ak.rank, same.rank);
    }

    #[test]
    fn two_pair_uses_best_kicker_from_seven() {
        let a = eval("Kc Kd 8h 8s Ad 2c 3d");
        let b = eval("Kh Ks 8c 8d Qd 2h 3c");
        assert!(a.rank > b.rank);
    }

    #[test]
    fn partial_hands_rank_without_straights_or_flushes() {
        assert_eq!(eval("As Ah").category, Category::Pair);
        assert_eq!(eval("2s 3s 4s 5s").category, Category::HighCard);
        assert_eq!(eval("Kd").category, Category::HighCard);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(evaluate(&[]), Err(EvalError::NoCards));
        let eight = parse_cards("2c 3c 4c 5c 6c 7c 8c 9c").unwrap();
        assert_eq!(evaluate(&eight), Err(EvalError::TooManyCards(8)));
        let dup = parse_cards("2c 2c 4d").unwrap();
        assert!(matches!(evaluate(&dup), Err(EvalError::DuplicateCard(_))));
    }

    #[test]
    fn rank_category_round_trips() {
        let ev = eval("9c 9d 9h Ks Kd 2c 3d");
        assert_eq!(ev.rank.category(), Category::FullHouse);
        assert_eq!(StandardEvaluator.rank(&parse_cards("9c 9d 9h Ks Kd").unwrap()), Ok(ev.rank));
    }
}
