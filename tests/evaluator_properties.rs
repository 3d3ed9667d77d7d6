use holdem_engine::cards::{Card, Rank, Suit};
use holdem_engine::deck::Deck;
use holdem_engine::evaluator::{evaluate, Category, HandEvaluator, StandardEvaluator};
use proptest::prelude::*;
use std::cmp::Ordering;

/// Distinct cards in random order.
fn shuffled_deck() -> impl Strategy<Value = Vec<Card>> {
    Just(Deck::standard().as_slice().to_vec()).prop_shuffle()
}

fn rank_from_val(v: u8) -> Rank {
    Rank::from_value(v).unwrap_or(Rank::Two)
}

fn straight_cards(top: u8) -> Vec<Card> {
    let values: Vec<u8> = if top == 5 { vec![14, 2, 3, 4, 5] } else { (top - 4..=top).collect() };
    let suits = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades, Suit::Clubs];
    values.into_iter().zip(suits).map(|(v, s)| Card::new(rank_from_val(v), s)).collect()
}

fn flush_rank_set() -> impl Strategy<Value = Vec<Rank>> {
    prop::collection::btree_set(2u8..=14u8, 5)
        .prop_filter("non-straight ranks", |set| {
            let vals: Vec<u8> = set.iter().copied().collect();
            let is_wheel = vals == vec![2, 3, 4, 5, 14];
            let is_straight = vals.windows(2).all(|w| w[1] == w[0] + 1);
            !(is_straight || is_wheel)
        })
        .prop_map(|set| set.into_iter().rev().map(rank_from_val).collect())
}

proptest! {
    #[test]
    fn seven_card_best_is_at_least_as_good_as_any_five(deck in shuffled_deck()) {
        let cards = &deck[..7];
        let best7 = evaluate(cards).unwrap();
        prop_assert_eq!(best7.best.len(), 5);
        for skip_a in 0..7 {
            for skip_b in skip_a + 1..7 {
                let five: Vec<Card> = cards
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip_a && *i != skip_b)
                    .map(|(_, c)| *c)
                    .collect();
                prop_assert!(best7.rank >= evaluate(&five).unwrap().rank);
            }
        }
    }

    #[test]
    fn rank_is_independent_of_card_order(deck in shuffled_deck()) {
        let mut cards = deck[..7].to_vec();
        let forward = StandardEvaluator.rank(&cards).unwrap();
        cards.reverse();
        prop_assert_eq!(StandardEvaluator.rank(&cards).unwrap(), forward);
    }

    #[test]
    fn category_matches_rank(deck in shuffled_deck(), n in 5usize..=7) {
        let ev = evaluate(&deck[..n]).unwrap();
        prop_assert_eq!(ev.rank.category(), ev.category);
    }

    #[test]
    fn straight_ordering_respects_top_card(top_hi in 6u8..=14u8, top_lo in 5u8..=13u8) {
        prop_assume!(top_hi > top_lo);
        let e_hi = evaluate(&straight_cards(top_hi)).unwrap();
        let e_lo = evaluate(&straight_cards(top_lo)).unwrap();
        prop_assert_eq!(e_hi.category, Category::Straight);
        prop_assert_eq!(e_lo.category, Category::Straight);
        prop_assert!(e_hi.rank > e_lo.rank);
    }

    #[test]
    fn flush_kicker_ordering(a in flush_rank_set(), b in flush_rank_set()) {
        let hand = |ranks: &[Rank]| -> Vec<Card> {
            ranks.iter().map(|r| Card::new(*r, Suit::Hearts)).collect()
        };
        let e_a = evaluate(&hand(&a)).unwrap();
        let e_b = evaluate(&hand(&b)).unwrap();
        prop_assert_eq!(e_a.category, Category::Flush);
        prop_assert_eq!(e_b.category, Category::Flush);
        match a.cmp(&b) {
            Ordering::Greater => prop_assert!(e_a.rank > e_b.rank),
            Ordering::Less => prop_assert!(e_a.rank < e_b.rank),
            Ordering::Equal => prop_assert_eq!(e_a.rank, e_b.rank),
        }
    }
}
