use holdem_engine::betting::Action;
use holdem_engine::cards::{parse_cards, Card};
use holdem_engine::config::Stakes;
use holdem_engine::deck::Deck;
use holdem_engine::evaluator::{Category, EvalError, HandEvaluator, HandRank, StandardEvaluator};
use holdem_engine::flow::{act, start_hand};
use holdem_engine::history::HistoryVerb;
use holdem_engine::player::{Player, PlayerId};
use holdem_engine::state::{GameState, RoundStatus, Street};
use holdem_engine::table::Table;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn players(stacks: &[u64]) -> Vec<Player> {
    stacks
        .iter()
        .enumerate()
        .map(|(i, &s)| Player::new(PlayerId(i as u32), format!("P{i}"), s, false))
        .collect()
}

fn play(state: &GameState, seat: u32, action: Action) -> GameState {
    act(state, PlayerId(seat), action, &StandardEvaluator).expect("legal action")
}

fn stacks(state: &GameState) -> Vec<u64> {
    state.players().iter().map(|p| p.stack()).collect()
}

#[test]
fn heads_up_small_blind_folds() {
    let mut table = Table::with_players(players(&[1000, 1000]), Stakes::new(25, 50), Some(7));
    let s = table.new_hand().unwrap();
    assert_eq!(s.pot().total(), 75);
    assert_eq!(s.status(), RoundStatus::AwaitingAction(PlayerId(0)));

    let s = table.act(PlayerId(0), Action::Fold).unwrap();
    assert_eq!(s.status(), RoundStatus::HandComplete);
    assert_eq!(stacks(s), [975, 1025]);
    let outcome = s.outcome().expect("hand finished");
    assert!(!outcome.showdown);
    assert_eq!(outcome.winners(), [PlayerId(1)]);
    assert_eq!(outcome.net(PlayerId(0)), -25);
    assert_eq!(outcome.net(PlayerId(1)), 25);
    assert!(outcome.reveals.is_empty());
}

#[test]
fn board_plays_and_the_odd_chip_goes_left_of_the_button() {
    // royal flush on board; every hole card is irrelevant
    let deck = Deck::with_top(
        &parse_cards("2c 3c 4c 2d 3d 4d 5h As Ks Qs 6h Js 7h Ts").expect("valid cards"),
    );
    let s = start_hand(players(&[1000, 1000, 1000]), 0, Stakes::new(5, 10), deck, 1, &StandardEvaluator)
        .expect("hand starts");
    let s = play(&s, 0, Action::Call);
    let s = play(&s, 1, Action::Fold);
    let mut s = play(&s, 2, Action::Check);
    assert_eq!(s.street(), Street::Flop);
    // the small blind's folded cards plus one burn
    assert_eq!(s.discards().len(), 3);
    assert!(s.players()[1].hole().is_none());

    while !s.is_complete() {
        let seat = s.current_player().expect("someone on turn").id().0;
        s = play(&s, seat, Action::Check);
    }
    assert_eq!(s.discards().len(), 5, "burns before turn and river");
    let outcome = s.outcome().expect("hand finished");
    assert!(outcome.showdown);
    assert_eq!(outcome.awards.len(), 1);
    assert_eq!(outcome.awards[0].amount, 25);
    assert_eq!(outcome.awards[0].winners, [PlayerId(2), PlayerId(0)]);
    assert_eq!(stacks(&s), [1002, 995, 1003]);
    assert!(outcome.reveals.iter().all(|(_, c)| *c == Category::StraightFlush));
    let splits = s.history().entries().iter().filter(|e| e.verb == HistoryVerb::Split).count();
    assert_eq!(splits, 2);
}

#[test]
fn antes_are_dead_and_do_not_set_the_bet() {
    let stakes = Stakes::new(5, 10).with_ante(2);
    let s = start_hand(players(&[1000, 1000, 1000]), 0, stakes, Deck::standard(), 1, &StandardEvaluator)
        .expect("hand starts");
    assert_eq!(s.pot().total(), 21);
    assert_eq!(s.highest_bet(), 10);
    let legal = s.legal_actions().expect("button on turn");
    assert_eq!(legal.call, Some(10));

    let s = play(&s, 0, Action::Fold);
    let s = play(&s, 1, Action::Fold);
    assert!(s.is_complete());
    assert_eq!(stacks(&s), [998, 993, 1009]);
    assert_eq!(s.outcome().map(|o| o.net(PlayerId(2))), Some(9), "ante and blind in, 21 back");
}

#[test]
fn short_big_blind_posts_what_it_has() {
    let s = start_hand(players(&[1000, 1000, 4]), 0, Stakes::new(5, 10), Deck::standard(), 1, &StandardEvaluator)
        .expect("hand starts");
    assert!(s.players()[2].is_all_in());
    assert_eq!(s.players()[2].street_bet(), 4);
    assert_eq!(s.highest_bet(), 5);
    assert_eq!(s.min_raise(), 10);
    let legal = s.legal_actions().expect("button on turn");
    assert_eq!(legal.player, PlayerId(0));
    assert_eq!(legal.call, Some(5));
    assert_eq!(legal.raise.map(|b| b.min_to), Some(15));
}

#[test]
fn table_carries_stacks_between_hands() {
    let mut table = Table::with_players(players(&[1000, 1000, 1000]), Stakes::new(5, 10), Some(11));
    table.new_hand().unwrap();
    table.act(PlayerId(0), Action::Fold).unwrap();
    table.act(PlayerId(1), Action::Fold).unwrap();
    assert_eq!(table.players().iter().map(|p| p.stack()).collect::<Vec<_>>(), [1000, 995, 1005]);

    let s = table.new_hand().unwrap();
    assert_eq!(s.hand_number(), 2);
    assert_eq!(s.dealer_index(), 1);
    assert_eq!(s.total_chips(), 3000);
    assert_eq!(table.hands_played(), 2);
}

#[test]
fn player_view_hides_other_hole_cards() {
    let s = start_hand(players(&[1000, 1000, 1000]), 0, Stakes::new(5, 10), Deck::standard(), 1, &StandardEvaluator)
        .expect("hand starts");
    let view = s.view_for(PlayerId(1)).expect("seated player");
    assert_eq!(view.seat, 1);
    assert_eq!(view.my_seat().street_bet, 5);
    assert!(view.hole.is_some());
    assert!(view.seats[0].hole.is_none());
    assert!(view.seats[2].hole.is_none());
    assert_eq!(view.pot_total, 15);
    assert_eq!(view.to_call, 5);
    assert!(view.legal.is_none(), "seat 1 is not on turn");
    assert!(s.view_for(PlayerId(7)).is_none());
}

/// Counts calls and defers to the standard ranking.
struct Counting(Arc<AtomicUsize>);

impl HandEvaluator for Counting {
    fn rank(&self, cards: &[Card]) -> Result<HandRank, EvalError> {
        self.0.fetch_add(1, Ordering::Relaxed);
        StandardEvaluator.rank(cards)
    }
}

#[test]
fn tables_accept_a_custom_evaluator() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut table = Table::with_players(players(&[1000, 1000]), Stakes::new(5, 10), Some(21))
        .with_evaluator(Box::new(Counting(Arc::clone(&calls))));
    table.new_hand().unwrap();
    table.act(PlayerId(0), Action::AllIn).unwrap();
    let s = table.act(PlayerId(1), Action::Call).unwrap();
    assert!(s.is_complete());
    assert_eq!(calls.load(Ordering::Relaxed), 2, "each live hand is ranked once");
}
