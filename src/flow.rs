//! Hand and street flow.
//!
//! [`start_hand`] posts antes and blinds and deals hole cards;
//! [`progress`] moves a hand whose betting round is over to the next
//! street (burn, deal, reset street bets), runs the board out when no
//! further decisions are possible, and settles at showdown. [`act`] is
//! the usual entry point: one action followed by `progress`.

use crate::betting::{self, Action, ActionError};
use crate::config::Stakes;
use crate::deck::Deck;
use crate::evaluator::{EvalError, HandEvaluator};
use crate::hand::{Board, HandError, HoleCards};
use crate::history::{HandHistory, HistoryVerb};
use crate::player::{Player, PlayerId, PlayerStatus};
use crate::pot::Pot;
use crate::sequencer;
use crate::showdown;
use crate::state::{GameState, Street};
use log::{debug, info};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlowError {
    #[error("deck ran out of cards")]
    DeckExhausted,
    #[error("hand evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandSetupError {
    #[error("need at least two players with chips, have {0}")]
    NotEnoughPlayers(usize),
    #[error("invalid stakes: {0}")]
    Stakes(#[from] crate::config::ConfigError),
    #[error("bad hole cards: {0}")]
    Hand(#[from] HandError),
    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Start a hand: seat players, post antes and blinds, deal hole cards.
///
/// `dealer` is moved forward to the first funded seat if it points at a
/// busted one. Players with no chips sit the hand out. With two players the
/// dealer posts the small blind and acts first pre-flop.
pub fn start_hand<E: HandEvaluator + ?Sized>(
    players: Vec<Player>,
    dealer: usize,
    stakes: Stakes,
    deck: Deck,
    hand_number: u64,
    evaluator: &E,
) -> Result<GameState, HandSetupError> {
    stakes.validate()?;
    let mut players = players;
    for p in &mut players {
        p.reset_for_hand();
    }
    let funded = players.iter().filter(|p| p.is_active()).count();
    if funded < 2 {
        return Err(HandSetupError::NotEnoughPlayers(funded));
    }
    let n = players.len();
    let total_chips = players.iter().map(|p| p.stack).sum();
    let dealer = (0..n).map(|k| (dealer + k) % n).find(|&i| players[i].is_active()).unwrap_or(0);

    let mut state = GameState {
        players,
        deck,
        board: Board::new(),
        discards: Vec::new(),
        pot: Pot::empty(),
        current_player_index: None,
        dealer_index: dealer,
        small_blind_index: None,
        big_blind_index: None,
        street: Street::Preflop,
        highest_bet: 0,
        min_raise: stakes.big_blind,
        stakes,
        total_chips,
        hand_number,
        history: HandHistory::default(),
        outcome: None,
    };

    let dealt_in = |s: &GameState, from: usize| {
        (1..=n).map(|k| (from + k) % n).find(|&i| s.players[i].is_active())
    };
    let (sb, bb) = if funded == 2 {
        (dealer, dealt_in(&state, dealer).unwrap_or(dealer))
    } else {
        let sb = dealt_in(&state, dealer).unwrap_or(dealer);
        (sb, dealt_in(&state, sb).unwrap_or(sb))
    };
    state.small_blind_index = Some(sb);
    state.big_blind_index = Some(bb);

    if stakes.ante > 0 {
        for k in 1..=n {
            let i = (dealer + k) % n;
            if state.players[i].is_active() {
                let paid = state.players[i].commit_dead(stakes.ante);
                let id = state.players[i].id;
                state.history.record(Some(id), HistoryVerb::Ante, Some(paid), Street::Preflop);
            }
        }
    }
    for (seat, amount, verb) in
        [(sb, stakes.small_blind, HistoryVerb::SmallBlind), (bb, stakes.big_blind, HistoryVerb::BigBlind)]
    {
        let paid = state.players[seat].commit(amount);
        let id = state.players[seat].id;
        state.history.record(Some(id), verb, Some(paid), Street::Preflop);
    }
    state.highest_bet = state.players.iter().map(|p| p.street_bet).max().unwrap_or(0);

    deal_hole_cards(&mut state)?;
    state.pot = Pot::from_players(&state.players);
    state.current_player_index = if sequencer::is_round_complete(&state) {
        None
    } else {
        sequencer::next_pending(&state, bb)
    };
    info!(
        "hand {} starts: {} players, dealer seat {}, blinds {}/{} ante {}",
        hand_number, funded, dealer, stakes.small_blind, stakes.big_blind, stakes.ante
    );
    Ok(progress(&state, evaluator)?)
}

/// Two passes round the table, starting left of the dealer.
fn deal_hole_cards(state: &mut GameState) -> Result<(), HandSetupError> {
    let n = state.players.len();
    let order: Vec<usize> = (1..=n)
        .map(|k| (state.dealer_index + k) % n)
        .filter(|&i| !matches!(state.players[i].status, PlayerStatus::SittingOut))
        .collect();
    let mut first = vec![None; n];
    for pass in 0..2 {
        for &i in &order {
            let card = state.deck.draw().ok_or(FlowError::DeckExhausted)?;
            if pass == 0 {
                first[i] = Some(card);
            } else if let Some(a) = first[i] {
                state.players[i].hole = Some(HoleCards::try_new(a, card)?);
            }
        }
    }
    Ok(())
}

/// Advance a hand whose betting round is finished.
///
/// Returns the state unchanged while a player still owes a decision.
/// Otherwise deals streets until someone can act again, or runs the board
/// out and settles when at most one player has chips to bet with.
pub fn progress<E: HandEvaluator + ?Sized>(
    state: &GameState,
    evaluator: &E,
) -> Result<GameState, FlowError> {
    let mut s = state.clone();
    loop {
        if s.is_complete() {
            return Ok(s);
        }
        if s.live_count() <= 1 {
            return showdown::settle(&s, evaluator);
        }
        if !sequencer::is_round_complete(&s) {
            if s.current_player_index.is_none() {
                s.current_player_index = sequencer::next_pending(&s, s.dealer_index);
            }
            return Ok(s);
        }
        if matches!(s.street, Street::River | Street::Showdown) {
            return showdown::settle(&s, evaluator);
        }
        advance_street(&mut s)?;
    }
}

/// Burn one card, then deal the street's community cards.
fn deal_board(s: &mut GameState, street: Street) -> Result<(), FlowError> {
    let burn = s.deck.draw().ok_or(FlowError::DeckExhausted)?;
    s.discards.push(burn);
    let cards = s.deck.draw_n(street.cards_dealt()).ok_or(FlowError::DeckExhausted)?;
    s.board.extend(cards);
    Ok(())
}

/// Apply one action for `player`, then progress the hand.
pub fn act<E: HandEvaluator + ?Sized>(
    state: &GameState,
    player: PlayerId,
    action: Action,
    evaluator: &E,
) -> Result<GameState, ActionError> {
    let next = betting::apply_action(state, player, action)?;
    Ok(progress(&next, evaluator)?)
}

fn advance_street(s: &mut GameState) -> Result<(), FlowError> {
    let street = s.street.next();
    deal_board(s, street)?;
    s.street = street;
    for p in &mut s.players {
        p.street_bet = 0;
        p.has_acted = false;
    }
    s.highest_bet = 0;
    s.min_raise = s.stakes.big_blind;
    s.history.record(None, HistoryVerb::Deal, None, street);
    s.current_player_index = if sequencer::is_round_complete(s) {
        None
    } else {
        sequencer::next_pending(s, s.dealer_index)
    };
    debug!("hand {} {}: board {:?}", s.hand_number, street.label(), s.board.as_slice());
    Ok(())
}
