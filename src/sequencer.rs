//! Turn order: who acts next and when a betting round is over.
//!
//! Seats are scanned clockwise (increasing index, wrapping). Only
//! [`PlayerStatus::Active`](crate::player::PlayerStatus) players are ever
//! returned; folded, all-in and sitting-out seats are skipped.

use crate::player::Player;
use crate::state::GameState;

/// Iterate seat indices clockwise, starting just after `from`.
fn clockwise_from(from: usize, n: usize) -> impl Iterator<Item = usize> {
    (1..=n).map(move |k| (from + k) % n)
}

/// First active seat clockwise after the current one.
///
/// Returns `None` once the hand is complete or when fewer than two players
/// can still act. Starts after the dealer when nobody is on turn.
pub fn next_to_act(state: &GameState) -> Option<usize> {
    if state.is_complete() || state.active_count() < 2 {
        return None;
    }
    let from = state.current_player_index.unwrap_or(state.dealer_index);
    first_after(&state.players, from, Player::is_active)
}

/// First active seat clockwise after `from` who still owes a decision:
/// has not acted since the last full raise, or has not matched the bet.
pub(crate) fn next_pending(state: &GameState, from: usize) -> Option<usize> {
    let highest = state.highest_bet;
    first_after(&state.players, from, |p| is_pending(p, highest))
}

fn is_pending(p: &Player, highest: u64) -> bool {
    p.is_active() && (!p.has_acted || p.street_bet < highest)
}

fn first_after(players: &[Player], from: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
    let n = players.len();
    if n == 0 {
        return None;
    }
    clockwise_from(from % n, n).find(|&i| pred(&players[i]))
}

/// Whether the current betting round needs no further decisions.
///
/// True when at most one player still holds cards, when nobody can act,
/// when a lone active player already covers the bet (everyone else is
/// all-in), or when every active player has acted since the last full
/// raise and matched the highest bet.
pub fn is_round_complete(state: &GameState) -> bool {
    if state.live_count() <= 1 {
        return true;
    }
    let highest = state.highest_bet;
    let mut active = state.players.iter().filter(|p| p.is_active()).peekable();
    let Some(first) = active.peek().copied() else {
        return true;
    };
    if state.active_count() == 1 {
        return first.street_bet >= highest;
    }
    active.all(|p| !is_pending(p, highest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Stakes;
    use crate::deck::Deck;
    use crate::evaluator::StandardEvaluator;
    use crate::flow::start_hand;
    use crate::player::{PlayerId, PlayerStatus};

    fn table(n: u32) -> GameState {
        let players =
            (0..n).map(|i| Player::new(PlayerId(i), format!("P{i}"), 1000, false)).collect();
        start_hand(players, 0, Stakes::new(5, 10), Deck::standard(), 1, &StandardEvaluator)
            .unwrap()
    }

    #[test]
    fn next_to_act_skips_folded_and_all_in() {
        let mut s = table(5);
        s.current_player_index = Some(0);
        s.players[1].status = PlayerStatus::Folded;
        s.players[1].hole = None;
        s.players[2].status = PlayerStatus::AllIn;
        assert_eq!(next_to_act(&s), Some(3));
        s.current_player_index = Some(4);
        assert_eq!(next_to_act(&s), Some(0));
    }

    #[test]
    fn next_to_act_is_none_after_a_check_down() {
        let mut s = table(3);
        let evaluator = StandardEvaluator;
        while !s.is_complete() {
            let legal = s.legal_actions().unwrap();
            s = crate::flow::act(&s, legal.player, legal.passive(), &evaluator).unwrap();
        }
        assert_eq!(s.street, crate::state::Street::Showdown);
        assert!(s.players.iter().filter(|p| p.is_active()).count() >= 2);
        assert_eq!(next_to_act(&s), None);
    }

    #[test]
    fn next_to_act_is_none_with_one_actor_left() {
        let mut s = table(3);
        s.players[0].status = PlayerStatus::Folded;
        s.players[1].status = PlayerStatus::AllIn;
        assert_eq!(next_to_act(&s), None);
    }

    #[test]
    fn big_blind_keeps_option_after_limps() {
        let mut s = table(3);
        // dealer 0, sb 1, bb 2: everyone limps to 10
        for p in &mut s.players {
            p.street_bet = 10;
        }
        s.players[0].has_acted = true;
        s.players[1].has_acted = true;
        assert!(!is_round_complete(&s));
        assert_eq!(next_pending(&s, 1), Some(2));
        s.players[2].has_acted = true;
        assert!(is_round_complete(&s));
        assert_eq!(next_pending(&s, 2), None);
    }

    #[test]
    fn lone_active_player_facing_all_in_must_still_decide() {
        let mut s = table(2);
        s.players[0].status = PlayerStatus::AllIn;
        s.players[0].street_bet = 300;
        s.highest_bet = 300;
        s.players[1].street_bet = 10;
        assert!(!is_round_complete(&s));
        s.players[1].street_bet = 300;
        assert!(is_round_complete(&s));
    }
}
