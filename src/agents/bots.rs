use crate::betting::{Action, LegalActions};
use crate::cards::{Card, Rank};
use crate::evaluator::evaluate;
use crate::hand::HoleCards;
use crate::state::PlayerView;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::{AgentKind, PlayerAgent};

/// Difficulty tiers for bot play style and mistake rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] =
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Expert];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    /// Next tier, wrapping; used by menus.
    pub fn cycle(self) -> Difficulty {
        let i = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn cycle_back(self) -> Difficulty {
        let i = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// (noise amplitude, style bias)
    fn modifiers(self) -> (f64, f64) {
        match self {
            Difficulty::Easy => (0.28, -0.1),
            Difficulty::Medium => (0.14, 0.0),
            Difficulty::Hard => (0.08, 0.05),
            Difficulty::Expert => (0.04, 0.09),
        }
    }
}

/// Configuration for a bot's play style and randomness.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct BotProfile {
    pub difficulty: Difficulty,
    /// Higher folds more marginal hands.
    pub tightness: f64,
    /// Chance to bet or raise a strong hand instead of calling.
    pub aggression: f64,
    /// Chance to bet or raise a weak hand.
    pub bluff: f64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub rng_seed: Option<u64>,
}

impl BotProfile {
    /// Create a profile with tuned defaults for a difficulty tier.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (tightness, aggression, bluff) = match difficulty {
            Difficulty::Easy => (0.3, 0.18, 0.03),
            Difficulty::Medium => (0.5, 0.35, 0.05),
            Difficulty::Hard => (0.62, 0.48, 0.08),
            Difficulty::Expert => (0.72, 0.6, 0.12),
        };
        Self {
            difficulty,
            tightness,
            aggression,
            bluff,
            min_delay_ms: 0,
            max_delay_ms: 0,
            rng_seed: None,
        }
    }

    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Thinking time, picked uniformly per decision.
    pub fn with_delay_ms(mut self, min: u64, max: u64) -> Self {
        self.min_delay_ms = min;
        self.max_delay_ms = max.max(min);
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Medium)
    }
}

/// Heuristic bot: hand strength, pot odds, position and its profile.
/// Every decision is taken from the legal set it is shown.
pub struct BotAgent {
    profile: BotProfile,
    rng: StdRng,
    next_action_at: Option<Instant>,
}

impl std::fmt::Debug for BotAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotAgent").field("profile", &self.profile).finish_non_exhaustive()
    }
}

impl BotAgent {
    pub fn new(profile: BotProfile) -> Self {
        let rng = match profile.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { profile, rng, next_action_at: None }
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    fn thinking_delay(&mut self) -> Duration {
        let (min, max) = (self.profile.min_delay_ms, self.profile.max_delay_ms);
        let ms = if max > min { self.rng.random_range(min..=max) } else { min };
        Duration::from_millis(ms)
    }

    /// Pick an action for the player on turn.
    pub fn decide(&mut self, view: &PlayerView, legal: &LegalActions) -> Action {
        let Some(hole) = view.hole else {
            return legal.passive();
        };
        let position = Position::of(view);
        let strength = hand_strength(&hole, &view.board, position, view.live_opponents());
        let (noise_amp, bias) = self.profile.difficulty.modifiers();
        let noise = self.rng.random_range(-1.0..=1.0) * noise_amp;
        let s = (strength + noise).clamp(0.0, 1.0);

        let pot_odds = if view.to_call == 0 {
            0.0
        } else {
            view.to_call as f64 / (view.pot_total + view.to_call) as f64
        };
        let tightness = (self.profile.tightness + bias - position.looseness()).clamp(0.05, 0.95);
        let aggression = (self.profile.aggression + bias + position.looseness()).clamp(0.05, 0.95);
        let fold_below = (0.2 + tightness * 0.3 + pot_odds * 0.3).clamp(0.1, 0.9);
        let raise_above = (0.7 - aggression * 0.25).clamp(0.15, 0.9);

        let aggressive = s > raise_above && self.rng.random::<f64>() < aggression;
        let bluffing = s < fold_below && self.rng.random::<f64>() < self.profile.bluff;

        if view.to_call > 0 {
            if s < fold_below && !bluffing {
                return Action::Fold;
            }
            if aggressive {
                return raise_action(view, legal, s, aggression);
            }
            return legal.passive();
        }
        if aggressive || bluffing {
            return raise_action(view, legal, s, aggression);
        }
        legal.passive()
    }
}

impl PlayerAgent for BotAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }

    fn on_turn(&mut self, view: &PlayerView) -> Option<Action> {
        let legal = view.legal?;
        let now = Instant::now();
        match self.next_action_at {
            None => {
                let delay = self.thinking_delay();
                if delay > Duration::ZERO {
                    self.next_action_at = Some(now + delay);
                    return None;
                }
            }
            Some(at) if now < at => return None,
            Some(_) => {}
        }
        self.next_action_at = None;
        Some(self.decide(view, &legal))
    }

    fn rejected(&mut self) {
        self.next_action_at = None;
    }
}

/// Size a bet or raise from pot size and strength, then fit it to the
/// legal bounds. Falls back to the passive action when raising is closed.
fn raise_action(view: &PlayerView, legal: &LegalActions, strength: f64, aggression: f64) -> Action {
    let Some(bounds) = legal.raise else {
        return legal.passive();
    };
    let factor = match strength {
        s if s > 0.85 => 1.0,
        s if s > 0.65 => 0.7,
        _ => 0.5,
    } * (0.8 + aggression * 0.4);
    let pot = view.pot_total.max(view.big_blind);
    let size = ((pot as f64) * factor).round() as u64;
    let target = view.highest_bet + size.max(view.min_raise);
    let target = target.clamp(bounds.min_to, bounds.max_to);
    if target == bounds.max_to && legal.all_in.is_some() {
        Action::AllIn
    } else {
        Action::Raise(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    HeadsUp,
    Blind,
    Early,
    Late,
}

impl Position {
    fn of(view: &PlayerView) -> Position {
        let n = view.num_players();
        if n <= 2 {
            return Position::HeadsUp;
        }
        let dist = (view.seat + n - view.dealer_index) % n;
        match dist {
            0 => Position::Late,
            1 | 2 => Position::Blind,
            d if d * 2 <= n => Position::Early,
            _ => Position::Late,
        }
    }

    fn looseness(self) -> f64 {
        match self {
            Position::Late => 0.08,
            Position::HeadsUp => 0.05,
            Position::Blind => 0.0,
            Position::Early => -0.08,
        }
    }
}

/// Rough 0..1 strength of a holding against `opponents` live hands.
fn hand_strength(hole: &HoleCards, board: &[Card], position: Position, opponents: usize) -> f64 {
    let multiway = 0.03 * opponents.saturating_sub(1) as f64;
    if board.len() < 3 {
        let base = chen_score(hole) / 20.0;
        return (base + position.looseness() * 0.5 - multiway).clamp(0.0, 1.0);
    }
    let mut cards = hole.as_array().to_vec();
    cards.extend_from_slice(board);
    let Ok(mine) = evaluate(&cards) else {
        return 0.0;
    };
    let category = f64::from(mine.category.ordinal()) / 8.0;
    let kicker = mine.best.first().map_or(0.0, |c| f64::from(c.rank().value()) / 14.0);
    let mut strength = 0.2 + category * 0.7 + kicker * 0.1;
    // made hand that lives entirely on the board is shared by everyone
    if let Ok(shared) = evaluate(board) {
        if board.len() == 5 && shared.rank == mine.rank {
            strength -= 0.25;
        } else if shared.category == mine.category {
            strength -= 0.1;
        }
    }
    if board.len() < 5 {
        strength += draw_bonus(&cards);
    }
    (strength - multiway).clamp(0.0, 1.0)
}

/// Chen formula for two hole cards; 20 for aces, slightly below zero for
/// the worst offsuit hands.
fn chen_score(hole: &HoleCards) -> f64 {
    let (a, b) = (hole.first().rank(), hole.second().rank());
    let (high, low) = if a >= b { (a, b) } else { (b, a) };
    let points = |r: Rank| match r {
        Rank::Ace => 10.0,
        Rank::King => 8.0,
        Rank::Queen => 7.0,
        Rank::Jack => 6.0,
        r => f64::from(r.value()) / 2.0,
    };
    if hole.is_pair() {
        return (points(high) * 2.0).max(5.0);
    }
    let mut score = points(high);
    if hole.is_suited() {
        score += 2.0;
    }
    let gap = high.value() - low.value() - 1;
    score -= match gap {
        0 => 0.0,
        1 => 1.0,
        2 => 2.0,
        3 => 4.0,
        _ => 5.0,
    };
    if gap <= 1 && high < Rank::Queen {
        score += 1.0;
    }
    score.ceil()
}

/// Flush and open-ended straight draws.
fn draw_bonus(cards: &[Card]) -> f64 {
    let mut bonus = 0.0;
    let mut suits = [0u8; 4];
    for c in cards {
        suits[c.suit() as usize] += 1;
    }
    if suits.contains(&4) {
        bonus += 0.08;
    }
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank().value()).collect();
    if values.contains(&14) {
        values.push(1);
    }
    values.sort_unstable();
    values.dedup();
    if values.windows(4).any(|w| w[3] - w[0] == 3) {
        bonus += 0.06;
    }
    bonus
}
