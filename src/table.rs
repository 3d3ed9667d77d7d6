//! A multi-hand session: the seats and stacks that survive between hands,
//! the dealer button, and the shuffling RNG.

use crate::betting::{Action, ActionError};
use crate::config::{ConfigError, Stakes, TableConfig};
use crate::deck::Deck;
use crate::evaluator::{HandEvaluator, StandardEvaluator};
use crate::flow::{self, HandSetupError};
use crate::player::{Player, PlayerId};
use crate::state::{GameState, PlayerView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableError {
    #[error("no hand in progress")]
    NoHandInProgress,
    #[error("the current hand is not finished")]
    HandInProgress,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Setup(#[from] HandSetupError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

pub struct Table {
    seats: Vec<Player>,
    stakes: Stakes,
    dealer: usize,
    rng: ChaCha8Rng,
    evaluator: Box<dyn HandEvaluator + Send>,
    hand: Option<GameState>,
    hands_played: u64,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("seats", &self.seats.len())
            .field("stakes", &self.stakes)
            .field("dealer", &self.dealer)
            .field("hands_played", &self.hands_played)
            .finish()
    }
}

impl Table {
    /// Seat `num_players` players from a validated config. The human seat,
    /// if any, is named "You"; the rest are bots.
    pub fn new(config: &TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let players = (0..config.num_players)
            .map(|i| {
                let human = config.human_seat == Some(i);
                let name = if human { "You".to_string() } else { format!("Bot {}", i + 1) };
                Player::new(PlayerId(i as u32), name, config.starting_stack, human)
            })
            .collect();
        Ok(Self::with_players(players, config.stakes(), config.seed))
    }

    /// Seat the given players. A `seed` makes every shuffle reproducible.
    pub fn with_players(players: Vec<Player>, stakes: Stakes, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            seats: players,
            stakes,
            dealer: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            evaluator: Box::new(StandardEvaluator),
            hand: None,
            hands_played: 0,
        }
    }

    /// Replace the showdown evaluator.
    pub fn with_evaluator(mut self, evaluator: Box<dyn HandEvaluator + Send>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Deal the next hand. The button moves to the next seat with chips.
    pub fn new_hand(&mut self) -> Result<&GameState, TableError> {
        if let Some(prev) = &self.hand {
            if !prev.is_complete() {
                return Err(TableError::HandInProgress);
            }
            self.seats = prev.players.clone();
            self.dealer = self.next_funded_seat(self.dealer);
        }
        let deck = Deck::shuffled(&mut self.rng);
        let state = flow::start_hand(
            self.seats.clone(),
            self.dealer,
            self.stakes,
            deck,
            self.hands_played + 1,
            self.evaluator.as_ref(),
        )?;
        self.dealer = state.dealer_index;
        self.hands_played += 1;
        Ok(self.hand.insert(state))
    }

    /// Apply an action for the player on turn.
    pub fn act(&mut self, player: PlayerId, action: Action) -> Result<&GameState, TableError> {
        let current = self.hand.as_ref().ok_or(TableError::NoHandInProgress)?;
        let next = flow::act(current, player, action, self.evaluator.as_ref())?;
        Ok(self.hand.insert(next))
    }

    pub fn state(&self) -> Option<&GameState> {
        self.hand.as_ref()
    }

    /// Seats with their latest stacks.
    pub fn players(&self) -> &[Player] {
        self.hand.as_ref().map_or(&self.seats, |h| &h.players)
    }

    pub fn stakes(&self) -> Stakes {
        self.stakes
    }

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// Seats that could be dealt into the next hand.
    pub fn funded_players(&self) -> usize {
        self.players().iter().filter(|p| p.stack() > 0).count()
    }

    pub fn view_for(&self, player: PlayerId) -> Option<PlayerView> {
        self.hand.as_ref().and_then(|h| h.view_for(player))
    }

    fn next_funded_seat(&self, from: usize) -> usize {
        let n = self.seats.len();
        (1..=n).map(|k| (from + k) % n).find(|&i| self.seats[i].stack() > 0).unwrap_or(from)
    }
}
