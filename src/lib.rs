//! holdem-engine: a Texas Hold'em betting engine.
//!
//! A hand is a [`state::GameState`] value moved forward by pure
//! transitions: [`flow::start_hand`] posts forced bets and deals,
//! [`flow::act`] applies one player's decision and advances streets, and
//! the hand ends with a [`showdown::HandOutcome`] once the pot is paid.
//! [`table::Table`] carries stacks and the button across hands.
//!
//! ## Quick start: play a hand
//! ```
//! use holdem_engine::betting::Action;
//! use holdem_engine::config::Stakes;
//! use holdem_engine::player::{Player, PlayerId};
//! use holdem_engine::table::Table;
//!
//! let players = vec![
//!     Player::new(PlayerId(0), "Ann", 1000, false),
//!     Player::new(PlayerId(1), "Bob", 1000, false),
//! ];
//! let mut table = Table::with_players(players, Stakes::new(25, 50), Some(7));
//! table.new_hand().unwrap();
//!
//! // heads-up: the button posts the small blind and acts first
//! let state = table.act(PlayerId(0), Action::Fold).unwrap();
//! assert!(state.is_complete());
//! assert_eq!(state.players()[0].stack(), 975);
//! assert_eq!(state.players()[1].stack(), 1025);
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin holdem
//! ```

pub mod agents;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod flow;
pub mod hand;
pub mod history;
pub mod persist;
pub mod player;
pub mod pot;
pub mod sequencer;
pub mod showdown;
pub mod state;
pub mod table;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
