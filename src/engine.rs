// Game engine boundary. Front ends (TUI, agents, simulations) drive a table
// through this trait and read state back as plain snapshots, so they never
// touch the state machine directly.

use crate::betting::Action;
use crate::player::PlayerId;
use crate::state::{GameState, PlayerView};
use crate::table::{Table, TableError};

pub trait GameEngine {
    // Hand lifecycle
    fn new_hand(&mut self) -> Result<(), TableError>;
    fn act(&mut self, player: PlayerId, action: Action) -> Result<(), TableError>;

    // Queries
    fn state(&self) -> Option<&GameState>;
    fn num_players(&self) -> usize;
    fn funded_players(&self) -> usize;

    fn view_for(&self, player: PlayerId) -> Option<PlayerView> {
        self.state().and_then(|s| s.view_for(player))
    }

    fn current_player(&self) -> Option<PlayerId> {
        self.state().filter(|s| !s.is_complete()).and_then(|s| s.current_player()).map(|p| p.id())
    }

    fn current_seat(&self) -> Option<usize> {
        self.state().filter(|s| !s.is_complete()).and_then(|s| s.current_player_index())
    }

    fn hand_in_progress(&self) -> bool {
        self.state().is_some_and(|s| !s.is_complete())
    }
}

impl GameEngine for Table {
    fn new_hand(&mut self) -> Result<(), TableError> {
        Table::new_hand(self).map(|_| ())
    }

    fn act(&mut self, player: PlayerId, action: Action) -> Result<(), TableError> {
        Table::act(self, player, action).map(|_| ())
    }

    fn state(&self) -> Option<&GameState> {
        Table::state(self)
    }

    fn num_players(&self) -> usize {
        self.players().len()
    }

    fn funded_players(&self) -> usize {
        Table::funded_players(self)
    }
}
