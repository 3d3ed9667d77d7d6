use crate::config::{MAX_SEATS, MIN_SEATS};
use crate::table::Table;
use log::{info, warn};

use super::{AppState, Scene};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Players,
    StartingStack,
    SmallBlind,
    BigBlind,
    Ante,
    BotDifficulty,
    BotDelayMs,
}

const MENU_ITEMS: [MenuItem; 7] = [
    MenuItem::Players,
    MenuItem::StartingStack,
    MenuItem::SmallBlind,
    MenuItem::BigBlind,
    MenuItem::Ante,
    MenuItem::BotDifficulty,
    MenuItem::BotDelayMs,
];

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        let cfg = &app.draft;
        match self {
            MenuItem::Players => format!("Players: {}", cfg.num_players),
            MenuItem::StartingStack => format!("Starting Stack: ${}", cfg.starting_stack),
            MenuItem::SmallBlind => format!("Small Blind: {}", cfg.small_blind),
            MenuItem::BigBlind => format!("Big Blind: {}", cfg.big_blind),
            MenuItem::Ante => format!("Ante: {}", cfg.ante),
            MenuItem::BotDifficulty => {
                format!("Bot Difficulty: {}", cfg.bot_difficulty.label())
            }
            MenuItem::BotDelayMs => format!("Bot Delay (ms): {}", cfg.bot_delay_ms),
        }
    }

    fn inc(self, app: &mut AppState) {
        let cfg = &mut app.draft;
        match self {
            MenuItem::Players => {
                cfg.num_players = (cfg.num_players + 1).min(MAX_SEATS);
            }
            MenuItem::StartingStack => {
                cfg.starting_stack = cfg.starting_stack.saturating_add(100);
            }
            MenuItem::SmallBlind => {
                cfg.small_blind = cfg.small_blind.saturating_add(1);
                cfg.big_blind = cfg.big_blind.max(cfg.small_blind);
            }
            MenuItem::BigBlind => {
                cfg.big_blind = cfg.big_blind.saturating_add(1);
            }
            MenuItem::Ante => {
                cfg.ante = cfg.ante.saturating_add(1);
            }
            MenuItem::BotDelayMs => {
                cfg.bot_delay_ms = cfg.bot_delay_ms.saturating_add(100);
            }
            MenuItem::BotDifficulty => {
                cfg.bot_difficulty = cfg.bot_difficulty.cycle();
            }
        }
    }

    fn dec(self, app: &mut AppState) {
        let cfg = &mut app.draft;
        match self {
            MenuItem::Players => {
                cfg.num_players = cfg.num_players.saturating_sub(1).max(MIN_SEATS);
            }
            MenuItem::StartingStack => {
                cfg.starting_stack = cfg.starting_stack.saturating_sub(100).max(100);
            }
            MenuItem::SmallBlind => {
                cfg.small_blind = cfg.small_blind.saturating_sub(1);
            }
            MenuItem::BigBlind => {
                if cfg.big_blind > 1 {
                    cfg.big_blind -= 1;
                    cfg.small_blind = cfg.small_blind.min(cfg.big_blind);
                }
            }
            MenuItem::Ante => {
                cfg.ante = cfg.ante.saturating_sub(1);
            }
            MenuItem::BotDelayMs => {
                cfg.bot_delay_ms = cfg.bot_delay_ms.saturating_sub(100);
            }
            MenuItem::BotDifficulty => {
                cfg.bot_difficulty = cfg.bot_difficulty.cycle_back();
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        match self.scene {
            Scene::Menu => self.cancel_menu(),
            _ => self.open_menu(),
        }
    }

    // --- Menu operations ---
    pub fn open_menu(&mut self) {
        self.close_help();
        self.close_history();
        self.menu_index = 0;
        self.menu_error = None;
        self.draft = self.config.clone();
        self.scene = Scene::Menu;
    }

    /// Rebuild the table from the edited settings. Invalid settings keep
    /// the menu open with the reason.
    pub fn apply_menu(&mut self) {
        let mut draft = self.draft.clone();
        if let Some(seat) = draft.human_seat {
            draft.human_seat = Some(seat.min(draft.num_players.saturating_sub(1)));
        }
        let table = match Table::new(&draft) {
            Ok(t) => t,
            Err(e) => {
                warn!("menu settings rejected: {e}");
                self.menu_error = Some(e.to_string());
                return;
            }
        };
        info!(
            "new table: {} seats, stack {}, blinds {}/{} ante {}",
            draft.num_players, draft.starting_stack, draft.small_blind, draft.big_blind, draft.ante
        );
        self.table = table;
        self.config = draft;
        self.menu_error = None;
        self.seat_agents();
        self.scene = Scene::Table;
    }

    pub fn cancel_menu(&mut self) {
        self.menu_error = None;
        self.scene = Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.inc(self);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.dec(self);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TableConfig;
    use crate::tui::app::{AppState, InputAction, Scene};

    fn menu() -> AppState {
        AppState::new(TableConfig { seed: Some(2), ..TableConfig::default() }).unwrap()
    }

    #[test]
    fn players_stay_within_table_limits() {
        let mut app = menu();
        for _ in 0..10 {
            app.handle_input(InputAction::MenuInc);
        }
        assert_eq!(app.draft.num_players, 9);
        for _ in 0..10 {
            app.handle_input(InputAction::MenuDec);
        }
        assert_eq!(app.draft.num_players, 2);
    }

    #[test]
    fn invalid_settings_keep_the_menu_open() {
        let mut app = menu();
        // lift the small blind, which drags the big blind above the stack
        app.handle_input(InputAction::MenuNext);
        app.handle_input(InputAction::MenuNext);
        for _ in 0..10 {
            app.handle_input(InputAction::MenuInc);
        }
        assert_eq!(app.draft.small_blind, 15);
        assert_eq!(app.draft.big_blind, 15);
        app.draft.starting_stack = 10;
        app.handle_input(InputAction::MenuApply);
        assert_eq!(app.scene, Scene::Menu);
        assert!(app.menu_error().is_some_and(|e| e.contains("starting stack")));
    }

    #[test]
    fn applying_rebuilds_table_and_agents() {
        let mut app = menu();
        app.handle_input(InputAction::MenuDec);
        app.handle_input(InputAction::MenuApply);
        assert_eq!(app.scene, Scene::Table);
        assert_eq!(app.table.players().len(), 5);
        assert_eq!(format!("{:?}", app.agents), "AgentTable(HBBBB)");
        app.handle_input(InputAction::ToggleMenu);
        assert_eq!(app.scene, Scene::Menu);
        assert_eq!(app.draft, app.config);
    }
}
