use crate::agents::{AgentKind, AgentTable, BotAgent, BotProfile, Difficulty, HumanAgent};
use crate::betting::{Action, LegalActions};
use crate::config::TableConfig;
use crate::engine::GameEngine;
use crate::history::HistoryEntry;
use crate::state::GameState;
use crate::table::{Table, TableError};
use log::info;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    ToggleHistory,
    HistoryUp,
    HistoryDown,
    NewHand,
    Fold,
    CheckCall,
    RaiseMin,
    AllIn,
    AmountOpen,
    AmountDigit(u8),
    AmountBackspace,
    AmountIncBb,
    AmountDecBb,
    AmountSubmit,
    AmountCancel,
    BotDifficultyNext,
    FocusNext,
    FocusPrev,
    FocusSeat(usize),
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub table: Table,
    /// Settings the current table was built from.
    pub config: TableConfig,
    /// Settings being edited in the menu.
    pub draft: TableConfig,
    pub menu_index: usize,
    pub(crate) menu_error: Option<String>,
    // UI focus seat index (does not auto-move with action)
    pub focus: usize,
    pub agents: AgentTable,
    pub(crate) bot_profiles: Vec<BotProfile>,
    help_open: bool,
    history_open: bool,
    history_offset: usize,
    amount_entry: Option<String>,
    amount_entry_error: Option<String>,
    action_error: Option<String>,
    action_error_at: Option<Instant>,
}

impl AppState {
    pub const HISTORY_PAGE_SIZE: usize = 20;
    const ACTION_ERROR_TTL: Duration = Duration::from_secs(3);
    const TABLE_PACE_MS: u64 = 150;

    /// Build a table from `config` and open the menu on it.
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        let table = Table::new(&config)?;
        let mut app = Self {
            scene: Scene::Menu,
            table,
            draft: config.clone(),
            config,
            menu_index: 0,
            menu_error: None,
            focus: 0,
            agents: AgentTable::for_seats(0),
            bot_profiles: Vec::new(),
            help_open: false,
            history_open: false,
            history_offset: 0,
            amount_entry: None,
            amount_entry_error: None,
            action_error: None,
            action_error_at: None,
        };
        app.seat_agents();
        Ok(app)
    }

    /// Attach a human agent to the configured seat and bots elsewhere.
    pub(crate) fn seat_agents(&mut self) {
        let n = self.config.num_players;
        let profile = Self::default_bot_profile(&self.config);
        self.bot_profiles = (0..n)
            .map(|i| match self.config.seed {
                Some(seed) => profile.clone().with_seed(seed.wrapping_add(i as u64)),
                None => profile.clone(),
            })
            .collect();
        self.agents = AgentTable::for_seats(n);
        self.agents.set_min_action_delay_ms(Self::TABLE_PACE_MS.min(self.config.bot_delay_ms));
        for i in 0..n {
            if self.config.human_seat == Some(i) {
                self.agents.set_agent(i, Some(Box::new(HumanAgent::new())));
            } else {
                let bot = BotAgent::new(self.bot_profiles[i].clone());
                self.agents.set_agent(i, Some(Box::new(bot)));
            }
        }
        self.focus = self.config.human_seat.unwrap_or(0);
    }

    pub(crate) fn default_bot_profile(config: &TableConfig) -> BotProfile {
        let delay = config.bot_delay_ms;
        BotProfile::for_difficulty(config.bot_difficulty).with_delay_ms(delay, delay + delay / 2)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.table.state()
    }

    pub fn hand_in_progress(&self) -> bool {
        self.table.hand_in_progress()
    }

    /// Legal actions for the focused seat, when it is a human seat on turn.
    pub fn focus_legal(&self) -> Option<LegalActions> {
        if self.scene != Scene::Table {
            return None;
        }
        if !matches!(self.agents.agent_kind(self.focus), Some(AgentKind::Human)) {
            return None;
        }
        if self.table.current_seat() != Some(self.focus) {
            return None;
        }
        self.table.state().and_then(|s| s.legal_actions())
    }

    fn queue_action(&mut self, action: Action) -> bool {
        if self.focus_legal().is_none() {
            return false;
        }
        self.clear_action_error();
        if !self.agents.receive(self.focus, action) {
            return false;
        }
        self.agents_on_turn();
        true
    }

    pub fn amount_entry_active(&self) -> bool {
        self.amount_entry.is_some()
    }

    pub fn amount_entry_text(&self) -> Option<&str> {
        self.amount_entry.as_deref()
    }

    pub fn amount_entry_error(&self) -> Option<&str> {
        self.amount_entry_error.as_deref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub fn menu_error(&self) -> Option<&str> {
        self.menu_error.as_deref()
    }

    fn set_action_error(&mut self, msg: String) {
        self.action_error = Some(msg);
        self.action_error_at = Some(Instant::now());
    }

    fn clear_action_error(&mut self) {
        self.action_error = None;
        self.action_error_at = None;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn history_offset(&self) -> usize {
        self.history_offset
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    pub(crate) fn close_history(&mut self) {
        self.history_open = false;
    }

    /// The visible page of the current hand's history.
    pub fn history_page(&self) -> &[HistoryEntry] {
        self.state()
            .map(|s| s.history().recent_offset(Self::HISTORY_PAGE_SIZE, self.history_offset))
            .unwrap_or_default()
    }

    pub fn bot_profile_label(&self, seat: usize) -> Option<&'static str> {
        if !matches!(self.agents.agent_kind(seat), Some(AgentKind::Bot)) {
            return None;
        }
        let diff = self.bot_profiles.get(seat).map_or(Difficulty::Medium, |p| p.difficulty);
        Some(Self::difficulty_label(diff))
    }

    pub fn difficulty_label(difficulty: Difficulty) -> &'static str {
        match difficulty {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Med",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Xprt",
        }
    }

    fn open_amount_entry(&mut self) -> bool {
        let Some(bounds) = self.focus_legal().and_then(|l| l.raise) else {
            return false;
        };
        self.amount_entry = Some(bounds.min_to.to_string());
        self.amount_entry_error = None;
        true
    }

    fn amount_entry_backspace(&mut self) {
        if let Some(buf) = self.amount_entry.as_mut() {
            buf.pop();
        }
        self.amount_entry_error = None;
    }

    fn amount_entry_push_digit(&mut self, digit: u8) {
        if let Some(buf) = self.amount_entry.as_mut() {
            if buf.len() >= 12 {
                return;
            }
            buf.push(char::from(b'0' + digit));
        }
        self.amount_entry_error = None;
    }

    fn amount_entry_adjust_bb(&mut self, delta: i64) {
        let step = self.table.stakes().big_blind.max(1);
        if let Some(buf) = self.amount_entry.as_mut() {
            let cur = buf.parse::<u64>().unwrap_or(0);
            let next = if delta >= 0 {
                cur.saturating_add(step * delta.unsigned_abs())
            } else {
                cur.saturating_sub(step * delta.unsigned_abs())
            };
            *buf = next.to_string();
        }
        self.amount_entry_error = None;
    }

    fn amount_entry_submit(&mut self) -> bool {
        let Some(buf) = self.amount_entry.as_ref() else {
            return false;
        };
        let Ok(amount) = buf.parse::<u64>() else {
            self.amount_entry_error = Some("Invalid amount".to_string());
            return false;
        };
        let Some(bounds) = self.focus_legal().and_then(|l| l.raise) else {
            self.amount_entry_error = Some("Raising is not allowed".to_string());
            return false;
        };
        if !(bounds.min_to..=bounds.max_to).contains(&amount) {
            self.amount_entry_error =
                Some(format!("Raise to {}..={}", bounds.min_to, bounds.max_to));
            return false;
        }
        self.amount_entry = None;
        self.amount_entry_error = None;
        self.queue_action(Action::Raise(amount))
    }

    fn amount_entry_cancel(&mut self) {
        self.amount_entry = None;
        self.amount_entry_error = None;
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.history_open = false;
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::ToggleHistory => {
                if self.scene == Scene::Table {
                    self.help_open = false;
                    if !self.history_open {
                        self.history_offset = 0;
                    }
                    self.history_open = !self.history_open;
                }
                false
            }
            InputAction::HistoryUp => {
                if self.scene == Scene::Table && self.history_open {
                    let len = self.state().map_or(0, |s| s.history().len());
                    let max_offset = len.saturating_sub(Self::HISTORY_PAGE_SIZE);
                    self.history_offset = (self.history_offset + 1).min(max_offset);
                }
                false
            }
            InputAction::HistoryDown => {
                if self.scene == Scene::Table && self.history_open {
                    self.history_offset = self.history_offset.saturating_sub(1);
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::NewHand => {
                if self.scene == Scene::Table {
                    self.new_hand();
                }
                false
            }
            InputAction::Fold => self.queue_action(Action::Fold),
            InputAction::CheckCall => match self.focus_legal() {
                Some(legal) => self.queue_action(legal.passive()),
                None => false,
            },
            InputAction::RaiseMin => match self.focus_legal().and_then(|l| l.raise) {
                Some(bounds) => self.queue_action(Action::Raise(bounds.min_to)),
                None => false,
            },
            InputAction::AllIn => self.queue_action(Action::AllIn),
            InputAction::AmountOpen => self.open_amount_entry(),
            InputAction::AmountDigit(d) => {
                self.amount_entry_push_digit(d);
                false
            }
            InputAction::AmountBackspace => {
                self.amount_entry_backspace();
                false
            }
            InputAction::AmountIncBb => {
                self.amount_entry_adjust_bb(1);
                false
            }
            InputAction::AmountDecBb => {
                self.amount_entry_adjust_bb(-1);
                false
            }
            InputAction::AmountSubmit => self.amount_entry_submit(),
            InputAction::AmountCancel => {
                self.amount_entry_cancel();
                false
            }
            InputAction::BotDifficultyNext => {
                if self.scene == Scene::Table {
                    self.cycle_focus_bot_difficulty();
                }
                false
            }
            InputAction::FocusNext => {
                if self.scene == Scene::Table {
                    self.focus_next();
                }
                false
            }
            InputAction::FocusPrev => {
                if self.scene == Scene::Table {
                    self.focus_prev();
                }
                false
            }
            InputAction::FocusSeat(idx) => {
                if self.scene == Scene::Table {
                    self.set_focus(idx);
                }
                false
            }
        }
    }

    /// Deal the next hand unless one is running or the table is down to a
    /// single funded seat.
    pub fn new_hand(&mut self) {
        if self.hand_in_progress() {
            return;
        }
        if self.table.funded_players() < 2 {
            self.set_action_error("Game over: one player has all the chips".to_string());
            return;
        }
        self.history_offset = 0;
        self.amount_entry = None;
        self.clear_action_error();
        match self.table.new_hand() {
            Ok(state) => {
                info!("dealt hand {} at dealer seat {}", state.hand_number(), state.dealer_index())
            }
            Err(e) => self.set_action_error(e.to_string()),
        }
    }

    fn seat_count(&self) -> usize {
        self.table.players().len()
    }

    pub fn focus_next(&mut self) {
        let n = self.seat_count();
        if n > 0 {
            self.focus = (self.focus + 1) % n;
        }
    }

    pub fn focus_prev(&mut self) {
        let n = self.seat_count();
        if n > 0 {
            self.focus = (self.focus + n - 1) % n;
        }
    }

    pub fn set_focus(&mut self, idx: usize) {
        let n = self.seat_count();
        if idx < n {
            self.focus = idx;
        }
    }

    pub fn cycle_focus_bot_difficulty(&mut self) {
        if !matches!(self.agents.agent_kind(self.focus), Some(AgentKind::Bot)) {
            return;
        }
        let Some(current) = self.bot_profiles.get(self.focus).cloned() else {
            return;
        };
        let mut next = BotProfile::for_difficulty(current.difficulty.cycle())
            .with_delay_ms(current.min_delay_ms, current.max_delay_ms);
        next.rng_seed = current.rng_seed;
        self.bot_profiles[self.focus] = next.clone();
        self.agents.set_agent(self.focus, Some(Box::new(BotAgent::new(next))));
    }

    /// Give the agent on turn a chance to act.
    pub fn agents_on_turn(&mut self) {
        if self.scene != Scene::Table || !self.hand_in_progress() {
            return;
        }
        if self.action_error_at.is_some_and(|at| at.elapsed() >= Self::ACTION_ERROR_TTL) {
            self.clear_action_error();
        }
        match self.agents.on_turn(&mut self.table) {
            Ok(true) => self.clear_action_error(),
            Ok(false) => {}
            Err(err) => self.set_action_error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppState {
        let config = TableConfig {
            num_players: 3,
            seed: Some(17),
            bot_delay_ms: 0,
            ..TableConfig::default()
        };
        let mut app = AppState::new(config).unwrap();
        app.apply_menu();
        app
    }

    #[test]
    fn actions_ignored_before_the_deal() {
        let mut app = app();
        assert!(!app.handle_input(InputAction::Fold));
        assert!(app.state().is_none());
    }

    #[test]
    fn human_acts_only_on_turn() {
        let mut app = app();
        app.new_hand();
        // three-handed with the button on seat 0: seat 0 is first to act
        assert_eq!(app.table.current_seat(), Some(0));
        app.set_focus(1);
        assert!(!app.handle_input(InputAction::CheckCall));
        app.set_focus(0);
        assert!(app.handle_input(InputAction::CheckCall));
        let s = app.state().unwrap();
        assert_eq!(s.players()[0].street_bet(), 10);
    }

    #[test]
    fn amount_entry_enforces_raise_bounds() {
        let mut app = app();
        app.new_hand();
        assert!(app.handle_input(InputAction::AmountOpen));
        assert_eq!(app.amount_entry_text(), Some("20"));
        app.handle_input(InputAction::AmountBackspace);
        app.handle_input(InputAction::AmountBackspace);
        app.handle_input(InputAction::AmountDigit(5));
        assert!(!app.handle_input(InputAction::AmountSubmit));
        assert_eq!(app.amount_entry_error(), Some("Raise to 20..=1000"));
        app.handle_input(InputAction::AmountIncBb);
        app.handle_input(InputAction::AmountIncBb);
        assert_eq!(app.amount_entry_text(), Some("25"));
        assert!(app.handle_input(InputAction::AmountSubmit));
        assert!(!app.amount_entry_active());
        assert_eq!(app.state().unwrap().highest_bet(), 25);
    }

    #[test]
    fn bots_finish_the_hand_after_the_human_folds() {
        let mut app = app();
        app.new_hand();
        assert!(app.handle_input(InputAction::Fold));
        for _ in 0..200 {
            if !app.hand_in_progress() {
                break;
            }
            app.agents_on_turn();
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(app.state().unwrap().is_complete());
        app.new_hand();
        assert_eq!(app.state().unwrap().hand_number(), 2);
        assert_eq!(app.state().unwrap().dealer_index(), 1);
    }

    #[test]
    fn difficulty_cycles_for_focused_bot_only() {
        let mut app = app();
        app.set_focus(0);
        app.handle_input(InputAction::BotDifficultyNext);
        assert_eq!(app.bot_profile_label(0), None);
        app.set_focus(1);
        app.handle_input(InputAction::BotDifficultyNext);
        assert_eq!(app.bot_profile_label(1), Some("Hard"));
    }
}
