//! Agents: pluggable decision sources for seats.
//!
//! A [`PlayerAgent`] looks at a read-only [`PlayerView`] and proposes an
//! [`Action`]; it never touches game state. [`AgentTable`] maps seats to
//! agents and submits the decision of whoever is on turn through the
//! [`GameEngine`] boundary, so UIs stay thin and the engine does not care
//! whether a decision came from a person or a bot.

use crate::betting::Action;
use crate::engine::GameEngine;
use crate::state::PlayerView;
use crate::table::TableError;
use core::fmt;
use log::warn;
use std::time::{Duration, Instant};

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// A seat controller that decides for a player when it is their turn.
pub trait PlayerAgent: Send {
    /// Called while this agent's player is on turn. Returning `None` means
    /// "not ready yet" (waiting for input or a thinking delay).
    fn on_turn(&mut self, view: &PlayerView) -> Option<Action>;
    /// The kind of this agent (human, bot, etc.).
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    /// Optionally queue an action from outside; default is to ignore it.
    fn receive(&mut self, _action: Action) -> bool {
        false
    }
    /// Called when a submitted action was rejected.
    fn rejected(&mut self) {}
}

mod bots;

pub use bots::{BotAgent, BotProfile, Difficulty};

/// Plays whatever action the UI queued for it.
#[derive(Debug, Default)]
pub struct HumanAgent {
    pending: Option<Action>,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl PlayerAgent for HumanAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }

    fn receive(&mut self, action: Action) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(action);
        true
    }

    fn on_turn(&mut self, _view: &PlayerView) -> Option<Action> {
        self.pending.take()
    }

    fn rejected(&mut self) {
        self.pending = None;
    }
}

/// One optional agent per seat, plus a table-wide pacing delay.
pub struct AgentTable {
    seats: Vec<Option<Box<dyn PlayerAgent>>>,
    min_action_delay: Duration,
    next_action_at: Option<Instant>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|a| match a.as_deref().map(|ag| ag.kind()) {
                Some(AgentKind::Human) => 'H',
                Some(AgentKind::Bot) => 'B',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    /// Create a table with `n` seats, all empty.
    pub fn for_seats(n: usize) -> Self {
        Self {
            seats: (0..n).map(|_| None).collect(),
            min_action_delay: Duration::ZERO,
            next_action_at: None,
        }
    }

    /// Assign an agent to a seat (or remove when `None`).
    pub fn set_agent(&mut self, seat: usize, agent: Option<Box<dyn PlayerAgent>>) {
        if seat >= self.seats.len() {
            self.seats.resize_with(seat + 1, || None);
        }
        self.seats[seat] = agent;
    }

    pub fn agent_kind(&self, seat: usize) -> Option<AgentKind> {
        self.seats.get(seat).and_then(|a| a.as_deref().map(|ag| ag.kind()))
    }

    /// Send an action intent to a specific seat agent, if any.
    pub fn receive(&mut self, seat: usize, action: Action) -> bool {
        match self.seats.get_mut(seat) {
            Some(Some(agent)) => agent.receive(action),
            _ => false,
        }
    }

    pub fn has_agent(&self, seat: usize) -> bool {
        self.seats.get(seat).is_some_and(|a| a.is_some())
    }

    pub fn any_bots(&self) -> bool {
        self.seats.iter().flatten().any(|ag| matches!(ag.kind(), AgentKind::Bot))
    }

    /// Minimum delay between consecutive bot actions at the table.
    pub fn set_min_action_delay_ms(&mut self, delay_ms: u64) {
        self.min_action_delay = Duration::from_millis(delay_ms);
    }

    /// Ask the agent on turn for a decision and submit it.
    ///
    /// Returns `Ok(true)` when an action was applied, `Ok(false)` when
    /// there is nothing to do yet. A rejected action is logged, reported to
    /// the agent, and returned so the caller can re-prompt.
    pub fn on_turn(&mut self, engine: &mut dyn GameEngine) -> Result<bool, TableError> {
        let (Some(seat), Some(player)) = (engine.current_seat(), engine.current_player()) else {
            return Ok(false);
        };
        let Some(Some(agent)) = self.seats.get_mut(seat) else {
            return Ok(false);
        };
        let now = Instant::now();
        let is_bot = matches!(agent.kind(), AgentKind::Bot);
        if is_bot && self.next_action_at.is_some_and(|next| now < next) {
            return Ok(false);
        }
        let Some(view) = engine.view_for(player) else {
            return Ok(false);
        };
        let Some(action) = agent.on_turn(&view) else {
            return Ok(false);
        };
        if let Err(e) = engine.act(player, action) {
            warn!("seat {seat} ({player}) {action} rejected: {e}");
            agent.rejected();
            return Err(e);
        }
        if is_bot && self.min_action_delay > Duration::ZERO {
            self.next_action_at = Some(now + self.min_action_delay);
        }
        Ok(true)
    }

    /// Drive the current hand until it completes or an agent is not ready.
    /// Returns the number of actions applied.
    pub fn play_out(&mut self, engine: &mut dyn GameEngine) -> Result<usize, TableError> {
        let mut actions = 0;
        while engine.hand_in_progress() && self.on_turn(engine)? {
            actions += 1;
        }
        Ok(actions)
    }

    /// Remove all agents.
    pub fn clear(&mut self) {
        for a in &mut self.seats {
            *a = None;
        }
        self.next_action_at = None;
    }
}
