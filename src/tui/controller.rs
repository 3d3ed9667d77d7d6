use crate::tui::app::{AppState, InputAction, Scene};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

/// Draw, read keys, and let bots act once per tick until the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.agents_on_turn();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Translate a key into app input. Returns `true` to quit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Char('?')) {
        app.handle_input(InputAction::ToggleHelp);
        return false;
    }
    if matches!(code, KeyCode::Char('h' | 'H')) {
        app.handle_input(InputAction::ToggleHistory);
        return false;
    }
    if app.help_open() {
        if matches!(code, KeyCode::Esc) {
            app.handle_input(InputAction::ToggleHelp);
        }
        return false;
    }
    if app.history_open() {
        let input = match code {
            KeyCode::Up => Some(InputAction::HistoryUp),
            KeyCode::Down => Some(InputAction::HistoryDown),
            KeyCode::Esc => Some(InputAction::ToggleHistory),
            _ => None,
        };
        if let Some(input) = input {
            app.handle_input(input);
        }
        return false;
    }
    if app.amount_entry_active() {
        let input = match code {
            KeyCode::Esc => Some(InputAction::AmountCancel),
            KeyCode::Enter => Some(InputAction::AmountSubmit),
            KeyCode::Backspace => Some(InputAction::AmountBackspace),
            KeyCode::Char('+' | '=') => Some(InputAction::AmountIncBb),
            KeyCode::Char('-' | '_') => Some(InputAction::AmountDecBb),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                Some(InputAction::AmountDigit(c as u8 - b'0'))
            }
            _ => None,
        };
        if let Some(input) = input {
            app.handle_input(input);
        }
        return false;
    }

    let input = match app.scene {
        Scene::Menu => match code {
            KeyCode::Up => InputAction::MenuPrev,
            KeyCode::Down => InputAction::MenuNext,
            KeyCode::Char('+' | '=') | KeyCode::Right => InputAction::MenuInc,
            KeyCode::Char('-' | '_') | KeyCode::Left => InputAction::MenuDec,
            KeyCode::Enter => InputAction::MenuApply,
            KeyCode::Esc => InputAction::MenuCancel,
            KeyCode::Char('m' | 'M') => InputAction::ToggleMenu,
            KeyCode::Char('q' | 'Q') => return true,
            _ => return false,
        },
        Scene::Table => match code {
            KeyCode::Char('m' | 'M') => InputAction::ToggleMenu,
            KeyCode::Char(' ') => InputAction::NewHand,
            KeyCode::Char('a' | 'A') => InputAction::AmountOpen,
            KeyCode::Char('d' | 'D') => InputAction::BotDifficultyNext,
            KeyCode::Char('f' | 'F') => InputAction::Fold,
            KeyCode::Char('c' | 'C') => InputAction::CheckCall,
            KeyCode::Char('r' | 'R') => InputAction::RaiseMin,
            KeyCode::Char('x' | 'X') => InputAction::AllIn,
            KeyCode::Char(']') => InputAction::FocusNext,
            KeyCode::Char('[') => InputAction::FocusPrev,
            KeyCode::Char(c @ '1'..='9') => InputAction::FocusSeat((c as u8 - b'1') as usize),
            KeyCode::Char('q' | 'Q') if !app.hand_in_progress() => return true,
            _ => return false,
        },
    };
    app.handle_input(input);
    false
}
