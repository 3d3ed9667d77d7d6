use crate::cards::{Card, Suit};
use crate::player::{Player, PlayerStatus};
use crate::state::{GameState, Street};
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let [header_area, board_area, seats_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(5),
        ])
        .areas(f.area());

    let stakes = app.table.stakes();
    let mut header_lines = vec![Line::from(format!(
        "Hand #{}  Blinds {}/{}  Ante {}  BTN P{}",
        app.table.hands_played(),
        stakes.small_blind,
        stakes.big_blind,
        stakes.ante,
        app.table.dealer() + 1,
    ))];
    if let Some(s) = app.state() {
        header_lines.push(Line::from(format!(
            "{}   Bet: {}   Min raise: {}",
            pot_line(s),
            s.highest_bet(),
            s.min_raise()
        )));
    }
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("holdem").borders(Borders::ALL));
    f.render_widget(header, header_area);

    draw_board(f, board_area, app.state());
    draw_seats(f, seats_area, app);
    draw_status(f, status_area, app);

    if app.help_open() {
        draw_help(f);
    } else if app.history_open() {
        draw_history(f, app);
    } else if app.amount_entry_active() {
        draw_amount_entry(f, app);
    }
}

fn pot_line(s: &GameState) -> String {
    let pot = s.pot();
    if pot.side_pots().is_empty() {
        return format!("Pot: ${}", pot.total());
    }
    let sides: Vec<String> = pot.side_pots().iter().map(|t| t.amount.to_string()).collect();
    format!("Pot: ${} (main {} + side {})", pot.total(), pot.main(), sides.join(" + "))
}

fn draw_board(f: &mut Frame, area: Rect, state: Option<&GameState>) {
    let street = state.map_or(Street::Preflop, |s| s.street());
    let block = Block::default().title(format!("Board: {}", street.label())).borders(Borders::ALL);
    let board_inner = inner(area);
    f.render_widget(block, area);
    let cards = state.map(|s| s.board().as_slice()).unwrap_or_default();
    let card_width = board_inner.width / 5;
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(card_width); 5])
        .split(board_inner);
    // cards dealt on the current street are highlighted
    let fresh = match street {
        Street::Flop => 0..3,
        Street::Turn => 3..4,
        Street::River => 4..5,
        _ => 0..0,
    };
    for (i, slot) in slots.iter().enumerate() {
        let color = fresh.contains(&i).then_some(Color::Yellow);
        render_card_widget(f, *slot, cards.get(i).copied(), color);
    }
}

fn draw_seats(f: &mut Frame, area: Rect, app: &AppState) {
    let players = app.table.players();
    let total = players.len();
    let top_cols = total.div_ceil(2);
    let bottom_cols = total - top_cols;
    let [top, bottom] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2); 2])
        .areas(area);
    for (r, (row, cols)) in [(top, top_cols), (bottom, bottom_cols)].into_iter().enumerate() {
        if cols == 0 {
            continue;
        }
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
            .split(row);
        for (c, chunk) in chunks.iter().enumerate() {
            // top row left to right, bottom row right to left
            let idx = if r == 0 { c } else { total - 1 - c };
            if let Some(p) = players.get(idx) {
                render_seat(f, *chunk, app, idx, p);
            }
        }
    }
}

/// Hole cards the viewer may see: the human seat, everyone at an all-bot
/// table, and live hands once they are shown down.
fn visible_hole(app: &AppState, idx: usize, p: &Player) -> bool {
    let Some(human) = app.config.human_seat else {
        return true;
    };
    let shown = app.state().and_then(|s| s.outcome()).is_some_and(|o| o.showdown);
    idx == human || (shown && p.is_live())
}

fn render_seat(f: &mut Frame, area: Rect, app: &AppState, idx: usize, p: &Player) {
    let state = app.state();
    let current = state.and_then(|s| s.current_player_index()).filter(|_| app.hand_in_progress());
    let mut title = format!("P{} {}", idx + 1, p.name());
    if idx == app.table.dealer() {
        title.push_str(" [BTN]");
    }
    if state.and_then(|s| s.small_blind_index()) == Some(idx) {
        title.push_str(" [SB]");
    }
    if state.and_then(|s| s.big_blind_index()) == Some(idx) {
        title.push_str(" [BB]");
    }
    if let Some(label) = app.bot_profile_label(idx) {
        title.push_str(&format!(" [BOT:{label}]"));
    }
    if current == Some(idx) {
        title.push_str(" [Act]");
    }

    let outcome = state.and_then(|s| s.outcome());
    let won = outcome.is_some_and(|o| o.winners().contains(&p.id()));
    let border = if matches!(p.status(), PlayerStatus::Folded | PlayerStatus::SittingOut) {
        Some(Color::DarkGray)
    } else if won {
        Some(Color::Green)
    } else if p.is_all_in() {
        Some(Color::LightRed)
    } else if current == Some(idx) {
        Some(Color::Yellow)
    } else if idx == app.focus {
        Some(Color::Cyan)
    } else {
        None
    };
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }

    let status = match p.status() {
        PlayerStatus::Active => "Active",
        PlayerStatus::Folded => "Folded",
        PlayerStatus::AllIn => "All-in",
        PlayerStatus::SittingOut => "Out",
    };
    let mut lines = vec![
        Line::from(format!("Stack: ${}", p.stack())),
        Line::from(format!("Bet: {}  In pot: {}", p.street_bet(), p.total_contribution())),
        Line::from(format!("Status: {status}")),
    ];
    if let Some(o) = outcome {
        let net = o.net(p.id());
        if net != 0 {
            lines.push(Line::from(format!("Result: {net:+}")));
        }
        if let Some((_, cat)) = o.reveals.iter().find(|(id, _)| *id == p.id()) {
            lines.push(Line::from(format!("Shows: {}", cat.label())));
        }
    }

    f.render_widget(block, area);
    let seat_inner = inner(area);
    let hole = p.hole().filter(|_| visible_hole(app, idx, p));
    let (text_area, cards_area) = match hole {
        Some(_) if seat_inner.height > 3 => {
            let [text, cards] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(3)])
                .areas(seat_inner);
            (text, Some(cards))
        }
        _ => (seat_inner, None),
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), text_area);
    if let (Some(h), Some(cards)) = (hole, cards_area) {
        let [a, b] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(cards.width / 2); 2])
            .areas(cards);
        render_card_widget(f, a, Some(h.first()), Some(Color::Cyan));
        render_card_widget(f, b, Some(h.second()), Some(Color::Cyan));
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let [left, right] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .areas(inner(area));

    let mut info = match app.state() {
        None => vec![Line::from("No hand yet: press Space to deal.")],
        Some(s) if s.is_complete() => {
            let winners: Vec<String> = s
                .outcome()
                .map(|o| o.winners())
                .unwrap_or_default()
                .into_iter()
                .filter_map(|id| s.player(id).map(|p| p.name().to_string()))
                .collect();
            vec![Line::from(format!("Hand over, won by {}. Space deals the next.", winners.join(", ")))]
        }
        Some(s) => {
            let acting = s.current_player().map_or("-".to_string(), |p| p.name().to_string());
            vec![Line::from(format!("Acting: {acting}   Focus: P{}", app.focus + 1))]
        }
    };
    if let Some(legal) = app.focus_legal() {
        let style = |enabled: bool| {
            if enabled {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            }
        };
        let call = match legal.call {
            Some(amount) => format!("C call {amount}"),
            None => "C check".to_string(),
        };
        let raise = match legal.raise {
            Some(b) => format!("R raise to {}", b.min_to),
            None => "R raise".to_string(),
        };
        info.push(Line::from(vec![
            Span::styled("F fold", style(legal.can_fold)),
            Span::raw(" • "),
            Span::styled(call, style(legal.can_check || legal.call.is_some())),
            Span::raw(" • "),
            Span::styled(raise, style(legal.raise.is_some())),
            Span::raw(" • "),
            Span::styled("A amount", style(legal.raise.is_some())),
            Span::raw(" • "),
            Span::styled("X all-in", style(legal.all_in.is_some())),
        ]));
    }
    if let Some(err) = app.action_error() {
        info.push(Line::from(Span::styled(format!("Error: {err}"), Style::default().fg(Color::Red))));
    }
    f.render_widget(Paragraph::new(info).wrap(Wrap { trim: true }), left);
    let keys = vec![Line::from(""), Line::from("? help • H history • M menu")];
    f.render_widget(Paragraph::new(keys).alignment(Alignment::Right), right);
}

fn draw_history(f: &mut Frame, app: &AppState) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("History").borders(Borders::ALL);
    let mut lines: Vec<Line> = Vec::new();
    let entries = app.history_page();
    if entries.is_empty() {
        lines.push(Line::from("No history yet."));
    }
    for entry in entries {
        let who = entry
            .player
            .and_then(|id| app.state().and_then(|s| s.player(id)))
            .map_or("Dealer".to_string(), |p| p.name().to_string());
        let amount = entry.amount.map(|v| format!(" {v}")).unwrap_or_default();
        lines.push(Line::from(format!(
            "{who} {}{amount} [{}]",
            entry.verb.label(),
            entry.street.label()
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Up/Down scroll • Close: H or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table:", bold)),
        Line::from("- Space: deal the next hand"),
        Line::from("- F: fold"),
        Line::from("- C: check / call"),
        Line::from("- R: minimum raise"),
        Line::from("- A: raise to an amount"),
        Line::from("- X: all-in"),
        Line::from("- D: cycle difficulty of the focused bot"),
        Line::from("- ] / [: focus next / prev, 1-9: focus seat"),
        Line::from("- H: history"),
        Line::from("- Q: quit (between hands)"),
        Line::from(""),
        Line::from(Span::styled("Amount entry:", bold)),
        Line::from("- 0-9 / Backspace: edit"),
        Line::from("- + / -: adjust by one big blind"),
        Line::from("- Enter: submit, Esc: cancel"),
        Line::from(""),
        Line::from(Span::styled("Menu:", bold)),
        Line::from("- M: open / close"),
        Line::from("- Up / Down: move, + / -: adjust"),
        Line::from("- Enter: apply (starts a new table), Esc: cancel"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_amount_entry(f: &mut Frame, app: &AppState) {
    let area = centered_rect(50, 30, f.area());
    let bounds = app.focus_legal().and_then(|l| l.raise);
    let title = match app.state() {
        Some(s) if s.highest_bet() == 0 => "Bet Amount",
        _ => "Raise To",
    };
    let range = bounds.map_or(String::from("-"), |b| format!("{}..={}", b.min_to, b.max_to));
    let lines = vec![
        Line::from(format!("Amount: {}", app.amount_entry_text().unwrap_or(""))),
        Line::from(format!("Allowed: {range}")),
        Line::from("Digits to edit, Backspace to delete"),
        Line::from("+/- in BB steps, Enter submit, Esc cancel"),
    ];
    let [body, error] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(inner(area));
    f.render_widget(Clear, area);
    f.render_widget(Block::default().title(title).borders(Borders::ALL), area);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
    let msg = Span::styled(app.amount_entry_error().unwrap_or(""), Style::default().fg(Color::Red));
    f.render_widget(Paragraph::new(Line::from(msg)).alignment(Alignment::Center), error);
}

fn suit_style(s: Suit) -> Style {
    if s.is_red() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_card_widget(f: &mut Frame, area: Rect, card: Option<Card>, border: Option<Color>) {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    let content = match card {
        Some(c) => Line::from(Span::styled(c.pretty(), suit_style(c.suit()))),
        None => Line::from("[  ]"),
    };
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner(area));
}

#[cfg(test)]
mod tests {
    use crate::config::TableConfig;
    use crate::tui::app::AppState;
    use crate::tui::ui;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn renders_menu_and_table_without_panicking() {
        let cfg = TableConfig { num_players: 4, seed: Some(6), bot_delay_ms: 0, ..Default::default() };
        let mut app = AppState::new(cfg).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| ui::draw(f, &app)).unwrap();
        app.apply_menu();
        app.new_hand();
        terminal.draw(|f| ui::draw(f, &app)).unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Board: Pre-flop"));
        assert!(text.contains("P1 You"));
    }
}
