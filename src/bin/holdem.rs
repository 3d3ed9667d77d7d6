use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use holdem_engine::agents::{AgentTable, BotAgent, BotProfile};
use holdem_engine::config::TableConfig;
use holdem_engine::engine::GameEngine;
use holdem_engine::table::{Table, TableError};
use holdem_engine::tui::{app::AppState, controller};
use log::{error, info, LevelFilter};
use ratatui::prelude::*;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use std::error::Error;
use std::fs::File;
use std::io::{self, IsTerminal, Stdout};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Texas Hold'em against bots in the terminal, or headless bot-only tables.
#[derive(Parser, Debug)]
#[command(name = "holdem", version, about)]
struct Cli {
    /// JSON table config; missing fields take defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Play this many hands per table with bots only, without the TUI.
    #[arg(long, value_name = "HANDS")]
    simulate: Option<u64>,
    /// Tables to simulate in parallel.
    #[arg(long, default_value_t = 1, requires = "simulate")]
    tables: usize,
    /// Shuffle seed; overrides the config.
    #[arg(long)]
    seed: Option<u64>,
    /// Log file for the TUI (the terminal is busy drawing).
    #[arg(long, default_value = "holdem.log")]
    log_file: PathBuf,
    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn log_config() -> simplelog::Config {
    ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build()
}

fn run_tui(config: TableConfig, cli: &Cli, level: LevelFilter) -> Result<(), Box<dyn Error>> {
    if !io::stdout().is_terminal() {
        println!(
            "holdem needs a real terminal (TTY); try --simulate for headless play. Version: {}",
            holdem_engine::VERSION
        );
        return Ok(());
    }
    WriteLogger::init(level, log_config(), File::create(&cli.log_file)?)?;
    let mut app = AppState::new(config)?;
    let mut terminal = setup_terminal()?;
    let res = controller::run(&mut terminal, &mut app, Duration::from_millis(100));
    restore_terminal(terminal)?;
    Ok(res?)
}

/// Play up to `hands` hands at one bot-only table. Returns hands played.
fn simulate_table(mut config: TableConfig, hands: u64, id: usize) -> Result<u64, TableError> {
    config.human_seat = None;
    let mut table = Table::new(&config)?;
    let mut agents = AgentTable::for_seats(config.num_players);
    for seat in 0..config.num_players {
        let mut profile = BotProfile::for_difficulty(config.bot_difficulty);
        if let Some(seed) = config.seed {
            profile = profile.with_seed(seed.wrapping_mul(31).wrapping_add(seat as u64));
        }
        agents.set_agent(seat, Some(Box::new(BotAgent::new(profile))));
    }
    let mut played = 0;
    while played < hands && table.funded_players() >= 2 {
        GameEngine::new_hand(&mut table)?;
        agents.play_out(&mut table)?;
        played += 1;
    }
    let stacks: Vec<String> =
        table.players().iter().map(|p| format!("{}={}", p.name(), p.stack())).collect();
    info!("table {id}: {played} hands, stacks {}", stacks.join(" "));
    Ok(played)
}

fn run_simulation(
    config: TableConfig,
    hands: u64,
    tables: usize,
    level: LevelFilter,
) -> Result<(), Box<dyn Error>> {
    TermLogger::init(level, log_config(), TerminalMode::Mixed, ColorChoice::Auto)?;
    let workers: Vec<_> = (0..tables.max(1))
        .map(|id| {
            let mut cfg = config.clone();
            cfg.seed = config.seed.map(|s| s.wrapping_add(id as u64));
            thread::spawn(move || simulate_table(cfg, hands, id))
        })
        .collect();
    let mut total = 0;
    for (id, worker) in workers.into_iter().enumerate() {
        match worker.join() {
            Ok(Ok(played)) => total += played,
            Ok(Err(e)) => error!("table {id} stopped: {e}"),
            Err(_) => error!("table {id} panicked"),
        }
    }
    info!("simulated {total} hands across {} tables", tables.max(1));
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => TableConfig::load(path)?,
        None => TableConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    match cli.simulate {
        Some(hands) => run_simulation(config, hands, cli.tables, level),
        None => run_tui(config, &cli, level),
    }
}
