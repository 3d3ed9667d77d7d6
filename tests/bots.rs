use holdem_engine::agents::{AgentKind, AgentTable, BotAgent, BotProfile, Difficulty, HumanAgent, PlayerAgent};
use holdem_engine::betting::Action;
use holdem_engine::config::TableConfig;
use holdem_engine::engine::GameEngine;
use holdem_engine::state::PlayerView;
use holdem_engine::table::Table;

fn bot_table(config: &TableConfig) -> (Table, AgentTable) {
    let table = Table::new(config).expect("valid config");
    let mut agents = AgentTable::for_seats(config.num_players);
    for seat in 0..config.num_players {
        let difficulty = Difficulty::ALL[seat % Difficulty::ALL.len()];
        let profile = BotProfile::for_difficulty(difficulty).with_seed(1000 + seat as u64);
        agents.set_agent(seat, Some(Box::new(BotAgent::new(profile))));
    }
    (table, agents)
}

#[test]
fn bots_play_many_hands_without_losing_chips() {
    let config = TableConfig {
        num_players: 6,
        human_seat: None,
        ante: 1,
        seed: Some(42),
        ..TableConfig::default()
    };
    let total = config.starting_stack * config.num_players as u64;
    let (mut table, mut agents) = bot_table(&config);

    let mut hands = 0;
    while hands < 200 && table.funded_players() >= 2 {
        GameEngine::new_hand(&mut table).unwrap();
        let actions = agents.play_out(&mut table).unwrap();
        let state = table.state().unwrap();
        assert!(state.is_complete(), "bots stalled after {actions} actions in hand {}", hands + 1);
        assert_eq!(state.validate(), Ok(()));
        let chips: u64 = table.players().iter().map(|p| p.stack()).sum();
        assert_eq!(chips, total);
        hands += 1;
    }
    assert_eq!(table.hands_played(), hands);
}

#[test]
fn seeded_bot_tables_are_reproducible() {
    let config = TableConfig { num_players: 4, human_seat: None, seed: Some(5), ..TableConfig::default() };
    let run = || {
        let (mut table, mut agents) = bot_table(&config);
        for _ in 0..25 {
            if table.funded_players() < 2 {
                break;
            }
            GameEngine::new_hand(&mut table).unwrap();
            agents.play_out(&mut table).unwrap();
        }
        table.players().iter().map(|p| p.stack()).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

/// Calls everything, checks when it can.
struct CallingStation;

impl PlayerAgent for CallingStation {
    fn on_turn(&mut self, view: &PlayerView) -> Option<Action> {
        view.legal.map(|l| l.passive())
    }
}

#[test]
fn custom_agents_plug_into_the_table() {
    let config = TableConfig { num_players: 3, human_seat: None, seed: Some(8), ..TableConfig::default() };
    let mut table = Table::new(&config).unwrap();
    let mut agents = AgentTable::for_seats(3);
    for seat in 0..3 {
        agents.set_agent(seat, Some(Box::new(CallingStation)));
    }
    assert!(!agents.any_bots());
    GameEngine::new_hand(&mut table).unwrap();
    let actions = agents.play_out(&mut table).unwrap();
    let state = table.state().unwrap();
    assert!(state.is_complete());
    assert_eq!(state.board().len(), 5, "nobody folds, so the hand reaches showdown");
    // two limps and a check preflop, then three checks on each later street
    assert_eq!(actions, 3 + 3 * 3);
}

#[test]
fn human_seat_waits_while_bots_act_around_it() {
    let config = TableConfig { num_players: 3, human_seat: Some(0), seed: Some(13), ..TableConfig::default() };
    let mut table = Table::new(&config).unwrap();
    let mut agents = AgentTable::for_seats(3);
    agents.set_agent(0, Some(Box::new(HumanAgent::new())));
    for seat in 1..3 {
        let profile = BotProfile::for_difficulty(Difficulty::Easy).with_seed(seat as u64);
        agents.set_agent(seat, Some(Box::new(BotAgent::new(profile))));
    }
    assert!(agents.has_agent(0));
    assert_eq!(agents.agent_kind(0), Some(AgentKind::Human));
    assert!(agents.any_bots());

    // the button is first to act three-handed, and it is the human
    GameEngine::new_hand(&mut table).unwrap();
    assert_eq!(table.current_seat(), Some(0));
    assert_eq!(agents.play_out(&mut table).unwrap(), 0);

    assert!(agents.receive(0, Action::Fold));
    agents.play_out(&mut table).unwrap();
    assert!(!table.hand_in_progress(), "bots settle the blinds between them");
}

#[test]
fn human_agent_holds_one_action_at_a_time() {
    let mut human = HumanAgent::new();
    assert!(!human.has_pending());
    assert!(human.receive(Action::Call));
    assert!(!human.receive(Action::Fold));
    assert!(human.has_pending());
    human.rejected();
    assert!(!human.has_pending());
}
