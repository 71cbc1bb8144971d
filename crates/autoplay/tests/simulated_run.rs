use ghostrider_autoplay::{
    tasks, write_json, write_text, AutoplayConfig, CombatStrategy, Command, Engine, Location,
    RunContext, RunResult, RunStatus, Scenario, SimulatedSession, StateChange, Task, TurnBudget,
};
use ghostrider_core::Monster;
use ghostrider_data::builtin_game_config;
use std::fs;

const DREAD_SCENARIO: &str = r#"{
  "seed": 3,
  "state": {
    "counters": { "turns_played": 300, "adventures": 30, "hp": 900, "max_hp": 1000 },
    "class": "Seal Clubber",
    "familiar": "Cocoabo",
    "familiars": ["Cocoabo"],
    "properties": { "flag_aabosses": "4" }
  },
  "raid_log": ["Ann (#2) got the carriageman 2100 sheet(s) drunker"],
  "commands": {
    "cli:dr limit hot|cold|stench|sleaze|spooky ghost": [
      { "change": "spend_turns", "turns": 1 },
      { "change": "raid_log", "line": "You (#1) drove some zombies out of the village (1 turn)" }
    ]
  }
}"#;

fn engine(turns: TurnBudget) -> Engine {
    let config = builtin_game_config().expect("builtin config");
    let settings = AutoplayConfig {
        turns,
        ..AutoplayConfig::default()
    };
    Engine::new(tasks::default_catalog(), RunContext::new(config, settings))
}

fn dread_session() -> SimulatedSession {
    SimulatedSession::new(Scenario::from_json(DREAD_SCENARIO).expect("scenario"))
}

#[test]
fn pinball_runs_until_two_zombie_banishes() {
    let mut engine = engine(TurnBudget::Turns(2));
    let mut session = dread_session();
    let result = engine.run(&mut session);

    assert_eq!(result.status, RunStatus::Completed);
    let order: Vec<&str> = result.cycles.iter().map(|cycle| cycle.task.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "Search the Mall",
            "Dreadsylvania Status",
            "Time to play some pinball! (Adjusting tilt)",
            "Dreadsylvania Status",
            "Time to play some pinball! (Adjusting tilt)",
        ]
    );
    assert_eq!(engine.run_context().dread.banished(Monster::Zombie), 1);
    assert_eq!(engine.run_context().dread.sheets, 2100);
}

#[test]
fn catalog_runs_dry_once_the_tilt_is_set() {
    let mut engine = engine(TurnBudget::Unlimited);
    let mut session = dread_session();
    let result = engine.run(&mut session);

    assert_eq!(
        result.status,
        RunStatus::Fatal {
            task: None,
            reason: "no eligible task".to_string()
        }
    );
    assert_eq!(engine.run_context().dread.banished(Monster::Zombie), 2);
    assert_eq!(engine.attempts("Time to play some pinball! (Adjusting tilt)"), 2);
    assert_eq!(session.state_mut().property("flag_aabosses"), Some("4"));
}

#[test]
fn closed_dungeon_skips_dread_tasks() {
    let mut scenario = Scenario::from_json(DREAD_SCENARIO).expect("scenario");
    scenario.raid_log = None;
    let mut engine = engine(TurnBudget::Unlimited);
    let mut session = SimulatedSession::new(scenario);
    engine.run(&mut session);
    assert!(!engine.run_context().dread.open);
    assert_eq!(engine.attempts("Time to play some pinball! (Adjusting tilt)"), 0);
    assert_eq!(engine.attempts("Dread Drunk"), 0);
}

#[test]
fn music_box_parts_set_their_choices() {
    let mut scenario = Scenario::from_json(DREAD_SCENARIO).expect("scenario");
    scenario.state.class = "Accordion Thief".to_string();
    scenario.state.items.insert("Freddy Kruegerand".to_string(), 80);
    if let Some(log) = scenario.raid_log.as_mut() {
        log.push("You (#1) drove some zombies out of the village (1 turn)".to_string());
        log.push("You (#1) drove some zombies out of the village (1 turn)".to_string());
    }
    scenario.commands.insert(
        Command::RunChoice { option: -1 }.stable_key(),
        vec![
            StateChange::SpendTurns { turns: 1 },
            StateChange::RaidLog {
                line: "You (#1) made the forest less spooky (1 turn)".to_string(),
            },
        ],
    );
    let mut engine = engine(TurnBudget::Turns(1));
    let mut session = SimulatedSession::new(scenario);
    let result = engine.run(&mut session);

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(engine.attempts("Get some music box parts"), 1);
    let state = session.state_mut();
    assert_eq!(state.property("choiceAdventure721"), Some("3"));
    assert_eq!(state.property("choiceAdventure724"), Some("1"));
    assert!(state.have_item("Dreadsylvanian skeleton key"));
    assert!(session
        .log()
        .iter()
        .any(|entry| entry == "visit:clan_dreadsylvania.php?action=forceloc&loc=1"));
}

#[test]
fn zero_hp_is_fatal() {
    let mut scenario = Scenario::from_json(DREAD_SCENARIO).expect("scenario");
    scenario.state.counters.hp = 0;
    let mut engine = engine(TurnBudget::Unlimited);
    let result = engine.run(&mut SimulatedSession::new(scenario));
    match result.status {
        RunStatus::Fatal { task, reason } => {
            assert_eq!(task.as_deref(), Some("Ow!"));
            assert!(reason.contains("0 hp"));
        }
        other => panic!("expected fatal, got {other:?}"),
    }
}

fn fight_outcomes(seed: u64) -> Vec<bool> {
    let mut scenario = Scenario::from_json(DREAD_SCENARIO).expect("scenario");
    scenario.seed = seed;
    scenario.encounters.loss_rate = 0.5;
    let tasks = vec![Task::new("Brawl", |_| false, |_| Ok(Some(Location::new("The Spooky Forest"))))
        .combat(CombatStrategy::standard())];
    let config = builtin_game_config().expect("builtin config");
    let settings = AutoplayConfig {
        turns: TurnBudget::Turns(12),
        ..AutoplayConfig::default()
    };
    let mut engine = Engine::new(tasks, RunContext::new(config, settings));
    let result = engine.run(&mut SimulatedSession::new(scenario));
    result
        .cycles
        .iter()
        .filter_map(|cycle| cycle.encounter.as_ref().map(|fight| fight.won))
        .collect()
}

#[test]
fn same_seed_replays_the_same_fights() {
    let first = fight_outcomes(42);
    assert_eq!(first.len(), 12);
    assert_eq!(first, fight_outcomes(42));
}

#[test]
fn reports_round_trip_through_files() {
    let mut engine = engine(TurnBudget::Turns(2));
    let result = engine.run(&mut dread_session());
    let dir = std::env::temp_dir().join(format!("ghostrider-report-{}", std::process::id()));
    let json = dir.join("run.json");
    let text = dir.join("run.txt");
    write_json(&json, &result).expect("json report");
    write_text(&text, &result).expect("text report");

    let loaded: RunResult =
        serde_json::from_str(&fs::read_to_string(&json).expect("read json")).expect("parse json");
    assert_eq!(loaded.status, result.status);
    assert_eq!(loaded.cycles.len(), result.cycles.len());
    let report = fs::read_to_string(&text).expect("read text");
    assert!(report.starts_with("status: Completed"));
    assert!(report.contains("Time to play some pinball!"));
    fs::remove_dir_all(&dir).ok();
}
