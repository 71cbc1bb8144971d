use anyhow::{bail, Context, Result};
use ghostrider_autoplay::{
    tasks, write_json, write_text, AutoplayConfig, Engine, RunContext, RunStatus, Scenario,
    SimulatedSession, TurnBudget,
};
use ghostrider_core::{DreadStatus, GameConfig};
use ghostrider_data::{builtin_game_config, load_game_config};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const DEMO_SCENARIO: &str = include_str!("../scenarios/haunted_pantry.json");

const USAGE: &str = "\
usage: ghostrider [TURNS] [options]

  TURNS                 turns to play; zero or negative keeps that many adventures
  --familiar NAME       familiar for contested tasks (default: the session's current one)
  --scenario FILE       simulated session to run against (default: builtin demo)
  --seed N              override the scenario seed
  --config DIR          game config directory (default: builtin assets)
  --max-cycles N        safety bound on scheduler cycles
  --json FILE           write the run result as JSON
  --text FILE           write the run report as text
  --debug FILE          parse a clan status page and print the dungeon status
  -h, --help            show this message";

#[derive(Debug, Clone, Default)]
struct CliOptions {
    turns: Option<i64>,
    familiar: Option<String>,
    scenario: Option<PathBuf>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    max_cycles: Option<u32>,
    json: Option<PathBuf>,
    text: Option<PathBuf>,
    debug: Option<PathBuf>,
    help: bool,
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let arg = args[idx].as_str();
        let mut value = || -> Result<String> {
            idx += 1;
            args.get(idx)
                .cloned()
                .with_context(|| format!("{arg} needs a value"))
        };
        match arg {
            "-h" | "--help" => options.help = true,
            "--familiar" => options.familiar = Some(value()?),
            "--scenario" => options.scenario = Some(PathBuf::from(value()?)),
            "--config" => options.config = Some(PathBuf::from(value()?)),
            "--json" => options.json = Some(PathBuf::from(value()?)),
            "--text" => options.text = Some(PathBuf::from(value()?)),
            "--debug" => options.debug = Some(PathBuf::from(value()?)),
            "--seed" => {
                let raw = value()?;
                options.seed = Some(raw.parse().with_context(|| format!("bad seed {raw}"))?);
            }
            "--max-cycles" => {
                let raw = value()?;
                options.max_cycles =
                    Some(raw.parse().with_context(|| format!("bad cycle bound {raw}"))?);
            }
            other if options.turns.is_none() && !other.starts_with("--") => {
                options.turns = Some(
                    other
                        .parse()
                        .with_context(|| format!("turns must be a whole number, got {other}"))?,
                );
            }
            other => bail!("unknown argument {other}"),
        }
        idx += 1;
    }
    Ok(options)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(dir: Option<&Path>) -> Result<GameConfig> {
    match dir {
        Some(dir) => load_game_config(dir),
        None => builtin_game_config(),
    }
}

fn load_scenario(path: Option<&Path>) -> Result<Scenario> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => DEMO_SCENARIO.to_string(),
    };
    Scenario::from_json(&text).context("failed to parse scenario")
}

fn print_dread_status(path: &Path) -> Result<()> {
    let page =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    println!("{}", DreadStatus::parse(&page));
    Ok(())
}

fn run(options: CliOptions) -> Result<bool> {
    if let Some(path) = &options.debug {
        print_dread_status(path)?;
        return Ok(true);
    }

    let config = load_config(options.config.as_deref())?;
    let mut scenario = load_scenario(options.scenario.as_deref())?;
    if let Some(seed) = options.seed {
        scenario.seed = seed;
    }
    let mut settings = AutoplayConfig {
        turns: options.turns.map_or(TurnBudget::Unlimited, TurnBudget::from_count),
        familiar: options.familiar,
        ..AutoplayConfig::default()
    };
    if let Some(max_cycles) = options.max_cycles {
        settings.max_cycles = max_cycles;
    }
    info!(turns = ?settings.turns, seed = scenario.seed, "starting the ghost ride");

    let mut session = SimulatedSession::new(scenario);
    let mut engine = Engine::new(tasks::default_catalog(), RunContext::new(config, settings));
    let result = engine.run(&mut session);

    println!("{}", result.to_text_report());
    if let Some(path) = &options.json {
        write_json(path, &result)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &options.text {
        write_text(path, &result)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(!matches!(result.status, RunStatus::Fatal { .. }))
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("ghostrider: {err:#}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };
    if options.help {
        println!("{USAGE}");
        return;
    }
    init_tracing();
    match run(options) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("ghostrider: {err:#}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn positional_turns_accept_negative_counts() {
        let options = parse_cli_options(&args(&["-20", "--seed", "7"])).expect("options");
        assert_eq!(options.turns, Some(-20));
        assert_eq!(options.seed, Some(7));
    }

    #[test]
    fn options_take_their_values() {
        let options = parse_cli_options(&args(&[
            "--familiar",
            "Cocoabo",
            "--json",
            "out/run.json",
            "30",
        ]))
        .expect("options");
        assert_eq!(options.familiar.as_deref(), Some("Cocoabo"));
        assert_eq!(options.json, Some(PathBuf::from("out/run.json")));
        assert_eq!(options.turns, Some(30));
    }

    #[test]
    fn missing_value_and_unknown_flag_are_errors() {
        assert!(parse_cli_options(&args(&["--seed"])).is_err());
        assert!(parse_cli_options(&args(&["--vonnegut"])).is_err());
        assert!(parse_cli_options(&args(&["ten"])).is_err());
    }

    #[test]
    fn demo_scenario_parses() {
        let scenario = load_scenario(None).expect("demo scenario");
        assert!(scenario.raid_log.is_some());
        assert!(scenario.state.have_familiar("Cocoabo"));
    }
}
