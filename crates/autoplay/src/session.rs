use crate::{AutoplayError, ChoiceTable, CombatStrategy, Loadout};
use ghostrider_core::{Resource, SessionCounters, SessionState};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(pub String);

impl Location {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Non-contested commands a task can send to the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Cli { line: String },
    UseSkill { skill: String },
    Use { item: String },
    Eat { item: String },
    Visit { url: String },
    RunChoice { option: i32 },
    Retrieve { item: String, quantity: u32 },
    UseFamiliar { familiar: String },
}

impl Command {
    pub fn cli(line: &str) -> Self {
        Self::Cli {
            line: line.to_string(),
        }
    }

    pub fn use_skill(skill: &str) -> Self {
        Self::UseSkill {
            skill: skill.to_string(),
        }
    }

    pub fn use_item(item: &str) -> Self {
        Self::Use {
            item: item.to_string(),
        }
    }

    pub fn eat(item: &str) -> Self {
        Self::Eat {
            item: item.to_string(),
        }
    }

    pub fn visit(url: &str) -> Self {
        Self::Visit {
            url: url.to_string(),
        }
    }

    pub fn retrieve(item: &str, quantity: u32) -> Self {
        Self::Retrieve {
            item: item.to_string(),
            quantity,
        }
    }

    /// Key used to look up scripted effects of a command.
    pub fn stable_key(&self) -> String {
        match self {
            Self::Cli { line } => format!("cli:{line}"),
            Self::UseSkill { skill } => format!("skill:{skill}"),
            Self::Use { item } => format!("use:{item}"),
            Self::Eat { item } => format!("eat:{item}"),
            Self::Visit { url } => format!("visit:{url}"),
            Self::RunChoice { option } => format!("choice:{option}"),
            Self::Retrieve { item, .. } => format!("retrieve:{item}"),
            Self::UseFamiliar { familiar } => format!("familiar:{familiar}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Encounter {
    pub monster: String,
    pub won: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionOutcome {
    pub turns_spent: u32,
    #[serde(default)]
    pub encounter: Option<Encounter>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WandererKind {
    Wanderer,
    YellowRay,
    FreeFight,
    Backup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WandererRequest {
    pub kind: WandererKind,
    /// Whether the target may be a place only reachable while sober.
    pub drunk_safe: bool,
}

/// Where the wanderer manager wants the next wandering encounter to happen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WanderTarget {
    pub location: Location,
    #[serde(default)]
    pub choices: ChoiceTable,
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// Readable session state plus the non-contested commands.
pub trait Environment {
    fn state(&self) -> &SessionState;

    fn read_counters(&self) -> SessionCounters {
        self.state().counters
    }

    /// Bring a resource up to at least `target`.
    fn restore_resource(&mut self, resource: Resource, target: i64) -> Result<(), AutoplayError>;

    fn execute(&mut self, command: &Command) -> Result<(), AutoplayError>;

    fn set_property(&mut self, key: &str, value: &str);
}

/// Everything that talks to the remote game.
pub trait Transport {
    fn fetch_status_report(&mut self) -> Result<String, AutoplayError>;

    fn perform_action(
        &mut self,
        target: &Location,
        strategy: Option<&CombatStrategy>,
        choices: &ChoiceTable,
    ) -> Result<ActionOutcome, AutoplayError>;

    fn apply_loadout(&mut self, loadout: &Loadout) -> Result<(), AutoplayError>;

    fn wanderer(&mut self, request: WandererRequest) -> Result<WanderTarget, AutoplayError>;
}

pub trait Session: Environment + Transport {}

impl<T: Environment + Transport + ?Sized> Session for T {}
