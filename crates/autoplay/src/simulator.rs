use crate::{
    ActionOutcome, AutoplayError, ChoiceTable, CombatStrategy, Command, Encounter, Environment,
    Loadout, Location, Transport, WanderTarget, WandererRequest,
};
use ghostrider_core::{Resource, RngState, SessionState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scripted effect of a command or an adventure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum StateChange {
    SetProperty { key: String, value: String },
    AddProperty { key: String, amount: i64 },
    AddItem { item: String, quantity: i64 },
    AddEffect { effect: String, turns: u32 },
    RemoveEffect { effect: String },
    SpendTurns { turns: u32 },
    AddAdventures { amount: i64 },
    AddInebriety { amount: u32 },
    AddFullness { amount: u32 },
    /// Appends a line to the raid log, if the dungeon is open.
    RaidLog { line: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterRules {
    #[serde(default = "default_monster")]
    pub monster: String,
    #[serde(default)]
    pub loss_rate: f64,
    #[serde(default)]
    pub on_win: Vec<StateChange>,
}

fn default_monster() -> String {
    "wandering monster".to_string()
}

impl Default for EncounterRules {
    fn default() -> Self {
        Self {
            monster: default_monster(),
            loss_rate: 0.0,
            on_win: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub state: SessionState,
    /// Raid log lines; `None` means the dungeon is closed.
    #[serde(default)]
    pub raid_log: Option<Vec<String>>,
    /// Keyed by `Command::stable_key`.
    #[serde(default)]
    pub commands: BTreeMap<String, Vec<StateChange>>,
    /// Applied after every adventure at the named location.
    #[serde(default)]
    pub locations: BTreeMap<String, Vec<StateChange>>,
    #[serde(default)]
    pub encounters: EncounterRules,
    #[serde(default)]
    pub wanderer: Option<WanderTarget>,
    #[serde(default)]
    pub seed: u64,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, AutoplayError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// In-memory session for dry runs and tests.
#[derive(Debug, Clone)]
pub struct SimulatedSession {
    state: SessionState,
    raid_log: Option<Vec<String>>,
    commands: BTreeMap<String, Vec<StateChange>>,
    locations: BTreeMap<String, Vec<StateChange>>,
    encounters: EncounterRules,
    wanderer: WanderTarget,
    rng: RngState,
    log: Vec<String>,
    loadouts: Vec<Loadout>,
}

impl SimulatedSession {
    pub fn new(scenario: Scenario) -> Self {
        let wanderer = scenario.wanderer.unwrap_or_else(|| WanderTarget {
            location: Location::new("Noob Cave"),
            choices: ChoiceTable::new(),
            equipment: Vec::new(),
        });
        Self {
            state: scenario.state,
            raid_log: scenario.raid_log,
            commands: scenario.commands,
            locations: scenario.locations,
            encounters: scenario.encounters,
            wanderer,
            rng: RngState::from_seed(scenario.seed),
            log: Vec::new(),
            loadouts: Vec::new(),
        }
    }

    pub fn from_state(state: SessionState) -> Self {
        Self::new(Scenario {
            state,
            raid_log: None,
            commands: BTreeMap::new(),
            locations: BTreeMap::new(),
            encounters: EncounterRules::default(),
            wanderer: None,
            seed: 0,
        })
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Everything sent to the session, in order.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn loadouts(&self) -> &[Loadout] {
        &self.loadouts
    }

    pub fn set_loss_rate(&mut self, rate: f64) {
        self.encounters.loss_rate = rate;
    }

    pub fn script_command(&mut self, command: &Command, changes: Vec<StateChange>) {
        self.commands.insert(command.stable_key(), changes);
    }

    pub fn script_location(&mut self, location: &str, changes: Vec<StateChange>) {
        self.locations.insert(location.to_string(), changes);
    }

    pub fn status_report(&self) -> String {
        match &self.raid_log {
            Some(lines) => format!(
                "<b>Current Clan Dungeons:</b>\n<b>Dreadsylvania</b>\n{}\n<b>Loot Distribution:</b>\n",
                lines.join("\n")
            ),
            None => "<b>Current Clan Dungeons:</b>\n".to_string(),
        }
    }

    pub fn apply(&mut self, change: &StateChange) {
        match change {
            StateChange::SetProperty { key, value } => self.state.set_property(key, value.as_str()),
            StateChange::AddProperty { key, amount } => {
                let value = self.state.property_int(key) + amount;
                self.state.set_property(key, value.to_string());
            }
            StateChange::AddItem { item, quantity } => self.add_item(item, *quantity),
            StateChange::AddEffect { effect, turns } => {
                *self.state.effects.entry(effect.clone()).or_insert(0) += turns;
            }
            StateChange::RemoveEffect { effect } => {
                self.state.effects.remove(effect);
            }
            StateChange::SpendTurns { turns } => self.spend_turns(*turns),
            StateChange::AddAdventures { amount } => self.state.counters.adventures += amount,
            StateChange::AddInebriety { amount } => self.state.counters.inebriety += amount,
            StateChange::AddFullness { amount } => self.state.counters.fullness += amount,
            StateChange::RaidLog { line } => {
                if let Some(lines) = self.raid_log.as_mut() {
                    lines.push(line.clone());
                }
            }
        }
    }

    fn apply_all(&mut self, changes: &[StateChange]) {
        for change in changes {
            self.apply(change);
        }
    }

    fn add_item(&mut self, item: &str, quantity: i64) {
        let held = i64::from(self.state.item_amount(item));
        let next = (held + quantity).max(0);
        if next == 0 {
            self.state.items.remove(item);
        } else {
            self.state
                .items
                .insert(item.to_string(), u32::try_from(next).unwrap_or(u32::MAX));
        }
    }

    fn spend_turns(&mut self, turns: u32) {
        self.state.counters.turns_played += turns;
        self.state.counters.adventures -= i64::from(turns);
        for remaining in self.state.effects.values_mut() {
            *remaining = remaining.saturating_sub(turns);
        }
        self.state.effects.retain(|_, remaining| *remaining > 0);
    }

    fn consume(&mut self, item: &str, verb: &str) -> Result<(), AutoplayError> {
        if self.state.item_amount(item) == 0 {
            return Err(AutoplayError::Transport(format!("cannot {verb} {item}: none held")));
        }
        self.add_item(item, -1);
        Ok(())
    }
}

impl Environment for SimulatedSession {
    fn state(&self) -> &SessionState {
        &self.state
    }

    fn restore_resource(&mut self, resource: Resource, target: i64) -> Result<(), AutoplayError> {
        let counters = &mut self.state.counters;
        let (current, maximum) = match resource {
            Resource::Hp => (&mut counters.hp, counters.max_hp),
            Resource::Mp => (&mut counters.mp, counters.max_mp),
        };
        *current = (*current).max(target.min(maximum));
        Ok(())
    }

    fn execute(&mut self, command: &Command) -> Result<(), AutoplayError> {
        self.log.push(command.stable_key());
        match command {
            Command::Eat { item } => {
                self.consume(item, "eat")?;
                self.state.counters.fullness += 1;
            }
            Command::Use { item } => self.consume(item, "use")?,
            Command::Retrieve { item, quantity } => {
                let missing = i64::from(*quantity) - i64::from(self.state.item_amount(item));
                if missing > 0 {
                    self.add_item(item, missing);
                }
            }
            Command::UseFamiliar { familiar } => {
                if !self.state.have_familiar(familiar) {
                    return Err(AutoplayError::Transport(format!("familiar {familiar} is not owned")));
                }
                self.state.familiar = Some(familiar.clone());
            }
            Command::Cli { .. }
            | Command::UseSkill { .. }
            | Command::Visit { .. }
            | Command::RunChoice { .. } => {}
        }
        if let Some(changes) = self.commands.get(&command.stable_key()).cloned() {
            self.apply_all(&changes);
        }
        Ok(())
    }

    fn set_property(&mut self, key: &str, value: &str) {
        self.state.set_property(key, value);
    }
}

impl Transport for SimulatedSession {
    fn fetch_status_report(&mut self) -> Result<String, AutoplayError> {
        Ok(self.status_report())
    }

    fn perform_action(
        &mut self,
        target: &Location,
        strategy: Option<&CombatStrategy>,
        choices: &ChoiceTable,
    ) -> Result<ActionOutcome, AutoplayError> {
        if self.state.counters.adventures <= 0 {
            return Err(AutoplayError::Transport("no adventures left".to_string()));
        }
        self.log.push(format!("adventure:{target}"));
        for (choice, option) in choices {
            self.log.push(format!("choice:{choice}={option}"));
        }
        let encounter = match strategy {
            Some(strategy) if !strategy.aborts_immediately() => {
                let lost = self.rng.roll(self.encounters.loss_rate);
                if lost {
                    *self.state.effects.entry("Beaten Up".to_string()).or_insert(0) += 3;
                } else {
                    let rewards = self.encounters.on_win.clone();
                    self.apply_all(&rewards);
                }
                Some(Encounter {
                    monster: self.encounters.monster.clone(),
                    won: !lost,
                })
            }
            _ => None,
        };
        self.spend_turns(1);
        if let Some(changes) = self.locations.get(target.name()).cloned() {
            self.apply_all(&changes);
        }
        Ok(ActionOutcome {
            turns_spent: 1,
            encounter,
        })
    }

    fn apply_loadout(&mut self, loadout: &Loadout) -> Result<(), AutoplayError> {
        if let Some(familiar) = &loadout.familiar {
            self.state.familiar = Some(familiar.clone());
        }
        self.state.equipped = loadout.slots.clone();
        self.log.push(format!("dress:{}", loadout.summary()));
        self.loadouts.push(loadout.clone());
        Ok(())
    }

    fn wanderer(&mut self, _request: WandererRequest) -> Result<WanderTarget, AutoplayError> {
        Ok(self.wanderer.clone())
    }
}
