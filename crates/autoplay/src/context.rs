use crate::{AutoplayConfig, AutoplayError, Command, Optimizer, Session};
use ghostrider_core::{DreadStatus, GameConfig, SessionCounters, SessionState, ValueCatalog};
use std::collections::BTreeSet;
use tracing::info;

/// Small bits of state tasks share across cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMemory {
    /// Turn count at the last status refresh.
    pub status_turn: u32,
    pub digitize_initialized: bool,
    pub flags: BTreeSet<String>,
}

impl Default for RunMemory {
    fn default() -> Self {
        Self {
            status_turn: 0,
            digitize_initialized: true,
            flags: BTreeSet::new(),
        }
    }
}

/// Everything one run owns besides the session itself.
pub struct RunContext {
    pub settings: AutoplayConfig,
    pub dread: DreadStatus,
    pub values: ValueCatalog,
    pub optimizer: Optimizer,
    pub memory: RunMemory,
}

impl RunContext {
    pub fn new(config: GameConfig, settings: AutoplayConfig) -> Self {
        let values = ValueCatalog::from_config(&config.values);
        Self {
            settings,
            dread: DreadStatus::default(),
            values,
            optimizer: Optimizer::new(config),
            memory: RunMemory::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        self.optimizer.config()
    }

    /// Forget everything derived during a run.
    pub fn reset(&mut self) {
        self.dread = DreadStatus::default();
        self.values.reset_derived();
        self.optimizer.reset();
        self.memory = RunMemory::default();
    }
}

/// What hooks and predicates see.
pub struct TaskContext<'a> {
    pub session: &'a mut dyn Session,
    pub run: &'a mut RunContext,
}

impl<'a> TaskContext<'a> {
    pub fn new(session: &'a mut dyn Session, run: &'a mut RunContext) -> Self {
        Self { session, run }
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn counters(&self) -> SessionCounters {
        self.session.read_counters()
    }

    pub fn have_item(&self, item: &str) -> bool {
        self.state().have_item(item)
    }

    pub fn property_int(&self, key: &str) -> i64 {
        self.state().property_int(key)
    }

    pub fn property_bool(&self, key: &str) -> bool {
        self.state().property_bool(key)
    }

    pub fn execute(&mut self, command: Command) -> Result<(), AutoplayError> {
        self.session.execute(&command)
    }

    pub fn set_property(&mut self, key: &str, value: &str) {
        self.session.set_property(key, value);
    }

    /// Re-read the raid log into a fresh snapshot.
    pub fn refresh_dread(&mut self) -> Result<(), AutoplayError> {
        let page = self.session.fetch_status_report()?;
        self.run.dread.refresh(&page);
        Ok(())
    }

    /// Refresh at most once per turn count.
    pub fn update_dread_status(&mut self) -> Result<(), AutoplayError> {
        let turns = self.counters().turns_played;
        if self.run.memory.status_turn == turns {
            return Ok(());
        }
        self.run.memory.status_turn = turns;
        self.refresh_dread()?;
        info!("{}", self.run.dread);
        Ok(())
    }
}
