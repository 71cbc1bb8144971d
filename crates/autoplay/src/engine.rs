use crate::{
    AutoplayError, ChoiceTable, Command, CycleRecord, Loadout, Purpose, RunContext, RunResult,
    RunStatus, RunSummary, Session, SessionAccountant, StopReason, Task, TaskContext,
    ABORT_PROPERTY, COMBAT_LOST_PROPERTY,
};
use ghostrider_core::{Resource, SessionCounters, Sobriety};
use std::time::Instant;
use tracing::{error, info, warn};

/// Runs the catalog: one task per cycle, first eligible in declaration order.
pub struct Engine {
    tasks: Vec<Task>,
    attempts: Vec<u32>,
    run: RunContext,
}

impl Engine {
    pub fn new(tasks: Vec<Task>, run: RunContext) -> Self {
        let attempts = vec![0; tasks.len()];
        Self {
            tasks,
            attempts,
            run,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn run_context(&self) -> &RunContext {
        &self.run
    }

    pub fn run_context_mut(&mut self) -> &mut RunContext {
        &mut self.run
    }

    /// Times the named task has been executed this run.
    pub fn attempts(&self, name: &str) -> u32 {
        self.tasks
            .iter()
            .position(|task| task.name == name)
            .map_or(0, |index| self.attempts[index])
    }

    /// Run under the configured turn budget.
    pub fn run<S: Session>(&mut self, session: &mut S) -> RunResult {
        let start_turns = session.read_counters().turns_played;
        let budget = self.run.settings.turns;
        self.run_until(session, move |counters| budget.stop_reason(start_turns, counters))
    }

    pub fn run_until<S, F>(&mut self, session: &mut S, mut stop: F) -> RunResult
    where
        S: Session,
        F: FnMut(&SessionCounters) -> Option<StopReason>,
    {
        let started_at = Instant::now();
        let session: &mut dyn Session = session;
        let remembered: Vec<(String, Option<String>)> = self
            .run
            .settings
            .restore_properties
            .iter()
            .map(|key| (key.clone(), session.state().property(key).map(str::to_string)))
            .collect();
        let familiar = self
            .run
            .settings
            .familiar
            .clone()
            .or_else(|| session.state().familiar.clone());
        session.set_property(COMBAT_LOST_PROPERTY, "false");
        let mut accountant = SessionAccountant::begin(session.state());
        let mut cycles = Vec::new();

        let status = self.drive(
            session,
            &mut stop,
            familiar.as_deref(),
            &mut accountant,
            &mut cycles,
        );
        let summary = self.teardown(session, &remembered, familiar.as_deref(), &accountant, started_at);
        RunResult {
            status,
            cycles,
            summary,
        }
    }

    fn drive(
        &mut self,
        session: &mut dyn Session,
        stop: &mut dyn FnMut(&SessionCounters) -> Option<StopReason>,
        familiar: Option<&str>,
        accountant: &mut SessionAccountant,
        cycles: &mut Vec<CycleRecord>,
    ) -> RunStatus {
        for cycle in 0..self.run.settings.max_cycles {
            if let Some(status) = check_stop(session, stop) {
                return status;
            }
            let Some(index) = self.next_task(session) else {
                let err = AutoplayError::NoEligibleTask;
                error!("{err}");
                return RunStatus::Fatal {
                    task: None,
                    reason: err.to_string(),
                };
            };
            match self.execute(index, cycle, session, familiar) {
                Ok(record) => {
                    accountant.record_action();
                    cycles.push(record);
                }
                Err(err) => {
                    let task = self.tasks[index].name.clone();
                    error!(task = %task, "caught an error doing the ghost ride: {err}");
                    return RunStatus::Fatal {
                        task: Some(task),
                        reason: err.to_string(),
                    };
                }
            }
        }
        check_stop(session, stop).unwrap_or(RunStatus::MaxCycles)
    }

    /// First task that passes the sobriety gate, is ready and is not completed.
    pub fn next_task(&mut self, session: &mut dyn Session) -> Option<usize> {
        let counters = session.read_counters();
        let ctx = TaskContext::new(session, &mut self.run);
        self.tasks.iter().position(|task| {
            available(task, &counters) && task.is_ready(&ctx) && !task.is_completed(&ctx)
        })
    }

    fn execute(
        &mut self,
        index: usize,
        cycle: u32,
        session: &mut dyn Session,
        familiar: Option<&str>,
    ) -> Result<CycleRecord, AutoplayError> {
        let task = &self.tasks[index];
        if let Some(limit) = task.limit {
            if self.attempts[index] >= limit {
                return Err(AutoplayError::TaskLimitExceeded {
                    task: task.name.clone(),
                    limit,
                });
            }
        }
        let before = session.read_counters();
        let mut ctx = TaskContext::new(&mut *session, &mut self.run);

        prepare(task, &mut ctx)?;
        let loadout = dress(task, &mut ctx, familiar)?;
        info!(
            task = %task.name,
            expected_value = ?loadout.as_ref().and_then(|loadout| loadout.expected_value),
            "executing"
        );

        let choices = match &task.choices {
            Some(choices) => choices(&mut ctx)?,
            None => ChoiceTable::new(),
        };
        for (choice, option) in &choices {
            ctx.set_property(&format!("choiceAdventure{choice}"), &option.to_string());
        }
        let strategy = task.contest.as_ref().map(|contest| (contest.strategy)(&ctx));

        let target = (task.action)(&mut ctx)?;
        let mut encounter = None;
        if let Some(location) = &target {
            let outcome = ctx
                .session
                .perform_action(location, strategy.as_ref(), &choices)?;
            if let Some(fight) = &outcome.encounter {
                if !fight.won {
                    warn!(task = %task.name, monster = %fight.monster, "lost a fight");
                    ctx.set_property(COMBAT_LOST_PROPERTY, "true");
                }
            }
            encounter = outcome.encounter;
        }
        if let Some(post) = &task.post {
            post(&mut ctx)?;
        }

        let name = task.name.clone();
        self.attempts[index] += 1;
        let after = session.read_counters();
        Ok(CycleRecord {
            cycle,
            task: name,
            target: target.map(|location| location.to_string()),
            loadout: loadout.as_ref().map(Loadout::summary),
            rider: loadout
                .as_ref()
                .and_then(|loadout| loadout.rider.as_ref())
                .map(|mounted| mounted.rider.familiar.clone()),
            expected_value: loadout.and_then(|loadout| loadout.expected_value),
            encounter,
            turns_before: before.turns_played,
            turns_after: after.turns_played,
            adventures_before: before.adventures,
            adventures_after: after.adventures,
        })
    }

    fn teardown(
        &mut self,
        session: &mut dyn Session,
        remembered: &[(String, Option<String>)],
        familiar: Option<&str>,
        accountant: &SessionAccountant,
        started_at: Instant,
    ) -> RunSummary {
        for (key, value) in remembered {
            session.set_property(key, value.as_deref().unwrap_or(""));
        }
        if let Some(familiar) = familiar {
            let command = Command::UseFamiliar {
                familiar: familiar.to_string(),
            };
            if let Err(err) = session.execute(&command) {
                warn!("could not restore familiar {familiar}: {err}");
            }
        }
        let summary = accountant.summary(session.state(), started_at.elapsed());
        info!(
            "ghostrider has run {} actions, and produced the following items:",
            summary.actions
        );
        for delta in &summary.items {
            info!(" {}: {}", delta.item, delta.quantity);
        }
        summary
    }
}

/// Sobriety gate: drunk means inebriety above the limit.
pub fn available(task: &Task, counters: &SessionCounters) -> bool {
    match task.sobriety {
        Some(Sobriety::Sober) => !counters.is_drunk(),
        Some(Sobriety::Drunk) => counters.is_drunk(),
        None => true,
    }
}

fn check_stop(
    session: &mut dyn Session,
    stop: &mut dyn FnMut(&SessionCounters) -> Option<StopReason>,
) -> Option<RunStatus> {
    let abort = session
        .state()
        .property(ABORT_PROPERTY)
        .is_some_and(|value| !value.is_empty());
    if abort {
        session.set_property(ABORT_PROPERTY, "");
        error!("aborting per request ({ABORT_PROPERTY} set)");
        return Some(RunStatus::Aborted);
    }
    stop(&session.read_counters()).map(|reason| match reason {
        StopReason::Completed => RunStatus::Completed,
        StopReason::ResourceExhausted => RunStatus::ResourceExhausted,
    })
}

fn prepare(task: &Task, ctx: &mut TaskContext<'_>) -> Result<(), AutoplayError> {
    if task.is_contested() {
        let counters = ctx.counters();
        let policy = ctx.run.settings.restore.clone();
        ctx.session
            .restore_resource(Resource::Hp, policy.hp_target(counters.max_hp))?;
        ctx.session
            .restore_resource(Resource::Mp, policy.mp_target(counters.max_mp))?;
    }
    if let Some(prepare) = &task.prepare {
        prepare(ctx)?;
    }
    Ok(())
}

fn dress(
    task: &Task,
    ctx: &mut TaskContext<'_>,
    familiar: Option<&str>,
) -> Result<Option<Loadout>, AutoplayError> {
    let request = match &task.equipment {
        Some(source) => Some(source.resolve(ctx)?),
        None => None,
    };
    let Some(contest) = &task.contest else {
        let Some(request) = request else {
            return Ok(None);
        };
        let loadout = ctx.run.optimizer.forced_loadout(&request, ctx.session.state())?;
        ctx.session.apply_loadout(&loadout)?;
        return Ok(Some(loadout));
    };
    let mut request = request.unwrap_or_default();
    if request.familiar.is_none() {
        request.familiar = familiar.map(str::to_string);
    }
    let state = ctx.session.state();
    let run = &mut *ctx.run;
    let loadout = match contest.purpose {
        Purpose::Adventure => run.optimizer.combat_loadout(&request, state, &mut run.values)?,
        Purpose::Digitize => run.optimizer.digitize_loadout(&request, state, &mut run.values)?,
    };
    ctx.session.apply_loadout(&loadout)?;
    Ok(Some(loadout))
}
