use crate::{
    AutoplayError, ChoiceTable, CombatStrategy, EquipmentRequest, Location, TaskContext,
};
use ghostrider_core::Sobriety;
use std::fmt;

pub type Predicate = Box<dyn Fn(&TaskContext<'_>) -> bool>;
pub type Hook = Box<dyn Fn(&mut TaskContext<'_>) -> Result<(), AutoplayError>>;
/// Runs the task; a returned location is then contested through the transport.
pub type ActionFn = Box<dyn Fn(&mut TaskContext<'_>) -> Result<Option<Location>, AutoplayError>>;
pub type ChoicesFn = Box<dyn Fn(&mut TaskContext<'_>) -> Result<ChoiceTable, AutoplayError>>;
pub type StrategyFn = Box<dyn Fn(&TaskContext<'_>) -> CombatStrategy>;
pub type EquipmentFn = Box<dyn Fn(&mut TaskContext<'_>) -> Result<EquipmentRequest, AutoplayError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Adventure,
    Digitize,
}

/// Present on tasks whose action can start a fight.
pub struct Contest {
    pub strategy: StrategyFn,
    pub purpose: Purpose,
}

pub enum EquipmentSource {
    Static(EquipmentRequest),
    Computed(EquipmentFn),
}

impl EquipmentSource {
    pub fn resolve(&self, ctx: &mut TaskContext<'_>) -> Result<EquipmentRequest, AutoplayError> {
        match self {
            Self::Static(request) => Ok(request.clone()),
            Self::Computed(compute) => compute(ctx),
        }
    }
}

/// One unit of work. The catalog order is its priority.
pub struct Task {
    pub name: String,
    pub ready: Option<Predicate>,
    pub completed: Predicate,
    pub limit: Option<u32>,
    pub sobriety: Option<Sobriety>,
    pub prepare: Option<Hook>,
    pub action: ActionFn,
    pub post: Option<Hook>,
    pub choices: Option<ChoicesFn>,
    pub equipment: Option<EquipmentSource>,
    pub contest: Option<Contest>,
}

impl Task {
    /// A task whose action may hand back a location to contest.
    pub fn new<C, A>(name: &str, completed: C, action: A) -> Self
    where
        C: Fn(&TaskContext<'_>) -> bool + 'static,
        A: Fn(&mut TaskContext<'_>) -> Result<Option<Location>, AutoplayError> + 'static,
    {
        Self {
            name: name.to_string(),
            ready: None,
            completed: Box::new(completed),
            limit: None,
            sobriety: None,
            prepare: None,
            action: Box::new(action),
            post: None,
            choices: None,
            equipment: None,
            contest: None,
        }
    }

    /// A task that only sends commands.
    pub fn plain<C, A>(name: &str, completed: C, action: A) -> Self
    where
        C: Fn(&TaskContext<'_>) -> bool + 'static,
        A: Fn(&mut TaskContext<'_>) -> Result<(), AutoplayError> + 'static,
    {
        Self::new(name, completed, move |ctx| action(ctx).map(|()| None))
    }

    pub fn ready<F>(mut self, ready: F) -> Self
    where
        F: Fn(&TaskContext<'_>) -> bool + 'static,
    {
        self.ready = Some(Box::new(ready));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sobriety(mut self, sobriety: Sobriety) -> Self {
        self.sobriety = Some(sobriety);
        self
    }

    pub fn prepare<F>(mut self, prepare: F) -> Self
    where
        F: Fn(&mut TaskContext<'_>) -> Result<(), AutoplayError> + 'static,
    {
        self.prepare = Some(Box::new(prepare));
        self
    }

    pub fn post<F>(mut self, post: F) -> Self
    where
        F: Fn(&mut TaskContext<'_>) -> Result<(), AutoplayError> + 'static,
    {
        self.post = Some(Box::new(post));
        self
    }

    pub fn choices<F>(mut self, choices: F) -> Self
    where
        F: Fn(&mut TaskContext<'_>) -> Result<ChoiceTable, AutoplayError> + 'static,
    {
        self.choices = Some(Box::new(choices));
        self
    }

    pub fn fixed_choices(self, table: &[(u32, u32)]) -> Self {
        let table: ChoiceTable = table.iter().copied().collect();
        self.choices(move |_| Ok(table.clone()))
    }

    pub fn equipment(mut self, request: EquipmentRequest) -> Self {
        self.equipment = Some(EquipmentSource::Static(request));
        self
    }

    pub fn equipment_with<F>(mut self, compute: F) -> Self
    where
        F: Fn(&mut TaskContext<'_>) -> Result<EquipmentRequest, AutoplayError> + 'static,
    {
        self.equipment = Some(EquipmentSource::Computed(Box::new(compute)));
        self
    }

    pub fn contest<F>(mut self, purpose: Purpose, strategy: F) -> Self
    where
        F: Fn(&TaskContext<'_>) -> CombatStrategy + 'static,
    {
        self.contest = Some(Contest {
            strategy: Box::new(strategy),
            purpose,
        });
        self
    }

    /// Contest with a fixed combat macro.
    pub fn combat(self, strategy: CombatStrategy) -> Self {
        self.contest(Purpose::Adventure, move |_| strategy.clone())
    }

    pub fn is_contested(&self) -> bool {
        self.contest.is_some()
    }

    pub fn is_ready(&self, ctx: &TaskContext<'_>) -> bool {
        self.ready.as_ref().map_or(true, |ready| ready(ctx))
    }

    pub fn is_completed(&self, ctx: &TaskContext<'_>) -> bool {
        (self.completed)(ctx)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("limit", &self.limit)
            .field("sobriety", &self.sobriety)
            .field("contested", &self.is_contested())
            .finish()
    }
}
