use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Choice adventure number to option picked.
pub type ChoiceTable = BTreeMap<u32, u32>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum CombatStep {
    /// Cast only when the skill is available this fight.
    TrySkill { skill: String },
    /// Cast only when the character knows the skill.
    TryHaveSkill { skill: String },
    Skill { skill: String },
    Runaway,
    Attack,
    Abort,
}

/// Ordered combat macro handed to the transport with contested actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombatStrategy {
    pub steps: Vec<CombatStep>,
}

impl CombatStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attack until the fight ends.
    pub fn standard() -> Self {
        Self::new().attack()
    }

    pub fn try_skill(mut self, skill: &str) -> Self {
        self.steps.push(CombatStep::TrySkill {
            skill: skill.to_string(),
        });
        self
    }

    pub fn try_have_skill(mut self, skill: &str) -> Self {
        self.steps.push(CombatStep::TryHaveSkill {
            skill: skill.to_string(),
        });
        self
    }

    pub fn skill(mut self, skill: &str) -> Self {
        self.steps.push(CombatStep::Skill {
            skill: skill.to_string(),
        });
        self
    }

    pub fn runaway(mut self) -> Self {
        self.steps.push(CombatStep::Runaway);
        self
    }

    pub fn attack(mut self) -> Self {
        self.steps.push(CombatStep::Attack);
        self
    }

    pub fn abort(mut self) -> Self {
        self.steps.push(CombatStep::Abort);
        self
    }

    pub fn then(mut self, other: CombatStrategy) -> Self {
        self.steps.extend(other.steps);
        self
    }

    /// True when the macro aborts before doing anything else.
    pub fn aborts_immediately(&self) -> bool {
        matches!(self.steps.first(), Some(CombatStep::Abort))
    }
}

impl fmt::Display for CombatStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrySkill { skill } => write!(f, "if hasskill {skill}; skill {skill}; endif"),
            Self::TryHaveSkill { skill } => write!(f, "if haveskill {skill}; skill {skill}; endif"),
            Self::Skill { skill } => write!(f, "skill {skill}"),
            Self::Runaway => f.write_str("runaway"),
            Self::Attack => f.write_str("attack; repeat"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

impl fmt::Display for CombatStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .steps
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_text_keeps_step_order() {
        let strategy = CombatStrategy::new()
            .try_skill("Shoot Ghost")
            .skill("Trap Ghost");
        assert_eq!(
            strategy.to_string(),
            "if hasskill Shoot Ghost; skill Shoot Ghost; endif; skill Trap Ghost"
        );
        assert!(!strategy.aborts_immediately());
        assert!(CombatStrategy::new().abort().aborts_immediately());
    }
}
