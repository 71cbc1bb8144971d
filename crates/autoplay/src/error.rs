use ghostrider_core::MemoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutoplayError {
    #[error("no eligible task")]
    NoEligibleTask,
    #[error("task {task} reached its limit of {limit} attempts without completing")]
    TaskLimitExceeded { task: String, limit: u32 },
    #[error("cannot equip: {0}")]
    CannotEquip(String),
    #[error("{task}: {message}")]
    Hook { task: String, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("memo error: {0}")]
    Memo(#[from] MemoError),
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl AutoplayError {
    /// Deliberate abort raised from inside a task hook.
    pub fn hook(task: &str, message: impl Into<String>) -> Self {
        Self::Hook {
            task: task.to_string(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AutoplayError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AutoplayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
