use crate::{AutoplayError, Encounter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    ResourceExhausted,
    Aborted,
    MaxCycles,
    Fatal { task: Option<String>, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: u32,
    pub task: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub loadout: Option<String>,
    #[serde(default)]
    pub rider: Option<String>,
    #[serde(default)]
    pub expected_value: Option<f64>,
    #[serde(default)]
    pub encounter: Option<Encounter>,
    pub turns_before: u32,
    pub turns_after: u32,
    pub adventures_before: i64,
    pub adventures_after: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDelta {
    pub item: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub actions: u32,
    pub turns_used: u32,
    pub adventures_delta: i64,
    pub items: Vec<ItemDelta>,
    pub wall_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,
    pub cycles: Vec<CycleRecord>,
    pub summary: RunSummary,
}

impl RunResult {
    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("status: {}", run_status_label(&self.status)),
            format!(
                "summary: actions={} turns={} adventures={:+} wall_ms={}",
                self.summary.actions,
                self.summary.turns_used,
                self.summary.adventures_delta,
                self.summary.wall_time_ms
            ),
            String::new(),
            "items:".to_string(),
        ];
        if self.summary.items.is_empty() {
            lines.push("  (none)".to_string());
        } else {
            for delta in &self.summary.items {
                lines.push(format!("  {}: {:+}", delta.item, delta.quantity));
            }
        }
        lines.push(String::new());
        lines.push("cycles:".to_string());
        for record in &self.cycles {
            lines.push(format!("  cycle {:>4} | {}", record.cycle, record.task));
            lines.push(format!(
                "    turns {} -> {} adventures {} -> {}",
                record.turns_before, record.turns_after, record.adventures_before, record.adventures_after
            ));
            if let Some(target) = &record.target {
                lines.push(format!("    target: {target}"));
            }
            if let Some(loadout) = &record.loadout {
                lines.push(format!("    loadout: {loadout}"));
            }
            if let Some(value) = record.expected_value {
                lines.push(format!("    expected value: {value:.2}"));
            }
            if let Some(encounter) = &record.encounter {
                let outcome = if encounter.won { "won" } else { "lost" };
                lines.push(format!("    encounter: {} ({outcome})", encounter.monster));
            }
        }
        lines.join("\n")
    }
}

fn run_status_label(status: &RunStatus) -> String {
    match status {
        RunStatus::Completed => "Completed".to_string(),
        RunStatus::ResourceExhausted => "ResourceExhausted".to_string(),
        RunStatus::Aborted => "Aborted".to_string(),
        RunStatus::MaxCycles => "MaxCycles".to_string(),
        RunStatus::Fatal { task: Some(task), reason } => format!("Fatal in {task}: {reason}"),
        RunStatus::Fatal { task: None, reason } => format!("Fatal: {reason}"),
    }
}

pub fn write_json(path: &Path, result: &RunResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(result)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn write_text(path: &Path, result: &RunResult) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, result.to_text_report())?;
    Ok(())
}
