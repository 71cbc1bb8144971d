//! The builtin task catalog. Order is priority.

mod dread;
mod global;

pub use dread::dread_tasks;
pub use global::{counter_turns, global_tasks, kramco_wanderer_chance, should_redigitize};

use crate::Task;

/// Global upkeep first, then the dungeon tasks.
pub fn default_catalog() -> Vec<Task> {
    let mut tasks = global_tasks();
    tasks.extend(dread_tasks());
    tasks
}
