//! Turn-by-turn task scheduler for the ghost rider, with loadout valuation and a simulated session.

mod accountant;
mod combat;
mod config;
mod context;
mod engine;
mod error;
mod outfit;
mod session;
mod simulator;
mod task;
pub mod tasks;
mod trace;

pub use accountant::*;
pub use combat::*;
pub use config::*;
pub use context::*;
pub use engine::*;
pub use error::*;
pub use outfit::*;
pub use session::*;
pub use simulator::*;
pub use task::*;
pub use trace::*;
