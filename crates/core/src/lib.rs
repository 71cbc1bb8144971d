//! Session model for the ghost rider. Keep this crate free of IO and platform concerns.

pub mod config;
pub mod gear;
pub mod memo;
pub mod raidlog;
pub mod rng;
pub mod state;
pub mod text;
pub mod value;

pub use config::*;
pub use gear::*;
pub use memo::*;
pub use raidlog::*;
pub use rng::*;
pub use state::*;
pub use value::*;
