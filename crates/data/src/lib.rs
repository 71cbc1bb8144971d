//! Game balance data for the ghost rider: loading and validation.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
