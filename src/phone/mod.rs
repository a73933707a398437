//! Phone operations on top of the supervised shell.

pub mod commands;
mod error;
mod gnokii;
mod types;

pub use error::*;
pub use gnokii::*;
pub use types::*;
