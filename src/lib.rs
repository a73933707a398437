//! gnokii supervisor - a typed request/response API over `gnokii --shell`.

pub mod batch;
pub mod command;
pub mod config;
pub mod display;
pub mod phone;
pub mod shell;
pub mod transport;
