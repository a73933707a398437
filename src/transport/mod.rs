//! Framed request/response transport over the shell's pipes.

mod error;
mod framing;
mod session;
mod state;

pub use error::*;
pub use framing::*;
pub use session::*;
pub use state::*;
