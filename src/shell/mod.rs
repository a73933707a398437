//! Shell process supervision: lookup, launch, liveness and teardown.

mod error;
mod locate;
mod process;

pub use error::*;
pub use locate::*;
pub use process::*;
