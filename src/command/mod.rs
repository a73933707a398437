//! Command formatting for the gnokii shell line protocol.

mod flags;
mod quote;
mod spec;

pub use flags::*;
pub use quote::*;
pub use spec::*;
