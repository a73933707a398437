//! Transport framing tests against in-memory pipes.

mod session_test;

