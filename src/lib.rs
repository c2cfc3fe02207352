//! scoring-init application library
//!
//! The `scoring_algo` schema and the bootstrap entry points shared by the
//! one-shot binary and the operator CLI.

pub mod bootstrap;
pub mod schema;
