//! Subcommand implementations. Each `*Args` owns its `run`.

pub mod extract;
pub mod sync;
