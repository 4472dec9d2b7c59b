//! CLI subcommands.

pub mod batch;
pub mod classify;
pub mod process;
