//! Command implementations for the `viewdefs` binary.
//!
//! Each command takes an already-built registry (or the result of building
//! one) and returns a process exit code.

pub mod check;
pub mod cli;
pub mod list;
pub mod load;
pub mod show;

pub use cli::{Cli, Commands};
pub use load::load_registry;
