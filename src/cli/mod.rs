//! CLI module for bargain

pub mod app;
pub mod commands;

pub use app::{ScriptRunner, ScriptStep};
pub use commands::{Cli, Commands};
