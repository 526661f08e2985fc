//! # tagkit-cli
//!
//! Headless driver for the bulk tag popup and tag field control.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod notifier;

pub use cli::{Cli, Commands};
pub use commands::{execute, run_batch};
pub use notifier::LogNotifier;
