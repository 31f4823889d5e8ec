//! # persist-cli
//!
//! Command-line inspector for persist-kit stores. Reads and writes go through
//! the same typed accessors applications use.

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Args, Command, PrefsCommand, SecretCommand};
pub use commands::{run_prefs, run_secret};
pub use error::{CliError, CliResult};
