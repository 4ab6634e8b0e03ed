//! CLI, configuration file and output for weekgrid.
//!
//! This crate provides the `weekgrid` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
