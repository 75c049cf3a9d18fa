//! # esgm-cli
//!
//! The `esgm` command:
//! - `serve`: run the HTTP API
//! - `migrate`: create the schema and seed the key issues
//! - `config`: inspect and edit the configuration file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;
pub mod error;
pub mod logging;

pub use cli::{Args, Command, ConfigAction};
pub use error::{Error, Result};
