//! ESGM Core: shared types, validation, configuration, and errors.
//!
//! This crate is the bottom of the dependency graph. The store, evaluator,
//! API, client, and CLI all build on it and nothing here depends on them.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Users, key issues, projects, evaluations
//! - [`validation`]: Request validation and normalization
//! - [`config`]: Service configuration and the [`ConfigManager`] trait
//! - [`util`]: Duration parsing

pub mod config;
pub mod error;
pub mod types;
pub mod util;
pub mod validation;

pub use config::{
    AuthSettings, ConfigManager, DatabaseConfig, Environment, EsgmConfig, EvaluationConfig,
    EvaluationMode, ServerConfig,
};
pub use error::{Error, Result};
pub use types::*;
