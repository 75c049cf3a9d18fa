//! # esgm-store
//!
//! SQLite persistence for the ESGM service.
//!
//! A single [`Store`] wraps one connection behind a mutex. Every public
//! operation is async and runs its SQL on Tokio's blocking pool, so handlers
//! never block the runtime. Statements are plain parameterized SQL.
//!
//! Tables: `users`, `msci_standard`, `key_issue`, `projects`,
//! `project_data`, `evaluations`, `pillar_scores`. See [`schema`].

pub mod db;
pub mod error;
pub mod evaluations;
pub mod issues;
pub mod projects;
pub mod schema;
pub mod sequences;
pub mod users;

pub use db::Store;
pub use error::{Error, Result};
pub use sequences::SequenceInfo;
