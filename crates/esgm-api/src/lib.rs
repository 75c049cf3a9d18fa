//! # esgm-api
//!
//! HTTP API server for the ESGM service.
//!
//! - [`routes::router`]: the axum router (auth, projects, health, dev helpers)
//! - [`AppState`]: store, token keys, config, and the evaluation dispatcher
//! - [`EvaluationDispatcher`]: placeholder evaluation in background tasks
//! - [`ApiError`]: request failures rendered as the JSON envelope
//! - [`Server`]: binding and graceful shutdown

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod dispatch;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use dispatch::EvaluationDispatcher;
pub use error::{ApiError, Error, Result};
pub use routes::router;
pub use server::Server;
pub use state::AppState;
