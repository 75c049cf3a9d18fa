//! # esgm-client
//!
//! Async client for the ESGM HTTP API.
//!
//! ```no_run
//! # async fn run() -> esgm_client::Result<()> {
//! let mut client = esgm_client::EsgmClient::new("http://localhost:3001")?;
//! client.login("ada@example.com", "Analytical1").await?;
//! for project in client.list_projects().await? {
//!     println!("{} {}", project.project.project_name, project.project.status);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod client;
pub mod error;

pub use client::{EsgmClient, EvaluationTriggered};
pub use error::{Error, Result};
