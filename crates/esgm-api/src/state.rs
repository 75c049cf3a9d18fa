//! Shared application state.

use std::fmt::Display;
use std::sync::Arc;

use esgm_auth::{JwtKeys, JwtValidator};
use esgm_core::EsgmConfig;
use esgm_store::Store;

use crate::dispatch::EvaluationDispatcher;
use crate::error::{ApiError, Result};

/// State handed to every handler. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle
    pub store: Store,
    /// Token signing keys
    pub keys: JwtKeys,
    /// Loaded configuration
    pub config: Arc<EsgmConfig>,
    /// Background evaluation
    pub dispatcher: EvaluationDispatcher,
}

impl AppState {
    /// Build state from a validated config and an open, migrated store.
    pub fn new(config: EsgmConfig, store: Store) -> Result<Self> {
        let keys = JwtKeys::new(
            config.auth.jwt_secret.as_bytes(),
            config.auth.issuer.clone(),
            config.auth.token_ttl()?,
        );
        let dispatcher = EvaluationDispatcher::new(store.clone(), &config.evaluation);
        Ok(Self {
            store,
            keys,
            config: Arc::new(config),
            dispatcher,
        })
    }

    /// Validator for the auth middleware, sharing this state's keys.
    pub fn validator(&self) -> JwtValidator {
        JwtValidator::new(self.keys.clone())
    }

    /// Whether the service runs in development mode.
    pub fn is_development(&self) -> bool {
        self.config.environment.is_development()
    }

    /// Log `err` and turn it into a 500 with `message`. The error text is
    /// only sent to the client in development.
    pub fn internal(&self, message: &str, err: impl Display) -> ApiError {
        tracing::error!(error = %err, "{message}");
        ApiError::Internal {
            message: message.to_string(),
            detail: self.is_development().then(|| err.to_string()),
        }
    }
}
