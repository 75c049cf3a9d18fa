//! Service configuration.
//!
//! Resolution order: built-in defaults, then the TOML file (explicit path,
//! `$ESGM_CONFIG`, or `<config_dir>/esgm/config.toml`), then `ESGM_*`
//! environment variables. A missing file is not an error.

use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::util::parse_duration;
use crate::{Error, Result};

/// JWT secret shipped in the default config. Refused in production.
pub const DEV_JWT_SECRET: &str = "esgm-development-secret-change-me";

// ============================================================================
// ConfigManager
// ============================================================================

/// Loading and exporting behaviour shared by CLI config commands.
pub trait ConfigManager: Default + Serialize + DeserializeOwned {
    /// Name used for the config directory and in CLI hints.
    fn project_name() -> &'static str;

    /// Prefix of the environment variables that override file values.
    fn env_prefix() -> &'static str;

    /// `<config_dir>/<project>/config.toml`, if the platform has one.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Explicit path, else `${PREFIX}_CONFIG`, else the default path.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(format!("{}_CONFIG", Self::env_prefix())) {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Load from file and environment.
    fn load(config_path: Option<&str>) -> Result<Self>;

    /// Serialize as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Environment variables that reproduce this configuration.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>>;
}

// ============================================================================
// Sections
// ============================================================================

/// Deployment environment. Development unlocks the sequence helpers and
/// detailed error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Anything user-facing
    Production,
}

impl Environment {
    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Whether this is [`Environment::Development`].
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::config(format!("Unknown environment '{other}'"))),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Allowed CORS origin (the web frontend)
    pub cors_origin: String,
    /// Maximum accepted request body
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_origin: "http://localhost:5173".to_string(),
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// SQLite location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file, or `:memory:`
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "esgm.db".to_string(),
        }
    }
}

/// Token and password settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime, e.g. `7d`
    pub token_ttl: String,
    /// `iss` claim written and required on tokens
    pub issuer: String,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: "7d".to_string(),
            issuer: "esgm".to_string(),
            bcrypt_cost: 12,
        }
    }
}

impl AuthSettings {
    /// Parsed `token_ttl`.
    pub fn token_ttl(&self) -> Result<Duration> {
        parse_duration(&self.token_ttl)
    }
}

/// Which placeholder evaluator runs after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Leave the project `PENDING`
    Noop,
    /// Every answered pillar gets `fixed_score`
    Fixed,
    /// Every answered pillar gets a random score
    #[default]
    Random,
}

impl EvaluationMode {
    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationMode::Noop => "noop",
            EvaluationMode::Fixed => "fixed",
            EvaluationMode::Random => "random",
        }
    }
}

impl std::str::FromStr for EvaluationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "noop" | "none" => Ok(EvaluationMode::Noop),
            "fixed" => Ok(EvaluationMode::Fixed),
            "random" => Ok(EvaluationMode::Random),
            other => Err(Error::config(format!("Unknown evaluation mode '{other}'"))),
        }
    }
}

/// Placeholder evaluation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Evaluator to run
    pub mode: EvaluationMode,
    /// Simulated processing time before scores are stored
    pub delay_ms: u64,
    /// Score at or above which a pillar (and the overall verdict) passes
    pub pass_threshold: f64,
    /// Score used by the fixed evaluator
    pub fixed_score: f64,
    /// Seed for the random evaluator; unseeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            mode: EvaluationMode::Random,
            delay_ms: 2000,
            pass_threshold: 50.0,
            fixed_score: 75.0,
            seed: None,
        }
    }
}

impl EvaluationConfig {
    /// `delay_ms` as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// ============================================================================
// EsgmConfig
// ============================================================================

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsgmConfig {
    /// Deployment environment
    pub environment: Environment,
    /// HTTP listener
    pub server: ServerConfig,
    /// SQLite location
    pub database: DatabaseConfig,
    /// Tokens and passwords
    pub auth: AuthSettings,
    /// Placeholder evaluation
    pub evaluation: EvaluationConfig,
}

impl EsgmConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `ESGM_*` overrides using `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ESGM_ENV") {
            self.environment = v.parse()?;
        }
        if let Some(v) = lookup("ESGM_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("ESGM_PORT") {
            self.server.port = v
                .trim()
                .parse()
                .map_err(|e| Error::config(format!("Invalid ESGM_PORT '{v}': {e}")))?;
        }
        if let Some(v) = lookup("ESGM_CORS_ORIGIN") {
            self.server.cors_origin = v;
        }
        if let Some(v) = lookup("ESGM_DATABASE_PATH") {
            self.database.path = v;
        }
        if let Some(v) = lookup("ESGM_JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Some(v) = lookup("ESGM_TOKEN_TTL") {
            self.auth.token_ttl = v;
        }
        if let Some(v) = lookup("ESGM_EVALUATION_MODE") {
            self.evaluation.mode = v.parse()?;
        }
        if let Some(v) = lookup("ESGM_EVALUATION_DELAY_MS") {
            self.evaluation.delay_ms = v.trim().parse().map_err(|e| {
                Error::config(format!("Invalid ESGM_EVALUATION_DELAY_MS '{v}': {e}"))
            })?;
        }
        Ok(())
    }

    /// Check cross-field constraints before the server starts.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(Error::config("auth.jwt_secret must not be empty"));
        }
        if !self.environment.is_development() && self.auth.jwt_secret == DEV_JWT_SECRET {
            return Err(Error::config(
                "auth.jwt_secret still has the development default; set ESGM_JWT_SECRET",
            ));
        }
        self.auth.token_ttl()?;
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(Error::config(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }
        let threshold = self.evaluation.pass_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(Error::config(format!(
                "evaluation.pass_threshold must be between 0 and 100, got {threshold}"
            )));
        }
        if self.database.path.trim().is_empty() {
            return Err(Error::config("database.path must not be empty"));
        }
        Ok(())
    }
}

impl ConfigManager for EsgmConfig {
    fn project_name() -> &'static str {
        "esgm"
    }

    fn env_prefix() -> &'static str {
        "ESGM"
    }

    fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(config_path) {
            Some(path) if path.exists() => {
                log::debug!("Loading configuration from {}", path.display());
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                Self::from_toml_str(&content)?
            }
            Some(path) => {
                log::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            ("ESGM_ENV".to_string(), self.environment.as_str().to_string()),
            ("ESGM_HOST".to_string(), self.server.host.clone()),
            ("ESGM_PORT".to_string(), self.server.port.to_string()),
            ("ESGM_CORS_ORIGIN".to_string(), self.server.cors_origin.clone()),
            ("ESGM_DATABASE_PATH".to_string(), self.database.path.clone()),
            ("ESGM_JWT_SECRET".to_string(), self.auth.jwt_secret.clone()),
            ("ESGM_TOKEN_TTL".to_string(), self.auth.token_ttl.clone()),
            (
                "ESGM_EVALUATION_MODE".to_string(),
                self.evaluation.mode.as_str().to_string(),
            ),
            (
                "ESGM_EVALUATION_DELAY_MS".to_string(),
                self.evaluation.delay_ms.to_string(),
            ),
        ])
    }
}
