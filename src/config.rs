//! Server configuration.
//!
//! Resolution order: defaults → environment (`.env` honored) → CLI flags,
//! followed by a single `validate()` so bad values fail before binding.
//!
//! | variable                  | meaning                          | default   |
//! |---------------------------|----------------------------------|-----------|
//! | `WEAKNESS_HOST`           | bind address                     | `0.0.0.0` |
//! | `PORT`                    | bind port                        | `8080`    |
//! | `WEAKNESS_RCOND`          | relative singular-value cutoff   | unset     |
//! | `WEAKNESS_MAX_BODY_BYTES` | request body limit               | 8 MiB     |

use crate::domain::SolverConfig;
use crate::error::{AppError, EXIT_INPUT};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub const HOST_ENV: &str = "WEAKNESS_HOST";
pub const PORT_ENV: &str = "PORT";
pub const RCOND_ENV: &str = "WEAKNESS_RCOND";
pub const MAX_BODY_ENV: &str = "WEAKNESS_MAX_BODY_BYTES";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rcond: Option<f64>,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rcond: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// CLI-level overrides; `None` keeps the env/default value.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub rcond: Option<f64>,
    pub max_body_bytes: Option<usize>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup(PORT_ENV) {
            config.port = parse_var(PORT_ENV, &port)?;
        }
        if let Some(rcond) = lookup(RCOND_ENV) {
            config.rcond = Some(parse_var(RCOND_ENV, &rcond)?);
        }
        if let Some(limit) = lookup(MAX_BODY_ENV) {
            config.max_body_bytes = parse_var(MAX_BODY_ENV, &limit)?;
        }

        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: ServerOverrides) {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if overrides.rcond.is_some() {
            self.rcond = overrides.rcond;
        }
        if let Some(limit) = overrides.max_body_bytes {
            self.max_body_bytes = limit;
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.host.trim().is_empty() {
            return Err(AppError::new(EXIT_INPUT, "Bind host must not be empty."));
        }
        if self.port == 0 {
            return Err(AppError::new(EXIT_INPUT, "Port must be in 1..=65535."));
        }
        if self.max_body_bytes == 0 {
            return Err(AppError::new(EXIT_INPUT, "Max body size must be > 0."));
        }
        self.solver_config().validate()
    }

    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::with_rcond(self.rcond)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid {key}='{raw}': {e}")))
}
