use anyhow::{anyhow, Context, Result};
use dotenv::dotenv;
use std::convert::Infallible;
use std::env;
use std::fmt;
use std::str::FromStr;

pub const ENV_VAR_ENVIRONMENT: &str = "APP_ENV";
pub const ENV_VAR_PREFIX: &str = "LOGGER_PREFIX";
pub const ENV_VAR_DEBUG: &str = "APP_DEBUG";

/// Deployment label shown in brackets ahead of every line. Any string is accepted;
/// the four well-known stages get their own variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Environment {
    Dev,
    Uat,
    Staging,
    Prod,
    Other(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Dev => "dev",
            Environment::Uat => "uat",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
            Environment::Other(label) => label,
        }
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "dev" => Environment::Dev,
            "uat" => Environment::Uat,
            "staging" => Environment::Staging,
            "prod" => Environment::Prod,
            other => Environment::Other(other.to_string()),
        })
    }
}

impl From<&str> for Environment {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(env) => env,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logger configuration. `Default` is the cleared state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggerConfig {
    pub environment: Option<Environment>,
    pub prefix: Option<String>,
    pub debug_enabled: bool,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(mut self, environment: impl Into<Environment>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn debug_enabled(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }

    /// Load `.env` (if any) and read `APP_ENV`, `LOGGER_PREFIX` and `APP_DEBUG`.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = read(ENV_VAR_ENVIRONMENT).map(|label| Environment::from(label.as_str()));
        let prefix = read(ENV_VAR_PREFIX);
        let debug_enabled = match read(ENV_VAR_DEBUG) {
            Some(raw) => parse_flag(&raw).with_context(|| format!("invalid {}", ENV_VAR_DEBUG))?,
            None => false,
        };

        Ok(Self {
            environment,
            prefix,
            debug_enabled,
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected a boolean flag, got {:?}", other)),
    }
}
