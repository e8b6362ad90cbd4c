//! Injector configuration.
//!
//! Settings come from code (builder methods), from the environment, or,
//! with the `config` feature, from JSON.

use std::env;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Default autowiring recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Default prefix for environment variables.
pub const DEFAULT_ENV_PREFIX: &str = "IOC";

/// What autowiring does when it reaches a component it is already wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum CyclePolicy {
    /// Fail with `DiError::Circular` before writing the field
    #[default]
    Reject,
    /// Write the field and stop the recursion at the repeated component
    Tolerate,
}

impl FromStr for CyclePolicy {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(CyclePolicy::Reject),
            "tolerate" => Ok(CyclePolicy::Tolerate),
            other => Err(DiError::InvalidConfig(format!(
                "unknown cycle policy '{}', expected 'reject' or 'tolerate'",
                other
            ))),
        }
    }
}

/// Injector settings.
///
/// # Examples
///
/// ```rust
/// use ioc_wire::{CyclePolicy, InjectorConfig};
///
/// let config = InjectorConfig::default()
///     .with_cycle_policy(CyclePolicy::Tolerate)
///     .with_max_depth(64)
///     .with_eager(false);
///
/// assert_eq!(config.cycle_policy, CyclePolicy::Tolerate);
/// assert_eq!(config.max_depth, 64);
/// assert!(!config.eager);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct InjectorConfig {
    pub cycle_policy: CyclePolicy,
    /// Autowiring recursion limit
    pub max_depth: usize,
    /// Instantiate and wire every component during startup
    pub eager: bool,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            cycle_policy: CyclePolicy::Reject,
            max_depth: DEFAULT_MAX_DEPTH,
            eager: true,
        }
    }
}

impl InjectorConfig {
    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Reads `IOC_CYCLE_POLICY`, `IOC_MAX_DEPTH` and `IOC_EAGER`.
    pub fn from_env() -> DiResult<Self> {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Like [`from_env`](Self::from_env) with a custom variable prefix.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env_with_prefix(prefix: &str) -> DiResult<Self> {
        let mut config = Self::default();
        if let Some(value) = env_var(prefix, "CYCLE_POLICY") {
            config.cycle_policy = value.parse()?;
        }
        if let Some(value) = env_var(prefix, "MAX_DEPTH") {
            config.max_depth = parse_value(prefix, "MAX_DEPTH", &value)?;
        }
        if let Some(value) = env_var(prefix, "EAGER") {
            config.eager = parse_value(prefix, "EAGER", &value)?;
        }
        Ok(config)
    }

    /// Parses a JSON object; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::InvalidConfig(e.to_string()))
    }
}

fn env_var(prefix: &str, key: &str) -> Option<String> {
    env::var(format!("{}_{}", prefix.to_uppercase(), key)).ok()
}

fn parse_value<T: FromStr>(prefix: &str, key: &str, value: &str) -> DiResult<T> {
    value.trim().parse().map_err(|_| {
        DiError::InvalidConfig(format!(
            "{}_{}: cannot parse '{}'",
            prefix.to_uppercase(),
            key,
            value
        ))
    })
}
