//! Planner configuration
//!
//! Settings come from code or from environment variables, with the
//! environment as the usual source for the CLI.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Environment variable selecting the [`OversizePolicy`]
pub const OVERSIZE_POLICY_ENV: &str = "IPPLAN_OVERSIZE_POLICY";

/// What VLSM allocation does with a requirement larger than the base block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// Skip it, record a warning on the plan, keep allocating
    #[default]
    Warn,
    /// Abort the whole run with `RequirementBelowBase`
    Fail,
}

impl FromStr for OversizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" | "skip" => Ok(OversizePolicy::Warn),
            "fail" | "strict" => Ok(OversizePolicy::Fail),
            other => Err(format!("unknown oversize policy: {}", other)),
        }
    }
}

impl fmt::Display for OversizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OversizePolicy::Warn => f.write_str("warn"),
            OversizePolicy::Fail => f.write_str("fail"),
        }
    }
}

/// Planner settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub oversize_policy: OversizePolicy,
}

impl PlannerConfig {
    /// Strict settings: oversized requirements abort the run
    pub fn strict() -> Self {
        Self {
            oversize_policy: OversizePolicy::Fail,
        }
    }

    /// Load from environment variables
    ///
    /// Checks `IPPLAN_OVERSIZE_POLICY` (`warn` or `fail`). Unset or
    /// unrecognised values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(OVERSIZE_POLICY_ENV) {
            match value.parse() {
                Ok(policy) => config.oversize_policy = policy,
                Err(e) => warn!("{}: {}, using {}", OVERSIZE_POLICY_ENV, e, config.oversize_policy),
            }
        }

        config
    }
}
