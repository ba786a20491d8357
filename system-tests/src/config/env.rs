// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: crudcheck-client
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crudcheck_client::HarnessConfig;
use crudcheck_client::config::read_env_strict;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional artifact run root override.
    RunRoot,
    /// Optional readiness deadline override in seconds (positive integer).
    ReadyTimeoutSeconds,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "CRUDCHECK_SYSTEM_TEST_RUN_ROOT",
            Self::ReadyTimeoutSeconds => "CRUDCHECK_SYSTEM_TEST_READY_TIMEOUT_SEC",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Optional artifact run root override.
    pub run_root: Option<PathBuf>,
    /// Optional readiness deadline override.
    pub ready_timeout: Option<Duration>,
    /// Target-service settings.
    pub harness: HarnessConfig,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid timeout or URL).
    pub fn load() -> Result<Self, String> {
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let ready_timeout = read_env_nonempty(SystemTestEnv::ReadyTimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::ReadyTimeoutSeconds.as_str(), &value))
            .transpose()?;
        let harness = HarnessConfig::load().map_err(|err| err.to_string())?;
        Ok(Self {
            run_root,
            ready_timeout,
            harness,
        })
    }

    /// Loads a `.env` file from the working directory when present, then
    /// reads the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when [`SystemTestConfig::load`] fails.
    pub fn load_with_dotenv() -> Result<Self, String> {
        HarnessConfig::load_with_dotenv(None).map_err(|err| err.to_string())?;
        Self::load()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is not UTF-8 or is set but empty.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name).map_err(|err| err.to_string())? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
