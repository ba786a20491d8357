// crates/crudcheck-client/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Environment-backed configuration for the contract harness.
// Purpose: Resolve the target service and harness limits with strict parsing.
// Dependencies: dotenvy, thiserror, url
// ============================================================================

//! ## Overview
//! Configuration is read from environment variables and mapped into a small
//! typed structure passed explicitly into client and lifecycle setup.
//! Environment values are parsed with strict UTF-8 enforcement; invalid or
//! empty values fail closed rather than falling back to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Base URL used when `APP_URL` is unset.
pub const DEFAULT_APP_URL: &str = "http://127.0.0.1:8002";
/// Collection path used when no override is set.
pub const DEFAULT_RESOURCE_PATH: &str = "/api/users/";
/// Uniform request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Liveness probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Base URL of the service under test.
    AppUrl,
    /// Collection path override.
    ResourcePath,
    /// Request timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Liveness probe timeout in seconds (positive integer).
    ProbeTimeoutSeconds,
    /// Permit destructive collection clears (`true`/`false` or `1`/`0`).
    AllowClear,
    /// Seed dataset file path.
    Dataset,
}

impl HarnessEnv {
    /// Every key, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::AppUrl,
        Self::ResourcePath,
        Self::TimeoutSeconds,
        Self::ProbeTimeoutSeconds,
        Self::AllowClear,
        Self::Dataset,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AppUrl => "APP_URL",
            Self::ResourcePath => "CRUDCHECK_RESOURCE_PATH",
            Self::TimeoutSeconds => "CRUDCHECK_TIMEOUT_SEC",
            Self::ProbeTimeoutSeconds => "CRUDCHECK_PROBE_TIMEOUT_SEC",
            Self::AllowClear => "CRUDCHECK_ALLOW_CLEAR",
            Self::Dataset => "CRUDCHECK_DATASET",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Value is not valid UTF-8.
    #[error("{0} must be valid UTF-8")]
    NotUtf8(String),
    /// Value is set but empty.
    #[error("{0} must not be empty")]
    Empty(String),
    /// Value failed validation.
    #[error("{name} {message}")]
    Invalid {
        /// Variable name.
        name: String,
        /// Validation failure.
        message: String,
    },
    /// A URL could not be built.
    #[error("invalid url {url}: {message}")]
    Url {
        /// Offending URL text.
        url: String,
        /// Parser message.
        message: String,
    },
    /// The `.env` file could not be read.
    #[error("failed to load env file: {0}")]
    EnvFile(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed harness configuration.
///
/// # Invariants
/// - `base_url` is an absolute http(s) URL.
/// - `resource_path` is non-empty.
/// - Timeouts are non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Base URL of the service under test.
    pub base_url: Url,
    /// Collection path, e.g. `/api/users/`.
    pub resource_path: String,
    /// Timeout applied to every CRUD request.
    pub timeout: Duration,
    /// Timeout applied to the liveness probe.
    pub probe_timeout: Duration,
    /// Permit destructive collection clears.
    pub allow_clear: bool,
    /// Optional seed dataset path.
    pub dataset: Option<PathBuf>,
}

impl HarnessConfig {
    /// Returns the configuration used when no environment override is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when [`DEFAULT_APP_URL`] does not parse.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::for_url(DEFAULT_APP_URL)
    }

    /// Creates a configuration for `base_url` with defaults elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is not absolute http(s).
    pub fn for_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(HarnessEnv::AppUrl.as_str(), base_url)?,
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            allow_clear: false,
            dataset: None,
        })
    }

    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid URL, timeout, or boolean).
    pub fn load() -> Result<Self, ConfigError> {
        let raw_url = read_env_nonempty(HarnessEnv::AppUrl.as_str())?;
        let base_url = parse_base_url(
            HarnessEnv::AppUrl.as_str(),
            raw_url.as_deref().unwrap_or(DEFAULT_APP_URL),
        )?;
        let resource_path = read_env_nonempty(HarnessEnv::ResourcePath.as_str())?
            .unwrap_or_else(|| DEFAULT_RESOURCE_PATH.to_string());
        let timeout = read_env_nonempty(HarnessEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(HarnessEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT);
        let probe_timeout = read_env_nonempty(HarnessEnv::ProbeTimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(HarnessEnv::ProbeTimeoutSeconds.as_str(), &value))
            .transpose()?
            .unwrap_or(DEFAULT_PROBE_TIMEOUT);
        let allow_clear = parse_bool_env(
            HarnessEnv::AllowClear.as_str(),
            read_env_nonempty(HarnessEnv::AllowClear.as_str())?,
        )?;
        let dataset = read_env_nonempty(HarnessEnv::Dataset.as_str())?.map(PathBuf::from);
        Ok(Self {
            base_url,
            resource_path,
            timeout,
            probe_timeout,
            allow_clear,
            dataset,
        })
    }

    /// Loads a `.env` file into the process environment, then reads the
    /// configuration. With no path, a `.env` in the working directory is used
    /// when present and silently skipped otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit env file cannot be read or
    /// when [`HarnessConfig::load`] fails.
    pub fn load_with_dotenv(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|err| ConfigError::EnvFile(err.to_string()))?;
        } else {
            let _ = dotenvy::dotenv();
        }
        Self::load()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses an absolute http(s) base URL.
fn parse_base_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|err| ConfigError::Url {
        url: raw.to_string(),
        message: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::Invalid {
            name: name.to_string(),
            message: format!("must use http or https, got {scheme}"),
        }),
    }
}

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ConfigError::NotUtf8(name.to_string()))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(name.to_string())),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |message: &str| ConfigError::Invalid {
        name: name.to_string(),
        message: message.to_string(),
    };
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a boolean environment variable; unset means false.
fn parse_bool_env(name: &str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(false);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(ConfigError::Invalid {
        name: name.to_string(),
        message: "must be 1, 0, true, or false".to_string(),
    })
}
