// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: System Test Timeouts
// Description: Centralized timeout configuration with env overrides.
// Purpose: Keep system-test timeouts consistent and configurable across suites.
// ============================================================================

use std::time::Duration;

use system_tests::config::SystemTestConfig;

/// Default deadline for the service to become ready.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Returns the effective timeout, honoring the configured readiness override.
/// The override acts as a minimum to avoid shortening explicitly longer test timeouts.
#[must_use]
pub fn resolve_timeout(config: &SystemTestConfig, requested: Duration) -> Duration {
    config.ready_timeout.map_or(requested, |override_timeout| requested.max(override_timeout))
}
