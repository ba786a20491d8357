// crates/crudcheck-client/src/liveness.rs
// ============================================================================
// Module: Liveness Probe
// Description: Status endpoint probe and readiness polling.
// Purpose: Confirm the target service is reachable and healthy before scenarios.
// Dependencies: crudcheck-core
// ============================================================================

//! ## Overview
//! The probe issues one bounded `GET /status`. An unreachable service is a
//! transport failure, a non-200 status or a status other than `"ok"` is a
//! contract violation, and an unparseable body is a shape violation.

use std::thread::sleep;
use std::time::Duration;
use std::time::Instant;

use crudcheck_core::AppStatus;
use crudcheck_core::ContractValidator;
use crudcheck_core::ContractViolation;

use crate::client::ResourceApiClient;
use crate::error::HarnessError;
use crate::expect::expect_app_status;
use crate::transport::Transport;

/// Delay between readiness attempts.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Probes the status endpoint once.
///
/// # Errors
///
/// Returns [`HarnessError`] attributed to transport, contract, or shape.
pub fn probe<T: Transport>(
    client: &ResourceApiClient<T>,
    validator: &ContractValidator,
    timeout: Duration,
) -> Result<AppStatus, HarnessError> {
    let response = client.status_with_timeout(timeout)?;
    let status = expect_app_status(&response, validator, "liveness probe")?;
    if !status.is_ok() {
        return Err(ContractViolation::Field {
            field: "status".to_string(),
            expected: format!("\"{}\"", AppStatus::HEALTHY),
            actual: format!("\"{}\"", status.status),
        }
        .into());
    }
    Ok(status)
}

/// Polls the probe until it succeeds or `deadline` elapses.
///
/// # Errors
///
/// Returns the last probe error once the deadline has passed.
pub fn wait_until_live<T: Transport>(
    client: &ResourceApiClient<T>,
    validator: &ContractValidator,
    probe_timeout: Duration,
    deadline: Duration,
) -> Result<AppStatus, HarnessError> {
    let start = Instant::now();
    loop {
        match probe(client, validator, probe_timeout) {
            Ok(status) => return Ok(status),
            Err(err) => {
                if start.elapsed() > deadline {
                    return Err(err);
                }
                sleep(POLL_INTERVAL);
            }
        }
    }
}
