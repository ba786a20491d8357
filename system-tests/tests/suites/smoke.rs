// system-tests/tests/suites/smoke.rs
// ============================================================================
// Module: Smoke Tests
// Description: Liveness and reachability checks for the users service.
// Purpose: Fail fast when the service is down or its status endpoint is wrong.
// Dependencies: crudcheck-client, crudcheck-core
// ============================================================================

//! ## Overview
//! Liveness and reachability checks for the users service.
//! Invariants:
//! - An unreachable service is a failure, never a skip.

use std::error::Error;

use crudcheck_client::expect::expect_page;
use crudcheck_client::liveness::probe;
use crudcheck_core::AppStatus;
use crudcheck_core::ContractValidator;
use crudcheck_core::status;
use helpers::harness::LiveHarness;

use crate::helpers;

#[test]
fn status_endpoint_reports_ok() -> Result<(), Box<dyn Error>> {
    let harness = LiveHarness::start("status_endpoint_reports_ok")?;
    let timeout = harness.config().harness.probe_timeout;
    let status = probe(harness.client(), harness.validator(), timeout)?;
    if status.status != AppStatus::HEALTHY {
        return Err(format!("unexpected status {}", status.status).into());
    }
    harness.finish(vec![format!("status reported {}", status.status)])
}

#[test]
fn status_answers_within_probe_timeout() -> Result<(), Box<dyn Error>> {
    let harness = LiveHarness::start("status_answers_within_probe_timeout")?;
    let timeout = harness.config().harness.probe_timeout;
    let response = harness.client().status_with_timeout(timeout)?;
    ContractValidator::assert_status("status", status::OK, response.status, &response.text)?;
    harness.finish(vec![format!("status answered within {}s", timeout.as_secs())])
}

#[test]
fn collection_listing_is_reachable() -> Result<(), Box<dyn Error>> {
    let harness = LiveHarness::start("collection_listing_is_reachable")?;
    let response = harness.client().list(None, None)?;
    let page = expect_page(&response, harness.validator(), "list users")?;
    ContractValidator::assert_no_duplicate_ids(&page.items)?;
    harness.finish(vec![format!("collection holds {} users", page.total)])
}
