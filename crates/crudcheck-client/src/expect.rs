// crates/crudcheck-client/src/expect.rs
// ============================================================================
// Module: Response Expectations
// Description: Status checks and typed decoding for raw responses.
// Purpose: Turn raw responses into typed bodies or attributable violations.
// Dependencies: crudcheck-core, serde_json
// ============================================================================

//! ## Overview
//! Every helper checks the status first (a [`ContractViolation`]) and only
//! then decodes the body (a [`ShapeViolation`]), so a wrong status is never
//! misreported as a malformed body.

use crudcheck_core::AppStatus;
use crudcheck_core::ContractValidator;
use crudcheck_core::PageResult;
use crudcheck_core::Resource;
use crudcheck_core::ShapeKind;
use crudcheck_core::ShapeViolation;
use serde_json::Value;

use crate::error::HarnessError;
use crate::transport::RawResponse;

/// Checks that `response` carries `expected` status.
///
/// # Errors
///
/// Returns [`HarnessError::Contract`] on any other status.
pub fn expect_status(response: &RawResponse, expected: u16, context: &str) -> Result<(), HarnessError> {
    ContractValidator::assert_status(context, expected, response.status, &response.text)?;
    Ok(())
}

/// Parses the body as JSON, attributing parse failures to `kind`.
///
/// # Errors
///
/// Returns [`ShapeViolation`] when the body is not JSON.
pub fn body_json(response: &RawResponse, kind: ShapeKind) -> Result<Value, ShapeViolation> {
    response.json().map_err(|err| ShapeViolation {
        kind,
        messages: vec![format!("body is not json: {err}")],
    })
}

/// Checks the status then decodes a resource body.
///
/// # Errors
///
/// Returns [`HarnessError::Contract`] or [`HarnessError::Shape`].
pub fn expect_resource(
    response: &RawResponse,
    validator: &ContractValidator,
    expected: u16,
    context: &str,
) -> Result<Resource, HarnessError> {
    expect_status(response, expected, context)?;
    let value = body_json(response, ShapeKind::Resource)?;
    Ok(validator.decode_resource(&value)?)
}

/// Checks for 200 then decodes a page body.
///
/// # Errors
///
/// Returns [`HarnessError::Contract`] or [`HarnessError::Shape`].
pub fn expect_page(
    response: &RawResponse,
    validator: &ContractValidator,
    context: &str,
) -> Result<PageResult, HarnessError> {
    expect_status(response, crudcheck_core::status::OK, context)?;
    let value = body_json(response, ShapeKind::Page)?;
    Ok(validator.decode_page(&value)?)
}

/// Checks for 200 then decodes a status body.
///
/// # Errors
///
/// Returns [`HarnessError::Contract`] or [`HarnessError::Shape`].
pub fn expect_app_status(
    response: &RawResponse,
    validator: &ContractValidator,
    context: &str,
) -> Result<AppStatus, HarnessError> {
    expect_status(response, crudcheck_core::status::OK, context)?;
    let value = body_json(response, ShapeKind::AppStatus)?;
    Ok(validator.decode_status(&value)?)
}
