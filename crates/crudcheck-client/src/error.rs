// crates/crudcheck-client/src/error.rs
// ============================================================================
// Module: Harness Errors
// Description: Scenario-level error taxonomy.
// Purpose: Attribute every scenario failure to transport, contract, shape, or setup.
// Dependencies: crudcheck-core, thiserror
// ============================================================================

//! ## Overview
//! [`HarnessError`] is the error type scenarios return. Each variant wraps the
//! component error it came from so failures stay attributable: a transport
//! failure is never reported as a contract failure, and a wrong shape is never
//! reported as wrong data.

use crudcheck_core::ContractViolation;
use crudcheck_core::PageRequestError;
use crudcheck_core::SchemaError;
use crudcheck_core::ShapeViolation;
use thiserror::Error;

use crate::config::ConfigError;
use crate::lifecycle::ProvisioningFailure;
use crate::transport::TransportError;

/// Scenario failure taxonomy.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// No HTTP exchange completed.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    /// A response disagreed with the modeled expectation.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),
    /// A response body had the wrong shape.
    #[error(transparent)]
    Shape(#[from] ShapeViolation),
    /// Scenario setup failed before the scenario body ran.
    #[error("provisioning failure: {0}")]
    Provisioning(#[from] ProvisioningFailure),
    /// Harness configuration was invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// A schema descriptor failed to compile.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A page request was invalid before it was sent.
    #[error("invalid page request: {0}")]
    Input(#[from] PageRequestError),
}
