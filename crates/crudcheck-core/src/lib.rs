// crates/crudcheck-core/src/lib.rs
// ============================================================================
// Module: Crudcheck Core
// Description: Data model, pagination oracle, and contract validation.
// Purpose: Provide the transport-free half of the users API contract harness.
// Dependencies: serde, serde_json, jsonschema, thiserror
// ============================================================================

//! ## Overview
//! Crudcheck core holds everything the harness needs to judge a response
//! without performing I/O: the resource data model, the pure pagination
//! arithmetic used as the oracle, JSON Schema descriptors for every response
//! kind, and the [`ContractValidator`] that compares live bodies against them.
//! Invariants:
//! - Pagination functions are pure and total over validated inputs.
//! - Shape failures and contract failures are reported as distinct types.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod model;
pub mod pagination;
pub mod schemas;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use model::AppStatus;
pub use model::NewResource;
pub use model::PageRequest;
pub use model::PageRequestError;
pub use model::PageResult;
pub use model::Resource;
pub use model::UserId;
pub use model::status;
pub use pagination::PaginationError;
pub use validator::ContractValidator;
pub use validator::ContractViolation;
pub use validator::IdList;
pub use validator::SchemaError;
pub use validator::ShapeKind;
pub use validator::ShapeViolation;
