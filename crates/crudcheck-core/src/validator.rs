// crates/crudcheck-core/src/validator.rs
// ============================================================================
// Module: Contract Validator
// Description: Shape validation and cross-response invariant checks.
// Purpose: Judge live users API responses against schemas and the pagination oracle.
// Dependencies: jsonschema, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The validator owns one compiled schema per response kind and exposes the
//! contract assertions scenarios compose. Structural failures surface as
//! [`ShapeViolation`]; disagreements with the modeled expectation surface as
//! [`ContractViolation`], each variant naming the invariant with expected and
//! actual values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use jsonschema::Draft;
use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::model::AppStatus;
use crate::model::PageRequest;
use crate::model::PageResult;
use crate::model::Resource;
use crate::model::UserId;
use crate::pagination;
use crate::schemas;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Ordered list of identifiers rendered as `1, 2, 3`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdList(pub Vec<UserId>);

impl fmt::Display for IdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, id) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            id.fmt(f)?;
        }
        Ok(())
    }
}

/// Response kinds with a schema descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Liveness status body.
    AppStatus,
    /// Single resource body.
    Resource,
    /// Paginated listing body.
    Page,
}

impl ShapeKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AppStatus => "app_status",
            Self::Resource => "resource",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A body does not match the schema for its response kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} shape violation: {}", .messages.join("; "))]
pub struct ShapeViolation {
    /// Response kind that was expected.
    pub kind: ShapeKind,
    /// Individual schema or decode failures.
    pub messages: Vec<String>,
}

/// A schema descriptor failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} schema failed to compile: {message}")]
pub struct SchemaError {
    /// Response kind of the failing schema.
    pub kind: ShapeKind,
    /// Compiler message.
    pub message: String,
}

/// A live response disagrees with the modeled expectation.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// Unexpected HTTP status.
    #[error("{context}: expected status {expected}, got {actual} (body: {body})")]
    Status {
        /// Operation under test.
        context: String,
        /// Expected status code.
        expected: u16,
        /// Observed status code.
        actual: u16,
        /// Observed body text.
        body: String,
    },
    /// Page or size not echoed back as requested.
    #[error("{field} echo mismatch: expected {expected}, got {actual}")]
    PageEcho {
        /// Echoed field name.
        field: &'static str,
        /// Requested value.
        expected: u64,
        /// Echoed value.
        actual: u64,
    },
    /// Reported total differs from the known collection size.
    #[error("total mismatch: expected {expected}, got {actual}")]
    Total {
        /// Known collection size.
        expected: u64,
        /// Reported total.
        actual: u64,
    },
    /// Reported page count differs from `ceil(total / size)`.
    #[error("pages count mismatch for total={total} size={size}: expected {expected}, got {actual}")]
    PageCount {
        /// Collection size used for the expectation.
        total: u64,
        /// Page size used for the expectation.
        size: u64,
        /// Modeled page count.
        expected: u64,
        /// Reported page count.
        actual: u64,
    },
    /// Item count on a page differs from the model.
    #[error(
        "item count mismatch on page {page} (size {size}, total {total}): expected {expected}, got {actual}"
    )]
    ItemCount {
        /// Requested page.
        page: u64,
        /// Requested size.
        size: u64,
        /// Collection size used for the expectation.
        total: u64,
        /// Modeled item count.
        expected: u64,
        /// Observed item count.
        actual: u64,
    },
    /// Identifiers repeated within one sequence.
    #[error("duplicate ids: {ids}")]
    DuplicateIds {
        /// Repeated identifiers.
        ids: IdList,
    },
    /// Two distinct pages share identifiers.
    #[error("pages {page_a} and {page_b} are not disjoint, shared ids: {ids}")]
    Overlap {
        /// First page number.
        page_a: u64,
        /// Second page number.
        page_b: u64,
        /// Shared identifiers.
        ids: IdList,
    },
    /// Repeating a request returned different items.
    #[error("ordering unstable for {request}: first divergence at position {position}")]
    UnstableOrdering {
        /// Request that was repeated.
        request: String,
        /// First index at which the sequences differ.
        position: usize,
    },
    /// Page items are not the expected slice of the ordered collection.
    #[error("page window mismatch for {request}: expected ids [{expected}], got [{actual}]")]
    Window {
        /// Request under test.
        request: String,
        /// Expected identifiers in order.
        expected: IdList,
        /// Observed identifiers in order.
        actual: IdList,
    },
    /// A resource field differs from the expected value.
    #[error("field {field} mismatch: expected {expected}, got {actual}")]
    Field {
        /// Field name.
        field: String,
        /// Expected JSON value.
        expected: String,
        /// Observed JSON value.
        actual: String,
    },
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Compiled schemas plus contract assertions.
pub struct ContractValidator {
    /// Status body schema.
    status: Validator,
    /// Resource body schema.
    resource: Validator,
    /// Page body schema.
    page: Validator,
}

impl ContractValidator {
    /// Compiles the schema for every response kind.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a schema fails to compile.
    pub fn new() -> Result<Self, SchemaError> {
        Ok(Self {
            status: compile_schema(ShapeKind::AppStatus, &schemas::app_status_schema())?,
            resource: compile_schema(ShapeKind::Resource, &schemas::resource_schema())?,
            page: compile_schema(ShapeKind::Page, &schemas::page_schema())?,
        })
    }

    /// Checks a body against the schema for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeViolation`] listing every schema failure.
    pub fn validate_shape(&self, value: &Value, kind: ShapeKind) -> Result<(), ShapeViolation> {
        let validator = match kind {
            ShapeKind::AppStatus => &self.status,
            ShapeKind::Resource => &self.resource,
            ShapeKind::Page => &self.page,
        };
        let messages: Vec<String> = validator.iter_errors(value).map(|err| err.to_string()).collect();
        if messages.is_empty() {
            Ok(())
        } else {
            Err(ShapeViolation {
                kind,
                messages,
            })
        }
    }

    /// Validates and decodes a resource body.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeViolation`] when the body is malformed.
    pub fn decode_resource(&self, value: &Value) -> Result<Resource, ShapeViolation> {
        self.decode(value, ShapeKind::Resource)
    }

    /// Validates and decodes a page body.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeViolation`] when the body is malformed.
    pub fn decode_page(&self, value: &Value) -> Result<PageResult, ShapeViolation> {
        self.decode(value, ShapeKind::Page)
    }

    /// Validates and decodes a status body.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeViolation`] when the body is malformed.
    pub fn decode_status(&self, value: &Value) -> Result<AppStatus, ShapeViolation> {
        self.decode(value, ShapeKind::AppStatus)
    }

    /// Shape check followed by a typed decode.
    fn decode<T: DeserializeOwned>(&self, value: &Value, kind: ShapeKind) -> Result<T, ShapeViolation> {
        self.validate_shape(value, kind)?;
        serde_json::from_value(value.clone()).map_err(|err| ShapeViolation {
            kind,
            messages: vec![err.to_string()],
        })
    }

    /// Checks an observed status code.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::Status`] when the codes differ.
    pub fn assert_status(
        context: &str,
        expected: u16,
        actual: u16,
        body: &str,
    ) -> Result<(), ContractViolation> {
        if expected == actual {
            return Ok(());
        }
        Err(ContractViolation::Status {
            context: context.to_string(),
            expected,
            actual,
            body: body.to_string(),
        })
    }

    /// Checks that no identifier repeats within `items`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::DuplicateIds`] naming the repeats.
    pub fn assert_no_duplicate_ids(items: &[Resource]) -> Result<(), ContractViolation> {
        let ids = pagination::duplicate_ids(items);
        if ids.is_empty() {
            Ok(())
        } else {
            Err(ContractViolation::DuplicateIds {
                ids: IdList(ids),
            })
        }
    }

    /// Checks a live page against the pagination model for a collection of
    /// `total` items.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContractViolation`] found, checked in the order
    /// page echo, size echo, total, pages count, item count, duplicate ids.
    pub fn assert_page_contract(
        result: &PageResult,
        total: u64,
        request: PageRequest,
    ) -> Result<(), ContractViolation> {
        if result.page != request.page() {
            return Err(ContractViolation::PageEcho {
                field: "page",
                expected: request.page(),
                actual: result.page,
            });
        }
        if result.size != request.size() {
            return Err(ContractViolation::PageEcho {
                field: "size",
                expected: request.size(),
                actual: result.size,
            });
        }
        if result.total != total {
            return Err(ContractViolation::Total {
                expected: total,
                actual: result.total,
            });
        }
        let pages = pagination::expected_pages(total, request.size()).unwrap_or(0);
        if result.pages != pages {
            return Err(ContractViolation::PageCount {
                total,
                size: request.size(),
                expected: pages,
                actual: result.pages,
            });
        }
        let expected_items =
            pagination::expected_item_count(total, request.page(), request.size()).unwrap_or(0);
        let actual_items = u64::try_from(result.items.len()).unwrap_or(u64::MAX);
        if actual_items != expected_items {
            return Err(ContractViolation::ItemCount {
                page: request.page(),
                size: request.size(),
                total,
                expected: expected_items,
                actual: actual_items,
            });
        }
        Self::assert_no_duplicate_ids(&result.items)
    }

    /// Checks that two distinct pages share no identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::Overlap`] naming the shared identifiers.
    pub fn assert_pages_disjoint(
        page_a: &PageResult,
        page_b: &PageResult,
    ) -> Result<(), ContractViolation> {
        if pagination::pages_are_disjoint(&page_a.items, &page_b.items) {
            return Ok(());
        }
        Err(ContractViolation::Overlap {
            page_a: page_a.page,
            page_b: page_b.page,
            ids: IdList(pagination::shared_ids(&page_a.items, &page_b.items)),
        })
    }

    /// Checks that a repeated request returned identical items in order.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::UnstableOrdering`] at the first divergence.
    pub fn assert_stable_ordering(
        first: &PageResult,
        second: &PageResult,
        request: PageRequest,
    ) -> Result<(), ContractViolation> {
        if pagination::ordering_is_stable(first, second) {
            return Ok(());
        }
        let position = first
            .items
            .iter()
            .zip(&second.items)
            .position(|(left, right)| left != right)
            .unwrap_or_else(|| first.items.len().min(second.items.len()));
        Err(ContractViolation::UnstableOrdering {
            request: request.to_string(),
            position,
        })
    }

    /// Checks that page items are exactly the expected slice of `ordered_ids`,
    /// the full collection in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::Window`] with both id sequences.
    pub fn assert_page_window(
        result: &PageResult,
        ordered_ids: &[UserId],
        request: PageRequest,
    ) -> Result<(), ContractViolation> {
        let total = u64::try_from(ordered_ids.len()).unwrap_or(u64::MAX);
        let window = pagination::expected_offsets(total, request.page(), request.size())
            .unwrap_or(total..total);
        let start = usize::try_from(window.start).unwrap_or(usize::MAX);
        let end = usize::try_from(window.end).unwrap_or(usize::MAX);
        let expected = ordered_ids.get(start..end).unwrap_or_default();
        let actual = result.ids();
        if expected == actual.as_slice() {
            return Ok(());
        }
        Err(ContractViolation::Window {
            request: request.to_string(),
            expected: IdList(expected.to_vec()),
            actual: IdList(actual),
        })
    }

    /// Checks that every field present in `expected` (a JSON object) carries
    /// the same value on `actual`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::Field`] for the first differing field.
    pub fn assert_fields_match(expected: &Value, actual: &Resource) -> Result<(), ContractViolation> {
        let actual_value = serde_json::to_value(actual).unwrap_or(Value::Null);
        let Value::Object(expected_map) = expected else {
            return Err(ContractViolation::Field {
                field: "<body>".to_string(),
                expected: expected.to_string(),
                actual: actual_value.to_string(),
            });
        };
        for (field, value) in expected_map {
            let observed = actual_value.get(field).unwrap_or(&Value::Null);
            if observed != value {
                return Err(ContractViolation::Field {
                    field: field.clone(),
                    expected: value.to_string(),
                    actual: observed.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Checks that `after` equals `before` on every field not listed in
    /// `changed`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::Field`] for the first unexpected change.
    pub fn assert_unchanged_except(
        before: &Resource,
        after: &Resource,
        changed: &[&str],
    ) -> Result<(), ContractViolation> {
        let before_value = serde_json::to_value(before).unwrap_or(Value::Null);
        let after_value = serde_json::to_value(after).unwrap_or(Value::Null);
        let Value::Object(before_map) = before_value else {
            return Ok(());
        };
        for (field, value) in &before_map {
            if changed.contains(&field.as_str()) {
                continue;
            }
            let observed = after_value.get(field).unwrap_or(&Value::Null);
            if observed != value {
                return Err(ContractViolation::Field {
                    field: field.clone(),
                    expected: value.to_string(),
                    actual: observed.to_string(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Compiles a draft 2020-12 schema with format assertions enabled.
fn compile_schema(kind: ShapeKind, schema: &Value) -> Result<Validator, SchemaError> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .should_validate_formats(true)
        .build(schema)
        .map_err(|err| SchemaError {
            kind,
            message: err.to_string(),
        })
}
