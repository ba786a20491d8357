// crates/crudcheck-core/src/schemas.rs
// ============================================================================
// Module: Response Schemas
// Description: JSON Schema descriptors for users API response bodies.
// Purpose: Describe the status, resource, and page shapes structurally.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Each response kind the harness consumes has an explicit draft 2020-12
//! schema. The page schema embeds the resource schema under `$defs` so each
//! document compiles on its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Draft used by every schema in this module.
const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Exactly one `@` with non-empty local part and domain.
const SINGLE_AT_PATTERN: &str = "^[^@\\s]+@[^@\\s]+$";

// ============================================================================
// SECTION: Schemas
// ============================================================================

/// Returns the schema for the liveness status body.
#[must_use]
pub fn app_status_schema() -> Value {
    json!({
        "$schema": DRAFT_2020_12,
        "$id": "crudcheck://schemas/app-status.schema.json",
        "title": "AppStatus",
        "type": "object",
        "required": ["status"],
        "properties": {
            "status": { "type": "string", "minLength": 1 }
        }
    })
}

/// Returns the schema for a single stored resource.
#[must_use]
pub fn resource_schema() -> Value {
    let mut schema = resource_definition();
    if let Value::Object(map) = &mut schema {
        map.insert("$schema".to_string(), Value::String(DRAFT_2020_12.to_string()));
        map.insert(
            "$id".to_string(),
            Value::String("crudcheck://schemas/resource.schema.json".to_string()),
        );
    }
    schema
}

/// Returns the schema for a paginated listing body.
#[must_use]
pub fn page_schema() -> Value {
    json!({
        "$schema": DRAFT_2020_12,
        "$id": "crudcheck://schemas/page.schema.json",
        "title": "PageResult",
        "type": "object",
        "required": ["items", "page", "size", "total", "pages"],
        "properties": {
            "items": {
                "type": "array",
                "items": { "$ref": "#/$defs/Resource" }
            },
            "page": { "type": "integer", "minimum": 1 },
            "size": { "type": "integer", "minimum": 1 },
            "total": { "type": "integer", "minimum": 0 },
            "pages": { "type": "integer", "minimum": 0 }
        },
        "$defs": {
            "Resource": resource_definition()
        }
    })
}

/// Resource body definition shared by the resource and page schemas.
fn resource_definition() -> Value {
    json!({
        "title": "Resource",
        "type": "object",
        "required": ["id", "email", "first_name", "last_name", "avatar"],
        "properties": {
            "id": { "type": "integer", "minimum": 1 },
            "email": {
                "type": "string",
                "format": "email",
                "pattern": SINGLE_AT_PATTERN
            },
            "first_name": { "type": "string", "minLength": 1 },
            "last_name": { "type": "string", "minLength": 1 },
            "avatar": { "type": "string", "format": "uri" }
        }
    })
}
