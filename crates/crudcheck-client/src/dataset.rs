// crates/crudcheck-client/src/dataset.rs
// ============================================================================
// Module: Seed Dataset
// Description: Loader for the fixed test-data file.
// Purpose: Read an ordered sequence of resource bodies for deterministic scenarios.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A dataset file is a JSON array of objects, each a creation body. Order is
//! significant: scenarios rely on creation order to predict page contents.
//! Bodies stay untyped so fixtures may carry extra or missing fields on
//! purpose.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::lifecycle::ProvisioningFailure;

/// Reads and parses a dataset file.
///
/// # Errors
///
/// Returns [`ProvisioningFailure::Dataset`] when the file cannot be read or
/// is not a JSON array of objects.
pub fn load_dataset(path: &Path) -> Result<Vec<Value>, ProvisioningFailure> {
    let label = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|err| ProvisioningFailure::Dataset {
        path: label.clone(),
        message: err.to_string(),
    })?;
    parse_dataset(&text, &label)
}

/// Parses dataset text; `label` names the source in errors.
///
/// # Errors
///
/// Returns [`ProvisioningFailure::Dataset`] when the text is not a JSON array
/// of objects.
pub fn parse_dataset(text: &str, label: &str) -> Result<Vec<Value>, ProvisioningFailure> {
    let invalid = |message: String| ProvisioningFailure::Dataset {
        path: label.to_string(),
        message,
    };
    let value: Value = serde_json::from_str(text).map_err(|err| invalid(err.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(invalid("dataset must be a json array".to_string()));
    };
    if let Some(index) = entries.iter().position(|entry| !entry.is_object()) {
        return Err(invalid(format!("entry {index} must be a json object")));
    }
    Ok(entries)
}
