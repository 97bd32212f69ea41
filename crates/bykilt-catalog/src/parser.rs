//! `llms.txt` parser.

use serde::Deserialize;
use serde_json::Value;

use bykilt_protocols::ActionDefinition;

use crate::error::CatalogError;

#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    actions: Vec<Value>,
}

/// Parse catalog YAML into action definitions, in file order.
///
/// An empty document is an empty catalog. Each entry must be a mapping with a
/// non-empty string `type`.
pub fn parse_catalog(content: &str) -> Result<Vec<ActionDefinition>, CatalogError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: Option<CatalogDocument> = serde_yml::from_str(content)?;
    let Some(document) = document else {
        return Ok(Vec::new());
    };

    document
        .actions
        .into_iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect()
}

fn parse_entry(index: usize, entry: Value) -> Result<ActionDefinition, CatalogError> {
    let Value::Object(map) = &entry else {
        return Err(CatalogError::InvalidEntry {
            index,
            message: "entry must be a mapping".to_string(),
        });
    };

    match map.get("type") {
        Some(Value::String(t)) if !t.trim().is_empty() => {}
        Some(Value::String(_)) | None => {
            return Err(CatalogError::InvalidEntry {
                index,
                message: "missing 'type'".to_string(),
            });
        }
        Some(other) => {
            return Err(CatalogError::InvalidEntry {
                index,
                message: format!("'type' must be a string, got {}", other),
            });
        }
    }

    serde_json::from_value(entry).map_err(|e| CatalogError::InvalidEntry {
        index,
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
