//! Pre-migration gates
//!
//! Each gate either passes or yields the [`ImportFailure`] that ends the
//! import.

use crate::config::ImportConfig;
use crate::error::{ImportErrorCode, ImportFailure};
use dialogue_migrate::legacy::select_edges;
use serde_json::Value;

/// Reject payloads over the byte ceiling
///
/// # Errors
/// `FILE_TOO_LARGE` when `raw` is longer than `max_bytes`.
pub fn check_size(raw: &str, max_bytes: usize) -> Result<(), ImportFailure> {
    if raw.len() > max_bytes {
        return Err(ImportFailure::too_large(raw.len(), max_bytes));
    }
    Ok(())
}

/// Parse the payload as JSON
///
/// # Errors
/// `INVALID_JSON` on any syntax error, including nesting too deep.
pub fn parse(text: &str) -> Result<Value, ImportFailure> {
    serde_json::from_str(text).map_err(|e| {
        tracing::debug!("JSON parse failed at line {}, column {}: {}", e.line(), e.column(), e);
        ImportFailure::new(ImportErrorCode::InvalidJson, "The file is not valid JSON")
    })
}

/// Reject documents whose `$ref` points at an enclosing `$id` or the root
///
/// # Errors
/// `CIRCULAR_REFERENCE` on the first such reference in document order.
pub fn check_references(document: &Value) -> Result<(), ImportFailure> {
    match find_reference_cycle(document) {
        Some(target) => {
            tracing::debug!("Reference '{}' points at an enclosing object", target);
            Err(ImportFailure::new(
                ImportErrorCode::CircularReference,
                "The file contains a circular reference",
            ))
        }
        None => Ok(()),
    }
}

/// Reject documents over the node or edge ceiling
///
/// # Errors
/// `TOO_MANY_NODES` or `TOO_MANY_EDGES`.
pub fn check_cardinality(document: &Value, config: &ImportConfig) -> Result<(), ImportFailure> {
    let array = |key: &str| document.get(key).and_then(Value::as_array).map(Vec::as_slice);

    let nodes = array("nodes").map_or(0, <[Value]>::len);
    if nodes > config.max_nodes {
        return Err(ImportFailure::new(
            ImportErrorCode::TooManyNodes,
            format!("The project has too many nodes ({nodes}, limit {})", config.max_nodes),
        ));
    }

    // Only the collection migration will read counts.
    let edges = select_edges(array("edges"), array("connections")).len();
    if edges > config.max_edges {
        return Err(ImportFailure::new(
            ImportErrorCode::TooManyEdges,
            format!("The project has too many edges ({edges}, limit {})", config.max_edges),
        ));
    }
    Ok(())
}

enum Step<'a> {
    Enter(&'a Value),
    Leave,
}

/// First `$ref` that targets `#` or the `$id` of itself or an ancestor
fn find_reference_cycle(root: &Value) -> Option<String> {
    let mut steps = vec![Step::Enter(root)];
    let mut ancestors: Vec<Option<&str>> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Leave => {
                ancestors.pop();
            }
            Step::Enter(Value::Object(map)) => {
                ancestors.push(map.get("$id").and_then(Value::as_str));
                if let Some(target) = map.get("$ref").and_then(Value::as_str) {
                    if target == "#" || ancestors.iter().flatten().any(|id| *id == target) {
                        return Some(target.to_string());
                    }
                }
                steps.push(Step::Leave);
                steps.extend(map.values().rev().map(Step::Enter));
            }
            Step::Enter(Value::Array(items)) => {
                steps.extend(items.iter().rev().map(Step::Enter));
            }
            Step::Enter(_) => {}
        }
    }
    None
}
