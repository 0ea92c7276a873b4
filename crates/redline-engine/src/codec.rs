//! Parses persisted step JSON into live [`Step`]s.
//!
//! Suggestion records arrive from the remote API as a JSON list of steps in
//! the document model's serialization, with the product's auxiliary fields
//! (`deletedText`, `insertedText`, `originalFrom`) bolted alongside. The
//! model's own reconstruction would discard those fields, so they are
//! re-attached here after each step deserializes. A malformed entry is dropped
//! and parsing continues; one broken step must not take down a whole
//! suggestion batch.

use serde::Deserialize;
use serde_json::Value;

use crate::step::{Slice, Step};

/// Step types in the document model's replace family. Anything else was
/// serialized against a different schema and cannot be reconstructed here.
const STEP_TYPES: [&str; 2] = ["replace", "replaceAround"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    step_type: String,
    from: i64,
    to: i64,
    #[serde(default)]
    slice: Option<Value>,
    #[serde(default)]
    deleted_text: Option<String>,
    #[serde(default)]
    inserted_text: Option<String>,
    #[serde(default)]
    original_from: Option<i64>,
}

/// Parse a raw step list (or a single raw step) into live steps.
///
/// Output order matches input order with invalid entries omitted; gaps
/// collapse, no placeholders.
pub fn parse_steps(raw: &Value) -> Vec<Step> {
    let entries: &[Value] = match raw {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    };

    let mut steps = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match parse_step(entry) {
            Ok(step) => steps.push(step),
            Err(reason) => tracing::warn!(index, %reason, "skipping unparseable step"),
        }
    }
    steps
}

fn parse_step(entry: &Value) -> Result<Step, String> {
    let raw: RawStep = serde_json::from_value(entry.clone()).map_err(|e| e.to_string())?;

    if !STEP_TYPES.contains(&raw.step_type.as_str()) {
        return Err(format!("unsupported stepType {:?}", raw.step_type));
    }
    let from = usize::try_from(raw.from).map_err(|_| "negative from".to_string())?;
    let to = usize::try_from(raw.to).map_err(|_| "negative to".to_string())?;

    Ok(Step {
        from,
        to,
        slice: raw.slice.as_ref().map(slice_from_node),
        deleted_text: raw.deleted_text,
        inserted_text: raw.inserted_text,
        original_from: raw.original_from.and_then(|p| usize::try_from(p).ok()),
    })
}

/// Flatten a persisted slice's node structure to its text.
///
/// Handles plain text nodes, nested `content` arrays, and bare fragment-like
/// arrays uniformly; non-text leaves (hard breaks, images) contribute nothing.
fn slice_from_node(node: &Value) -> Slice {
    let mut text = String::new();
    collect_text(node, &mut text);
    Slice::from_text(&text)
}

fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for item in items {
                collect_text(item, out);
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get("text") {
                out.push_str(s);
            }
            if let Some(content) = map.get("content") {
                collect_text(content, out);
            }
        }
        _ => {}
    }
}
