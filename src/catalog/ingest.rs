//! Defensive ingestion of the auto-discovery payload.
//!
//! The payload shape (`count` plus an `api` list of operation
//! descriptors) is externally defined; absent or mistyped fields fall
//! back to defaults instead of failing the record, and a malformed
//! record is skipped instead of failing the ingestion. Only a payload
//! with no operation list at all is a hard error.

use serde_json::Value;
use tracing::{debug, warn};

use super::models::{split_verb_noun, ArgKind, ArgumentSpec, Operation};
use super::ApiCatalog;
use crate::constants::FILTER_ARG;
use crate::error::Error;

fn str_field(node: &Value, key: &str) -> String {
    node.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn bool_field(node: &Value, key: &str) -> bool {
    node.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn parse_argument(node: &Value) -> Option<ArgumentSpec> {
    let name = str_field(node, "name");
    if name.is_empty() {
        return None;
    }
    let related = node
        .get("related")
        .and_then(Value::as_str)
        .map(|raw| {
            let mut related: Vec<String> = raw.split(',').map(str::to_string).collect();
            related.sort();
            related
        })
        .unwrap_or_default();
    Some(ArgumentSpec {
        name: format!("{name}="),
        kind: ArgKind::parse(&str_field(node, "type")),
        related,
        required: bool_field(node, "required"),
        description: str_field(node, "description"),
    })
}

fn parse_operation(node: &Value) -> Option<Operation> {
    let name = node.get("name")?.as_str()?.to_string();
    let (verb, noun) = split_verb_noun(&name);

    let mut args: Vec<ArgumentSpec> = node
        .get("params")
        .and_then(Value::as_array)
        .map(|params| params.iter().filter_map(parse_argument).collect())
        .unwrap_or_default();

    // The CLI-only response filter rides along on every operation.
    args.push(ArgumentSpec {
        name: FILTER_ARG.to_string(),
        kind: ArgKind::Filter,
        related: vec![],
        required: false,
        description: "comma separated list of response keys to display".to_string(),
    });
    args.sort_by(|a, b| a.name.cmp(&b.name));

    let required_args = args
        .iter()
        .filter(|arg| arg.required)
        .map(|arg| arg.name.clone())
        .collect();

    let mut response_keys: Vec<String> = node
        .get("response")
        .and_then(Value::as_array)
        .map(|keys| {
            keys.iter()
                .filter_map(|entry| entry.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    response_keys.sort();

    Some(Operation {
        verb,
        noun,
        args,
        required_args,
        is_async: bool_field(node, "isasync"),
        description: str_field(node, "description"),
        response_keys,
        name,
    })
}

/// Builds a fresh catalog from a discovery payload.
///
/// # Errors
/// Fails only when the payload has no `api` list; individual malformed
/// descriptors are logged and skipped.
pub fn ingest(payload: &Value) -> Result<ApiCatalog, Error> {
    let api_list = payload
        .get("api")
        .and_then(Value::as_array)
        .ok_or(Error::MalformedDiscovery)?;

    let mut catalog = ApiCatalog::empty();
    for node in api_list {
        match parse_operation(node) {
            Some(op) => catalog.insert(op),
            None => warn!(target: "cumulus::catalog", "skipping malformed API descriptor: {node}"),
        }
    }
    debug!(target: "cumulus::catalog", "ingested {} operations", catalog.len());
    Ok(catalog)
}
