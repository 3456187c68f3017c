//! Extracts completion candidates from a decoded list response.

use serde_json::{Map, Value};

/// One offered argument value plus a short human-readable detail used
/// to disambiguate when several candidates survive filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCandidate {
    pub value: String,
    pub detail: String,
}

/// Walks every list-valued top-level field of the response and maps
/// each element to a candidate, sorted ascending by value.
///
/// `prefer_id` selects the `id` field as the candidate value (used when
/// the argument being completed names an id); the display chain is
/// `name`, then `username`, then a composed hypervisor/version string,
/// then the description or IP-address fields.
#[must_use]
pub fn extract_candidates(response: &Value, prefer_id: bool) -> Vec<ValueCandidate> {
    let mut out = Vec::new();
    let Some(obj) = response.as_object() else {
        return out;
    };
    for value in obj.values() {
        let Some(items) = value.as_array() else {
            continue;
        };
        for item in items {
            if let Some(candidate) = item.as_object().and_then(|row| from_row(row, prefer_id)) {
                out.push(candidate);
            }
        }
    }
    out.sort_by(|a, b| a.value.cmp(&b.value));
    out
}

fn field(row: &Map<String, Value>, key: &str) -> Option<String> {
    row.get(key).and_then(|value| match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn from_row(row: &Map<String, Value>, prefer_id: bool) -> Option<ValueCandidate> {
    let display = field(row, "name")
        .or_else(|| field(row, "username"))
        .or_else(|| {
            match (field(row, "hypervisor"), field(row, "hypervisorversion")) {
                (Some(hv), Some(version)) => Some(format!("{hv} {version}")),
                _ => None,
            }
        })
        .or_else(|| field(row, "displaytext"))
        .or_else(|| field(row, "description"))
        .or_else(|| field(row, "ipaddress"));
    let detail = field(row, "displaytext")
        .or_else(|| field(row, "description"))
        .or_else(|| field(row, "ipaddress"))
        .unwrap_or_default();
    let id = field(row, "id");

    let value = if prefer_id {
        id.or(display)
    } else {
        display.or(id)
    }?;
    Some(ValueCandidate { value, detail })
}
