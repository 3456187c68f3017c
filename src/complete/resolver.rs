//! Guesses which `list` operation can supply values for an argument.
//!
//! Remote naming conventions are inconsistent enough that no single
//! rule suffices; the chain below trades recall for precision and an
//! ambiguous match is rejected rather than guessed, so the completer
//! never offers wrong-typed values.

use std::sync::Arc;

use crate::catalog::models::{ArgumentSpec, Operation};
use crate::catalog::verbs::{EntryOrigin, VerbIndex};

/// Resolves the `list` operation supplying candidate values for `arg`,
/// evaluated as an ordered rule chain where the first hit wins.
#[must_use]
pub fn resolve_list_operation(
    arg: &ArgumentSpec,
    owner: &Operation,
    index: &VerbIndex,
) -> Option<Arc<Operation>> {
    // Map-typed arguments have no sensible list source.
    if arg.kind.is_map() {
        return None;
    }
    let target = target_noun(arg.bare_name(), owner);
    exact_noun(index, &target)
        .or_else(|| storage_fallback(index, &target))
        .or_else(|| unique_substring_fallback(index, &target))
}

/// Name-specific overrides, checked in fixed priority order.
pub(crate) fn target_noun(arg_name: &str, owner: &Operation) -> String {
    match arg_name {
        // A `list` operation's own id argument refers to itself, so its
        // noun is used unpluralized; any other verb pluralizes.
        "id" | "ids" => {
            if owner.verb == "list" {
                owner.noun.clone()
            } else {
                format!("{}s", owner.noun)
            }
        }
        "account" => "accounts".to_string(),
        "ipaddressid" => "publicipaddresses".to_string(),
        "storageid" => "storagepools".to_string(),
        "associatednetworkid" => "networks".to_string(),
        _ => {
            let stripped = arg_name
                .strip_suffix("ids")
                .or_else(|| arg_name.strip_suffix("id"))
                .unwrap_or(arg_name);
            format!("{stripped}s")
        }
    }
}

fn list_operations(index: &VerbIndex) -> impl Iterator<Item = &Arc<Operation>> {
    index
        .bucket("list")
        .iter()
        .filter(|entry| entry.origin == EntryOrigin::Remote)
        .map(|entry| &entry.op)
}

fn exact_noun(index: &VerbIndex, noun: &str) -> Option<Arc<Operation>> {
    list_operations(index)
        .find(|op| op.noun == noun)
        .map(Arc::clone)
}

fn storage_fallback(index: &VerbIndex, target: &str) -> Option<Arc<Operation>> {
    if target.contains("storage") {
        exact_noun(index, "storagepools")
    } else {
        None
    }
}

/// Last resort: unique substring match against the singular form.
/// Ambiguity (zero or several hits) is NotFound, never a guess.
fn unique_substring_fallback(index: &VerbIndex, target: &str) -> Option<Arc<Operation>> {
    let singular = target.strip_suffix('s').unwrap_or(target);
    let mut matches = list_operations(index).filter(|op| op.noun.contains(singular));
    match (matches.next(), matches.next()) {
        (Some(op), None) => Some(Arc::clone(op)),
        _ => None,
    }
}
