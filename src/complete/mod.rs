//! Staged interactive completer: verb → noun → argument → value.
//!
//! Invoked on every completion request against the line up to the
//! cursor. Strictly left to right with no backtracking: each stage
//! either consumes an exact token and advances, or returns whatever
//! soft candidates it collected.
//!
//! Candidates are continuation strings inserted at the cursor; for any
//! known token `T` and strict prefix `P` the user typed, `P` plus the
//! candidate reproduces `T` followed by a separator. `offset` reports
//! how many characters of the in-progress token the candidates
//! continue.

pub mod resolver;
pub mod values;

use std::sync::Arc;

use tracing::debug;

use crate::catalog::verbs::VerbIndex;
use crate::client::RemoteInvoker;
use crate::spinner::BusyIndicator;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Completion {
    pub candidates: Vec<String>,
    pub offset: usize,
}

pub struct CompleteContext<'a> {
    pub index: &'a VerbIndex,
    /// Live argument-value completion toggle; when off, the value stage
    /// makes no network call and offers nothing.
    pub live_values: bool,
    pub invoker: &'a dyn RemoteInvoker,
    pub indicator: &'a dyn BusyIndicator,
}

/// Completes `line` at byte position `pos`.
#[must_use]
pub fn complete(line: &str, pos: usize, ctx: &CompleteContext<'_>) -> Completion {
    let upto = &line[..pos.min(line.len())];
    let trimmed = upto.trim_start();
    let mut out = Completion::default();

    // ExpectVerb: found only when the prefix exactly equals `verb + " "`.
    let mut verb_found: Option<String> = None;
    for verb in ctx.index.verbs() {
        let search = format!("{verb} ");
        if trimmed.starts_with(&search) {
            verb_found = Some(verb.to_string());
            break;
        }
        soft_complete(trimmed, &search, &mut out);
    }
    let Some(verb) = verb_found else {
        return out;
    };

    // ExpectNoun against the operations bucketed under the verb.
    let rest = trimmed[verb.len()..].trim_start();
    let mut entry_found = None;
    for entry in ctx.index.bucket(&verb) {
        let search = format!("{} ", entry.op.noun);
        if rest.starts_with(&search) {
            entry_found = Some(entry);
            break;
        }
        soft_complete(rest, &search, &mut out);
    }
    let Some(entry) = entry_found else {
        return out;
    };
    let op = &entry.op;

    // ExpectArgument: the last whitespace-delimited token is in progress.
    let after = &rest[op.noun.len() + 1..];
    let token = after.split(' ').next_back().unwrap_or("");
    if !token.contains('=') {
        let mut arg_out = Completion::default();
        for arg in &op.args {
            soft_complete(token, &arg.name, &mut arg_out);
        }
        return arg_out;
    }

    let Some(arg) = op.find_arg(token) else {
        return Completion::default();
    };
    let typed_value = &token[arg.name.len()..];

    if arg.kind.is_boolean() {
        let mut bool_out = Completion {
            candidates: vec![],
            offset: typed_value.len(),
        };
        for full in ["true ", "false "] {
            if full.starts_with(typed_value) && typed_value.len() < full.len() {
                bool_out.candidates.push(full[typed_value.len()..].to_string());
            }
        }
        return bool_out;
    }

    if arg.kind.is_filter() {
        return complete_filter_keys(op.response_keys.as_slice(), typed_value);
    }

    complete_remote_values(ctx, op, arg, typed_value)
}

/// Response-key completion for the filter pseudo-argument: repeated
/// keys are comma-separated, and keys already listed are not offered
/// again.
fn complete_filter_keys(response_keys: &[String], typed_value: &str) -> Completion {
    let mut segments: Vec<&str> = typed_value.split(',').collect();
    let partial = segments.pop().unwrap_or("");
    let mut out = Completion {
        candidates: vec![],
        offset: partial.len(),
    };
    for key in response_keys {
        if segments.contains(&key.as_str()) {
            continue;
        }
        if key.starts_with(partial) && partial.len() < key.len() {
            out.candidates.push(key[partial.len()..].to_string());
        }
    }
    out
}

fn complete_remote_values(
    ctx: &CompleteContext<'_>,
    op: &Arc<crate::catalog::models::Operation>,
    arg: &crate::catalog::models::ArgumentSpec,
    typed_value: &str,
) -> Completion {
    if !ctx.live_values {
        return Completion::default();
    }
    let Some(mut list_op) = resolver::resolve_list_operation(arg, op, ctx.index) else {
        return Completion::default();
    };

    // Unpaged fetch, with operation-specific narrowing.
    let mut fetch_args = vec!["listall=true".to_string()];
    if list_op.noun == "templates" {
        fetch_args.push("templatefilter=executable".to_string());
    }
    if list_op.name == "listHosts" && !op.name.contains("Certificate") {
        fetch_args.push("type=routing".to_string());
    }
    if op.name == "migrateSystemVm" && list_op.name == "listVirtualMachines" {
        if let Some(system) = ctx.index.find("list", "systemvms") {
            list_op = Arc::clone(&system.op);
        }
    }
    if list_op.name == "listPublicIpAddresses" {
        fetch_args.push("allocatedonly=false".to_string());
    }

    debug!(
        target: "cumulus::complete",
        "fetching values for {} via {}", arg.name, list_op.name
    );
    ctx.indicator.start(&format!("fetching {} options", arg.bare_name()));
    let fetched = ctx.invoker.invoke(&list_op.name, &fetch_args, false);
    ctx.indicator.stop();
    let Ok(response) = fetched else {
        return Completion::default();
    };

    let bare = arg.bare_name();
    let prefer_id = bare.ends_with("id") || bare.ends_with("ids");
    let candidates = values::extract_candidates(&response, prefer_id);
    let matching: Vec<&values::ValueCandidate> = candidates
        .iter()
        .filter(|candidate| candidate.value.starts_with(typed_value))
        .collect();
    let annotate = matching.len() > 1;

    let mut out = Completion {
        candidates: vec![],
        offset: typed_value.len(),
    };
    for candidate in matching {
        let mut text = candidate.value[typed_value.len()..].to_string();
        if annotate && !candidate.detail.is_empty() {
            text.push_str(&format!(" ({})", candidate.detail));
        }
        if !text.is_empty() {
            out.candidates.push(text);
        }
    }
    out
}

/// Soft completion of a typed fragment against a known full token
/// (which carries its trailing separator). A strict prefix yields the
/// remaining suffix; an exact match yields a single separator.
fn soft_complete(typed: &str, full: &str, out: &mut Completion) {
    if typed.len() < full.len() {
        if full.starts_with(typed) {
            out.candidates.push(full[typed.len()..].to_string());
            out.offset = typed.len();
        }
    } else if typed == full {
        out.candidates.push(" ".to_string());
        out.offset = typed.len();
    }
}
