//! Dispatch: resolves one argv into a local command or a remote
//! operation, gates on required arguments, and routes output.

use std::sync::Arc;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::catalog::ApiCatalog;
use crate::commands;
use crate::constants::FILTER_ARG;
use crate::error::Error;
use crate::render;
use crate::session::Session;

/// Executes one command line. Empty argv is a no-op.
///
/// # Errors
/// Unknown commands and remote failures surface as errors; a missing
/// required argument prints a message and returns `Ok` without
/// contacting the remote.
pub fn execute(session: &mut Session, args: &[String]) -> Result<(), Error> {
    let Some(first) = args.first() else {
        return Ok(());
    };
    if let Some(command) = commands::find(first) {
        return (command.handler)(session, &args[1..]);
    }
    execute_operation(session, args)
}

/// Resolves and runs a remote operation invocation.
///
/// The first token is tried as the operation name; when it matches
/// nothing, the first two tokens joined are tried (the `list zones`
/// spelling of `listZones`).
///
/// # Errors
/// See [`execute`].
pub fn execute_operation(session: &mut Session, args: &[String]) -> Result<(), Error> {
    let mut name = args[0].to_lowercase();
    let mut op_args: Vec<String> = args[1..].to_vec();
    if session.catalog().get(&name).is_none() && args.len() > 1 {
        name = format!("{}{}", args[0], args[1]).to_lowercase();
        op_args = args[2..].to_vec();
    }

    if op_args.iter().any(|arg| arg == "-h") {
        return commands::help::print_operation_help(session, &name);
    }

    let Some(op) = session.catalog().get(&name).map(Arc::clone) else {
        return Err(Error::UnknownCommand {
            name: args[0].clone(),
            suggestions: suggest_operations(session.catalog(), &args[0]),
        });
    };

    let missing: Vec<String> = op
        .required_args
        .iter()
        .filter(|required| !op_args.iter().any(|arg| arg.starts_with(required.as_str())))
        .map(|required| required.trim_end_matches('=').to_string())
        .collect();
    if !missing.is_empty() {
        println!("Missing required arguments: {}", missing.join(", "));
        return Ok(());
    }

    let filter: Vec<String> = op_args
        .iter()
        .find(|arg| arg.starts_with(FILTER_ARG))
        .map(|arg| {
            arg[FILTER_ARG.len()..]
                .split(',')
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    // The filter pseudo-argument is CLI-only; never forward it.
    let remote_args: Vec<String> = op_args
        .iter()
        .filter(|arg| !arg.starts_with(FILTER_ARG))
        .cloned()
        .collect();

    let output = session.config.core.output;
    match session.invoker().invoke(&op.name, &remote_args, op.is_async) {
        Ok(response) => render::print_response(output, &response, &filter),
        Err(err) => {
            // A partial body that came back with the failure still renders.
            if let Some(partial) = err.partial_body() {
                let _ = render::print_response(output, partial, &filter);
            }
            Err(err)
        }
    }
}

/// Closest catalog names for an unrecognized input, best first.
#[must_use]
pub fn suggest_operations(catalog: &ApiCatalog, input: &str) -> Vec<String> {
    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, String)> = catalog
        .names()
        .into_iter()
        .filter_map(|name| {
            matcher
                .fuzzy_match(&name.to_lowercase(), &input.to_lowercase())
                .map(|score| (score, name))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.into_iter().take(3).map(|(_, name)| name).collect()
}
