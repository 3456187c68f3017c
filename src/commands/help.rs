//! The `help` command: command usage, or details of one API.

use crate::error::Error;
use crate::exec::suggest_operations;
use crate::session::Session;

pub fn handle(session: &mut Session, args: &[String]) -> Result<(), Error> {
    if let Some(name) = args.first() {
        return print_operation_help(session, name);
    }
    println!("Interactive CLI for CloudStack-compatible cloud management APIs.\n");
    println!("Local commands:");
    for command in super::all() {
        println!("  {:<8} {}", command.name, command.help);
    }
    println!("\nAnything else is dispatched as an API, e.g. `list zones` or `listZones`.");
    println!("Append -h to an API invocation to see its arguments.");
    Ok(())
}

/// Renders argument-level help for one operation.
pub fn print_operation_help(session: &Session, name: &str) -> Result<(), Error> {
    let Some(op) = session.catalog().get(name) else {
        return Err(Error::UnknownCommand {
            name: name.to_string(),
            suggestions: suggest_operations(session.catalog(), name),
        });
    };
    println!("{}: {}", op.name, op.description);
    if op.is_async {
        println!("This API is asynchronous.");
    }
    if !op.required_args.is_empty() {
        let required: Vec<&str> = op
            .required_args
            .iter()
            .map(|arg| arg.trim_end_matches('='))
            .collect();
        println!("Required arguments: {}", required.join(", "));
    }
    println!("Arguments:");
    for arg in &op.args {
        let marker = if arg.required { " (required)" } else { "" };
        println!("  {:<24}{}{}", arg.name, arg.description, marker);
    }
    Ok(())
}
