//! Local (non-remote) commands and their completion metadata.
//!
//! Unknown top-level tokens fall through to operation dispatch, so this
//! registry only carries the handful of CLI-owned verbs.

pub mod help;
pub mod set;
pub mod sync;

use crate::catalog::verbs::{LocalCommandSpec, SubCommandSpec};
use crate::config::Config;
use crate::error::Error;
use crate::render::OutputFormat;
use crate::session::Session;

pub type Handler = fn(&mut Session, &[String]) -> Result<(), Error>;

pub struct LocalCommand {
    pub name: &'static str,
    pub help: &'static str,
    pub handler: Handler,
}

static COMMANDS: &[LocalCommand] = &[
    LocalCommand {
        name: "api",
        help: "Runs a named API with the given key=value arguments",
        handler: api_handler,
    },
    LocalCommand {
        name: "help",
        help: "Shows command usage or details of an API",
        handler: help::handle,
    },
    LocalCommand {
        name: "set",
        help: "Configures CLI options and server profiles",
        handler: set::handle,
    },
    LocalCommand {
        name: "sync",
        help: "Discovers the server's APIs and refreshes the local catalog",
        handler: sync::handle,
    },
    LocalCommand {
        name: "exit",
        help: "Leaves the interactive shell",
        handler: noop_handler,
    },
    LocalCommand {
        name: "quit",
        help: "Leaves the interactive shell",
        handler: noop_handler,
    },
];

#[must_use]
pub fn all() -> &'static [LocalCommand] {
    COMMANDS
}

#[must_use]
pub fn find(name: &str) -> Option<&'static LocalCommand> {
    COMMANDS.iter().find(|command| command.name == name)
}

// `exit`/`quit` are intercepted by the shell loop; outside the shell
// there is nothing to leave.
fn noop_handler(_session: &mut Session, _args: &[String]) -> Result<(), Error> {
    Ok(())
}

fn api_handler(session: &mut Session, args: &[String]) -> Result<(), Error> {
    if args.is_empty() {
        return Err(Error::Config("please provide an API to execute".to_string()));
    }
    crate::exec::execute_operation(session, args)
}

/// Completion metadata for the registry, merged into the verb index.
///
/// The `profile` sub-command's values cannot be known statically; they
/// are recomputed from the live profile list on every index build.
#[must_use]
pub fn local_command_specs(config: &Config) -> Vec<LocalCommandSpec> {
    let bools = || vec!["true".to_string(), "false".to_string()];
    let sub = |name: &str, values: Vec<String>| SubCommandSpec {
        name: name.to_string(),
        values,
    };
    let plain = |name: &str| LocalCommandSpec {
        name: name.to_string(),
        subcommands: vec![],
    };

    let set_spec = LocalCommandSpec {
        name: "set".to_string(),
        subcommands: vec![
            sub("apikey", vec![]),
            sub("asyncblock", bools()),
            sub("domain", vec![]),
            sub(
                "output",
                OutputFormat::names().iter().map(|s| (*s).to_string()).collect(),
            ),
            sub("paramcompletion", bools()),
            sub("password", vec![]),
            sub("profile", config.profile_names()),
            sub("prompt", vec!["random".to_string()]),
            sub("secretkey", vec![]),
            sub(
                "timeout",
                vec!["600".to_string(), "1800".to_string(), "3600".to_string()],
            ),
            sub("url", vec![]),
            sub("username", vec![]),
            sub("verifycert", bools()),
        ],
    };

    vec![
        plain("api"),
        plain("help"),
        set_spec,
        plain("sync"),
        plain("exit"),
        plain("quit"),
    ]
}
