pub mod errors;
pub mod tracing_init;

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::render::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Cumulus: interactive CLI for CloudStack-compatible cloud management APIs",
    long_about = "Cumulus talks to CloudStack-compatible management servers over their\n\
                  query API, with an interactive shell that tab-completes verbs, nouns,\n\
                  arguments, and live argument values fetched from the server.\n\n\
                  Examples:\n  \
                  cumulus                          # start the interactive shell\n  \
                  cumulus list zones               # run one command and exit\n  \
                  cumulus deploy virtualmachine -h # show an API's arguments\n  \
                  cumulus sync                     # refresh the API catalog"
)]
pub struct Cli {
    /// Config directory (default: ~/.cumulus, or $CUMULUS_CONFIG_DIR)
    #[arg(short = 'c', long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Server profile to activate
    #[arg(short = 'p', long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Output format for this invocation (not persisted)
    #[arg(short = 'o', long, value_enum, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbosity: u8,

    /// Command line to execute; starts the interactive shell when empty
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub args: Vec<String>,
}
