use std::cell::RefCell;
use std::rc::Rc;

use clap::Parser;

use cumulus_cli::cli::errors::print_error;
use cumulus_cli::cli::{tracing_init, Cli};
use cumulus_cli::config::Config;
use cumulus_cli::error::Error;
use cumulus_cli::session::Session;
use cumulus_cli::{exec, shell};

fn main() {
    let cli = Cli::parse();
    tracing_init::init_tracing(cli.verbosity);

    if let Err(error) = run(cli) {
        print_error(&error);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let dir = match cli.config_dir {
        Some(dir) => dir,
        None => Config::default_dir()?,
    };
    let mut config = Config::load(dir)?;
    if let Some(profile) = &cli.profile {
        config.update("profile", profile)?;
    }
    if let Some(output) = cli.output {
        // One-shot override; deliberately not saved.
        config.core.output = output;
    }

    let session = Session::new(config)?;
    if cli.args.is_empty() {
        shell::run(&Rc::new(RefCell::new(session)))
    } else {
        let mut session = session;
        exec::execute(&mut session, &cli.args)
    }
}
