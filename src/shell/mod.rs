//! Interactive shell: readline loop, history, and prompt.

pub mod helper;

use std::cell::RefCell;
use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config as LineConfig, Editor};

use crate::cli::errors::print_error;
use crate::error::Error;
use crate::exec;
use crate::session::Session;
use crate::utils::split_args;
use helper::ShellHelper;

/// Runs the interactive loop until EOF or `exit`/`quit`.
///
/// # Errors
/// Fails when the line editor cannot be initialized; per-line command
/// errors are printed and the loop continues.
pub fn run(session: &Rc<RefCell<Session>>) -> Result<(), Error> {
    let history_path = session.borrow().config.history_path();
    let line_config = LineConfig::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut editor: Editor<ShellHelper, DefaultHistory> = Editor::with_config(line_config)?;
    editor.set_helper(Some(ShellHelper {
        session: Rc::clone(session),
    }));
    let _ = editor.load_history(&history_path);

    print_header(&session.borrow());

    loop {
        let prompt = session.borrow().config.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                let args = match split_args(line) {
                    Ok(args) => args,
                    Err(err) => {
                        print_error(&err);
                        continue;
                    }
                };
                if args
                    .first()
                    .is_some_and(|first| first == "exit" || first == "quit")
                {
                    break;
                }
                if let Err(err) = exec::execute(&mut session.borrow_mut(), &args) {
                    print_error(&err);
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                let _ = editor.save_history(&history_path);
                return Err(err.into());
            }
        }
    }

    editor.save_history(&history_path)?;
    Ok(())
}

fn print_header(session: &Session) {
    println!(
        "cumulus {} — interactive cloud management shell",
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "Profile: {} ({}), {} APIs cached. Type 'help' or press tab.",
        session.config.core.profile,
        session.config.active_profile().url,
        session.catalog().len()
    );
}
