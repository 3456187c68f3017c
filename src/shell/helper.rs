//! Rustyline adapter over the completion engine.

use std::cell::RefCell;
use std::rc::Rc;

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::session::Session;

pub struct ShellHelper {
    pub session: Rc<RefCell<Session>>,
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let completion = self.session.borrow_mut().complete_line(line, pos);
        // Candidates are continuations inserted at the cursor; the
        // offset recovers the typed fragment for display.
        let start = pos.saturating_sub(completion.offset);
        let typed = if line.is_char_boundary(start) {
            &line[start..pos.min(line.len())]
        } else {
            ""
        };
        let pairs = completion
            .candidates
            .into_iter()
            .map(|candidate| Pair {
                display: format!("{typed}{candidate}").trim_end().to_string(),
                replacement: candidate,
            })
            .collect();
        Ok((pos, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellHelper {}
impl Validator for ShellHelper {}
impl Helper for ShellHelper {}
