//! Error display formatting for the CLI.

use crate::error::Error;

/// Prints a user-friendly error message with a hint where one helps.
pub fn print_error(error: &Error) {
    match error {
        Error::UnknownCommand { name, suggestions } => {
            eprintln!("Error: unknown command or API: {name}");
            if !suggestions.is_empty() {
                eprintln!("Did you mean: {}?", suggestions.join(", "));
            }
        }
        Error::Network(req_err) => {
            if req_err.is_connect() {
                eprintln!(
                    "Connection error: {req_err}\n\nHint: check that the management server is running and the profile url is correct."
                );
            } else if req_err.is_timeout() {
                eprintln!(
                    "Timeout error: {req_err}\n\nHint: the server may be slow; raise it with 'set timeout <seconds>'."
                );
            } else {
                eprintln!("Network error: {req_err}");
            }
        }
        Error::Auth(message) => {
            eprintln!(
                "Authentication error: {message}\n\nHint: check the profile credentials with 'set username/password' or 'set apikey/secretkey'."
            );
        }
        Error::JobTimeout { job_id, seconds } => {
            eprintln!(
                "Async job {job_id} did not finish within {seconds}s.\n\nHint: raise 'set timeout' or disable blocking with 'set asyncblock false'."
            );
        }
        other => eprintln!("Error: {other}"),
    }
}
