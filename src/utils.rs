use crate::error::Error;

/// Splits a command line into whitespace-delimited arguments, honoring
/// single and double quotes so values may contain spaces
/// (e.g. `displaytext="my vm"`).
///
/// # Errors
/// Returns an error when a quote is left unterminated.
pub fn split_args(line: &str) -> Result<Vec<String>, Error> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                } else {
                    current.push(ch);
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        args.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err(Error::Config(format!("unterminated quote in: {line}")));
    }
    if in_token {
        args.push(current);
    }
    Ok(args)
}

/// Renders a JSON scalar without the surrounding quotes a `Value`'s
/// `Display` impl would add.
#[must_use]
pub fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
