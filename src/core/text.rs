//! Text helpers for building and scraping command lines
//!
//! Argument strings are built the way a shell-style command line is written
//! (`checkout -f "master"`) and split back into argv right before launch.
//! Values scraped from `git log` output are spliced into those strings, so
//! every quote they contain must be escaped first.

use std::iter;

/// Prefixes every `'` and `"` in `source` with a backslash.
///
/// This is the single escaping routine used for all text that is spliced
/// into a further command line. It is not idempotent: escaping twice adds
/// a second layer of backslashes.
///
/// # Examples
///
/// ```rust
/// use svn2git::core::escape_quotes;
///
/// assert_eq!(escape_quotes("O'Brien \"Bob\""), "O\\'Brien \\\"Bob\\\"");
/// assert_eq!(escape_quotes("plain"), "plain");
/// ```
pub fn escape_quotes(source: &str) -> String {
    let mut escaped = String::with_capacity(source.len() + 8);
    for c in source.chars() {
        if c == '\'' || c == '"' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Removes every leading and trailing occurrence of `pattern`.
///
/// `git log --pretty=format:'%s'` echoes the literal single quotes around
/// the formatted value; this strips them off again.
pub fn remove_from_two_ends(source: &str, pattern: char) -> &str {
    source.trim_matches(pattern)
}

/// Wraps `value` in double quotes so that [`split_arguments`] yields it
/// back unchanged as a single argument.
///
/// Used for values read from git that must be written back verbatim.
///
/// # Examples
///
/// ```rust
/// use svn2git::core::{quote_argument, split_arguments};
///
/// let quoted = quote_argument(r#"Bob "the builder" \"#);
/// assert_eq!(split_arguments(&quoted), vec![r#"Bob "the builder" \"#]);
/// ```
pub fn quote_argument(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    let mut backslashes = 0;
    for c in value.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(iter::repeat('\\').take(backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            c => {
                quoted.extend(iter::repeat('\\').take(backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    quoted.extend(iter::repeat('\\').take(backslashes * 2));
    quoted.push('"');
    quoted
}

/// Splits an argument string into individual arguments.
///
/// # Rules
///
/// - Unquoted whitespace separates arguments
/// - `"` toggles quoting and is not part of the argument
/// - `2n` backslashes followed by `"` produce `n` backslashes and a toggle
/// - `2n + 1` backslashes followed by `"` produce `n` backslashes and a literal `"`
/// - Backslashes not followed by `"` are literal
/// - Single quotes have no special meaning
///
/// # Examples
///
/// ```rust
/// use svn2git::core::split_arguments;
///
/// assert_eq!(
///     split_arguments(r#"tag -a -m "first release" "v1""#),
///     vec!["tag", "-a", "-m", "first release", "v1"]
/// );
/// assert_eq!(
///     split_arguments("log -1 --pretty=format:'%s'"),
///     vec!["log", "-1", "--pretty=format:'%s'"]
/// );
/// ```
pub fn split_arguments(arguments: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = arguments.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let mut backslashes = 1;
                while chars.peek() == Some(&'\\') {
                    chars.next();
                    backslashes += 1;
                }
                if chars.peek() == Some(&'"') {
                    current.extend(iter::repeat('\\').take(backslashes / 2));
                    if backslashes % 2 == 1 {
                        chars.next();
                        current.push('"');
                    }
                } else {
                    current.extend(iter::repeat('\\').take(backslashes));
                }
                in_token = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        args.push(current);
    }
    args
}
