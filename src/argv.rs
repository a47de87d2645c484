use std::ffi::CString;

use crate::command::CommandRecord;
use crate::error::ExecError;
use crate::expander;

/// Argument vector for a command whose span may still contain redirection
/// clauses: every token of the span except `<`/`>` operators and the
/// target token after each. No wildcard expansion; pipeline stages after
/// the first use this directly.
pub fn build(tokens: &[String], record: &CommandRecord) -> Result<Vec<CString>, ExecError> {
    to_cstrings(strip(tokens, record.first, record.last))
}

/// Like [`build`], with the single wildcard slot expanded in place.
pub fn build_expanded(tokens: &[String], record: &CommandRecord) -> Result<Vec<CString>, ExecError> {
    to_cstrings(substitute(strip(tokens, record.first, record.last)))
}

/// Argument vector for a command whose trailing redirection clause was
/// already consumed by the caller: the last two tokens of the span are
/// dropped unconditionally, any redirection clause still inside the
/// shortened span is stripped, and the wildcard slot is expanded.
pub fn build_redirected(
    tokens: &[String],
    record: &CommandRecord,
) -> Result<Vec<CString>, ExecError> {
    if record.last - record.first < 2 {
        return Err(ExecError::EmptyCommand);
    }
    to_cstrings(substitute(strip(tokens, record.first, record.last - 2)))
}

fn strip(tokens: &[String], first: usize, last: usize) -> Vec<String> {
    let mut args = Vec::with_capacity(last - first + 1);
    let mut i = first;
    while i <= last {
        if tokens[i] == "<" || tokens[i] == ">" {
            // Skip the operator and its target together.
            i += 2;
        } else {
            args.push(tokens[i].clone());
            i += 1;
        }
    }
    args
}

fn substitute(mut args: Vec<String>) -> Vec<String> {
    if let Some(index) = expander::wildcard_index(&args) {
        let matches = expander::expand(&args[index]);
        args.splice(index..=index, matches);
    }
    args
}

fn to_cstrings(args: Vec<String>) -> Result<Vec<CString>, ExecError> {
    if args.is_empty() {
        return Err(ExecError::EmptyCommand);
    }
    args.into_iter()
        .map(|arg| {
            CString::new(arg).map_err(|e| {
                ExecError::BadArgument(String::from_utf8_lossy(&e.into_vec()).into_owned())
            })
        })
        .collect()
}
