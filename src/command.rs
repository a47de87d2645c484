use crate::error::SyntaxError;

/// Upper bound on command records per input line.
pub const MAX_COMMANDS: usize = 1000;

/// The token that ends a command and says how it relates to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `|`: stdout feeds the next command.
    Pipe,
    /// `&`: the shell does not wait for this command.
    Concurrent,
    /// `;`: the next command starts once this one is done.
    Sequential,
}

impl Separator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "|" => Some(Separator::Pipe),
            "&" => Some(Separator::Concurrent),
            ";" => Some(Separator::Sequential),
            _ => None,
        }
    }
}

/// One syntactic command between separators.
///
/// `first` and `last` are inclusive indices into the token sequence of the
/// line; the trailing separator is not part of the span. A record only
/// indexes into the token sequence it was segmented from and must not
/// outlive it. The argument vector itself is built on demand at dispatch
/// time, after redirection stripping and wildcard expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub first: usize,
    pub last: usize,
    pub sep: Separator,
    pub stdin_target: Option<String>,
    pub stdout_target: Option<String>,
}

impl CommandRecord {
    fn new(first: usize, last: usize, sep: Separator) -> Self {
        CommandRecord {
            first,
            last,
            sep,
            stdin_target: None,
            stdout_target: None,
        }
    }

    /// The command name: the first token of the span.
    pub fn name<'t>(&self, tokens: &'t [String]) -> &'t str {
        &tokens[self.first]
    }

    pub fn has_redirection(&self) -> bool {
        self.stdin_target.is_some() || self.stdout_target.is_some()
    }

    /// Record the targets of `<` and `>` operators found inside the span.
    /// A repeated operator overwrites the earlier target: the last
    /// occurrence wins.
    fn scan_redirections(&mut self, tokens: &[String]) {
        for i in self.first..=self.last {
            match tokens[i].as_str() {
                "<" => self.stdin_target = tokens.get(i + 1).cloned(),
                ">" => self.stdout_target = tokens.get(i + 1).cloned(),
                _ => {}
            }
        }
    }
}

/// Partition a token sequence into command records.
///
/// Scans left to right; each separator token closes the command that
/// precedes it. A line that does not end in a separator gets an implicit
/// trailing `;`. Empty input is an empty sequence, not an error.
pub fn segment(tokens: &[String]) -> Result<Vec<CommandRecord>, SyntaxError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    if Separator::from_token(&tokens[0]).is_some() {
        return Err(SyntaxError::EmptyLeadingSeparator);
    }

    let mut records = Vec::new();
    let mut first = 0;
    for (i, token) in tokens.iter().enumerate() {
        if let Some(sep) = Separator::from_token(token) {
            if first == i {
                return Err(SyntaxError::AdjacentSeparators);
            }
            if records.len() == MAX_COMMANDS {
                return Err(SyntaxError::TooManyCommands);
            }
            records.push(CommandRecord::new(first, i - 1, sep));
            first = i + 1;
        }
    }

    if first < tokens.len() {
        // No trailing separator: the last command is implicitly sequential.
        if records.len() == MAX_COMMANDS {
            return Err(SyntaxError::TooManyCommands);
        }
        records.push(CommandRecord::new(
            first,
            tokens.len() - 1,
            Separator::Sequential,
        ));
    } else if records.last().map(|r| r.sep) == Some(Separator::Pipe) {
        // A pipeline cannot dangle off the end of the line.
        return Err(SyntaxError::DanglingPipe);
    }

    for record in &mut records {
        record.scan_redirections(tokens);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn empty_input_is_an_empty_sequence() {
        assert_eq!(segment(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn lone_command_gets_implicit_sequential() {
        let tokens = toks("ls -l");
        let records = segment(&tokens).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].first, 0);
        assert_eq!(records[0].last, 1);
        assert_eq!(records[0].sep, Separator::Sequential);
    }

    #[test]
    fn pipe_closes_the_first_command() {
        let tokens = toks("ls | wc");
        let records = segment(&tokens).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].first, records[0].last), (0, 0));
        assert_eq!(records[0].sep, Separator::Pipe);
        assert_eq!((records[1].first, records[1].last), (2, 2));
        assert_eq!(records[1].sep, Separator::Sequential);
    }

    #[test]
    fn leading_separator_is_rejected() {
        let tokens = toks("| ls");
        assert_eq!(segment(&tokens), Err(SyntaxError::EmptyLeadingSeparator));
    }

    #[test]
    fn adjacent_separators_are_rejected() {
        let tokens = toks("ls | | wc");
        assert_eq!(segment(&tokens), Err(SyntaxError::AdjacentSeparators));
    }

    #[test]
    fn trailing_pipe_is_rejected() {
        let tokens = toks("ls |");
        assert_eq!(segment(&tokens), Err(SyntaxError::DanglingPipe));
    }

    #[test]
    fn concurrent_separator_is_recorded() {
        let tokens = toks("sleep 1 &");
        let records = segment(&tokens).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sep, Separator::Concurrent);
        assert_eq!(records[0].last, 1);
    }

    #[test]
    fn redirection_targets_are_extracted() {
        let tokens = toks("sort < in.txt > out.txt");
        let records = segment(&tokens).unwrap();
        assert_eq!(records[0].stdin_target.as_deref(), Some("in.txt"));
        assert_eq!(records[0].stdout_target.as_deref(), Some("out.txt"));
    }

    #[test]
    fn last_redirection_occurrence_wins() {
        let tokens = toks("cat < a.txt < b.txt");
        let records = segment(&tokens).unwrap();
        assert_eq!(records[0].stdin_target.as_deref(), Some("b.txt"));
    }

    #[test]
    fn command_bound_is_enforced() {
        let mut tokens = Vec::new();
        for _ in 0..=MAX_COMMANDS {
            tokens.push("a".to_string());
            tokens.push(";".to_string());
        }
        assert_eq!(segment(&tokens), Err(SyntaxError::TooManyCommands));
    }

    #[test]
    fn spans_never_invert() {
        let tokens = toks("a b ; c | d & e");
        for record in segment(&tokens).unwrap() {
            assert!(record.first <= record.last);
        }
    }
}
