use std::fmt;
use std::io;

/// Errors found while splitting a line into tokens and commands.
/// Any of these abandons the whole line; the shell returns to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    EmptyLeadingSeparator,
    AdjacentSeparators,
    DanglingPipe,
    TooManyCommands,
    TooManyTokens,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::EmptyLeadingSeparator => {
                write!(f, "syntax error: line starts with a separator")
            }
            SyntaxError::AdjacentSeparators => {
                write!(f, "syntax error: empty command between separators")
            }
            SyntaxError::DanglingPipe => write!(f, "syntax error: pipe at end of line"),
            SyntaxError::TooManyCommands => write!(f, "too many commands on one line"),
            SyntaxError::TooManyTokens => write!(f, "too many tokens on one line"),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Wrong number of tokens after a `<` or `>` operator. The offending
/// command is skipped; the rest of the line still runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirArityError {
    MissingArgument(char),
    TooManyArguments(char),
}

impl fmt::Display for RedirArityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirArityError::MissingArgument(op) => write!(f, "missing argument after {}", op),
            RedirArityError::TooManyArguments(op) => write!(f, "too many arguments after {}", op),
        }
    }
}

impl std::error::Error for RedirArityError {}

#[derive(Debug)]
pub enum ExecError {
    Io(io::Error),
    Sys(nix::Error),
    Redirect(RedirArityError),
    EmptyCommand,
    BadArgument(String),
}

impl ExecError {
    /// Fork and pipe failures leave the shell unable to run anything else;
    /// everything else is reported and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecError::Sys(_))
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Io(e) => write!(f, "IO error: {}", e),
            ExecError::Sys(e) => write!(f, "system error: {}", e),
            ExecError::Redirect(e) => write!(f, "{}", e),
            ExecError::EmptyCommand => write!(f, "missing command"),
            ExecError::BadArgument(arg) => write!(f, "invalid argument: {}", arg),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ExecError {
    fn from(e: io::Error) -> Self {
        ExecError::Io(e)
    }
}

impl From<nix::Error> for ExecError {
    fn from(e: nix::Error) -> Self {
        ExecError::Sys(e)
    }
}

impl From<RedirArityError> for ExecError {
    fn from(e: RedirArityError) -> Self {
        ExecError::Redirect(e)
    }
}
