use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, IntoRawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::process;

use nix::unistd::{self, ForkResult};

use crate::argv;
use crate::command::CommandRecord;
use crate::error::{ExecError, RedirArityError};

use super::{fork_exec, pipeline, wait_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdin,
    Stdout,
}

impl Stream {
    fn op(self) -> &'static str {
        match self {
            Stream::Stdin => "<",
            Stream::Stdout => ">",
        }
    }

    fn op_char(self) -> char {
        match self {
            Stream::Stdin => '<',
            Stream::Stdout => '>',
        }
    }

    fn fileno(self) -> i32 {
        match self {
            Stream::Stdin => libc::STDIN_FILENO,
            Stream::Stdout => libc::STDOUT_FILENO,
        }
    }
}

/// Single command with redirection targets and no pipe involvement.
///
/// Arity is checked for both operators before any file is opened or any
/// child forked; an arity failure skips the command without side effects.
/// The child wires the opened descriptors onto its standard streams and
/// execs the redirection-stripped argv; the parent drops its copies of the
/// descriptors and waits.
pub fn exec_redirected(tokens: &[String], record: &CommandRecord) -> Result<(), ExecError> {
    if record.stdin_target.is_some() {
        validate(tokens, record, Stream::Stdin)?;
    }
    if record.stdout_target.is_some() {
        validate(tokens, record, Stream::Stdout)?;
    }

    let stdin_file = match &record.stdin_target {
        Some(target) => Some(File::open(target).map_err(ExecError::Io)?),
        None => None,
    };
    let stdout_file = match &record.stdout_target {
        Some(target) => Some(open_output(target)?),
        None => None,
    };

    let argv = argv::build_redirected(tokens, record)?;
    let child = fork_exec(
        &argv,
        stdin_file.as_ref().map(|f| f.as_raw_fd()),
        stdout_file.as_ref().map(|f| f.as_raw_fd()),
    )?;

    drop(stdin_file);
    drop(stdout_file);

    wait_for(child)
}

/// Redirection wraps a whole pipe run: a wrapper child replaces its own
/// standard stream with the opened file, performs the entire fan-out
/// internally, and exits once the inner chain is done. The caller resolves
/// which stream to wrap; stdin wins over stdout when the terminal record
/// carries both.
pub fn run_pipeline_redirected(
    tokens: &[String],
    commands: &[CommandRecord],
    start: usize,
    links: usize,
    stream: Stream,
    target: &str,
    background: bool,
) -> Result<(), ExecError> {
    let last_record = &commands[start + links];
    validate(tokens, last_record, stream)?;

    let file = match stream {
        Stream::Stdin => File::open(target).map_err(ExecError::Io)?,
        Stream::Stdout => open_output(target)?,
    };

    match unsafe { unistd::fork() }.map_err(ExecError::Sys)? {
        ForkResult::Parent { child, .. } => {
            drop(file);
            if !background {
                wait_for(child)?;
            }
            Ok(())
        }
        ForkResult::Child => {
            let fd = file.into_raw_fd();
            let _ = unistd::dup2(fd, stream.fileno());
            let _ = unistd::close(fd);
            let code = match pipeline::run(tokens, commands, start, links, false) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("minish: {}", e);
                    1
                }
            };
            process::exit(code);
        }
    }
}

/// Exactly one token may follow the redirection operator inside the span;
/// anything after that target must be another redirection clause. The last
/// occurrence of the operator is the one validated, matching the recorded
/// target.
fn validate(tokens: &[String], record: &CommandRecord, stream: Stream) -> Result<(), ExecError> {
    let mut op_index = record.first;
    for i in record.first..=record.last {
        if tokens[i] == stream.op() {
            op_index = i;
        }
    }

    if op_index == record.last {
        return Err(RedirArityError::MissingArgument(stream.op_char()).into());
    }
    if !trailing_clauses_only(tokens, op_index + 2, record.last) {
        return Err(RedirArityError::TooManyArguments(stream.op_char()).into());
    }
    Ok(())
}

fn trailing_clauses_only(tokens: &[String], mut i: usize, last: usize) -> bool {
    while i <= last {
        if tokens[i] == "<" || tokens[i] == ">" {
            i += 2;
        } else {
            return false;
        }
    }
    true
}

fn open_output(path: &str) -> Result<File, ExecError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o664)
        .open(path)
        .map_err(ExecError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::segment;
    use crate::tokenizer::tokenize;
    use std::fs;
    use std::path::PathBuf;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("minish-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_redirection_argument_is_rejected() {
        let tokens = tokenize("cat < ;").unwrap();
        let commands = segment(&tokens).unwrap();
        let err = exec_redirected(&tokens, &commands[0]).unwrap_err();
        assert!(matches!(
            err,
            ExecError::Redirect(RedirArityError::MissingArgument('<'))
        ));
    }

    #[test]
    fn extra_token_after_the_target_is_rejected() {
        let tokens = tokenize("cat < a.txt stray").unwrap();
        let commands = segment(&tokens).unwrap();
        let err = exec_redirected(&tokens, &commands[0]).unwrap_err();
        assert!(matches!(
            err,
            ExecError::Redirect(RedirArityError::TooManyArguments('<'))
        ));
    }

    #[test]
    fn a_following_clause_is_not_an_extra_token() {
        let tokens = tokenize("cat < in.txt > out.txt").unwrap();
        let commands = segment(&tokens).unwrap();
        assert!(validate(&tokens, &commands[0], Stream::Stdin).is_ok());
        assert!(validate(&tokens, &commands[0], Stream::Stdout).is_ok());
    }

    #[test]
    fn redirected_command_writes_its_target_file() {
        let dir = fixture_dir("redir");
        let out = dir.join("out.txt");
        let line = format!("echo hello > {}", out.display());
        let tokens = tokenize(&line).unwrap();
        let commands = segment(&tokens).unwrap();
        exec_redirected(&tokens, &commands[0]).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap().trim_end(), "hello");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn redirection_wraps_the_whole_pipeline() {
        let dir = fixture_dir("pipe-redir");
        let out = dir.join("count.txt");
        let line = format!("echo one two | wc -w > {}", out.display());
        let tokens = tokenize(&line).unwrap();
        let commands = segment(&tokens).unwrap();
        let links = pipeline::pipe_run_len(&commands, 0);
        assert_eq!(links, 1);
        run_pipeline_redirected(
            &tokens,
            &commands,
            0,
            links,
            Stream::Stdout,
            out.to_str().unwrap(),
            false,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap().trim(), "2");
        let _ = fs::remove_dir_all(&dir);
    }
}
