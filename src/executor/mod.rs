pub mod pipeline;
pub mod reaper;
pub mod redirect;

use std::ffi::CString;
use std::os::fd::RawFd;
use std::process;

use nix::sys::wait::waitpid;
use nix::unistd::{self, ForkResult, Pid, execvp, fork};

use crate::argv;
use crate::builtins::BuiltinManager;
use crate::command::{CommandRecord, Separator};
use crate::error::ExecError;
use crate::session::Session;

/// Retry a syscall while it reports EINTR.
pub(crate) fn syscall<F, T>(mut f: F) -> Result<T, nix::Error>
where
    F: FnMut() -> Result<T, nix::Error>,
{
    loop {
        match f() {
            Err(nix::Error::EINTR) => continue,
            result => return result,
        }
    }
}

/// Block until the child terminates. A child that was already collected
/// elsewhere counts as terminated.
pub(crate) fn wait_for(child: Pid) -> Result<(), ExecError> {
    match syscall(|| waitpid(child, None)) {
        Ok(_) => Ok(()),
        Err(nix::Error::ECHILD) => Ok(()),
        Err(e) => Err(ExecError::Sys(e)),
    }
}

/// Execute one segmented line left to right.
///
/// Each command is dispatched in span order: builtins run in the shell
/// process; a `|`-terminated record starts a pipeline run and the cursor
/// jumps past the whole run at once; records with redirection targets fork
/// around the opened file; everything else is a plain fork and exec,
/// waited for unless the record ends in `&`. Non-fatal failures are
/// reported here and skip past the offending unit; only resource errors
/// propagate to the caller. Terminated background children are collected
/// after every unit of work.
pub fn run_sequence(
    tokens: &[String],
    commands: &[CommandRecord],
    session: &mut Session,
) -> Result<(), ExecError> {
    let builtins = BuiltinManager::new();
    let mut i = 0;
    while i < commands.len() {
        let record = &commands[i];
        let name = record.name(tokens);

        let consumed = if name == "exit" {
            // `exit` terminates the shell only as a whole line; embedded
            // in a longer line it executes nothing.
            1
        } else if builtins.is_builtin(name) {
            builtins.execute(tokens, record, session);
            1
        } else if record.sep == Separator::Pipe {
            let links = pipeline::pipe_run_len(commands, i);
            let last = &commands[i + links];
            let background = last.sep == Separator::Concurrent;
            let outcome = if let Some(target) = last.stdin_target.clone() {
                redirect::run_pipeline_redirected(
                    tokens,
                    commands,
                    i,
                    links,
                    redirect::Stream::Stdin,
                    &target,
                    background,
                )
            } else if let Some(target) = last.stdout_target.clone() {
                redirect::run_pipeline_redirected(
                    tokens,
                    commands,
                    i,
                    links,
                    redirect::Stream::Stdout,
                    &target,
                    background,
                )
            } else {
                pipeline::run(tokens, commands, i, links, background)
            };
            report(outcome)?;
            links + 1
        } else if record.has_redirection() {
            report(redirect::exec_redirected(tokens, record))?;
            1
        } else {
            let background = record.sep == Separator::Concurrent;
            report(exec_simple(tokens, record, background))?;
            1
        };

        reaper::reap();
        i += consumed;
    }
    Ok(())
}

/// Plain command: fork, exec, wait. A background command is not waited
/// for; the reaper collects it once it terminates.
fn exec_simple(
    tokens: &[String],
    record: &CommandRecord,
    background: bool,
) -> Result<(), ExecError> {
    let argv = argv::build_expanded(tokens, record)?;
    let child = fork_exec(&argv, None, None)?;
    if !background {
        wait_for(child)?;
    }
    Ok(())
}

/// Fork one child that wires the given descriptors onto its standard
/// streams, closes the originals, and execs `argv[0]`.
pub(crate) fn fork_exec(
    argv: &[CString],
    stdin_fd: Option<RawFd>,
    stdout_fd: Option<RawFd>,
) -> Result<Pid, ExecError> {
    match unsafe { fork() }.map_err(ExecError::Sys)? {
        ForkResult::Parent { child, .. } => Ok(child),
        ForkResult::Child => {
            if let Some(fd) = stdin_fd {
                let _ = unistd::dup2(fd, libc::STDIN_FILENO);
                let _ = unistd::close(fd);
            }
            if let Some(fd) = stdout_fd {
                let _ = unistd::dup2(fd, libc::STDOUT_FILENO);
                let _ = unistd::close(fd);
            }
            exec_or_die(argv)
        }
    }
}

/// Exec in the current (child) process. Exec failure is reported by the
/// child itself, which exits 127 without disturbing its siblings.
pub(crate) fn exec_or_die(argv: &[CString]) -> ! {
    let err = execvp(&argv[0], argv).unwrap_err();
    eprintln!("minish: {}: {}", argv[0].to_string_lossy(), err.desc());
    process::exit(127);
}

fn report(outcome: Result<(), ExecError>) -> Result<(), ExecError> {
    match outcome {
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            eprintln!("minish: {}", e);
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}
