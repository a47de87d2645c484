use std::os::fd::{AsRawFd, OwnedFd};

use nix::unistd::{self, ForkResult, pipe};

use crate::argv;
use crate::command::{CommandRecord, Separator};
use crate::error::ExecError;

use super::{exec_or_die, wait_for};

/// Number of pipe links in the run starting at `start`: the count of
/// consecutive records terminated by a `Pipe` separator. The record after
/// the last link terminates the run and always exists, because a line can
/// never end on a pipe.
pub fn pipe_run_len(commands: &[CommandRecord], start: usize) -> usize {
    let mut i = start;
    while commands[i].sep == Separator::Pipe {
        i += 1;
    }
    i - start
}

/// Execute the run `commands[start ..= start + links]` as one chain of
/// `links + 1` children sharing `links` pipes.
///
/// All pipes are allocated up front and every argument vector is built
/// before the first fork, so a bad command aborts the run without leaving
/// half a chain behind. Each child wires its ends with dup2 and closes
/// every pipe descriptor before exec; the parent drops its copies once the
/// fork phase is done, so readers see end-of-stream, and then reaps each
/// child pid in order. A background run skips the reaping and leaves its
/// children to the reaper.
pub fn run(
    tokens: &[String],
    commands: &[CommandRecord],
    start: usize,
    links: usize,
    background: bool,
) -> Result<(), ExecError> {
    // Only the first stage of a pipeline expands its wildcard slot.
    let mut argvs = Vec::with_capacity(links + 1);
    for i in 0..=links {
        let record = &commands[start + i];
        argvs.push(if i == 0 {
            argv::build_expanded(tokens, record)?
        } else {
            argv::build(tokens, record)?
        });
    }

    let mut pipes: Vec<(OwnedFd, OwnedFd)> = Vec::with_capacity(links);
    for _ in 0..links {
        pipes.push(pipe().map_err(ExecError::Sys)?);
    }

    let mut children = Vec::with_capacity(links + 1);
    for (i, argv) in argvs.iter().enumerate() {
        match unsafe { unistd::fork() }.map_err(ExecError::Sys)? {
            ForkResult::Parent { child, .. } => children.push(child),
            ForkResult::Child => {
                if i > 0 {
                    let _ = unistd::dup2(pipes[i - 1].0.as_raw_fd(), libc::STDIN_FILENO);
                }
                if i < links {
                    let _ = unistd::dup2(pipes[i].1.as_raw_fd(), libc::STDOUT_FILENO);
                }
                for (read_end, write_end) in &pipes {
                    let _ = unistd::close(read_end.as_raw_fd());
                    let _ = unistd::close(write_end.as_raw_fd());
                }
                exec_or_die(argv)
            }
        }
    }

    drop(pipes);

    if !background {
        for child in children {
            wait_for(child)?;
        }
    }
    Ok(())
}
