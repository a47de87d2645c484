use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

/// Collect every child that has already terminated, without ever
/// blocking. Background children end up here; foreground children were
/// reaped by their spawner, so the loop usually exits on the first poll.
pub fn reap() {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => continue,
            Ok(WaitStatus::StillAlive) => return,
            Err(nix::Error::ECHILD) => return,
            _ => return,
        }
    }
}
