//! Child process attached to the subordinate side of a pty

use std::ffi::OsStr;
use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::Path;
use std::process::{self, Command, ExitStatus, Stdio};

use nix::unistd::setsid;

use crate::error::{Error, Result};

/// Base name of `path`: the path with its directory components stripped
pub fn base_name(path: &Path) -> &OsStr {
    path.file_name().unwrap_or(path.as_os_str())
}

/// How the child terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    /// Normal exit with the given status code
    Exited(i32),
    /// Killed by the given signal number
    Signaled(i32),
}

impl ChildExit {
    /// Exit code to report for this termination, using the shell's
    /// `128 + signal` convention for signal deaths
    pub fn code(&self) -> i32 {
        match *self {
            ChildExit::Exited(code) => code,
            ChildExit::Signaled(signal) => 128 + signal,
        }
    }
}

impl From<ExitStatus> for ChildExit {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => ChildExit::Exited(code),
            (None, Some(signal)) => ChildExit::Signaled(signal),
            // stopped/continued statuses are never returned by a blocking wait
            (None, None) => ChildExit::Exited(libc::EXIT_FAILURE),
        }
    }
}

/// A spawned target process
///
/// Dropping a `Child` that was never waited on kills and reaps it, so no
/// exit path leaves a zombie behind.
pub struct Child {
    inner: process::Child,
    reaped: bool,
}

impl Child {
    /// Spawn `target` with `args`, attached to the pty `subordinate`
    ///
    /// The child sees its argv[0] as the base name of `target`, gets the pty
    /// as stdin/stdout/stderr and as its controlling terminal, and inherits
    /// this process's environment unchanged.
    pub fn spawn<I, S>(target: &Path, args: I, subordinate: OwnedFd) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let spawn_error = |source: io::Error| Error::Spawn {
            target: target.to_path_buf(),
            source,
        };

        let stdin = subordinate.try_clone().map_err(spawn_error)?;
        let stdout = subordinate.try_clone().map_err(spawn_error)?;

        let mut command = Command::new(target);
        command
            .arg0(base_name(target))
            .args(args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(subordinate));

        // SAFETY: the hook only issues setsid and ioctl, both async-signal-safe.
        unsafe {
            command.pre_exec(attach_controlling_terminal);
        }

        // `command` owns the parent's copies of the subordinate fd and closes
        // them when it goes out of scope, leaving the child as the only holder.
        let inner = command.spawn().map_err(spawn_error)?;
        tracing::debug!(pid = inner.id(), target = %target.display(), "spawned child");

        Ok(Self {
            inner,
            reaped: false,
        })
    }

    /// OS process id of the child
    pub fn id(&self) -> u32 {
        self.inner.id()
    }

    /// Block until the child terminates
    pub fn wait(&mut self) -> Result<ChildExit> {
        let status = self.inner.wait().map_err(Error::Wait)?;
        self.reaped = true;
        let exit = ChildExit::from(status);
        tracing::debug!(pid = self.inner.id(), ?exit, "child terminated");
        Ok(exit)
    }
}

impl Drop for Child {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        tracing::warn!(pid = self.inner.id(), "child not waited on; killing it");
        let _ = self.inner.kill();
        let _ = self.inner.wait();
    }
}

/// Runs in the forked child after stdio is wired to the pty, before exec
fn attach_controlling_terminal() -> io::Result<()> {
    setsid().map_err(io::Error::from)?;
    let result = unsafe { libc::ioctl(libc::STDIN_FILENO, libc::TIOCSCTTY as libc::c_ulong, 0) };
    if result == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
