//! Runs a target inside a pty mirroring the invoking terminal
//!
//! One invocation spawns exactly one child on exactly one pty pair. The
//! controlling side is drained to end-of-stream, then closed, then the
//! child is waited on, whether or not the relay succeeded.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::os::fd::{AsFd, BorrowedFd};

use crate::config::Config;
use crate::error::Result;
use crate::pty::{Child, ChildExit, PtyPair, TerminalSnapshot};
use crate::relay;
use crate::resize::ResizeWatcher;

pub struct PtyRunner {
    config: Config,
}

impl PtyRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the target with `args` on a pty built from `snapshot` (taken from
    /// this process's stdin), relaying to this process's stdout
    ///
    /// When resize forwarding is enabled, stdin is watched for size changes.
    pub fn run<I, S>(&self, snapshot: &TerminalSnapshot, args: I) -> Result<ChildExit>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let stdin = io::stdin();
        let resize_source = self.config.forward_resize.then(|| stdin.as_fd());
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.execute(snapshot, args, &mut out, resize_source)
    }

    /// Run the target on a pty built from `snapshot`, relaying to `out`
    pub fn run_with<I, S, W>(
        &self,
        snapshot: &TerminalSnapshot,
        args: I,
        out: &mut W,
    ) -> Result<ChildExit>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
        W: Write + ?Sized,
    {
        self.execute(snapshot, args, out, None)
    }

    fn execute<I, S, W>(
        &self,
        snapshot: &TerminalSnapshot,
        args: I,
        out: &mut W,
        resize_source: Option<BorrowedFd<'_>>,
    ) -> Result<ChildExit>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
        W: Write + ?Sized,
    {
        let (mut controlling, subordinate) = PtyPair::open(snapshot)?.into_parts();
        let mut child = Child::spawn(&self.config.target, args, subordinate)?;

        let watcher = resize_source.and_then(|source| {
            ResizeWatcher::start(source, &controlling)
                .map_err(|e| tracing::warn!("window size forwarding disabled: {}", e))
                .ok()
        });

        let relayed = relay::copy(&mut controlling, out);

        if let Some(watcher) = watcher {
            watcher.stop();
        }
        drop(controlling);
        let exit = child.wait()?;

        if let Err(e) = &relayed {
            tracing::debug!(pid = child.id(), "relay aborted after child was reaped: {}", e);
        }
        relayed?;
        Ok(exit)
    }
}
