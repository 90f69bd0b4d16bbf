//! Window size forwarding
//!
//! Watches for SIGWINCH on a background thread and copies the invoking
//! terminal's new size onto the pty. Setting the size through TIOCSWINSZ
//! makes the kernel deliver SIGWINCH to the child's foreground group.

use std::io;
use std::os::fd::{AsFd, OwnedFd};
use std::thread;

use signal_hook::consts::signal::SIGWINCH;
use signal_hook::iterator::{Handle, Signals};

use crate::error::{Error, Result};
use crate::pty::WindowSize;

pub struct ResizeWatcher {
    handle: Handle,
    thread: thread::JoinHandle<()>,
}

impl ResizeWatcher {
    /// Start forwarding size changes of `source` to the pty behind `controlling`
    ///
    /// Both fds are duplicated; the watcher thread only ever touches its
    /// own copies.
    pub fn start<S: AsFd, C: AsFd>(source: S, controlling: C) -> Result<Self> {
        let source = source.as_fd().try_clone_to_owned().map_err(Error::Resize)?;
        let controlling = controlling
            .as_fd()
            .try_clone_to_owned()
            .map_err(Error::Resize)?;

        let mut signals = Signals::new([SIGWINCH]).map_err(Error::Resize)?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("ptywrap-resize".into())
            .spawn(move || {
                for _ in signals.forever() {
                    if let Err(e) = forward(&source, &controlling) {
                        tracing::warn!("failed to forward window size: {}", e);
                    }
                }
            })
            .map_err(Error::Resize)?;

        Ok(Self { handle, thread })
    }

    pub fn stop(self) {
        self.handle.close();
        let _ = self.thread.join();
    }
}

fn forward(source: &OwnedFd, controlling: &OwnedFd) -> io::Result<()> {
    let size = WindowSize::query(source)?;
    tracing::debug!(cols = size.cols, rows = size.rows, "terminal resized");
    size.apply(controlling)
}
