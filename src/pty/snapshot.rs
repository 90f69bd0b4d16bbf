//! Snapshot of the invoking terminal's state
//!
//! Captured once at startup and applied to the new pty. Never written back.

use std::io;
use std::os::fd::AsFd;

use nix::sys::termios::{self, Termios};

use crate::error::{Error, Result};
use crate::pty::WindowSize;

/// Line-discipline attributes and geometry of a terminal
#[derive(Debug, Clone)]
pub struct TerminalSnapshot {
    termios: Termios,
    size: WindowSize,
}

impl TerminalSnapshot {
    /// Capture the terminal state behind `fd`
    ///
    /// Fails with [`Error::TerminalQuery`] when `fd` is not a terminal.
    pub fn capture<Fd: AsFd>(fd: Fd) -> Result<Self> {
        let fd = fd.as_fd();
        let termios = termios::tcgetattr(fd).map_err(Error::TerminalQuery)?;
        let size = WindowSize::query(fd).map_err(Error::TerminalQuery)?;
        Ok(Self { termios, size })
    }

    /// Capture the terminal state of this process's standard input
    pub fn from_stdin() -> Result<Self> {
        Self::capture(io::stdin())
    }

    pub fn termios(&self) -> &Termios {
        &self.termios
    }

    pub fn size(&self) -> WindowSize {
        self.size
    }
}
