//! Error types for the wrapper

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Wrapper error type
///
/// Every variant is fatal to the wrapper process. Only [`Error::Relay`] is
/// produced after the child has been spawned, and it is returned only once
/// the child has been reaped.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading termios or window size from the invoking terminal failed
    #[error("cannot query terminal attributes: {0}")]
    TerminalQuery(#[source] nix::Error),

    /// The OS could not allocate a pty pair
    #[error("cannot allocate pty: {0}")]
    PtyAllocation(#[source] nix::Error),

    /// The target could not be started
    #[error("cannot spawn {}: {source}", target.display())]
    Spawn {
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Copying child output to stdout failed
    #[error("relay failed: {0}")]
    Relay(#[source] io::Error),

    /// Waiting for the child failed
    #[error("cannot wait for child: {0}")]
    Wait(#[source] io::Error),

    /// Starting the resize watcher failed
    #[error("cannot forward window size changes: {0}")]
    Resize(#[source] io::Error),

    /// No target executable could be determined
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for wrapper operations
pub type Result<T> = std::result::Result<T, Error>;
