//! ptywrap
//!
//! Runs a command inside a pseudoterminal that mirrors the invoking
//! terminal, so the command formats its output as if attached to a tty
//! even when this process's stdout is a pipe. Useful for feeding a
//! terminal-aware formatter downstream.
//!
//! - `pty`: terminal snapshot, pty allocation, child spawning
//! - `relay`: copying the pty's output to stdout
//! - `resize`: optional SIGWINCH forwarding
//! - `runner`: the end-to-end run
//!
//! Reference: https://www.man7.org/linux/man-pages/man3/openpty.3.html

pub mod config;
pub mod error;
pub mod pty;
pub mod relay;
pub mod resize;
pub mod runner;

pub use config::Config;
pub use error::{Error, Result};
pub use pty::{ChildExit, TerminalSnapshot, WindowSize};
pub use runner::PtyRunner;
