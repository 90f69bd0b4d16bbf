//! PTY (pseudoterminal) handling
//!
//! Captures the invoking terminal, allocates a matching pty pair and spawns
//! the target attached to its subordinate side.

mod child;
mod pair;
mod size;
mod snapshot;

pub use child::{base_name, Child, ChildExit};
pub use pair::PtyPair;
pub use size::WindowSize;
pub use snapshot::TerminalSnapshot;
