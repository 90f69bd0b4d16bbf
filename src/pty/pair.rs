//! PTY pair allocation
//!
//! Both sides are opened at once with `openpty`, so the snapshot's termios
//! and window size are in place before the child ever sees the device.

use std::fs::File;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd};

use nix::fcntl::{fcntl, FcntlArg, FdFlag};
use nix::pty::openpty;

use crate::error::{Error, Result};
use crate::pty::{TerminalSnapshot, WindowSize};

/// A freshly allocated pty: controlling side plus subordinate terminal
pub struct PtyPair {
    controlling: OwnedFd,
    subordinate: OwnedFd,
}

impl PtyPair {
    /// Allocate a pty whose subordinate side mirrors `snapshot`
    pub fn open(snapshot: &TerminalSnapshot) -> Result<Self> {
        let winsize = snapshot.size().to_winsize();
        let pty = openpty(&winsize, snapshot.termios()).map_err(Error::PtyAllocation)?;

        // openpty does not set close-on-exec; neither fd may leak into the child
        // under its own number (the subordinate reaches it via dup2 onto 0/1/2).
        for fd in [&pty.master, &pty.slave] {
            fcntl(fd.as_raw_fd(), FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))
                .map_err(Error::PtyAllocation)?;
        }

        Ok(Self {
            controlling: pty.master,
            subordinate: pty.slave,
        })
    }

    /// Current window size as seen through the controlling side
    pub fn window_size(&self) -> Result<WindowSize> {
        WindowSize::query(&self.controlling).map_err(Error::PtyAllocation)
    }

    pub fn subordinate(&self) -> &OwnedFd {
        &self.subordinate
    }

    /// Split into the controlling side (as a readable file) and the
    /// subordinate fd to hand to the child
    pub fn into_parts(self) -> (File, OwnedFd) {
        (File::from(self.controlling), self.subordinate)
    }
}

impl AsFd for PtyPair {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.controlling.as_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::termios::{self, InputFlags, LocalFlags, SetArg, SpecialCharacterIndices};
    use proptest::prelude::*;

    /// A pty standing in for the invoking terminal
    fn invoking_terminal(size: WindowSize, echo: bool, vkill: u8) -> nix::pty::OpenptyResult {
        let pty = openpty(None, None).unwrap();
        size.apply(&pty.master).unwrap();
        let mut attrs = termios::tcgetattr(&pty.slave).unwrap();
        attrs.local_flags.set(LocalFlags::ECHO, echo);
        attrs.input_flags.set(InputFlags::IXON, !echo);
        attrs.control_chars[SpecialCharacterIndices::VKILL as usize] = vkill;
        termios::tcsetattr(&pty.slave, SetArg::TCSANOW, &attrs).unwrap();
        pty
    }

    #[test]
    fn test_open_mirrors_size() {
        let source = invoking_terminal(WindowSize::with_pixels(132, 50, 1056, 800), true, 0x15);
        let snapshot = TerminalSnapshot::capture(&source.slave).unwrap();

        let pair = PtyPair::open(&snapshot).unwrap();
        assert_eq!(
            pair.window_size().unwrap(),
            WindowSize::with_pixels(132, 50, 1056, 800)
        );
    }

    #[test]
    fn test_fds_are_cloexec() {
        let source = invoking_terminal(WindowSize::new(80, 24), true, 0x15);
        let snapshot = TerminalSnapshot::capture(&source.slave).unwrap();
        let pair = PtyPair::open(&snapshot).unwrap();

        for fd in [pair.as_fd().as_raw_fd(), pair.subordinate().as_raw_fd()] {
            let flags = FdFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFD).unwrap());
            assert!(flags.contains(FdFlag::FD_CLOEXEC));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn subordinate_matches_snapshot(
            cols in 1u16..500,
            rows in 1u16..200,
            echo in any::<bool>(),
            vkill in 1u8..0x20,
        ) {
            let source = invoking_terminal(WindowSize::new(cols, rows), echo, vkill);
            let snapshot = TerminalSnapshot::capture(&source.slave).unwrap();
            let pair = PtyPair::open(&snapshot).unwrap();

            let applied = termios::tcgetattr(pair.subordinate()).unwrap();
            let expected = snapshot.termios();
            prop_assert_eq!(applied.local_flags, expected.local_flags);
            prop_assert_eq!(applied.input_flags, expected.input_flags);
            prop_assert_eq!(applied.output_flags, expected.output_flags);
            prop_assert_eq!(applied.control_flags, expected.control_flags);
            prop_assert_eq!(applied.control_chars, expected.control_chars);

            let size = WindowSize::query(pair.subordinate()).unwrap();
            prop_assert_eq!((size.cols, size.rows), (cols, rows));
        }
    }
}
