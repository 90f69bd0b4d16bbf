//! Window size for PTY

use std::io;
use std::os::fd::{AsFd, AsRawFd};

use nix::pty::Winsize;

/// Window size in characters and pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    /// Number of rows (characters)
    pub rows: u16,
    /// Number of columns (characters)
    pub cols: u16,
    /// Width in pixels (0 when the terminal does not report it)
    pub pixel_width: u16,
    /// Height in pixels (0 when the terminal does not report it)
    pub pixel_height: u16,
}

impl WindowSize {
    /// Create a new window size
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        }
    }

    /// Create a window size with pixel dimensions
    pub fn with_pixels(cols: u16, rows: u16, pixel_width: u16, pixel_height: u16) -> Self {
        Self {
            rows,
            cols,
            pixel_width,
            pixel_height,
        }
    }

    /// Read the window size of the terminal behind `fd` (TIOCGWINSZ)
    pub fn query<Fd: AsFd>(fd: Fd) -> nix::Result<Self> {
        let mut ws: Winsize = unsafe { std::mem::zeroed() };
        let result = unsafe {
            libc::ioctl(
                fd.as_fd().as_raw_fd(),
                libc::TIOCGWINSZ as libc::c_ulong,
                &mut ws,
            )
        };
        if result == -1 {
            Err(nix::Error::last())
        } else {
            Ok(Self::from(ws))
        }
    }

    /// Apply this size to the terminal behind `fd` (TIOCSWINSZ)
    pub fn apply<Fd: AsFd>(&self, fd: Fd) -> io::Result<()> {
        let ws = self.to_winsize();
        let result = unsafe {
            libc::ioctl(
                fd.as_fd().as_raw_fd(),
                libc::TIOCSWINSZ as libc::c_ulong,
                &ws,
            )
        };
        if result == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    /// Convert to libc winsize structure
    pub fn to_winsize(&self) -> Winsize {
        Winsize {
            ws_row: self.rows,
            ws_col: self.cols,
            ws_xpixel: self.pixel_width,
            ws_ypixel: self.pixel_height,
        }
    }
}

impl From<Winsize> for WindowSize {
    fn from(ws: Winsize) -> Self {
        Self {
            rows: ws.ws_row,
            cols: ws.ws_col,
            pixel_width: ws.ws_xpixel,
            pixel_height: ws.ws_ypixel,
        }
    }
}
