//! Relay loop: controlling side of the pty to standard output
//!
//! Bytes are forwarded verbatim and in order. Once every holder of the
//! subordinate side is gone, Linux reports `EIO` on the controlling side
//! instead of end-of-file; both mean the child's output is fully drained.

use std::io::{self, Read, Write};

use crate::error::{Error, Result};

/// Read buffer size, matching stdio's BUFSIZ on glibc
const BUFFER_SIZE: usize = 8192;

/// Copy everything from `src` to `dst` until end-of-stream
///
/// Returns the number of bytes relayed. `EIO` from `src` counts as
/// end-of-stream. Any other read error and any failed or short write is
/// [`Error::Relay`].
pub fn copy<R, W>(src: &mut R, dst: &mut W) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = [0u8; BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if is_hangup(&e) => break,
            Err(e) => return Err(Error::Relay(e)),
        };

        dst.write_all(&buf[..n]).map_err(Error::Relay)?;
        dst.flush().map_err(Error::Relay)?;
        total += n as u64;
    }

    tracing::debug!(bytes = total, "relay reached end of stream");
    Ok(total)
}

fn is_hangup(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EIO)
}
