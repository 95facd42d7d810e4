use std::io::{self, Read};
use std::time::{Duration, Instant};

/// Read into `buf` until it is full, the reader goes quiet or `window` elapses
///
/// `set_timeout` is called before every read with the time left in the window.
/// A read that times out or returns zero bytes ends the window without error.
#[cfg_attr(not(feature = "serial"), allow(dead_code))]
pub(crate) fn read_window<R, F>(
    reader: &mut R,
    buf: &mut [u8],
    window: Duration,
    mut set_timeout: F,
) -> io::Result<usize>
where
    R: Read + ?Sized,
    F: FnMut(&mut R, Duration) -> io::Result<()>,
{
    let deadline = Instant::now() + window;
    let mut filled = 0;
    while filled < buf.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        set_timeout(reader, remaining)?;
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
