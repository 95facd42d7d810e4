use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use crate::{
    command::Command,
    config::{SerialConfig, DEFAULT_MAX_READ_BYTES},
    error::ChannelError,
    framing::{frame, parse_response, Response},
};

/// A byte link to the instrument
///
/// Implementations own the read window: `receive` returns once `buf` is full or
/// the window has elapsed, and a window with no data is `Ok(0)`, not an error.
pub trait Transport {
    /// Write every byte of `bytes`
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;
    /// Read up to `buf.len()` bytes within the read window
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    /// Release the underlying device
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).send(bytes)
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).receive(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

struct Link<T> {
    transport: T,
    open: bool,
}

/// Request/response channel to the analyzer shell
///
/// The channel owns its transport and closes it exactly once, either through
/// [`CommandChannel::close`] or when dropped. Exchanges are serialized: each call
/// holds the link for its write and read, and a [`Session`] holds it for as many
/// exchanges as a caller needs to run without interleaving.
pub struct CommandChannel<T: Transport> {
    link: Mutex<Link<T>>,
    max_read_bytes: usize,
}

impl<T: Transport> CommandChannel<T> {
    pub fn new(transport: T) -> Self {
        Self::with_max_read_bytes(transport, DEFAULT_MAX_READ_BYTES)
    }

    pub fn with_config(transport: T, cfg: &SerialConfig) -> Self {
        Self::with_max_read_bytes(transport, cfg.max_read_bytes)
    }

    pub fn with_max_read_bytes(transport: T, max_read_bytes: usize) -> Self {
        Self {
            link: Mutex::new(Link {
                transport,
                open: true,
            }),
            max_read_bytes,
        }
    }

    pub fn max_read_bytes(&self) -> usize {
        self.max_read_bytes
    }

    /// Take exclusive use of the link until the returned session is dropped
    pub fn session(&self) -> Session<'_, T> {
        Session {
            // A panic mid-exchange leaves nothing half-written in `Link` itself
            link: self.link.lock().unwrap_or_else(PoisonError::into_inner),
            max_read_bytes: self.max_read_bytes,
        }
    }

    /// Send a line of text and read back the reply
    pub fn send(&self, command: &str) -> Result<Response, ChannelError> {
        self.session().send(command)
    }

    pub fn execute(&self, command: &Command) -> Result<Response, ChannelError> {
        self.session().execute(command)
    }

    /// Read whatever the instrument has pending, up to `max_bytes`
    pub fn receive(&self, max_bytes: usize) -> Result<Response, ChannelError> {
        self.session().receive(max_bytes)
    }

    /// Discard pending output, such as the banner printed at power on
    pub fn drain(&self) -> Result<(), ChannelError> {
        let pending = self.receive(self.max_read_bytes)?;
        if !pending.is_empty() {
            debug!(lines = pending.len(), "Drained pending output");
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.session().link.open
    }

    /// Release the transport. Closing an already closed channel does nothing.
    pub fn close(&self) -> Result<(), ChannelError> {
        let mut link = self.link.lock().unwrap_or_else(PoisonError::into_inner);
        if !link.open {
            return Ok(());
        }
        link.open = false;
        debug!("Closing command channel");
        link.transport.close()?;
        Ok(())
    }
}

impl<T: Transport> Drop for CommandChannel<T> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close transport: {e}");
        }
    }
}

/// Exclusive handle on a [`CommandChannel`]
pub struct Session<'a, T: Transport> {
    link: MutexGuard<'a, Link<T>>,
    max_read_bytes: usize,
}

impl<'a, T: Transport> Session<'a, T> {
    pub fn send(&mut self, command: &str) -> Result<Response, ChannelError> {
        if command.contains(['\r', '\n']) {
            return Err(ChannelError::InvalidCommand(command.to_owned()));
        }
        self.ensure_open()?;
        debug!(command, "Sending");
        self.link.transport.send(&frame(command))?;
        self.receive(self.max_read_bytes)
    }

    pub fn execute(&mut self, command: &Command) -> Result<Response, ChannelError> {
        self.send(&command.to_string())
    }

    pub fn receive(&mut self, max_bytes: usize) -> Result<Response, ChannelError> {
        self.ensure_open()?;
        let mut buf = vec![0u8; max_bytes];
        let n = self.link.transport.receive(&mut buf)?;
        trace!(bytes = n, "Read window closed");
        let response = parse_response(&buf[..n]);
        debug!(lines = ?response.lines(), "Received");
        Ok(response)
    }

    fn ensure_open(&self) -> Result<(), ChannelError> {
        if self.link.open {
            Ok(())
        } else {
            Err(ChannelError::Closed)
        }
    }
}
