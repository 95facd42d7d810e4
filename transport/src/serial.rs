use std::io::{self, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, trace};

use crate::{channel::Transport, config::SerialConfig, window::read_window};

/// [`Transport`] over a host serial port
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    window: Duration,
}

impl SerialTransport {
    /// Open the device named in `cfg`
    pub fn open(cfg: &SerialConfig) -> serialport::Result<Self> {
        debug!(port = %cfg.port, baud = cfg.baud_rate, "Opening serial port");
        let port = serialport::new(&cfg.port, cfg.baud_rate)
            .timeout(cfg.read_timeout())
            .open()?;
        Ok(Self::from_port(port, cfg.read_timeout()))
    }

    pub fn from_port(port: Box<dyn SerialPort>, window: Duration) -> Self {
        Self {
            port: Some(port),
            window,
        }
    }

    fn port(&mut self) -> io::Result<&mut Box<dyn SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port closed"))
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        let port = self.port()?;
        port.write_all(bytes)?;
        port.flush()
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let window = self.window;
        let port = self.port()?;
        let filled = read_window(port, buf, window, |port, remaining| {
            Ok(port.set_timeout(remaining)?)
        })?;
        trace!(bytes = filled, "Serial read");
        Ok(filled)
    }

    fn close(&mut self) -> io::Result<()> {
        // Dropping the handle releases the OS device
        if self.port.take().is_some() {
            debug!("Serial port released");
        }
        Ok(())
    }
}
