use std::time::Duration;

use serde::Deserialize;

/// Default serial baud rate of the analyzer UART
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
/// Default length of the read window in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 100;
/// Default number of bytes read per exchange
pub const DEFAULT_MAX_READ_BYTES: usize = 1000;

/// Serial link settings for the analyzer
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path of the serial port (e.g. `/dev/ttyACM0` or `COM4`)
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// How long a single receive waits for data
    pub read_timeout_ms: u64,
    /// Upper bound on the bytes read back for one command
    pub max_read_bytes: usize,
}

impl SerialConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Default::default()
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
        }
    }
}
