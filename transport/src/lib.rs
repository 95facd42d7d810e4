//! Line-oriented command channel between the host and the antenna analyzer firmware

mod channel;
mod command;
mod config;
mod error;
mod framing;
#[cfg(feature = "serial")]
mod serial;
mod window;

pub use channel::{CommandChannel, Session, Transport};
pub use command::{Command, Property, Register};
pub use config::SerialConfig;
pub use error::ChannelError;
pub use framing::{frame, parse_response, Response, LINE_TERMINATOR, PROMPT};
#[cfg(feature = "serial")]
pub use serial::SerialTransport;
