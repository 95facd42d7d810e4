use thiserror::Error;

/// Errors raised while exchanging commands with the instrument
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The underlying byte transport failed
    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The channel was closed and the transport released
    #[error("command channel is closed")]
    Closed,
    /// The command text would break line framing
    #[error("command {0:?} contains a line terminator")]
    InvalidCommand(String),
}
