use std::num::ParseIntError;

use num_complex::Complex64;
use thiserror::Error;
use transport::ChannelError;

/// The instrument answered, but not with what the command calls for
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Nothing came back within the read window
    #[error("no response to {command:?}")]
    EmptyResponse { command: String },
    /// The first response line is not an integer
    #[error("response {line:?} to {command:?} is not an integer")]
    MalformedValue {
        command: String,
        line: String,
        #[source]
        source: ParseIntError,
    },
}

/// The readings were taken, but the bridge equation has no finite solution
#[derive(Debug, Error, PartialEq)]
pub enum ComputationError {
    /// `2*Vref - Vant` vanished
    #[error("degenerate bridge: 2*Vref - Vant is zero (Vref = {reference}, Vant = {antenna})")]
    DegenerateBridge {
        reference: Complex64,
        antenna: Complex64,
    },
}

/// Errors raised while driving the analyzer
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Transport(#[from] ChannelError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
