//! Framing of the analyzer's shell-style text protocol
//!
//! Every command goes out terminated by `\r\n`. The firmware answers with zero or
//! more `\r\n`-terminated lines and then prints a `>` prompt once it is ready for
//! the next command. The prompt is not part of the data.

/// Terminator appended to commands and separating response lines
pub const LINE_TERMINATOR: &[u8] = b"\r\n";
/// Prompt byte the firmware prints after each reply
pub const PROMPT: u8 = b'>';

/// The text lines returned for a single command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    lines: Vec<String>,
}

impl Response {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The first line, which carries the value for every `get` command
    pub fn first(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl IntoIterator for Response {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

/// Encode a command for the wire
pub fn frame(command: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(command.len() + LINE_TERMINATOR.len());
    bytes.extend_from_slice(command.as_bytes());
    bytes.extend_from_slice(LINE_TERMINATOR);
    bytes
}

/// Split raw bytes read back from the instrument into response lines
///
/// A trailing prompt is dropped, the rest is split on [`LINE_TERMINATOR`] and the
/// last split segment is discarded. That segment is empty when the reply ends
/// with a terminator and an incomplete line otherwise.
pub fn parse_response(raw: &[u8]) -> Response {
    let raw = match raw.split_last() {
        Some((&PROMPT, rest)) => rest,
        _ => raw,
    };
    let mut segments = split_lines(raw);
    segments.pop();
    Response::new(
        segments
            .into_iter()
            .map(|seg| String::from_utf8_lossy(seg).into_owned())
            .collect(),
    )
}

fn split_lines(mut raw: &[u8]) -> Vec<&[u8]> {
    let mut segments = Vec::new();
    while let Some(idx) = raw
        .windows(LINE_TERMINATOR.len())
        .position(|w| w == LINE_TERMINATOR)
    {
        segments.push(&raw[..idx]);
        raw = &raw[idx + LINE_TERMINATOR.len()..];
    }
    segments.push(raw);
    segments
}
