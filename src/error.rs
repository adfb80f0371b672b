use std::{fmt, io, num::ParseIntError, str::Utf8Error};

pub const USAGE: &str = "Usage: echo 'data' | line-send <HOST> <PORT>";

/// Every way a single send can fail. Each variant maps to one line on
/// standard output and one exit code.
#[derive(Debug)]
pub enum SendError {
    Usage,
    Parse { port: String, source: ParseIntError },
    StdinRead(io::Error),
    EmptyPayload,
    ConnectionRefused { host: String, port: u16 },
    Network(io::Error),
    Decode(Utf8Error),
}

impl SendError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SendError::Usage | SendError::StdinRead(_) | SendError::EmptyPayload => 1,
            SendError::Parse { .. } => 2,
            SendError::ConnectionRefused { .. } => 3,
            SendError::Network(_) | SendError::Decode(_) => 4,
        }
    }
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Usage => f.write_str(USAGE),
            SendError::Parse { port, source } => {
                write!(f, "Error: invalid port '{port}': {source}")
            }
            SendError::StdinRead(e) => write!(f, "Error reading from standard input: {e}"),
            SendError::EmptyPayload => f.write_str("Error: No data received from standard input."),
            SendError::ConnectionRefused { host, port } => write!(
                f,
                "Error: Connection refused. The server is not running on {host}:{port}."
            ),
            SendError::Network(e) => write!(f, "Error: {e}"),
            SendError::Decode(e) => write!(f, "Error: {e}"),
        }
    }
}

impl std::error::Error for SendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SendError::Parse { source, .. } => Some(source),
            SendError::StdinRead(e) | SendError::Network(e) => Some(e),
            SendError::Decode(e) => Some(e),
            SendError::Usage | SendError::EmptyPayload | SendError::ConnectionRefused { .. } => {
                None
            }
        }
    }
}

impl From<Utf8Error> for SendError {
    fn from(e: Utf8Error) -> Self {
        SendError::Decode(e)
    }
}
