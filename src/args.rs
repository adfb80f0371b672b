use std::{ffi::OsString, num::ParseIntError};

use clap::{error::ErrorKind, Parser};

use crate::error::SendError;

/// Sends standard input to HOST:PORT over one TCP connection and prints the reply.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "line-send", version)]
pub struct Target {
    /// Hostname or IP literal of the peer
    pub host: String,
    /// Base-10 TCP port of the peer
    #[arg(allow_hyphen_values = true)]
    pub port: String,
    /// Anything after the port is accepted and ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub extra: Vec<String>,
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Invocation {
    Send(Target),
    /// `--help` or `--version`; the rendered text is printed as-is.
    Info(String),
}

impl Target {
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            extra: Vec::new(),
        }
    }

    pub fn port(&self) -> Result<u16, SendError> {
        self.port
            .trim()
            .parse::<u16>()
            .map_err(|source: ParseIntError| SendError::Parse {
                port: self.port.clone(),
                source,
            })
    }
}

pub fn parse<I, T>(argv: I) -> Result<Invocation, SendError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Target::try_parse_from(argv) {
        Ok(target) => Ok(Invocation::Send(target)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(Invocation::Info(e.to_string()))
        }
        Err(e) => {
            log::debug!("rejected command line: {}", e.kind());
            Err(SendError::Usage)
        }
    }
}
