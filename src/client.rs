use std::{ffi::OsString, io};

use bytes::{Bytes, BytesMut};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
};

use crate::{
    args::{self, Invocation},
    error::SendError,
};

/// Upper bound of the one and only read of the reply.
pub const RESPONSE_LIMIT: usize = 1024;

/// Strips surrounding whitespace, counting the ASCII information separators
/// (`\x1c`..=`\x1f`) as whitespace too.
pub fn strip(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

enum Outcome {
    Response(String),
    Info(String),
}

/// Reads `reader` to end-of-stream and returns the trimmed text.
pub async fn read_payload<R>(mut reader: R) -> Result<String, SendError>
where
    R: AsyncRead + Unpin,
{
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .await
        .map_err(SendError::StdinRead)?;

    let text = String::from_utf8(raw)
        .map_err(|e| SendError::StdinRead(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    let payload = strip(&text);
    if payload.is_empty() {
        return Err(SendError::EmptyPayload);
    }
    Ok(payload.to_string())
}

/// Writes the whole payload, then performs a single read of at most
/// [`RESPONSE_LIMIT`] bytes. Whatever is still in flight after that read is
/// left unread.
pub async fn exchange<S>(stream: &mut S, payload: &[u8]) -> io::Result<Bytes>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(payload).await?;
    stream.flush().await?;
    log::debug!("sent {} bytes", payload.len());

    let mut buf = BytesMut::zeroed(RESPONSE_LIMIT);
    let n = stream.read(&mut buf[..]).await?;
    buf.truncate(n);
    log::debug!("received {n} bytes");

    Ok(buf.freeze())
}

/// Opens one connection to `host:port`, runs the exchange and closes it.
pub async fn send(host: &str, port: u16, payload: &[u8]) -> Result<Bytes, SendError> {
    log::debug!("connecting to {host}:{port}");
    let mut stream = TcpStream::connect((host, port))
        .await
        .map_err(|e| classify(e, host, port))?;

    // the stream is dropped, and so closed, on every return below
    exchange(&mut stream, payload)
        .await
        .map_err(|e| classify(e, host, port))
}

pub fn decode_response(raw: &[u8]) -> Result<String, SendError> {
    Ok(strip(std::str::from_utf8(raw)?).to_string())
}

fn classify(e: io::Error, host: &str, port: u16) -> SendError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => SendError::ConnectionRefused {
            host: host.to_string(),
            port,
        },
        _ => SendError::Network(e),
    }
}

async fn execute<I, T, R>(argv: I, stdin: R) -> Result<Outcome, SendError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    R: AsyncRead + Unpin,
{
    let target = match args::parse(argv)? {
        Invocation::Send(target) => target,
        Invocation::Info(text) => return Ok(Outcome::Info(text)),
    };
    let port = target.port()?;

    let payload = read_payload(stdin).await?;
    let raw = send(&target.host, port, payload.as_bytes()).await?;

    Ok(Outcome::Response(decode_response(&raw)?))
}

/// Runs one invocation end to end: parses `argv`, reads `stdin`, performs the
/// exchange and writes exactly one report to `out`. Returns the exit code.
///
/// The only error surfaced is a failure to write the report itself.
pub async fn run<I, T, R, W>(argv: I, stdin: R, out: &mut W) -> io::Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    R: AsyncRead + Unpin,
    W: io::Write,
{
    match execute(argv, stdin).await {
        Ok(Outcome::Response(text)) => {
            writeln!(out, "Response: '{text}'")?;
            Ok(0)
        }
        Ok(Outcome::Info(text)) => {
            writeln!(out, "{}", text.trim_end())?;
            Ok(0)
        }
        Err(e) => {
            log::debug!("send failed: {e:?}");
            writeln!(out, "{e}")?;
            Ok(e.exit_code())
        }
    }
}
