use std::net::SocketAddr;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
};

/// What a peer saw during its single connection.
#[derive(Debug)]
pub struct PeerReport {
    pub request: Vec<u8>,
    /// The client closed its side once the exchange was over.
    pub saw_close: bool,
}

/// Accepts one connection, reads the request, answers with whatever `reply`
/// builds from it and then waits for the client to hang up.
pub async fn spawn_peer<F>(reply: F) -> (SocketAddr, oneshot::Receiver<PeerReport>)
where
    F: FnOnce(&[u8]) -> Vec<u8> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let n = stream.read(&mut buf).await.unwrap();
        let request = buf[..n].to_vec();

        let response = reply(&request);
        if !response.is_empty() {
            stream.write_all(&response).await.unwrap();
        }

        let saw_close = loop {
            match stream.read(&mut buf).await {
                Ok(0) => break true,
                Ok(_) => continue,
                Err(_) => break true,
            }
        };
        let _ = tx.send(PeerReport { request, saw_close });
    });

    (addr, rx)
}

pub async fn spawn_echo() -> (SocketAddr, oneshot::Receiver<PeerReport>) {
    spawn_peer(|request| request.to_vec()).await
}

/// A port on loopback that nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

pub async fn run_with(args: &[&str], stdin: &[u8]) -> (i32, String) {
    let mut argv = vec!["line-send"];
    argv.extend_from_slice(args);

    let mut out = Vec::new();
    let code = line_send::run(argv, stdin, &mut out).await.unwrap();
    (code, String::from_utf8(out).unwrap())
}
