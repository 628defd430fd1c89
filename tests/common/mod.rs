//! Shared helpers for the integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Full;
use reqlog::transport::ClientRequest;
use reqlog::{HyperTransport, Transport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a raw-TCP backend that answers every connection with a fixed
/// `200 OK` and `body`.
pub async fn start_mock_backend(addr: SocketAddr, body: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
}

pub fn get(uri: impl AsRef<str>) -> ClientRequest {
    http::Request::get(uri.as_ref()).body(Full::new(Bytes::new())).unwrap()
}

pub fn post(uri: impl AsRef<str>, body: &'static str) -> ClientRequest {
    http::Request::post(uri.as_ref())
        .header("content-type", "text/plain")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap()
}

/// Poll `addr` until something answers HTTP, or give up after ~2s.
pub async fn wait_until_serving(addr: SocketAddr) {
    let probe = HyperTransport::new();
    for _ in 0..100 {
        if probe.round_trip(get(format!("http://{addr}/__ready"))).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {addr} never came up");
}

/// A shutdown future for `Server::serve_with_shutdown` and the sender that
/// fires it.
pub fn shutdown_pair() -> (tokio::sync::oneshot::Sender<()>, impl Future<Output = ()>) {
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    (tx, async move {
        let _ = rx.await;
    })
}
