//! HTTP server and graceful shutdown.
//!
//! The server is the host end of the handler chain: it turns every hyper
//! request into a [`Request`] carrying the server's base [`Context`], runs the
//! handler against a fresh [`BufferedResponse`], and sends what was written.
//!
//! # Graceful shutdown
//!
//! On shutdown the server:
//! 1. Immediately stops `listener.accept()`, so no new connections are made.
//! 2. Lets every in-flight connection task run to completion.
//! 3. Returns from [`Server::serve`].
//!
//! [`Server::serve`] shuts down on SIGTERM or Ctrl-C;
//! [`Server::serve_with_shutdown`] on any future you hand it.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::context::Context;
use crate::error::Error;
use crate::handler::Handler;
use crate::request::Request;
use crate::response::BufferedResponse;

/// The HTTP server.
pub struct Server {
    addr: String,
    context: Context,
}

impl Server {
    /// Configures the server to bind to `addr` (`host:port`) when it starts
    /// serving. Resolution and binding errors surface from `serve`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use reqlog::Server;
    /// let server = Server::bind("0.0.0.0:3000");
    /// ```
    pub fn bind(addr: impl Into<String>) -> Self {
        Self { addr: addr.into(), context: Context::background() }
    }

    /// Sets the context every request starts from.
    ///
    /// Loggers bound here are visible to every handler, e.g. a process-wide
    /// error channel.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Serves `handler` until SIGTERM or Ctrl-C, then drains in-flight
    /// connections.
    pub async fn serve(self, handler: impl Handler) -> Result<(), Error> {
        self.serve_with_shutdown(handler, shutdown_signal()).await
    }

    /// Serves `handler` until `signal` resolves, then drains in-flight
    /// connections.
    pub async fn serve_with_shutdown<H, S>(self, handler: H, signal: S) -> Result<(), Error>
    where
        H: Handler,
        S: Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.addr.as_str()).await?;
        let local = listener.local_addr()?;

        let handler = Arc::new(handler);
        let context = self.context;

        info!(addr = %local, "reqlog listening");

        // Tracks every connection task so shutdown can wait for them.
        let mut tasks = tokio::task::JoinSet::new();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check shutdown first so a signal stops accepting at once,
                // even with connections still queued.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let handler = Arc::clone(&handler);
                    let context = context.clone();
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let handler = Arc::clone(&handler);
                            let context = context.clone();
                            async move { dispatch(handler, req, context, remote_addr).await }
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished tasks so the set does not grow without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("reqlog stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Runs one request through the handler chain.
///
/// Infallible: a body that cannot be read becomes a `400`, everything else is
/// whatever the handler wrote.
async fn dispatch<H: Handler>(
    handler: Arc<H>,
    req: hyper::Request<hyper::body::Incoming>,
    context: Context,
    remote_addr: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (head, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(peer = %remote_addr, "request body read failed: {e}");
            let mut resp = http::Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = StatusCode::BAD_REQUEST;
            return Ok(resp);
        }
    };

    debug!(peer = %remote_addr, method = %head.method, uri = %head.uri, "dispatch");

    let mut writer = BufferedResponse::new();
    handler.serve(Request::from_parts(head, body).with_context(context), &mut writer).await;
    Ok(writer.into_response())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C). On
/// Windows only Ctrl-C is available. A signal that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    // `pending()` never resolves, so on non-Unix platforms the SIGTERM arm
    // is disabled.
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
