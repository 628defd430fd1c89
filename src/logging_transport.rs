//! Client-side request/response logging.
//!
//! [`LoggingTransport`] logs each outbound request and the response that
//! comes back, body included. To log the body it has to read it, so the whole
//! body is buffered in memory and handed back to the caller as a fresh,
//! unread [`Full`](http_body_util::Full) body. There is no size cap: memory
//! use grows with the response.

use std::sync::Arc;

use bytes::BytesMut;
use http_body_util::BodyExt;
use tracing::debug;

use crate::error::Error;
use crate::handler::BoxFuture;
use crate::logger::Logger;
use crate::transport::{ClientRequest, ClientResponse, HyperTransport, Transport, full_body};

/// A [`Transport`] decorator that logs every round trip.
///
/// | `msg` | other keys |
/// |---|---|
/// | `http request` | `url` |
/// | `http response` | `statusCode`, `body` on success; `err`, `body` on failure |
///
/// ```rust,no_run
/// use bytes::Bytes;
/// use http_body_util::{BodyExt, Full};
/// use reqlog::{LoggingTransport, Transport};
/// use reqlog::logger::TracingLogger;
///
/// # async fn run() -> Result<(), reqlog::Error> {
/// let client = LoggingTransport::new(TracingLogger::default());
/// let req = http::Request::get("http://127.0.0.1:3000/healthz")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let resp = client.round_trip(req).await?;
/// // the body was logged, yet it is still here to read
/// let body = resp.into_body().collect().await.unwrap().to_bytes();
/// # Ok(()) }
/// ```
pub struct LoggingTransport<T = HyperTransport> {
    inner: T,
    logger: Arc<dyn Logger>,
}

impl LoggingTransport {
    /// Logs to `logger`, sending requests over a default [`HyperTransport`].
    pub fn new(logger: impl Logger + 'static) -> Self {
        Self::with_transport(HyperTransport::new(), logger)
    }
}

impl<T: Transport> LoggingTransport<T> {
    /// Logs to `logger`, sending requests over `inner`.
    pub fn with_transport(inner: T, logger: impl Logger + 'static) -> Self {
        Self { inner, logger: Arc::new(logger) }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for LoggingTransport<T> {
    fn round_trip(&self, req: ClientRequest) -> BoxFuture<'_, Result<ClientResponse, Error>> {
        Box::pin(async move {
            let _ = self.logger.log(&[("msg", &"http request"), ("url", req.uri())]);

            match self.inner.round_trip(req).await {
                Ok(resp) => {
                    let (parts, mut body) = resp.into_parts();
                    // A failed read keeps what arrived before the error.
                    let mut buf = BytesMut::new();
                    while let Some(frame) = body.frame().await {
                        match frame {
                            Ok(frame) => {
                                if let Some(data) = frame.data_ref() {
                                    buf.extend_from_slice(data);
                                }
                            }
                            Err(e) => {
                                debug!(read = buf.len(), "response body read failed: {e}");
                                break;
                            }
                        }
                    }
                    let bytes = buf.freeze();
                    let _ = self.logger.log(&[
                        ("msg", &"http response"),
                        ("statusCode", &parts.status.as_u16()),
                        ("body", &String::from_utf8_lossy(&bytes)),
                    ]);
                    Ok(http::Response::from_parts(parts, full_body(bytes)))
                }
                Err(err) => {
                    let _ = self.logger.log(&[
                        ("msg", &"http response"),
                        ("err", &err),
                        ("body", &""),
                    ]);
                    Err(err)
                }
            }
        })
    }
}
