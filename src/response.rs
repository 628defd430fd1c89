//! The response side of a handler: [`ResponseWriter`] and the buffered
//! writer the server hands to every request.
//!
//! A handler does not return a response; it writes one. Headers first, then
//! a status line (at most once), then body chunks:
//!
//! ```rust
//! use http::StatusCode;
//! use reqlog::{BufferedResponse, ResponseWriter};
//!
//! let mut w = BufferedResponse::new();
//! w.headers_mut().insert("location", "/users/99".parse().unwrap());
//! w.write_header(StatusCode::CREATED);
//! w.write(br#"{"id":"99"}"#);
//!
//! let resp = w.into_response();
//! assert_eq!(resp.status(), StatusCode::CREATED);
//! ```

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use tracing::warn;

/// Destination for one HTTP response.
///
/// Only the first [`write_header`](ResponseWriter::write_header) counts: a
/// response has exactly one status line. Writing body bytes before any
/// status implies `200 OK`.
pub trait ResponseWriter: Send {
    fn headers(&self) -> &HeaderMap;
    fn headers_mut(&mut self) -> &mut HeaderMap;
    fn write_header(&mut self, status: StatusCode);
    fn write(&mut self, chunk: &[u8]);
}

/// A [`ResponseWriter`] that collects everything in memory and turns into an
/// `http::Response` once the handler is done.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status written so far, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Finishes the response. A handler that wrote nothing yields an empty
    /// `200 OK`.
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let mut resp = http::Response::new(Full::new(self.body.freeze()));
        *resp.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *resp.headers_mut() = self.headers;
        resp
    }
}

impl ResponseWriter for BufferedResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        if let Some(sent) = self.status {
            warn!(sent = %sent, ignored = %status, "superfluous write_header call");
            return;
        }
        self.status = Some(status);
    }

    fn write(&mut self, chunk: &[u8]) {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(chunk);
    }
}
