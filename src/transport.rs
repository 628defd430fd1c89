//! Client-side round trips.
//!
//! A [`Transport`] takes one request and yields one response (or an error).
//! It is the seam client decorators such as
//! [`LoggingTransport`](crate::LoggingTransport) wrap.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::error::{BoxError, Error};
use crate::handler::BoxFuture;

/// Body type of responses coming back from a [`Transport`].
pub type ResponseBody = UnsyncBoxBody<Bytes, BoxError>;

/// Outbound request type accepted by a [`Transport`].
pub type ClientRequest = http::Request<Full<Bytes>>;

/// Outbound response type produced by a [`Transport`].
pub type ClientResponse = http::Response<ResponseBody>;

/// Performs one HTTP round trip.
pub trait Transport: Send + Sync + 'static {
    fn round_trip(&self, req: ClientRequest) -> BoxFuture<'_, Result<ClientResponse, Error>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn round_trip(&self, req: ClientRequest) -> BoxFuture<'_, Result<ClientResponse, Error>> {
        (**self).round_trip(req)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn round_trip(&self, req: ClientRequest) -> BoxFuture<'_, Result<ClientResponse, Error>> {
        (**self).round_trip(req)
    }
}

/// Wraps in-memory bytes as a [`ResponseBody`].
pub fn full_body(bytes: impl Into<Bytes>) -> ResponseBody {
    Full::new(bytes.into()).map_err(|never| match never {}).boxed_unsync()
}

/// The default transport: a pooled hyper client over plain TCP, speaking
/// HTTP/1.1 or HTTP/2.
///
/// There is no TLS. An `https://` URL fails with [`Error::Transport`] before
/// anything is sent; wrap a TLS-capable [`Transport`] in
/// [`LoggingTransport`](crate::LoggingTransport) to reach HTTPS upstreams.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self { client: Client::builder(TokioExecutor::new()).build(HttpConnector::new()) }
    }
}

impl Default for HyperTransport {
    fn default() -> Self { Self::new() }
}

impl Transport for HyperTransport {
    fn round_trip(&self, req: ClientRequest) -> BoxFuture<'_, Result<ClientResponse, Error>> {
        let pending = self.client.request(req);
        Box::pin(async move {
            let resp = pending.await?;
            Ok(resp.map(|body| body.map_err(|e| Box::new(e) as BoxError).boxed_unsync()))
        })
    }
}
