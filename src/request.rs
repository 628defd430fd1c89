//! Incoming HTTP request type.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri, Version};

use crate::context::Context;

/// An incoming HTTP request with its body fully read and its [`Context`].
pub struct Request {
    pub(crate) head: http::request::Parts,
    pub(crate) body: Bytes,
    pub(crate) context: Context,
}

impl Request {
    /// Wraps an `http::Request` with an empty background context.
    pub fn new(req: http::Request<Bytes>) -> Self {
        let (head, body) = req.into_parts();
        Self::from_parts(head, body)
    }

    pub fn from_parts(head: http::request::Parts, body: Bytes) -> Self {
        Self { head, body, context: Context::background() }
    }

    pub fn method(&self) -> &Method { &self.head.method }
    pub fn uri(&self) -> &Uri { &self.head.uri }
    pub fn version(&self) -> Version { self.head.version }
    pub fn headers(&self) -> &HeaderMap { &self.head.headers }
    pub fn body(&self) -> &Bytes { &self.body }
    pub fn context(&self) -> &Context { &self.context }

    /// Case-insensitive header lookup. Non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Replaces the request's context, typically with a child of the current one.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn into_parts(self) -> (http::request::Parts, Bytes) {
        (self.head, self.body)
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        Self::new(req)
    }
}
