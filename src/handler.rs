//! The handler trait that middleware composes over.
//!
//! # Shape of a handler
//!
//! A handler receives the [`Request`] by value and a borrowed
//! [`ResponseWriter`], and returns a boxed future that borrows both `self` and
//! the writer for `'a`:
//!
//! ```text
//! fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a>
//! ```
//!
//! Borrowing the writer, rather than returning a response, is what lets a
//! middleware slip a decorator in front of it and still inspect that
//! decorator after the inner handler has finished:
//!
//! ```text
//! DebugLogging::serve(req, w)
//!        ↓ StatusRecorder::new(w)            ← wraps the caller's writer
//! next.serve(req, &mut recorder).await       ← inner handler writes through it
//!        ↓
//! recorder.status()                          ← still ours, read it and log
//! ```
//!
//! `Pin<Box<…>>` lets the trait stay object-safe and lets the server poll the
//! future in place. `Send` lets tokio move it across worker threads.
//!
//! Plain functions with the matching signature are handlers too:
//!
//! ```rust
//! use http::StatusCode;
//! use reqlog::{BoxFuture, Request, ResponseWriter};
//!
//! fn created<'a>(_req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
//!     Box::pin(async move {
//!         w.write_header(StatusCode::CREATED);
//!         w.write(b"made it");
//!     })
//! }
//! # fn assert_handler<H: reqlog::Handler>(_: H) {}
//! # assert_handler(created);
//! ```

use std::future::Future;
use std::pin::Pin;

use crate::request::Request;
use crate::response::ResponseWriter;

/// A heap-allocated, type-erased future.
pub type BoxFuture<'a, T = ()> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Serves one HTTP request by writing to a [`ResponseWriter`].
pub trait Handler: Send + Sync + 'static {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(Request, &'a mut dyn ResponseWriter) -> BoxFuture<'a> + Send + Sync + 'static,
{
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        self(req, w)
    }
}
