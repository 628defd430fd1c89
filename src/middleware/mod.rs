//! Middleware layer.
//!
//! Middleware wraps a [`Handler`](crate::Handler) in another handler and is
//! the right place for cross-cutting concerns. Everything here composes by
//! plain function application, innermost handler first:
//!
//! ```rust
//! use reqlog::{channel, middleware, BoxFuture, Request, ResponseWriter};
//! use reqlog::logger::TracingLogger;
//!
//! fn hello<'a>(_req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
//!     Box::pin(async move { w.write(b"hello") })
//! }
//!
//! let app = middleware::with_context(
//!     |ctx| channel::with_debug_log(ctx, TracingLogger::default()),
//!     middleware::debug_logging(hello),
//! );
//! # let _ = app;
//! ```
//!
//! Built-in middleware:
//! - [`debug_logging`]: logs method, URL, headers, status and latency to the debug channel
//! - [`with_context`]: derives each request's [`Context`](crate::context::Context)

mod context;
mod debug;
mod recorder;

pub use context::{WithContext, with_context};
pub use debug::{DebugLogging, debug_logging};
pub use recorder::StatusRecorder;
