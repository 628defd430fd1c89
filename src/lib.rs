//! # reqlog
//!
//! Request-scoped logging for HTTP services. It does not ship a logging engine.
//!
//! ## The contract
//!
//! A [`Logger`](logger::Logger) takes one structured entry, a list of
//! key/value pairs, and returns a `Result`. Formatting, filtering, buffering
//! and shipping belong to whatever implements it. reqlog only decides *which*
//! logger a piece of code talks to, and logs the HTTP traffic around it:
//!
//! - **Channels**: four logger slots (error, info, debug, session-debug)
//!   carried in an immutable [`Context`](context::Context). An unset channel
//!   resolves to a no-op logger, so there is never anything to null-check.
//! - **Server side**: [`middleware::debug_logging`] logs method, URL and
//!   headers before a handler runs, and status, latency and headers after.
//! - **Client side**: [`LoggingTransport`] logs each outbound request and
//!   its response body, then hands the body back unread.
//!
//! Logging is best-effort throughout: a failing logger never changes a
//! response, and handler or transport errors pass through untouched.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use reqlog::{channel, middleware, BoxFuture, Request, ResponseWriter, Server};
//! use reqlog::context::Context;
//! use reqlog::logger::TracingLogger;
//! use tracing::Level;
//!
//! #[tokio::main]
//! async fn main() {
//!     let base = channel::with_err_log(&Context::background(), TracingLogger::new(Level::ERROR));
//!     let base = channel::with_debug_log(&base, TracingLogger::new(Level::DEBUG));
//!
//!     Server::bind("0.0.0.0:3000")
//!         .with_context(base)
//!         .serve(middleware::debug_logging(create_user))
//!         .await
//!         .unwrap();
//! }
//!
//! fn create_user<'a>(req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
//!     Box::pin(async move {
//!         if req.body().is_empty() {
//!             w.write_header(StatusCode::BAD_REQUEST);
//!             return;
//!         }
//!         w.headers_mut().insert("location", "/users/99".parse().unwrap());
//!         w.write_header(StatusCode::CREATED);
//!         w.write(br#"{"id":"99"}"#);
//!     })
//! }
//! ```

mod error;
mod handler;
mod logging_transport;
mod request;
mod response;
mod server;

pub mod channel;
pub mod context;
pub mod logger;
pub mod middleware;
pub mod transport;

pub use error::{BoxError, Error, LogError};
pub use handler::{BoxFuture, Handler};
pub use logging_transport::LoggingTransport;
pub use request::Request;
pub use response::{BufferedResponse, ResponseWriter};
pub use server::Server;
pub use transport::{HyperTransport, Transport};
