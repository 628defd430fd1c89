//! Per-request context injection.

use crate::context::Context;
use crate::handler::{BoxFuture, Handler};
use crate::request::Request;
use crate::response::ResponseWriter;

/// Wraps `next` so each request's context is replaced by `derive(&ctx)`
/// before `next` sees it.
///
/// This is where hosts bind channels that depend on the request, such as a
/// session-debug logger keyed on a cookie:
///
/// ```rust
/// use reqlog::{channel, middleware, BoxFuture, Request, ResponseWriter};
/// use reqlog::logger::{self, TracingLogger};
///
/// fn hello<'a>(_req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
///     Box::pin(async move { w.write(b"hello") })
/// }
///
/// let app = middleware::with_context(
///     |ctx| channel::with_session_debug_log(ctx, logger::with(TracingLogger::default(), &[("session", &"s-1")])),
///     middleware::debug_logging(hello),
/// );
/// ```
pub fn with_context<F, H>(derive: F, next: H) -> WithContext<F, H>
where
    F: Fn(&Context) -> Context + Send + Sync + 'static,
    H: Handler,
{
    WithContext { derive, next }
}

/// Handler returned by [`with_context`].
pub struct WithContext<F, H> {
    derive: F,
    next: H,
}

impl<F, H> Handler for WithContext<F, H>
where
    F: Fn(&Context) -> Context + Send + Sync + 'static,
    H: Handler,
{
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        let ctx = (self.derive)(req.context());
        self.next.serve(req.with_context(ctx), w)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::channel;
    use crate::logger::{Logger, MemoryLogger};
    use crate::response::BufferedResponse;

    fn log_to_info<'a>(req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            let _ = channel::info_log(req.context()).log(&[("msg", &"inside"), ("path", &req.uri().path())]);
            w.write(b"done");
        })
    }

    #[tokio::test]
    async fn derived_context_reaches_the_next_handler() {
        let memory = MemoryLogger::new();
        let sink = memory.clone();
        let app = with_context(move |ctx| channel::with_info_log(ctx, sink.clone()), log_to_info);

        let req = Request::new(http::Request::builder().uri("/orders").body(Bytes::new()).unwrap());
        let mut w = BufferedResponse::new();
        app.serve(req, &mut w).await;

        let entries = memory.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].get("path"), Some("/orders"));
        assert_eq!(w.body(), b"done");
    }

    #[tokio::test]
    async fn parent_bindings_survive_derivation() {
        let errors = MemoryLogger::new();
        let info = MemoryLogger::new();
        let base = channel::with_err_log(&Context::background(), errors.clone());
        let sink = info.clone();
        let app = with_context(move |ctx| channel::with_info_log(ctx, sink.clone()), log_to_info);

        let req = Request::new(http::Request::new(Bytes::new())).with_context(base.clone());
        app.serve(req, &mut BufferedResponse::new()).await;

        assert!(channel::Channel::Err.bound(&base).is_some());
        assert!(channel::Channel::Info.bound(&base).is_none());
        assert_eq!(info.entries().len(), 1);
    }
}
