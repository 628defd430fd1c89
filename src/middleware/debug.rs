//! Request/response debug logging.

use std::time::Instant;

use crate::channel;
use crate::handler::{BoxFuture, Handler};
use crate::logger::Logger;
use crate::middleware::recorder::StatusRecorder;
use crate::request::Request;
use crate::response::ResponseWriter;

/// Wraps `next` so every request is logged to the context's debug channel.
///
/// Two entries per request:
///
/// | `msg` | other keys |
/// |---|---|
/// | `request start` | `requestMethod`, `requestURL`, `requestHeaders` |
/// | `end` | `statusCode`, `responseTime`, `responseHeaders` |
///
/// With no debug logger in the context both entries go to a no-op logger.
/// Logger failures are ignored.
pub fn debug_logging<H: Handler>(next: H) -> DebugLogging<H> {
    DebugLogging { next }
}

/// Handler returned by [`debug_logging`].
pub struct DebugLogging<H> {
    next: H,
}

impl<H: Handler> Handler for DebugLogging<H> {
    fn serve<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            let logger = channel::debug_log(req.context());
            let started = Instant::now();
            let _ = logger.log(&[
                ("msg", &"request start"),
                ("requestMethod", req.method()),
                ("requestURL", req.uri()),
                ("requestHeaders", &format!("{:?}", req.headers())),
            ]);

            let mut recorder = StatusRecorder::new(w);
            self.next.serve(req, &mut recorder).await;

            let _ = logger.log(&[
                ("msg", &"end"),
                ("statusCode", &recorder.status().as_u16()),
                ("responseTime", &format!("{:?}", started.elapsed())),
                ("responseHeaders", &format!("{:?}", recorder.headers())),
            ]);
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::context::Context;
    use crate::logger::MemoryLogger;
    use crate::response::BufferedResponse;

    fn created<'a>(_req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            w.headers_mut().insert("location", "/users/99".parse().unwrap());
            w.write_header(StatusCode::CREATED);
            w.write_header(StatusCode::INTERNAL_SERVER_ERROR);
            w.write(b"ok");
        })
    }

    fn slow<'a>(_req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            w.write(b"late");
        })
    }

    fn late_error<'a>(_req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        Box::pin(async move {
            w.write(b"partial");
            w.write_header(StatusCode::INTERNAL_SERVER_ERROR);
        })
    }

    fn request(uri: &str, ctx: Context) -> Request {
        let req = http::Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-request-id", "req-1")
            .body(Bytes::new())
            .unwrap();
        Request::new(req).with_context(ctx)
    }

    #[tokio::test]
    async fn logs_start_and_end_around_the_handler() {
        let memory = MemoryLogger::new();
        let ctx = channel::with_debug_log(&Context::background(), memory.clone());
        let mut w = BufferedResponse::new();

        debug_logging(created).serve(request("http://svc/users?x=1", ctx), &mut w).await;

        let entries = memory.entries();
        assert_eq!(entries.len(), 2);

        let start = &entries[0];
        assert_eq!(start.get("msg"), Some("request start"));
        assert_eq!(start.get("requestMethod"), Some("POST"));
        assert_eq!(start.get("requestURL"), Some("http://svc/users?x=1"));
        assert!(start.get("requestHeaders").unwrap().contains("req-1"));

        let end = &entries[1];
        assert_eq!(end.get("msg"), Some("end"));
        assert_eq!(end.get("statusCode"), Some("201"));
        assert!(end.get("responseTime").is_some());
        assert!(end.get("responseHeaders").unwrap().contains("/users/99"));

        // the wrapped writer saw the first status only
        assert_eq!(w.status(), Some(StatusCode::CREATED));
        assert_eq!(w.body(), b"ok");
    }

    #[tokio::test]
    async fn implicit_status_is_logged_as_200() {
        let memory = MemoryLogger::new();
        let ctx = channel::with_debug_log(&Context::background(), memory.clone());
        let mut w = BufferedResponse::new();

        debug_logging(slow).serve(request("/slow", ctx), &mut w).await;

        let end = &memory.entries()[1];
        assert_eq!(end.get("statusCode"), Some("200"));
        assert_ne!(end.get("responseTime"), Some("0ns"));
    }

    #[tokio::test]
    async fn status_after_body_logs_what_was_sent() {
        let memory = MemoryLogger::new();
        let ctx = channel::with_debug_log(&Context::background(), memory.clone());
        let mut w = BufferedResponse::new();

        debug_logging(late_error).serve(request("/partial", ctx), &mut w).await;

        assert_eq!(memory.entries()[1].get("statusCode"), Some("200"));
        assert_eq!(w.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn without_a_debug_logger_the_handler_still_runs() {
        let errors = MemoryLogger::new();
        let ctx = channel::with_err_log(&Context::background(), errors.clone());
        let mut w = BufferedResponse::new();

        debug_logging(created).serve(request("/", ctx), &mut w).await;

        assert_eq!(w.status(), Some(StatusCode::CREATED));
        assert!(errors.entries().is_empty());
    }
}
