//! Minimal reqlog example: a debug-logged server and a logging client.
//!
//! Run with:
//!   RUST_LOG=reqlog=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl http://localhost:3000/upstream     ← proxies to /users/42 through LoggingTransport

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use reqlog::context::Context;
use reqlog::logger::{self, Logger, TracingLogger};
use reqlog::{BoxFuture, LoggingTransport, Request, ResponseWriter, Server, Transport, channel, middleware};
use tracing::Level;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let base = channel::with_err_log(&Context::background(), TracingLogger::new(Level::ERROR));
    let base = channel::with_info_log(&base, TracingLogger::new(Level::INFO));
    let base = channel::with_debug_log(&base, TracingLogger::new(Level::DEBUG));

    let app = middleware::with_context(
        |ctx: &Context| {
            channel::with_session_debug_log(
                ctx,
                logger::with(TracingLogger::new(Level::TRACE), &[("session", &"demo")]),
            )
        },
        middleware::debug_logging(route),
    );

    if let Err(e) = Server::bind("0.0.0.0:3000").with_context(base).serve(app).await {
        eprintln!("server error: {e}");
    }
}

fn route<'a>(req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
    Box::pin(async move {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        match (method, path.as_str()) {
            (Method::POST, "/users") => create_user(req, w),
            (Method::GET, "/upstream") => upstream(req, w).await,
            (Method::GET, p) if p.starts_with("/users/") => get_user(p.trim_start_matches("/users/"), w),
            _ => w.write_header(StatusCode::NOT_FOUND),
        }
    })
}

// GET /users/{id}
fn get_user(id: &str, w: &mut dyn ResponseWriter) {
    w.headers_mut().insert("content-type", "application/json".parse().unwrap());
    w.write(format!(r#"{{"id":"{id}","name":"alice"}}"#).as_bytes());
}

// POST /users
fn create_user(req: Request, w: &mut dyn ResponseWriter) {
    if req.body().is_empty() {
        let _ = channel::info_log(req.context()).log(&[("msg", &"rejected empty user")]);
        w.write_header(StatusCode::BAD_REQUEST);
        return;
    }
    let _ = channel::session_debug_log(req.context()).log(&[("msg", &"creating user"), ("bytes", &req.body().len())]);
    w.headers_mut().insert("location", "/users/99".parse().unwrap());
    w.write_header(StatusCode::CREATED);
    w.write(br#"{"id":"99","name":"new_user"}"#);
}

// GET /upstream: calls back into this server through a logging client
async fn upstream(req: Request, w: &mut dyn ResponseWriter) {
    let client = LoggingTransport::new(channel::debug_log(req.context()));
    let outbound = http::Request::get("http://127.0.0.1:3000/users/42")
        .body(Full::new(Bytes::new()))
        .unwrap();

    match client.round_trip(outbound).await {
        Ok(resp) => {
            let status = resp.status();
            let body = resp.into_body().collect().await.map(|c| c.to_bytes()).unwrap_or_default();
            w.write_header(status);
            w.write(&body);
        }
        Err(e) => {
            let _ = channel::err_log(req.context()).log(&[("msg", &"upstream failed"), ("err", &e)]);
            w.write_header(StatusCode::BAD_GATEWAY);
        }
    }
}
