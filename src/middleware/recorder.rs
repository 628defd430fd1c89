//! Response status recorder.

use http::{HeaderMap, StatusCode};

use crate::response::ResponseWriter;

/// Wraps a [`ResponseWriter`] and remembers the first status written to it.
///
/// Later `write_header` calls are dropped before they reach the wrapped
/// writer, so it sees exactly one. A body write without a prior status sends
/// `200 OK` implicitly and counts as the first status. Headers and body pass
/// straight through.
pub struct StatusRecorder<'w> {
    inner: &'w mut dyn ResponseWriter,
    status: Option<StatusCode>,
}

impl<'w> StatusRecorder<'w> {
    pub fn new(inner: &'w mut dyn ResponseWriter) -> Self {
        Self { inner, status: None }
    }

    /// Whether a status line has gone out through this recorder.
    pub fn headers_sent(&self) -> bool {
        self.status.is_some()
    }

    /// The status the response goes out with: the first explicit one, or
    /// `200 OK` once the body was written first or if nothing was written.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }
}

impl ResponseWriter for StatusRecorder<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.status.is_some() {
            return;
        }
        self.status = Some(status);
        self.inner.write_header(status);
    }

    fn write(&mut self, chunk: &[u8]) {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.inner.write(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::BufferedResponse;

    /// Counts what reaches the wrapped writer.
    #[derive(Default)]
    struct Counting {
        headers: HeaderMap,
        header_writes: Vec<StatusCode>,
        body: Vec<u8>,
    }

    impl ResponseWriter for Counting {
        fn headers(&self) -> &HeaderMap { &self.headers }
        fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
        fn write_header(&mut self, status: StatusCode) { self.header_writes.push(status) }
        fn write(&mut self, chunk: &[u8]) { self.body.extend_from_slice(chunk) }
    }

    #[test]
    fn first_write_header_wins_and_is_forwarded_once() {
        let mut inner = Counting::default();
        let mut recorder = StatusRecorder::new(&mut inner);

        recorder.write_header(StatusCode::OK);
        recorder.write_header(StatusCode::NOT_FOUND);

        assert_eq!(recorder.status(), StatusCode::OK);
        assert!(recorder.headers_sent());
        assert_eq!(inner.header_writes, vec![StatusCode::OK]);
    }

    #[test]
    fn headers_and_body_pass_through() {
        let mut inner = Counting::default();
        let mut recorder = StatusRecorder::new(&mut inner);

        recorder.headers_mut().insert("x-trace", "abc".parse().unwrap());
        recorder.write(b"payload");

        assert_eq!(recorder.headers().get("x-trace").unwrap(), "abc");
        assert!(recorder.headers_sent());
        assert_eq!(inner.body, b"payload");
        assert!(inner.header_writes.is_empty());
    }

    #[test]
    fn body_write_fixes_status_at_ok() {
        let mut inner = BufferedResponse::new();
        let mut recorder = StatusRecorder::new(&mut inner);

        recorder.write(b"partial");
        recorder.write_header(StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(recorder.status(), StatusCode::OK);
        assert_eq!(inner.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn unwritten_status_reports_ok() {
        let mut inner = BufferedResponse::new();
        let recorder = StatusRecorder::new(&mut inner);
        assert_eq!(recorder.status(), StatusCode::OK);
        assert!(!recorder.headers_sent());
    }
}
