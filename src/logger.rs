//! The logger capability and its stock implementations.
//!
//! A [`Logger`] accepts one structured entry (an ordered list of key/value
//! pairs) and reports whether it was recorded. That is the whole contract.
//! Where the entry goes (stdout, a file, a remote collector) is the
//! implementation's business, not this crate's.
//!
//! ```rust
//! use reqlog::logger::{Logger, MemoryLogger};
//!
//! let logger = MemoryLogger::new();
//! let _ = logger.log(&[("msg", &"cache miss"), ("key", &"user:42")]);
//! assert_eq!(logger.entries()[0].get("key"), Some("user:42"));
//! ```

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Level;

use crate::error::LogError;

/// One key/value pair of a log entry.
pub type KeyValue<'a> = (&'a str, &'a dyn fmt::Display);

/// Anything that can record a structured log entry.
pub trait Logger: Send + Sync {
    fn log(&self, keyvals: &[KeyValue<'_>]) -> Result<(), LogError>;
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn log(&self, keyvals: &[KeyValue<'_>]) -> Result<(), LogError> {
        (**self).log(keyvals)
    }
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn log(&self, keyvals: &[KeyValue<'_>]) -> Result<(), LogError> {
        (**self).log(keyvals)
    }
}

// ── NopLogger ─────────────────────────────────────────────────────────────────

/// Accepts everything, records nothing, never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn log(&self, _keyvals: &[KeyValue<'_>]) -> Result<(), LogError> {
        Ok(())
    }
}

// ── LoggerFn ──────────────────────────────────────────────────────────────────

/// Adapts a plain function or closure into a [`Logger`].
///
/// ```rust
/// use reqlog::LogError;
/// use reqlog::logger::{Logger, LoggerFn, KeyValue};
///
/// let stderr = LoggerFn(|keyvals: &[KeyValue<'_>]| -> Result<(), LogError> {
///     for (k, v) in keyvals {
///         eprint!("{k}={v} ");
///     }
///     eprintln!();
///     Ok(())
/// });
/// let _ = stderr.log(&[("msg", &"hello")]);
/// ```
#[derive(Clone, Copy)]
pub struct LoggerFn<F>(pub F);

impl<F> Logger for LoggerFn<F>
where
    F: Fn(&[KeyValue<'_>]) -> Result<(), LogError> + Send + Sync,
{
    fn log(&self, keyvals: &[KeyValue<'_>]) -> Result<(), LogError> {
        (self.0)(keyvals)
    }
}

// ── IdentifyingLogger ─────────────────────────────────────────────────────────

/// A logger tagged with a stable name.
///
/// The name identifies which logger is bound where (it is what `Display`
/// prints). It is never added to the entries themselves.
#[derive(Clone)]
pub struct IdentifyingLogger {
    inner: Arc<dyn Logger>,
    id: &'static str,
}

impl IdentifyingLogger {
    pub fn new(logger: impl Logger + 'static, id: &'static str) -> Self {
        Self { inner: Arc::new(logger), id }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }
}

impl Logger for IdentifyingLogger {
    fn log(&self, keyvals: &[KeyValue<'_>]) -> Result<(), LogError> {
        self.inner.log(keyvals)
    }
}

impl fmt::Display for IdentifyingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

impl fmt::Debug for IdentifyingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifyingLogger").field("id", &self.id).finish_non_exhaustive()
    }
}

// ── with ──────────────────────────────────────────────────────────────────────

/// Returns a logger that prepends `keyvals` to every entry it records.
///
/// Values are rendered once, here, so the returned logger owns its fields.
pub fn with(logger: impl Logger + 'static, keyvals: &[KeyValue<'_>]) -> WithFields {
    WithFields {
        inner: Arc::new(logger),
        fields: keyvals.iter().map(|(k, v)| ((*k).to_owned(), v.to_string())).collect(),
    }
}

/// A logger carrying fixed leading fields. Built by [`with`].
#[derive(Clone)]
pub struct WithFields {
    inner: Arc<dyn Logger>,
    fields: Vec<(String, String)>,
}

impl Logger for WithFields {
    fn log(&self, keyvals: &[KeyValue<'_>]) -> Result<(), LogError> {
        let mut all: Vec<KeyValue<'_>> = self.fields.iter()
            .map(|(k, v)| (k.as_str(), v as &dyn fmt::Display))
            .collect();
        all.extend_from_slice(keyvals);
        self.inner.log(&all)
    }
}

// ── MemoryLogger ──────────────────────────────────────────────────────────────

/// One recorded entry, with every value already rendered to a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry(Vec<(String, String)>);

impl Entry {
    /// The first value recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Keeps every entry in memory. Clones share the same buffer.
///
/// Handy for tests and for surfacing what a request logged, e.g. in a debug
/// endpoint.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogger {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, keyvals: &[KeyValue<'_>]) -> Result<(), LogError> {
        let entry = Entry(keyvals.iter().map(|(k, v)| ((*k).to_owned(), v.to_string())).collect());
        self.entries
            .lock()
            .map_err(|_| LogError::new("memory logger poisoned"))?
            .push(entry);
        Ok(())
    }
}

// ── TracingLogger ─────────────────────────────────────────────────────────────

/// Forwards entries to `tracing` as events at a fixed level.
///
/// A `msg` key becomes the event message. Every other pair is rendered as
/// `key=value` into a single `fields` field.
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    level: Level,
}

impl TracingLogger {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for TracingLogger {
    fn default() -> Self { Self::new(Level::DEBUG) }
}

impl Logger for TracingLogger {
    fn log(&self, keyvals: &[KeyValue<'_>]) -> Result<(), LogError> {
        let mut message = None;
        let mut fields = String::new();
        for (key, value) in keyvals {
            if *key == "msg" && message.is_none() {
                message = Some(value.to_string());
                continue;
            }
            if !fields.is_empty() {
                fields.push(' ');
            }
            write!(fields, "{key}={value}").map_err(|e| LogError::new(e.to_string()))?;
        }
        let message = message.unwrap_or_default();

        if self.level == Level::ERROR {
            tracing::error!(target: "reqlog", fields = %fields, "{message}");
        } else if self.level == Level::WARN {
            tracing::warn!(target: "reqlog", fields = %fields, "{message}");
        } else if self.level == Level::INFO {
            tracing::info!(target: "reqlog", fields = %fields, "{message}");
        } else if self.level == Level::DEBUG {
            tracing::debug!(target: "reqlog", fields = %fields, "{message}");
        } else {
            tracing::trace!(target: "reqlog", fields = %fields, "{message}");
        }
        Ok(())
    }
}
