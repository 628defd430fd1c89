//! The four logging channels carried in a [`Context`].
//!
//! | Channel | Setter | Getter | Label |
//! |---|---|---|---|
//! | error | [`with_err_log`] | [`err_log`] | `errLog` |
//! | info | [`with_info_log`] | [`info_log`] | `infoLog` |
//! | debug | [`with_debug_log`] | [`debug_log`] | `debugLog` |
//! | session debug | [`with_session_debug_log`] | [`session_debug_log`] | `sessionDebugLog` |
//!
//! Getters never fail. A channel that was never set resolves to a
//! [`NopLogger`], so call sites log unconditionally:
//!
//! ```rust
//! use reqlog::channel;
//! use reqlog::context::Context;
//! use reqlog::logger::{Logger, MemoryLogger};
//!
//! let debug = MemoryLogger::new();
//! let ctx = channel::with_debug_log(&Context::background(), debug.clone());
//!
//! let _ = channel::debug_log(&ctx).log(&[("msg", &"seen")]);
//! let _ = channel::err_log(&ctx).log(&[("msg", &"dropped")]);  // unset: no-op
//!
//! assert_eq!(debug.entries().len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::context::{Context, Key};
use crate::logger::{IdentifyingLogger, Logger, NopLogger};

/// One of the four logging slots.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Channel {
    Err,
    Info,
    Debug,
    SessionDebug,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Self::Err, Self::Info, Self::Debug, Self::SessionDebug];

    /// The label given to loggers bound on this channel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Err          => "errLog",
            Self::Info         => "infoLog",
            Self::Debug        => "debugLog",
            Self::SessionDebug => "sessionDebugLog",
        }
    }

    /// Binds `logger` to this channel in a new child of `ctx`.
    pub fn set(self, ctx: &Context, logger: impl Logger + 'static) -> Context {
        match self {
            Self::Err          => with_err_log(ctx, logger),
            Self::Info         => with_info_log(ctx, logger),
            Self::Debug        => with_debug_log(ctx, logger),
            Self::SessionDebug => with_session_debug_log(ctx, logger),
        }
    }

    /// The logger bound to this channel, or a no-op logger.
    pub fn get(self, ctx: &Context) -> Arc<dyn Logger> {
        match self {
            Self::Err          => err_log(ctx),
            Self::Info         => info_log(ctx),
            Self::Debug        => debug_log(ctx),
            Self::SessionDebug => session_debug_log(ctx),
        }
    }

    /// The bound logger itself, for finding out what (if anything) is set.
    pub fn bound(self, ctx: &Context) -> Option<Arc<IdentifyingLogger>> {
        match self {
            Self::Err          => ctx.value::<ErrLogKey>().cloned(),
            Self::Info         => ctx.value::<InfoLogKey>().cloned(),
            Self::Debug        => ctx.value::<DebugLogKey>().cloned(),
            Self::SessionDebug => ctx.value::<SessionDebugLogKey>().cloned(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Each key is a private unit type, so nothing outside this module can read
// or overwrite a channel except through the functions below.
macro_rules! channel {
    ($key:ident, $channel:expr, $(#[$set_doc:meta])* $set:ident, $(#[$get_doc:meta])* $get:ident) => {
        struct $key;

        impl Key for $key {
            type Value = Arc<IdentifyingLogger>;
        }

        $(#[$set_doc])*
        pub fn $set(ctx: &Context, logger: impl Logger + 'static) -> Context {
            let channel: Channel = $channel;
            ctx.with_value::<$key>(Arc::new(IdentifyingLogger::new(logger, channel.label())))
        }

        $(#[$get_doc])*
        pub fn $get(ctx: &Context) -> Arc<dyn Logger> {
            match ctx.value::<$key>() {
                Some(logger) => Arc::clone(logger) as Arc<dyn Logger>,
                None => Arc::new(NopLogger),
            }
        }
    };
}

channel!(
    ErrLogKey, Channel::Err,
    /// Returns a child of `ctx` whose error channel logs to `logger`.
    with_err_log,
    /// The error-channel logger of `ctx`; a no-op logger if unset.
    err_log
);

channel!(
    InfoLogKey, Channel::Info,
    /// Returns a child of `ctx` whose info channel logs to `logger`.
    with_info_log,
    /// The info-channel logger of `ctx`; a no-op logger if unset.
    info_log
);

channel!(
    DebugLogKey, Channel::Debug,
    /// Returns a child of `ctx` whose debug channel logs to `logger`.
    with_debug_log,
    /// The debug-channel logger of `ctx`; a no-op logger if unset.
    debug_log
);

channel!(
    SessionDebugLogKey, Channel::SessionDebug,
    /// Returns a child of `ctx` whose session-debug channel logs to `logger`.
    with_session_debug_log,
    /// The session-debug-channel logger of `ctx`; a no-op logger if unset.
    session_debug_log
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::MemoryLogger;

    #[test]
    fn every_channel_forwards_to_its_logger() {
        for channel in Channel::ALL {
            let memory = MemoryLogger::new();
            let ctx = channel.set(&Context::background(), memory.clone());

            channel.get(&ctx).log(&[("msg", &"ping"), ("channel", &channel)]).unwrap();

            let entries = memory.entries();
            assert_eq!(entries.len(), 1, "{channel}");
            assert_eq!(entries[0].get("channel"), Some(channel.label()));
        }
    }

    #[test]
    fn named_functions_and_channel_enum_agree() {
        let memory = MemoryLogger::new();
        let ctx = with_session_debug_log(&Context::background(), memory.clone());

        session_debug_log(&ctx).log(&[("msg", &"a")]).unwrap();
        Channel::SessionDebug.get(&ctx).log(&[("msg", &"b")]).unwrap();

        assert_eq!(memory.entries().len(), 2);
    }

    #[test]
    fn unset_channel_is_a_silent_no_op() {
        let ctx = Context::background();
        for channel in Channel::ALL {
            assert!(channel.bound(&ctx).is_none());
            assert!(channel.get(&ctx).log(&[("msg", &"nobody hears this")]).is_ok());
        }
        assert!(err_log(&ctx).log(&[]).is_ok());
    }

    #[test]
    fn channels_are_independent() {
        let errors = MemoryLogger::new();
        let debug = MemoryLogger::new();
        let ctx = with_err_log(&Context::background(), errors.clone());
        let ctx = with_debug_log(&ctx, debug.clone());

        err_log(&ctx).log(&[("msg", &"boom")]).unwrap();
        info_log(&ctx).log(&[("msg", &"lost")]).unwrap();

        assert_eq!(errors.entries().len(), 1);
        assert!(debug.entries().is_empty());
    }

    #[test]
    fn bound_logger_carries_the_channel_label() {
        let ctx = with_info_log(&Context::background(), NopLogger);
        let bound = Channel::Info.bound(&ctx).unwrap();
        assert_eq!(bound.to_string(), "infoLog");
        assert!(Channel::Debug.bound(&ctx).is_none());
    }

    #[test]
    fn rebinding_shadows_without_mutating_the_parent() {
        let first = MemoryLogger::new();
        let second = MemoryLogger::new();
        let parent = with_debug_log(&Context::background(), first.clone());
        let child = with_debug_log(&parent, second.clone());

        debug_log(&parent).log(&[("msg", &"p")]).unwrap();
        debug_log(&child).log(&[("msg", &"c")]).unwrap();

        assert_eq!(first.entries()[0].get("msg"), Some("p"));
        assert_eq!(second.entries()[0].get("msg"), Some("c"));
    }
}
