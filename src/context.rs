//! Request-scoped, immutable key/value context.
//!
//! A [`Context`] is a persistent chain of bindings. [`Context::with_value`]
//! never touches the receiver: it returns a new context whose newest node
//! points back at the old chain, so every ancestor stays valid and can keep
//! being shared across tasks.
//!
//! ```text
//! background ── err_log ── debug_log          ← ctx_a
//!                    └──── debug_log'         ← ctx_b  (shares the err_log node)
//! ```
//!
//! Keys are types, not strings. Each key is a (usually private) type
//! implementing [`Key`], so two crates can never collide on a name.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A typed context key.
///
/// The implementing type is the key itself; `Value` is what it maps to.
///
/// ```rust
/// use reqlog::context::{Context, Key};
///
/// struct TenantId;
/// impl Key for TenantId {
///     type Value = String;
/// }
///
/// let ctx = Context::background().with_value::<TenantId>("acme".to_owned());
/// assert_eq!(ctx.value::<TenantId>().map(String::as_str), Some("acme"));
/// ```
pub trait Key: 'static {
    type Value: Any + Send + Sync;
}

struct Node {
    key: TypeId,
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// An immutable, cheaply clonable key/value carrier.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a child context in which `K` resolves to `value`.
    pub fn with_value<K: Key>(&self, value: K::Value) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key: TypeId::of::<K>(),
                value: Box::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// The nearest binding for `K`, if any.
    pub fn value<K: Key>(&self) -> Option<&K::Value> {
        let wanted = TypeId::of::<K>();
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == wanted {
                return n.value.downcast_ref::<K::Value>();
            }
            node = n.parent.as_deref();
        }
        None
    }

    /// Number of bindings in the chain, shadowed ones included.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.head.as_deref(), |n| n.parent.as_deref()).count()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("depth", &self.depth()).finish()
    }
}
