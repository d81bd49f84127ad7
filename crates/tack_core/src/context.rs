//! Scoped context values
//!
//! Ancestors pass values down to descendants without threading them through
//! every constructor. A [`Context`] is an immutable scope; [`Context::provide`]
//! returns a child scope that shadows any value of the same type provided
//! further up.
//!
//! ```ignore
//! #[derive(Clone, Copy)]
//! struct SiderCollapsed(bool);
//!
//! let root = Context::root();
//! let sider = root.provide(SiderCollapsed(true));
//!
//! assert_eq!(sider.get::<SiderCollapsed>().map(|c| c.0), Some(true));
//! assert!(root.get::<SiderCollapsed>().is_none());
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

struct Scope {
    parent: Option<Arc<Scope>>,
    values: FxHashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

/// An immutable scope of type-keyed values
#[derive(Clone)]
pub struct Context {
    scope: Arc<Scope>,
}

impl Default for Context {
    fn default() -> Self {
        Self::root()
    }
}

impl Context {
    /// An empty root scope
    pub fn root() -> Self {
        Self {
            scope: Arc::new(Scope {
                parent: None,
                values: FxHashMap::default(),
            }),
        }
    }

    /// Create a child scope holding `value`
    pub fn provide<T: Send + Sync + 'static>(&self, value: T) -> Context {
        self.provide_arc(Arc::new(value))
    }

    /// Create a child scope holding an already shared value
    pub fn provide_arc<T: Send + Sync + 'static>(&self, value: Arc<T>) -> Context {
        let mut values: FxHashMap<TypeId, Arc<dyn Any + Send + Sync>> = FxHashMap::default();
        values.insert(TypeId::of::<T>(), value);
        Context {
            scope: Arc::new(Scope {
                parent: Some(Arc::clone(&self.scope)),
                values,
            }),
        }
    }

    /// Nearest value of type `T`
    pub fn get_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let mut scope = Some(&self.scope);
        while let Some(current) = scope {
            if let Some(value) = current.values.get(&TypeId::of::<T>()) {
                return Arc::clone(value).downcast::<T>().ok();
            }
            scope = current.parent.as_ref();
        }
        None
    }

    /// Nearest value of type `T`, cloned
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.get_arc::<T>().map(|value| (*value).clone())
    }

    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.get_arc::<T>().is_some()
    }

    /// Number of scopes between this one and the root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.scope.parent.as_ref();
        while let Some(current) = scope {
            depth += 1;
            scope = current.parent.as_ref();
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .finish()
    }
}
