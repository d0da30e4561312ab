// File: src/node.rs
// Purpose: Route node entity stored in the registry arena

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::route::CompiledPath;
use crate::state::StateBinding;

/// Handle of a node in a [`Registry`](crate::Registry).
///
/// A small copyable index into the registry arena. Nodes are never removed, so
/// an id stays valid for the lifetime of the registry that produced it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub(crate) u32);

impl RouteId {
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }

    /// Position of the node in construction order
    pub fn index(self) -> usize {
        self.idx()
    }
}

/// Capability set of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Lightweight route identified by a positional id
    Leaf,
    /// Named route that can own and adopt children
    Module,
    /// Named route carrying a reducer-style state binding
    Stateful,
}

/// Opaque reference to whatever the rendering side invokes for a route.
///
/// The tree never looks inside; it only hands the descriptor back.
#[derive(Clone)]
pub struct RenderDescriptor(Arc<dyn Any + Send + Sync>);

impl RenderDescriptor {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the wrapped value if it has type `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// True if both descriptors point at the same value
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RenderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.downcast_ref::<String>() {
            Some(key) => f.debug_tuple("RenderDescriptor").field(key).finish(),
            None => f.write_str("RenderDescriptor(..)"),
        }
    }
}

/// Pass-through metadata, never interpreted by the tree
#[derive(Debug, Clone, Default)]
pub struct RouteMeta {
    pub title: Option<String>,
    pub icon: Option<Value>,
    pub extras: Option<Value>,
    pub show_menu: Option<bool>,
    pub description: Option<String>,
}

/// A route in the tree.
///
/// Children are owned through their ids; `parent` and `root` are plain
/// back-references used for traversal only.
#[derive(Debug)]
pub struct RouteNode {
    pub(crate) id: RouteId,
    pub(crate) kind: RouteKind,
    pub(crate) name: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) path: Option<String>,
    pub(crate) meta: RouteMeta,
    pub(crate) render: Option<RenderDescriptor>,
    pub(crate) children: Vec<RouteId>,
    pub(crate) parent: Option<RouteId>,
    pub(crate) root: RouteId,
    pub(crate) compiled: CompiledPath,
    pub(crate) state: Option<StateBinding>,
}

impl RouteNode {
    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Registered name (named kinds only, and only if it passed validation)
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Positional id of a leaf route
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Raw path segment as stored. `None` if every assignment was rejected.
    pub fn raw_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Raw path segment, empty when unset
    pub fn segment(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }

    pub fn meta(&self) -> &RouteMeta {
        &self.meta
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }

    pub fn render(&self) -> Option<&RenderDescriptor> {
        self.render.as_ref()
    }

    pub fn child_ids(&self) -> &[RouteId] {
        &self.children
    }

    pub fn parent_id(&self) -> Option<RouteId> {
        self.parent
    }

    pub fn root_id(&self) -> RouteId {
        self.root
    }

    /// Matcher and builder compiled from the node's full path
    pub fn compiled(&self) -> &CompiledPath {
        &self.compiled
    }

    pub fn is_stateful(&self) -> bool {
        self.kind == RouteKind::Stateful
    }

    pub(crate) fn state(&self) -> Option<&StateBinding> {
        self.state.as_ref()
    }

    /// Human readable identity for diagnostics
    pub(crate) fn label(&self) -> String {
        match (&self.name, &self.key) {
            (Some(name), _) => name.clone(),
            (None, Some(key)) => format!("#{key}"),
            (None, None) => format!("<route {}>", self.id.0),
        }
    }
}
