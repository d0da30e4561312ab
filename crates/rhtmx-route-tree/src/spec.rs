// File: src/spec.rs
// Purpose: Declarative route specifications consumed by the tree builder

use std::fmt;

use serde_json::Value;

use crate::node::{RenderDescriptor, RouteId, RouteMeta};
use crate::state::Reducer;

/// How a route is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Unique, registered name (module and stateful routes)
    Name(String),
    /// Positional id (leaf routes), not registered in the name index
    Id(String),
}

/// A child entry: either a spec to build or a node to adopt
#[derive(Debug, Clone)]
pub enum ChildSpec {
    Spec(RouteSpec),
    Built(RouteId),
}

impl From<RouteSpec> for ChildSpec {
    fn from(spec: RouteSpec) -> Self {
        ChildSpec::Spec(spec)
    }
}

impl From<RouteId> for ChildSpec {
    fn from(id: RouteId) -> Self {
        ChildSpec::Built(id)
    }
}

/// Specification of one route and, recursively, its children.
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::RouteSpec;
///
/// let spec = RouteSpec::named("", "App")
///     .with_title("Application")
///     .with_child(RouteSpec::named("users", "Users")
///         .with_child(RouteSpec::named(":id", "UserDetail")));
///
/// assert_eq!(spec.children().len(), 1);
/// ```
#[derive(Clone)]
pub struct RouteSpec {
    pub(crate) path: String,
    pub(crate) identity: Identity,
    pub(crate) meta: RouteMeta,
    pub(crate) render: Option<RenderDescriptor>,
    pub(crate) children: Vec<ChildSpec>,
    pub(crate) parent: Option<RouteId>,
    pub(crate) root: Option<RouteId>,
    pub(crate) reducer: Option<Reducer>,
    pub(crate) initial_state: Option<Value>,
}

impl RouteSpec {
    pub fn new(path: impl Into<String>, identity: Identity) -> Self {
        Self {
            path: path.into(),
            identity,
            meta: RouteMeta::default(),
            render: None,
            children: Vec::new(),
            parent: None,
            root: None,
            reducer: None,
            initial_state: None,
        }
    }

    /// Spec of a named (module or stateful) route
    pub fn named(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(path, Identity::Name(name.into()))
    }

    /// Spec of a lightweight leaf route
    pub fn leaf(path: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(path, Identity::Id(id.into()))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn with_render(mut self, render: RenderDescriptor) -> Self {
        self.render = Some(render);
        self
    }

    pub fn with_icon(mut self, icon: Value) -> Self {
        self.meta.icon = Some(icon);
        self
    }

    pub fn with_extras(mut self, extras: Value) -> Self {
        self.meta.extras = Some(extras);
        self
    }

    pub fn with_show_menu(mut self, show_menu: bool) -> Self {
        self.meta.show_menu = Some(show_menu);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    /// Appends a child spec or an already-built node to adopt
    pub fn with_child(mut self, child: impl Into<ChildSpec>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ChildSpec>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Attach the new route under an existing node
    pub fn with_parent(mut self, parent: RouteId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Override the root reference (defaults to the parent's root, or the node itself)
    pub fn with_root(mut self, root: RouteId) -> Self {
        self.root = Some(root);
        self
    }

    /// Reducer applied by [`Registry::dispatch`](crate::Registry::dispatch)
    pub fn with_reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.reducer = Some(Reducer::new(reducer));
        self
    }

    pub fn with_initial_state(mut self, state: Value) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn children(&self) -> &[ChildSpec] {
        &self.children
    }

    /// Named specs with a reducer or an initial state become stateful routes
    pub(crate) fn is_stateful(&self) -> bool {
        matches!(self.identity, Identity::Name(_))
            && (self.reducer.is_some() || self.initial_state.is_some())
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("path", &self.path)
            .field("identity", &self.identity)
            .field("meta", &self.meta)
            .field("render", &self.render)
            .field("children", &self.children)
            .field("parent", &self.parent)
            .field("root", &self.root)
            .field("reducer", &self.reducer.is_some())
            .field("initial_state", &self.initial_state)
            .finish()
    }
}

/// Identity pass-through for authoring specs declaratively.
///
/// Nothing is instantiated or registered; the spec comes back unchanged and can
/// be handed to [`Registry::create`](crate::Registry::create) later.
pub fn create_impl(spec: RouteSpec) -> RouteSpec {
    spec
}
