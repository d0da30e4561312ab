//! # RHTMX Route Tree
//!
//! Declarative route trees for client-side applications:
//! - Nested route specs (`users` → `:id`) built into a wired tree
//! - Named routes with an O(1) name index
//! - Path patterns compiled into a matcher and a parameter builder
//! - Ancestor / descendant traversal and breadcrumb helpers
//! - Route-scoped state (reducer state and typed scope state)
//!
//! ## Data Model
//!
//! Routes live in an append-only arena owned by a [`Registry`] and reference
//! each other through [`RouteId`]s. Children are owned by id; `parent` and
//! `root` are plain back-references. Building takes `&mut Registry`; once the
//! tree is finished it can be frozen for the whole process with
//! [`global::install`].
//!
//! ## Path Resolution
//!
//! - Raw segments never start or end with `/` (invalid values are logged and ignored)
//! - Full paths join ancestor segments with `/`, collapse doubled slashes and
//!   strip `*` wildcard markers
//! - Matchers are compiled from the absolute pattern path (`/users/:id`)
//!
//! ## Example
//!
//! ```
//! use rhtmx_route_tree::{Registry, RouteSpec};
//!
//! let mut registry = Registry::new();
//! let root = registry
//!     .create(
//!         RouteSpec::named("", "App").with_child(
//!             RouteSpec::named("users", "Users")
//!                 .with_child(RouteSpec::named(":id", "UserDetail")),
//!         ),
//!     )
//!     .unwrap();
//!
//! let detail = registry.get_route_by_name("UserDetail").unwrap();
//! assert_eq!(detail.get_path(), "/users/:id");
//! assert_eq!(detail.to_path_params(&[("id", "5")]).unwrap(), "/users/5");
//! assert_eq!(registry.route(root).unwrap().get_all_children().len(), 2);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod config;
mod error;
pub mod global;
mod node;
pub mod path;
mod registry;
mod render;
pub mod route;
mod spec;
mod state;
mod tree;
mod validate;

// Re-export public types
pub use config::{RouteDef, RouteKey, RouterConfig, RouterMode, INITIAL_ROUTE_NAME};
pub use error::{Result, RouteError};
pub use node::{RenderDescriptor, RouteId, RouteKind, RouteMeta, RouteNode};
pub use registry::Registry;
pub use render::RouteRenderer;
pub use route::{compile, CompiledPath, PathBuilder, PathMatcher};
pub use spec::{create_impl, ChildSpec, Identity, RouteSpec};
pub use state::{Reducer, ScopeState};
pub use tree::{Ancestors, RouteRef};
pub use validate::is_valid_name;
