//! Traversal and path resolution over a finished tree.
//!
//! [`RouteRef`] is a borrowed handle (registry + id) that exposes what the
//! rendering side needs from a node: computed paths, raw segment, ordered
//! children, parent/root and the render descriptor.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::error::Result;
use crate::node::{RenderDescriptor, RouteId, RouteKind, RouteMeta, RouteNode};
use crate::path::{join_path, navigable};
use crate::registry::Registry;
use crate::route::compile;

mod ancestors;

pub use ancestors::Ancestors;

/// Borrowed view of one route inside a [`Registry`]
#[derive(Clone, Copy)]
pub struct RouteRef<'a> {
    registry: &'a Registry,
    id: RouteId,
}

impl PartialEq for RouteRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.registry, other.registry) && self.id == other.id
    }
}

impl Eq for RouteRef<'_> {}

impl fmt::Debug for RouteRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRef")
            .field("id", &self.id)
            .field("label", &self.node().label())
            .field("path", &self.node().raw_path())
            .finish()
    }
}

impl<'a> RouteRef<'a> {
    /// `id` must belong to `registry`
    pub(crate) fn new(registry: &'a Registry, id: RouteId) -> Self {
        Self { registry, id }
    }

    fn at(&self, id: RouteId) -> RouteRef<'a> {
        RouteRef::new(self.registry, id)
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn node(&self) -> &'a RouteNode {
        &self.registry.nodes[self.id.idx()]
    }

    pub fn kind(&self) -> RouteKind {
        self.node().kind()
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node().name()
    }

    /// Raw stored segment, `None` if it was never accepted
    pub fn raw_path(&self) -> Option<&'a str> {
        self.node().raw_path()
    }

    pub fn meta(&self) -> &'a RouteMeta {
        self.node().meta()
    }

    pub fn render(&self) -> Option<&'a RenderDescriptor> {
        self.node().render()
    }

    pub fn parent(&self) -> Option<RouteRef<'a>> {
        self.node().parent.map(|id| self.at(id))
    }

    pub fn root(&self) -> RouteRef<'a> {
        self.at(self.node().root)
    }

    /// Immediate children in declaration order
    pub fn routes(&self) -> Vec<RouteRef<'a>> {
        self.node().children.iter().map(|id| self.at(*id)).collect()
    }

    // ========================================================================
    // Paths
    // ========================================================================

    /// Navigable full path: ancestor segments joined with `/`, doubled
    /// slashes collapsed and wildcard markers stripped.
    ///
    /// Recomputed on every call; cost grows with depth. A root route only
    /// normalizes its own segment, so a root `""` yields `""` and its child
    /// `users` yields `/users`.
    pub fn get_path(&self) -> String {
        let node = self.node();
        match self.parent() {
            Some(parent) => navigable(&join_path(&parent.get_path(), node.segment())),
            None => navigable(node.segment()),
        }
    }

    /// Absolute pattern path the matcher and builder are compiled from
    /// (slashes collapsed, wildcard markers kept)
    pub fn get_full_path(&self) -> &'a str {
        self.node().compiled.pattern()
    }

    /// Substitute `params` into the compiled full path
    ///
    /// Fails when a required parameter is missing or empty.
    pub fn to_path(&self, params: &HashMap<String, String>) -> Result<String> {
        self.node().compiled.builder().build(params)
    }

    /// [`to_path`](Self::to_path) with parameters given as `(name, value)` pairs
    pub fn to_path_params(&self, params: &[(&str, &str)]) -> Result<String> {
        let params: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.to_path(&params)
    }

    /// [`to_path`](Self::to_path) with a JSON object of string or number values
    pub fn to_path_json(&self, params: &Value) -> Result<String> {
        self.node().compiled.builder().build_json(params)
    }

    /// Decoded parameters if the compiled full path matches `path`
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        self.node().compiled.matcher().match_path(path)
    }

    // ========================================================================
    // Ancestors
    // ========================================================================

    fn ancestor_refs(&self) -> impl Iterator<Item = RouteRef<'a>> + 'a {
        let registry = self.registry;
        Ancestors::new(registry, self.node().parent).map(move |id| RouteRef::new(registry, id))
    }

    /// Complete ancestor chain, nearest first
    pub fn get_all_parents(&self) -> Vec<RouteRef<'a>> {
        self.ancestor_refs().collect()
    }

    /// Ancestors nearest first, up to and including the first one whose
    /// navigable path matches `stop_path`; the whole chain without a stop.
    pub fn parents(&self, stop_path: Option<&str>) -> Vec<RouteRef<'a>> {
        let mut found = Vec::new();
        for ancestor in self.ancestor_refs() {
            found.push(ancestor);
            if let Some(stop) = stop_path {
                let matched = compile(&ancestor.get_path())
                    .map(|compiled| compiled.matcher().is_match(stop))
                    .unwrap_or(false);
                if matched {
                    break;
                }
            }
        }
        found
    }

    /// Ancestors in breadcrumb order (root-most first, parent last), starting
    /// at the nearest ancestor named `stop_name` when one exists.
    pub fn get_parents_by_name(&self, stop_name: Option<&str>) -> Vec<RouteRef<'a>> {
        self.breadcrumb(|ancestor| stop_name.is_some() && ancestor.name() == stop_name)
    }

    /// Like [`get_parents_by_name`](Self::get_parents_by_name), stopping at the
    /// nearest ancestor whose compiled full path matches `stop_path`.
    pub fn get_parents_by_path(&self, stop_path: Option<&str>) -> Vec<RouteRef<'a>> {
        self.breadcrumb(|ancestor| match stop_path {
            Some(stop) => ancestor.node().compiled.matcher().is_match(stop),
            None => false,
        })
    }

    fn breadcrumb(&self, stop: impl Fn(&RouteRef<'a>) -> bool) -> Vec<RouteRef<'a>> {
        let mut found = Vec::new();
        for ancestor in self.ancestor_refs() {
            found.push(ancestor);
            if stop(&ancestor) {
                break;
            }
        }
        found.reverse();
        found
    }

    // ========================================================================
    // Descendants
    // ========================================================================

    /// Every descendant, depth-first pre-order
    pub fn get_all_children(&self) -> Vec<RouteRef<'a>> {
        let mut found = Vec::new();
        self.collect_descendants(&mut found);
        found
    }

    fn collect_descendants(&self, found: &mut Vec<RouteRef<'a>>) {
        for child in self.routes() {
            found.push(child);
            child.collect_descendants(found);
        }
    }

    /// Every descendant, depth-first pre-order.
    ///
    /// Same listing as [`get_all_children`](Self::get_all_children); no
    /// sibling scan is cut short.
    pub fn children(&self) -> Vec<RouteRef<'a>> {
        self.get_all_children()
    }
}
