// File: src/registry.rs
// Purpose: Route arena, name index and the tree builder that fills them

use std::collections::HashMap;

use crate::error::{Result, RouteError};
use crate::node::{RouteId, RouteKind, RouteNode};
use crate::path::{collapse_slashes, join_path};
use crate::route::compile;
use crate::spec::{ChildSpec, Identity, RouteSpec};
use crate::state::StateBinding;
use crate::tree::RouteRef;
use crate::validate::{check_name, check_path, reject_leaf_name};

/// Every route ever constructed, plus the name index.
///
/// The registry is append-only: nodes are never removed, so the arena order is
/// the construction order. Building needs `&mut Registry`; once the tree is
/// finished every query goes through `&Registry`, which is `Sync` and can be
/// frozen process-wide with [`global::install`](crate::global::install).
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::{Registry, RouteSpec};
///
/// let mut registry = Registry::new();
/// registry
///     .create(
///         RouteSpec::named("", "App").with_child(
///             RouteSpec::named("users", "Users")
///                 .with_child(RouteSpec::named(":id", "UserDetail")),
///         ),
///     )
///     .unwrap();
///
/// let detail = registry.get_route_by_name("UserDetail").unwrap();
/// assert_eq!(detail.get_path(), "/users/:id");
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) nodes: Vec<RouteNode>,
    names: HashMap<String, RouteId>,
    pub(crate) fallback: StateBinding,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of routes ever constructed
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: RouteId) -> Option<&RouteNode> {
        self.nodes.get(id.idx())
    }

    pub fn route(&self, id: RouteId) -> Option<RouteRef<'_>> {
        self.node(id).map(|_| RouteRef::new(self, id))
    }

    pub(crate) fn check(&self, id: RouteId) -> Result<()> {
        if id.idx() < self.nodes.len() {
            Ok(())
        } else {
            Err(RouteError::UnknownRoute(id))
        }
    }

    // ========================================================================
    // Tree Builder
    // ========================================================================

    /// Builds a route and its children, wiring parent and root references.
    ///
    /// Child specs are built recursively under the new node. Children given as
    /// [`ChildSpec::Built`] are adopted: they are detached from their previous
    /// parent and re-pointed (with their subtree) at the new node's root.
    ///
    /// If the spec names a parent, the new node is appended to that parent's
    /// children.
    pub fn create(&mut self, spec: RouteSpec) -> Result<RouteId> {
        let parent = spec.parent;
        let chain: Vec<RouteId> = match parent {
            Some(parent) => self.ancestors_inclusive(parent)?.collect(),
            None => Vec::new(),
        };
        let root = match spec.root {
            Some(root) => {
                self.check(root)?;
                Some(root)
            }
            None => parent.map(|p| self.nodes[p.idx()].root),
        };

        // Nothing is registered unless every adoption in the spec can succeed
        self.check_adoptions(&spec, &chain)?;
        self.build(spec, parent, root)
    }

    /// Verify every [`ChildSpec::Built`] in `spec` (at any depth) exists and is
    /// not an ancestor of the node that would adopt it. `chain` is the existing
    /// ancestry the new subtree hangs from, nearest first.
    fn check_adoptions(&self, spec: &RouteSpec, chain: &[RouteId]) -> Result<()> {
        for child in &spec.children {
            match child {
                ChildSpec::Spec(child_spec) => self.check_adoptions(child_spec, chain)?,
                ChildSpec::Built(existing) => {
                    self.check(*existing)?;
                    if let Some(parent) = chain.first().filter(|_| chain.contains(existing)) {
                        return Err(RouteError::AdoptionCycle {
                            child: *existing,
                            parent: *parent,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn build(
        &mut self,
        spec: RouteSpec,
        parent: Option<RouteId>,
        root: Option<RouteId>,
    ) -> Result<RouteId> {
        let kind = match spec.identity {
            Identity::Id(_) => RouteKind::Leaf,
            Identity::Name(_) if spec.is_stateful() => RouteKind::Stateful,
            Identity::Name(_) => RouteKind::Module,
        };
        let RouteSpec {
            path,
            identity,
            meta,
            render,
            children,
            reducer,
            initial_state,
            ..
        } = spec;

        let id = RouteId(self.nodes.len() as u32);
        let (name, key) = match identity {
            Identity::Name(name) => (Some(name), None),
            Identity::Id(key) => (None, Some(key)),
        };
        let path = check_path(&path, name.as_deref()).then_some(path);
        let name = name.filter(|name| check_name(name, path.as_deref()));

        let full_pattern = self.pattern_under(parent, path.as_deref().unwrap_or_default());
        let compiled = compile(&full_pattern)?;
        let state = (kind == RouteKind::Stateful).then(|| StateBinding::new(reducer, initial_state));

        self.nodes.push(RouteNode {
            id,
            kind,
            name,
            key,
            path,
            meta,
            render,
            children: Vec::new(),
            parent,
            root: root.unwrap_or(id),
            compiled,
            state,
        });
        if let Some(parent) = parent {
            self.nodes[parent.idx()].children.push(id);
        }
        self.register_name(id);
        tracing::debug!(
            route = %self.nodes[id.idx()].label(),
            pattern = %full_pattern,
            kind = ?kind,
            "Registered route"
        );

        for child in children {
            match child {
                ChildSpec::Spec(child_spec) => {
                    let root = self.nodes[id.idx()].root;
                    self.build(child_spec, Some(id), Some(root))?;
                }
                ChildSpec::Built(existing) => {
                    self.adopt(existing, id)?;
                    self.nodes[id.idx()].children.push(existing);
                }
            }
        }

        Ok(id)
    }

    /// Moves an already-built node under `parent`.
    ///
    /// The caller records the child in `parent.children`.
    fn adopt(&mut self, child: RouteId, parent: RouteId) -> Result<()> {
        self.check(child)?;
        if self.ancestors_inclusive(parent)?.any(|id| id == child) {
            return Err(RouteError::AdoptionCycle { child, parent });
        }

        if let Some(previous) = self.nodes[child.idx()].parent {
            self.nodes[previous.idx()].children.retain(|c| *c != child);
        }
        self.nodes[child.idx()].parent = Some(parent);

        let root = self.nodes[parent.idx()].root;
        self.rewire_subtree(child, root)?;
        tracing::debug!(
            route = %self.nodes[child.idx()].label(),
            parent = %self.nodes[parent.idx()].label(),
            "Adopted route"
        );
        Ok(())
    }

    /// Re-point a subtree at `root` and recompile its matchers from the new full paths
    fn rewire_subtree(&mut self, id: RouteId, root: RouteId) -> Result<()> {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let compiled = compile(&self.full_pattern(current))?;
            let node = &mut self.nodes[current.idx()];
            node.root = root;
            node.compiled = compiled;
            stack.extend(node.children.iter().copied());
        }
        Ok(())
    }

    /// Full pattern of a node: ancestor segments joined and collapsed, wildcards kept
    pub(crate) fn full_pattern(&self, id: RouteId) -> String {
        let node = &self.nodes[id.idx()];
        self.pattern_under(node.parent, node.segment())
    }

    fn pattern_under(&self, parent: Option<RouteId>, segment: &str) -> String {
        let base = parent.map(|p| self.full_pattern(p)).unwrap_or_default();
        collapse_slashes(&join_path(&base, segment)).into_owned()
    }

    // ========================================================================
    // Name index
    // ========================================================================

    fn register_name(&mut self, id: RouteId) {
        let Some(name) = self.nodes[id.idx()].name.clone() else {
            return;
        };

        if let Some(previous) = self.names.insert(name.clone(), id) {
            if previous != id {
                let old = &self.nodes[previous.idx()];
                let new = &self.nodes[id.idx()];
                tracing::warn!(
                    name = %name,
                    previous_path = old.segment(),
                    previous_pattern = old.compiled.pattern(),
                    new_path = new.segment(),
                    new_pattern = new.compiled.pattern(),
                    "Route name \"{}\" is already registered; the name index now points at the new route.",
                    name
                );
            }
        }
    }

    /// Assign a new name to a named route.
    ///
    /// Invalid names are logged and ignored (`Ok(false)`); the previous name
    /// stays in place. Leaf routes have no name: the attempt is logged the same
    /// way and returns `Ok(false)`.
    pub fn set_name(&mut self, id: RouteId, name: &str) -> Result<bool> {
        self.check(id)?;
        let node = &self.nodes[id.idx()];
        if node.kind == RouteKind::Leaf {
            reject_leaf_name(name, node.raw_path());
            return Ok(false);
        }
        if !check_name(name, node.raw_path()) {
            return Ok(false);
        }

        if let Some(old) = self.nodes[id.idx()].name.take() {
            if self.names.get(&old) == Some(&id) {
                self.names.remove(&old);
            }
        }
        self.nodes[id.idx()].name = Some(name.to_string());
        self.register_name(id);
        Ok(true)
    }

    /// Assign a new raw path segment.
    ///
    /// Segments starting or ending with `/` are logged and ignored
    /// (`Ok(false)`). On success the matchers of the node and its subtree are
    /// recompiled.
    pub fn set_path(&mut self, id: RouteId, path: &str) -> Result<bool> {
        self.check(id)?;
        let node = &self.nodes[id.idx()];
        if !check_path(path, node.name()) {
            return Ok(false);
        }

        let root = node.root;
        self.nodes[id.idx()].path = Some(path.to_string());
        self.rewire_subtree(id, root)?;
        Ok(true)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// O(1) lookup in the name index; the most recent registration wins
    pub fn get_route_by_name(&self, name: &str) -> Option<RouteRef<'_>> {
        self.names.get(name).map(|id| RouteRef::new(self, *id))
    }

    /// Snapshot of every route in construction order
    pub fn get_all_routes(&self) -> Vec<RouteRef<'_>> {
        self.iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = RouteRef<'_>> + '_ {
        self.nodes.iter().map(|node| RouteRef::new(self, node.id))
    }

    /// First route whose **raw stored segment** equals `path`.
    ///
    /// This compares the literal segment (`":id"`), not the full path
    /// (`"/users/:id"`), so looking up an absolute path only finds routes
    /// whose own segment happens to be spelled that way. Use
    /// [`match_route`](Self::match_route) to resolve a concrete path.
    pub fn get_route_by_path(&self, path: &str) -> Option<RouteRef<'_>> {
        self.iter().find(|route| route.node().raw_path() == Some(path))
    }

    /// Every route whose raw stored segment equals `path`, see
    /// [`get_route_by_path`](Self::get_route_by_path)
    pub fn get_routes_by_path(&self, path: &str) -> Vec<RouteRef<'_>> {
        self.iter()
            .filter(|route| route.node().raw_path() == Some(path))
            .collect()
    }

    /// First route (construction order) whose full-path matcher accepts `path`
    pub fn match_route(&self, path: &str) -> Option<RouteRef<'_>> {
        self.iter().find(|route| route.node().compiled.matcher().is_match(path))
    }

    /// Every route whose full-path matcher accepts `path`
    pub fn match_routes(&self, path: &str) -> Vec<RouteRef<'_>> {
        self.iter()
            .filter(|route| route.node().compiled.matcher().is_match(path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_duplicate_name_warns_and_overwrites() {
        let mut registry = Registry::new();
        let first = registry.create(RouteSpec::named("a", "Dup")).unwrap();
        let second = registry.create(RouteSpec::named("b", "Dup")).unwrap();

        assert!(logs_contain("is already registered"));
        assert_eq!(registry.get_route_by_name("Dup").unwrap().id(), second);
        assert_eq!(registry.len(), 2);
        assert!(registry.route(first).is_some());
    }

    #[traced_test]
    #[test]
    fn test_invalid_spec_values_are_reported_not_fatal() {
        let mut registry = Registry::new();
        let id = registry.create(RouteSpec::named("/admin", "1admin")).unwrap();

        let node = registry.node(id).unwrap();
        assert_eq!(node.raw_path(), None);
        assert_eq!(node.name(), None);
        assert!(logs_contain("Route path cannot start and end with"));
        assert!(logs_contain("Route name must match"));
    }

    #[traced_test]
    #[test]
    fn test_set_name_on_leaf_is_reported() {
        let mut registry = Registry::new();
        let id = registry.create(RouteSpec::leaf("about", "7")).unwrap();

        assert!(!registry.set_name(id, "About").unwrap());
        assert_eq!(registry.node(id).unwrap().name(), None);
        assert!(registry.get_route_by_name("About").is_none());
        assert!(logs_contain("cannot take a name"));
        assert!(logs_contain("at route name: \"About\""));
        assert!(logs_contain("at route path: \"about\""));
    }

    #[test]
    fn test_full_pattern_is_absolute() {
        let mut registry = Registry::new();
        let root = registry
            .create(RouteSpec::named("app", "App").with_child(RouteSpec::named("*", "Rest")))
            .unwrap();
        let rest = registry.get_route_by_name("Rest").unwrap().id();

        assert_eq!(registry.full_pattern(root), "/app");
        assert_eq!(registry.full_pattern(rest), "/app/*");
    }

    #[test]
    fn test_unknown_parent_is_an_error() {
        let mut registry = Registry::new();
        let err = registry
            .create(RouteSpec::named("a", "Orphan").with_parent(RouteId(42)))
            .unwrap_err();
        assert!(matches!(err, RouteError::UnknownRoute(RouteId(42))));
        assert!(registry.is_empty());
    }
}
