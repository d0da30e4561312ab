use crate::error::Result;
use crate::node::RouteId;
use crate::registry::Registry;

/// Lazy iterator that walks the parent chain on-demand
///
/// Yields ids nearest first and stops at the root. Nothing is collected up
/// front, so `find()` / `position()` short-circuit.
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::{Registry, RouteSpec};
///
/// let mut registry = Registry::new();
/// let root = registry
///     .create(RouteSpec::named("", "App").with_child(RouteSpec::named("a", "A")))
///     .unwrap();
/// let a = registry.get_route_by_name("A").unwrap().id();
///
/// let chain: Vec<_> = registry.ancestors_inclusive(a).unwrap().collect();
/// assert_eq!(chain, vec![a, root]);
/// ```
#[derive(Clone)]
pub struct Ancestors<'a> {
    registry: &'a Registry,
    current: Option<RouteId>,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(registry: &'a Registry, start: Option<RouteId>) -> Self {
        Self {
            registry,
            current: start,
        }
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = RouteId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.registry.nodes[current.idx()].parent;
        Some(current)
    }
}

impl Registry {
    /// `id` followed by its ancestors, nearest first
    pub fn ancestors_inclusive(&self, id: RouteId) -> Result<Ancestors<'_>> {
        self.check(id)?;
        Ok(Ancestors::new(self, Some(id)))
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: RouteId) -> Result<Ancestors<'_>> {
        self.check(id)?;
        Ok(Ancestors::new(self, self.nodes[id.idx()].parent))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Registry, RouteSpec};

    #[test]
    fn test_ancestors_excludes_self() {
        let mut registry = Registry::new();
        let root = registry
            .create(
                RouteSpec::named("", "App")
                    .with_child(RouteSpec::named("a", "A").with_child(RouteSpec::named("b", "B"))),
            )
            .unwrap();
        let a = registry.get_route_by_name("A").unwrap().id();
        let b = registry.get_route_by_name("B").unwrap().id();

        assert_eq!(registry.ancestors(b).unwrap().collect::<Vec<_>>(), vec![a, root]);
        assert_eq!(registry.ancestors(root).unwrap().count(), 0);
        assert_eq!(registry.ancestors(b).unwrap().position(|id| id == root), Some(1));
    }
}
