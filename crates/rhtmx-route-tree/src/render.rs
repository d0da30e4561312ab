// File: src/render.rs
// Purpose: Narrow interface for the collaborator that turns routes into UI nodes

use crate::tree::RouteRef;

/// Turns routes into whatever the view layer renders.
///
/// The tree drives the walk bottom-up: each route is rendered after its
/// children, which are handed over already rendered (nested outlets).
pub trait RouteRenderer {
    type Output;

    fn render(&mut self, route: RouteRef<'_>, children: Vec<Self::Output>) -> Self::Output;
}

impl<'a> RouteRef<'a> {
    /// Render this route and its subtree with `renderer`
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_route_tree::{Registry, RouteRef, RouteRenderer, RouteSpec};
    ///
    /// struct Outline;
    ///
    /// impl RouteRenderer for Outline {
    ///     type Output = String;
    ///
    ///     fn render(&mut self, route: RouteRef<'_>, children: Vec<String>) -> String {
    ///         format!("{}[{}]", route.raw_path().unwrap_or_default(), children.join(","))
    ///     }
    /// }
    ///
    /// let mut registry = Registry::new();
    /// let root = registry
    ///     .create(RouteSpec::named("app", "App")
    ///         .with_child(RouteSpec::leaf("a", "1"))
    ///         .with_child(RouteSpec::leaf("b", "2")))
    ///     .unwrap();
    ///
    /// let outline = registry.route(root).unwrap().render_with(&mut Outline);
    /// assert_eq!(outline, "app[a[],b[]]");
    /// ```
    pub fn render_with<R: RouteRenderer>(&self, renderer: &mut R) -> R::Output {
        let children = self
            .routes()
            .into_iter()
            .map(|child| child.render_with(renderer))
            .collect();
        renderer.render(*self, children)
    }
}
