// File: src/config.rs
// Purpose: Router configuration and serializable route definitions (routes.toml / routes.json)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::node::{RenderDescriptor, RouteId};
use crate::registry::Registry;
use crate::spec::RouteSpec;

/// Name of the catch-all route used when no configuration is present
pub const INITIAL_ROUTE_NAME: &str = "RcInitialRoute";

/// Router mount configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Base URL the application is served under (multi-instance deployments)
    #[serde(default)]
    pub basename: Option<String>,

    #[serde(default)]
    pub mode: RouterMode,

    #[serde(default = "default_route")]
    pub route: RouteDef,
}

/// History flavour used by the navigation adapter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterMode {
    #[default]
    Browser,
    Hash,
}

/// Positional route id, written either as a string or a number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteKey {
    Text(String),
    Number(i64),
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteKey::Text(text) => f.write_str(text),
            RouteKey::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Serializable mirror of [`RouteSpec`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteDef {
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub id: Option<RouteKey>,

    #[serde(default)]
    pub title: Option<String>,

    /// Key of the view the renderer should mount for this route
    #[serde(default)]
    pub controller: Option<String>,

    #[serde(default)]
    pub icon: Option<Value>,

    #[serde(default)]
    pub extras: Option<Value>,

    #[serde(default)]
    pub show_menu: Option<bool>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub initial_state: Option<Value>,

    #[serde(default)]
    pub children: Vec<RouteDef>,
}

fn default_route() -> RouteDef {
    RouteDef {
        path: "*".to_string(),
        name: Some(INITIAL_ROUTE_NAME.to_string()),
        ..RouteDef::default()
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            basename: None,
            mode: RouterMode::default(),
            route: default_route(),
        }
    }
}

impl RouteDef {
    /// Convert into a builder spec. A route needs a name or an id; when both
    /// are present the name wins.
    pub fn into_spec(self) -> Result<RouteSpec> {
        let mut spec = match (self.name, self.id) {
            (Some(name), _) => RouteSpec::named(self.path, name),
            (None, Some(id)) => RouteSpec::leaf(self.path, id.to_string()),
            (None, None) => bail!("Route \"{}\" needs either a name or an id", self.path),
        };

        if let Some(title) = self.title {
            spec = spec.with_title(title);
        }
        if let Some(controller) = self.controller {
            spec = spec.with_render(RenderDescriptor::new(controller));
        }
        if let Some(icon) = self.icon {
            spec = spec.with_icon(icon);
        }
        if let Some(extras) = self.extras {
            spec = spec.with_extras(extras);
        }
        if let Some(show_menu) = self.show_menu {
            spec = spec.with_show_menu(show_menu);
        }
        if let Some(description) = self.description {
            spec = spec.with_description(description);
        }
        if let Some(state) = self.initial_state {
            spec = spec.with_initial_state(state);
        }

        let children = self
            .children
            .into_iter()
            .map(RouteDef::into_spec)
            .collect::<Result<Vec<_>>>()?;
        Ok(spec.with_children(children))
    }
}

impl RouterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse router config as TOML")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse router config as JSON")
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means the default catch-all route
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        parsed.with_context(|| format!("Invalid router config: {:?}", path))
    }

    /// Build the configured tree into `registry` and return its root
    pub fn build(&self, registry: &mut Registry) -> Result<RouteId> {
        let spec = self.route.clone().into_spec()?;
        let root = registry
            .create(spec)
            .context("Failed to build configured route tree")?;
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const ROUTES_TOML: &str = r#"
basename = "/admin"
mode = "hash"

[route]
path = ""
name = "App"
controller = "AppShell"

[[route.children]]
path = "users"
name = "Users"
title = "Users"
show_menu = true
icon = "people"

[[route.children.children]]
path = ":id"
name = "UserDetail"
initial_state = { tab = "profile" }

[[route.children]]
path = "about"
id = 7
"#;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.mode, RouterMode::Browser);
        assert_eq!(config.basename, None);
        assert_eq!(config.route.path, "*");
        assert_eq!(config.route.name.as_deref(), Some(INITIAL_ROUTE_NAME));
    }

    #[test]
    fn test_parse_toml() {
        let config = RouterConfig::from_toml_str(ROUTES_TOML).unwrap();
        assert_eq!(config.basename.as_deref(), Some("/admin"));
        assert_eq!(config.mode, RouterMode::Hash);
        assert_eq!(config.route.children.len(), 2);
        assert_eq!(config.route.children[1].id, Some(RouteKey::Number(7)));
        assert_eq!(
            config.route.children[0].children[0].initial_state,
            Some(json!({ "tab": "profile" }))
        );
    }

    #[test]
    fn test_parse_json() {
        let config = RouterConfig::from_json_str(
            r#"{ "route": { "path": "", "id": "root", "children": [{ "path": "a", "name": "Alpha" }] } }"#,
        )
        .unwrap();
        assert_eq!(config.mode, RouterMode::Browser);
        assert_eq!(config.route.id, Some(RouteKey::Text("root".to_string())));
    }

    #[test]
    fn test_build_from_config() {
        let config = RouterConfig::from_toml_str(ROUTES_TOML).unwrap();
        let mut registry = Registry::new();
        let root = config.build(&mut registry).unwrap();

        assert_eq!(registry.len(), 4);
        let detail = registry.get_route_by_name("UserDetail").unwrap();
        assert_eq!(detail.get_path(), "/users/:id");
        assert!(detail.node().is_stateful());
        assert_eq!(detail.root().id(), root);

        let about = registry.get_route_by_path("about").unwrap();
        assert_eq!(about.node().key(), Some("7"));
        assert_eq!(
            registry
                .route(root)
                .unwrap()
                .render()
                .and_then(|r| r.downcast_ref::<String>())
                .map(String::as_str),
            Some("AppShell")
        );
    }

    #[test]
    fn test_route_without_identity_is_rejected() {
        let def = RouteDef {
            path: "nowhere".to_string(),
            ..RouteDef::default()
        };
        let err = def.into_spec().unwrap_err();
        assert!(err.to_string().contains("needs either a name or an id"));
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let config = RouterConfig::load("does-not-exist/routes.toml").unwrap();
        assert_eq!(config.route.name.as_deref(), Some(INITIAL_ROUTE_NAME));
    }
}
