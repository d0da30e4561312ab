// File: src/validate.rs
// Purpose: Soft validation of route names and path segments

use once_cell::sync::Lazy;
use regex::Regex;

use crate::path::is_valid_segment;

// Route name: ASCII letter followed by one or more letters, digits or underscores
static ROUTE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]+$").unwrap());

/// Check a route name against the naming rule
pub fn is_valid_name(name: &str) -> bool {
    ROUTE_NAME_REGEX.is_match(name)
}

/// Validate a name before it is assigned to a route.
///
/// On failure the three diagnostic lines are logged and `false` is returned;
/// the caller keeps its previous value.
pub(crate) fn check_name(name: &str, current_path: Option<&str>) -> bool {
    if is_valid_name(name) {
        return true;
    }
    tracing::error!(
        "Route name must match \"{}\".",
        ROUTE_NAME_REGEX.as_str()
    );
    tracing::error!("   at route name: \"{}\"", name);
    tracing::error!("   at route path: \"{}\"", current_path.unwrap_or_default());
    false
}

/// Validate a path segment before it is assigned to a route.
pub(crate) fn check_path(path: &str, current_name: Option<&str>) -> bool {
    if is_valid_segment(path) {
        return true;
    }
    tracing::error!("Route path cannot start and end with \"/\".");
    tracing::error!("   at route path: \"{}\"", path);
    tracing::error!("   at route name: \"{}\"", current_name.unwrap_or_default());
    false
}

/// Report a name assigned to a leaf route, which is identified by id only.
pub(crate) fn reject_leaf_name(name: &str, current_path: Option<&str>) {
    tracing::error!("Leaf routes are identified by id and cannot take a name.");
    tracing::error!("   at route name: \"{}\"", name);
    tracing::error!("   at route path: \"{}\"", current_path.unwrap_or_default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("Abc2"));
        assert!(is_valid_name("Users"));
        assert!(is_valid_name("user_detail"));
        assert!(is_valid_name("ab"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name("1abc"));
        assert!(!is_valid_name("_abc"));
        assert!(!is_valid_name("A"));
        assert!(!is_valid_name("user-detail"));
        assert!(!is_valid_name("user.detail"));
        assert!(!is_valid_name(""));
    }

    #[traced_test]
    #[test]
    fn test_check_name_logs_three_lines() {
        assert!(!check_name("1abc", Some("users")));
        assert!(logs_contain("Route name must match"));
        assert!(logs_contain("at route name: \"1abc\""));
        assert!(logs_contain("at route path: \"users\""));
    }

    #[traced_test]
    #[test]
    fn test_check_path_logs_three_lines() {
        assert!(!check_path("/admin", Some("Admin")));
        assert!(logs_contain("Route path cannot start and end with"));
        assert!(logs_contain("at route path: \"/admin\""));
        assert!(logs_contain("at route name: \"Admin\""));
    }

    #[traced_test]
    #[test]
    fn test_accepted_values_log_nothing() {
        assert!(check_name("Admin", None));
        assert!(check_path("admin", None));
        assert!(!logs_contain("Route"));
    }
}
