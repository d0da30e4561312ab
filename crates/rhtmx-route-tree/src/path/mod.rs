//! Path algebra for route segments
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

/// Wildcard marker stripped from navigable paths
pub const WILDCARD: char = '*';

/// Validates a raw route segment
///
/// A segment may not start or end with `/`. The empty segment is valid (it is
/// what a root route usually carries).
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::path::is_valid_segment;
///
/// assert!(is_valid_segment(""));
/// assert!(is_valid_segment("admin"));
/// assert!(is_valid_segment("users/:id"));
///
/// assert!(!is_valid_segment("/admin"));
/// assert!(!is_valid_segment("admin/"));
/// assert!(!is_valid_segment("/"));
/// ```
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.starts_with('/') && !segment.ends_with('/')
}

/// Joins a parent path and a child segment with a single `/`
///
/// No normalization happens here, `join_path("/", "a")` is `"//a"`.
pub fn join_path(parent: &str, segment: &str) -> String {
    let mut joined = String::with_capacity(parent.len() + segment.len() + 1);
    joined.push_str(parent);
    joined.push('/');
    joined.push_str(segment);
    joined
}

/// Collapses every run of `/` into a single separator
///
/// Returns `Cow::Borrowed` when there is nothing to collapse.
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::path::collapse_slashes;
/// use std::borrow::Cow;
///
/// assert!(matches!(collapse_slashes("/users/:id"), Cow::Borrowed(_)));
/// assert_eq!(collapse_slashes("//users///:id"), "/users/:id");
/// ```
pub fn collapse_slashes(path: &str) -> Cow<'_, str> {
    if !path.contains("//") {
        return Cow::Borrowed(path);
    }

    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        collapsed.push(c);
    }
    Cow::Owned(collapsed)
}

/// Removes every wildcard marker
pub fn strip_wildcards(path: &str) -> Cow<'_, str> {
    if path.contains(WILDCARD) {
        Cow::Owned(path.replace(WILDCARD, ""))
    } else {
        Cow::Borrowed(path)
    }
}

/// Turns a joined path into a navigable one: wildcards stripped, slashes collapsed
///
/// Stripping happens first so that `a/*/b` cannot leave a doubled separator behind.
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::path::navigable;
///
/// assert_eq!(navigable("//users"), "/users");
/// assert_eq!(navigable("/files/*"), "/files/");
/// assert_eq!(navigable("/a/*/b"), "/a/b");
/// ```
pub fn navigable(path: &str) -> String {
    collapse_slashes(&strip_wildcards(path)).into_owned()
}
