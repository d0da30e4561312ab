//! Pattern parsing for route path segments
//!
//! Pure functional parsing of route patterns (`users/:id`, `files/*`) into typed
//! segments. All functions are **pure**: same input → same output, no side effects.

/// Represents different types of route pattern segments
///
/// Functional sum type for pattern matching route segments.
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::route::pattern::{classify_segment, PatternSegmentType};
///
/// assert!(matches!(classify_segment("about"), PatternSegmentType::Static(_)));
/// assert!(matches!(classify_segment(":id"), PatternSegmentType::Required(_)));
/// assert!(matches!(classify_segment(":id?"), PatternSegmentType::Optional(_)));
/// assert!(matches!(classify_segment("*"), PatternSegmentType::Splat));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PatternSegmentType {
    /// Splat segment: `*`, captures the rest of the path under the key `*`
    Splat,
    /// Optional parameter: `:id?`
    Optional(String),
    /// Required parameter: `:id`
    Required(String),
    /// Static text segment (may be empty for leading or doubled separators)
    Static(String),
}

/// Parameter key under which a splat capture is stored
pub const SPLAT_PARAM: &str = "*";

impl PatternSegmentType {
    /// Name of the captured parameter, if the segment captures one
    pub fn param_name(&self) -> Option<&str> {
        match self {
            PatternSegmentType::Splat => Some(SPLAT_PARAM),
            PatternSegmentType::Optional(name) | PatternSegmentType::Required(name) => Some(name),
            PatternSegmentType::Static(_) => None,
        }
    }
}

/// Classifies a segment into a pattern type (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Splat**: exactly `*`
/// 2. **Optional param**: `:name?`
/// 3. **Required param**: `:name`
/// 4. **Static**: any other text, including a bare `:` or `:` followed by
///    characters that are not valid in a parameter name
pub fn classify_segment(segment: &str) -> PatternSegmentType {
    if segment == "*" {
        return PatternSegmentType::Splat;
    }

    match segment.strip_prefix(':') {
        Some(inner) => match inner.strip_suffix('?') {
            Some(name) if is_param_name(name) => PatternSegmentType::Optional(name.to_string()),
            _ if is_param_name(inner) => PatternSegmentType::Required(inner.to_string()),
            _ => PatternSegmentType::Static(segment.to_string()),
        },
        None => PatternSegmentType::Static(segment.to_string()),
    }
}

/// Splits a pattern on `/` and classifies every piece.
///
/// The split keeps empty pieces, so `"/users"` yields a leading empty static
/// segment. The compiler relies on that to know whether the pattern was
/// anchored with a leading separator.
pub fn parse_pattern(pattern: &str) -> Vec<PatternSegmentType> {
    pattern.split('/').map(classify_segment).collect()
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_static() {
        let seg = classify_segment("about");
        assert_eq!(seg, PatternSegmentType::Static("about".to_string()));
    }

    #[test]
    fn test_classify_required() {
        let seg = classify_segment(":id");
        assert_eq!(seg, PatternSegmentType::Required("id".to_string()));
    }

    #[test]
    fn test_classify_optional() {
        let seg = classify_segment(":id?");
        assert_eq!(seg, PatternSegmentType::Optional("id".to_string()));
    }

    #[test]
    fn test_classify_splat() {
        assert_eq!(classify_segment("*"), PatternSegmentType::Splat);
        assert_eq!(PatternSegmentType::Splat.param_name(), Some("*"));
    }

    #[test]
    fn test_classify_malformed_params_are_static() {
        assert_eq!(classify_segment(":"), PatternSegmentType::Static(":".to_string()));
        assert_eq!(classify_segment(":?"), PatternSegmentType::Static(":?".to_string()));
        assert_eq!(
            classify_segment(":user-id"),
            PatternSegmentType::Static(":user-id".to_string())
        );
        assert_eq!(
            classify_segment("files*"),
            PatternSegmentType::Static("files*".to_string())
        );
    }

    #[test]
    fn test_parse_pattern_keeps_leading_separator() {
        let segments = parse_pattern("/users/:id");
        assert_eq!(
            segments,
            vec![
                PatternSegmentType::Static(String::new()),
                PatternSegmentType::Static("users".to_string()),
                PatternSegmentType::Required("id".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_pattern_relative() {
        let segments = parse_pattern(":id");
        assert_eq!(segments, vec![PatternSegmentType::Required("id".to_string())]);
    }
}
