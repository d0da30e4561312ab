//! Path compiler: pattern → matcher + builder
//!
//! A pattern is compiled once into a [`PathMatcher`] (tests concrete paths and
//! extracts parameters) and a [`PathBuilder`] (substitutes parameters back into
//! the pattern). Matching follows the usual client-router conventions:
//! case-insensitive, anchored at both ends, one trailing delimiter tolerated.

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;

use super::pattern::{parse_pattern, PatternSegmentType, SPLAT_PARAM};
use crate::error::{Result, RouteError};

/// Tests concrete paths against a compiled pattern
#[derive(Debug, Clone)]
pub struct PathMatcher {
    regex: Regex,
    keys: Vec<String>,
}

impl PathMatcher {
    /// Returns true if `path` matches the pattern
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and returns the decoded parameters
    ///
    /// Parameters whose (optional) segment did not participate in the match are
    /// absent from the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_route_tree::route::compile;
    ///
    /// let compiled = compile("/users/:id").unwrap();
    /// let params = compiled.matcher().match_path("/users/a%20b").unwrap();
    /// assert_eq!(params.get("id"), Some(&"a b".to_string()));
    /// ```
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let captures = self.regex.captures(path)?;
        let params = self
            .keys
            .iter()
            .enumerate()
            .filter_map(|(idx, key)| {
                captures.get(idx + 1).map(|m| {
                    let raw = m.as_str();
                    let value = urlencoding::decode(raw)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| raw.to_string());
                    (key.clone(), value)
                })
            })
            .collect();
        Some(params)
    }

    /// Parameter names in capture order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Substitutes parameters into a compiled pattern
#[derive(Debug, Clone)]
pub struct PathBuilder {
    pattern: String,
    segments: Vec<PatternSegmentType>,
}

impl PathBuilder {
    /// Builds a concrete path from string parameters
    ///
    /// Every value is percent-encoded. A missing required parameter fails with
    /// [`RouteError::MissingParam`]; an empty required value fails with
    /// [`RouteError::InvalidParam`]. Missing optional parameters and a missing
    /// splat are dropped together with their separator.
    pub fn build(&self, params: &HashMap<String, String>) -> Result<String> {
        let mut out = String::with_capacity(self.pattern.len());

        for (idx, segment) in self.segments.iter().enumerate() {
            let sep = if idx == 0 { "" } else { "/" };
            match segment {
                PatternSegmentType::Static(text) => {
                    out.push_str(sep);
                    out.push_str(text);
                }
                PatternSegmentType::Required(name) => {
                    let value = params.get(name).ok_or_else(|| RouteError::MissingParam {
                        name: name.clone(),
                        pattern: self.pattern.clone(),
                    })?;
                    out.push_str(sep);
                    out.push_str(&self.encode(name, value)?);
                }
                PatternSegmentType::Optional(name) => {
                    if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
                        out.push_str(sep);
                        out.push_str(&self.encode(name, value)?);
                    }
                }
                PatternSegmentType::Splat => {
                    if let Some(value) = params.get(SPLAT_PARAM).filter(|v| !v.is_empty()) {
                        let encoded: Vec<String> = value
                            .split('/')
                            .map(|part| urlencoding::encode(part).into_owned())
                            .collect();
                        out.push_str(sep);
                        out.push_str(&encoded.join("/"));
                    }
                }
            }
        }

        Ok(out)
    }

    /// Builds a concrete path from a JSON object of parameters
    ///
    /// Strings are used as-is and numbers are rendered in their JSON form.
    /// Any other value type fails with [`RouteError::InvalidParam`]. `null`
    /// stands for "no parameters".
    pub fn build_json(&self, params: &Value) -> Result<String> {
        let object = match params {
            Value::Null => return self.build(&HashMap::new()),
            Value::Object(object) => object,
            other => {
                return Err(RouteError::InvalidParam {
                    name: "params".to_string(),
                    pattern: self.pattern.clone(),
                    reason: format!("expected an object of parameters, got {}", json_kind(other)),
                })
            }
        };

        let params = object
            .iter()
            .map(|(name, value)| match value {
                Value::String(s) => Ok((name.clone(), s.clone())),
                Value::Number(n) => Ok((name.clone(), n.to_string())),
                other => Err(RouteError::InvalidParam {
                    name: name.clone(),
                    pattern: self.pattern.clone(),
                    reason: format!("expected a string or number, got {}", json_kind(other)),
                }),
            })
            .collect::<Result<HashMap<_, _>>>()?;

        self.build(&params)
    }

    /// The pattern this builder was compiled from
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn encode(&self, name: &str, value: &str) -> Result<String> {
        if value.is_empty() {
            return Err(RouteError::InvalidParam {
                name: name.to_string(),
                pattern: self.pattern.clone(),
                reason: "expected a non-empty value".to_string(),
            });
        }
        Ok(urlencoding::encode(value).into_owned())
    }
}

/// Matcher and builder compiled from the same pattern
#[derive(Debug, Clone)]
pub struct CompiledPath {
    pattern: String,
    matcher: PathMatcher,
    builder: PathBuilder,
}

impl CompiledPath {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    pub fn builder(&self) -> &PathBuilder {
        &self.builder
    }
}

/// Compiles a path pattern into a matcher and a builder (pure function)
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::route::compile;
/// use std::collections::HashMap;
///
/// let compiled = compile("/user/:id").unwrap();
/// assert!(compiled.matcher().is_match("/user/5"));
/// assert!(compiled.matcher().is_match("/USER/5/"));
///
/// let params = HashMap::from([("id".to_string(), "5".to_string())]);
/// assert_eq!(compiled.builder().build(&params).unwrap(), "/user/5");
/// assert!(compiled.builder().build(&HashMap::new()).is_err());
/// ```
pub fn compile(pattern: &str) -> Result<CompiledPath> {
    let segments = parse_pattern(pattern);
    let mut source = String::from("(?i)^");
    let mut keys = Vec::new();

    for (idx, segment) in segments.iter().enumerate() {
        let sep = if idx == 0 { "" } else { "/" };
        match segment {
            PatternSegmentType::Static(text) => {
                source.push_str(sep);
                source.push_str(&regex::escape(text));
            }
            PatternSegmentType::Required(name) => {
                source.push_str(sep);
                source.push_str("([^/#?]+?)");
                keys.push(name.clone());
            }
            PatternSegmentType::Optional(name) => {
                source.push_str(&format!("(?:{sep}([^/#?]+?))?"));
                keys.push(name.clone());
            }
            PatternSegmentType::Splat => {
                source.push_str(&format!("(?:{sep}(.*))?"));
                keys.push(SPLAT_PARAM.to_string());
            }
        }
    }
    source.push_str("[/#?]?$");

    let regex = Regex::new(&source)?;

    Ok(CompiledPath {
        pattern: pattern.to_string(),
        matcher: PathMatcher { regex, keys },
        builder: PathBuilder {
            pattern: pattern.to_string(),
            segments,
        },
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_matcher_static() {
        let compiled = compile("/about").unwrap();
        assert!(compiled.matcher().is_match("/about"));
        assert!(compiled.matcher().is_match("/about/"));
        assert!(compiled.matcher().is_match("/About"));
        assert!(!compiled.matcher().is_match("/about/more"));
        assert!(!compiled.matcher().is_match("/other"));
    }

    #[test]
    fn test_matcher_extracts_params() {
        let compiled = compile("/users/:id/posts/:post").unwrap();
        let found = compiled.matcher().match_path("/users/7/posts/hello").unwrap();
        assert_eq!(found, params(&[("id", "7"), ("post", "hello")]));
        assert_eq!(compiled.matcher().keys(), &["id".to_string(), "post".to_string()]);
    }

    #[test]
    fn test_matcher_required_param_needs_a_value() {
        let compiled = compile("/users/:id").unwrap();
        assert!(!compiled.matcher().is_match("/users"));
        assert!(!compiled.matcher().is_match("/users/"));
    }

    #[test]
    fn test_matcher_optional_param() {
        let compiled = compile("/posts/:page?").unwrap();
        assert_eq!(compiled.matcher().match_path("/posts").unwrap(), params(&[]));
        assert_eq!(
            compiled.matcher().match_path("/posts/2").unwrap(),
            params(&[("page", "2")])
        );
    }

    #[test]
    fn test_matcher_splat() {
        let compiled = compile("/files/*").unwrap();
        assert_eq!(
            compiled.matcher().match_path("/files/a/b.txt").unwrap(),
            params(&[("*", "a/b.txt")])
        );
        assert!(compiled.matcher().is_match("/files"));
    }

    #[test]
    fn test_matcher_relative_pattern() {
        let compiled = compile("users").unwrap();
        assert!(compiled.matcher().is_match("users"));
        assert!(!compiled.matcher().is_match(""));
        assert!(!compiled.matcher().is_match("/users"));
    }

    #[test]
    fn test_matcher_empty_pattern() {
        let compiled = compile("").unwrap();
        assert!(compiled.matcher().is_match(""));
        assert!(compiled.matcher().is_match("/"));
        assert!(!compiled.matcher().is_match("/a"));
    }

    #[test]
    fn test_matcher_escapes_static_text() {
        let compiled = compile("/v1.0/(x)").unwrap();
        assert!(compiled.matcher().is_match("/v1.0/(x)"));
        assert!(!compiled.matcher().is_match("/v1x0/(x)"));
    }

    #[test]
    fn test_builder_substitutes_and_encodes() {
        let compiled = compile("/user/:id").unwrap();
        assert_eq!(compiled.builder().build(&params(&[("id", "5")])).unwrap(), "/user/5");
        assert_eq!(
            compiled.builder().build(&params(&[("id", "a/b c")])).unwrap(),
            "/user/a%2Fb%20c"
        );
    }

    #[test]
    fn test_builder_missing_required() {
        let compiled = compile("/user/:id").unwrap();
        let err = compiled.builder().build(&params(&[])).unwrap_err();
        assert!(matches!(err, RouteError::MissingParam { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_builder_empty_required_value() {
        let compiled = compile("/user/:id").unwrap();
        let err = compiled.builder().build(&params(&[("id", "")])).unwrap_err();
        assert!(matches!(err, RouteError::InvalidParam { .. }));
    }

    #[test]
    fn test_builder_optional_and_splat() {
        let compiled = compile("/docs/:lang?/*").unwrap();
        assert_eq!(compiled.builder().build(&params(&[])).unwrap(), "/docs");
        assert_eq!(
            compiled
                .builder()
                .build(&params(&[("lang", "en"), ("*", "guide/intro page")]))
                .unwrap(),
            "/docs/en/guide/intro%20page"
        );
    }

    #[test]
    fn test_builder_json_params() {
        let compiled = compile("/user/:id/:tab").unwrap();
        assert_eq!(
            compiled
                .builder()
                .build_json(&json!({ "id": 5, "tab": "info" }))
                .unwrap(),
            "/user/5/info"
        );

        let err = compiled
            .builder()
            .build_json(&json!({ "id": [1, 2], "tab": "info" }))
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidParam { ref name, .. } if name == "id"));

        let err = compiled.builder().build_json(&json!("5")).unwrap_err();
        assert!(matches!(err, RouteError::InvalidParam { .. }));

        let err = compiled.builder().build_json(&Value::Null).unwrap_err();
        assert!(matches!(err, RouteError::MissingParam { .. }));
    }
}
