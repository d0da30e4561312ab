/// Route module: path pattern parsing and compilation
///
/// Contains pure functional components that turn a path pattern into typed
/// segments, and typed segments into a matcher and a builder.
pub mod compiler;
pub mod pattern;

// Re-export commonly used types
pub use compiler::{compile, CompiledPath, PathBuilder, PathMatcher};
pub use pattern::{classify_segment, parse_pattern, PatternSegmentType, SPLAT_PARAM};
