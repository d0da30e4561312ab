// File: src/error.rs
// Purpose: Hard failures raised by the route tree

use crate::node::RouteId;

/// Convenience alias used throughout the crate
pub type Result<T, E = RouteError> = std::result::Result<T, E>;

/// Errors that abort an operation.
///
/// Author-time mistakes such as an invalid route name or a duplicated name are
/// not errors: they are logged and the tree keeps building.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("missing parameter \"{name}\" for path \"{pattern}\"")]
    MissingParam { name: String, pattern: String },

    #[error("invalid parameter \"{name}\" for path \"{pattern}\": {reason}")]
    InvalidParam {
        name: String,
        pattern: String,
        reason: String,
    },

    #[error("invalid state, initial state cannot be a bare `{type_name}`")]
    DisallowedState { type_name: &'static str },

    #[error("route {0:?} is not part of this registry")]
    UnknownRoute(RouteId),

    #[error("cannot adopt route {child:?} under {parent:?}: it is an ancestor of the new parent")]
    AdoptionCycle { child: RouteId, parent: RouteId },

    #[error("failed to compile path pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("a route registry has already been installed for this process")]
    AlreadyInstalled,
}
