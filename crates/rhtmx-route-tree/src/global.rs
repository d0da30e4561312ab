// File: src/global.rs
// Purpose: Process-wide registry, frozen once the tree is built

use once_cell::sync::OnceCell;

use crate::error::{Result, RouteError};
use crate::registry::Registry;

/// Registry installed for the whole process.
///
/// Building happens on an owned `Registry` (`&mut` access only). Installing it
/// moves it here, after which it is read-only and shared across threads.
static INSTALLED: OnceCell<Registry> = OnceCell::new();

/// Freeze `registry` as the process-wide route registry.
///
/// Only the first call succeeds; later calls fail with
/// [`RouteError::AlreadyInstalled`] and drop their registry.
pub fn install(registry: Registry) -> Result<&'static Registry> {
    INSTALLED
        .set(registry)
        .map_err(|_| RouteError::AlreadyInstalled)?;
    let registry = INSTALLED.get().ok_or(RouteError::AlreadyInstalled)?;
    tracing::debug!(routes = registry.len(), "Route registry installed");
    Ok(registry)
}

/// The process-wide registry, if one was installed
pub fn installed() -> Option<&'static Registry> {
    INSTALLED.get()
}
