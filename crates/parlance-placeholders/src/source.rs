// crates/parlance-placeholders/src/source.rs
// ============================================================================
// Module: Placeholder Source
// Description: Provider of scoped placeholder resolvers.
// Purpose: Decouple placeholder injection from any particular placeholder
//          engine, with an optional process-wide installation.
// Dependencies: parlance-core, thiserror
// ============================================================================

//! ## Overview
//! A [`PlaceholderSource`] maps a [`PlaceholderScope`] to the tag resolver
//! the template engine should see. One source may be installed per process;
//! the first installation wins and later attempts are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::OnceLock;

use parlance_core::TagResolver;
use thiserror::Error;

use crate::scope::PlaceholderScope;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Supplies placeholders for a scope.
pub trait PlaceholderSource: Send + Sync {
    /// Returns the resolver for `scope`.
    fn placeholders(&self, scope: PlaceholderScope) -> TagResolver;
}

impl<F> PlaceholderSource for F
where
    F: Fn(PlaceholderScope) -> TagResolver + Send + Sync,
{
    fn placeholders(&self, scope: PlaceholderScope) -> TagResolver {
        self(scope)
    }
}

// ============================================================================
// SECTION: Process-Wide Source
// ============================================================================

/// Process-wide source; set at most once.
static INSTALLED_SOURCE: OnceLock<Arc<dyn PlaceholderSource>> = OnceLock::new();

/// Installs the process-wide source.
///
/// # Errors
///
/// Returns [`PlaceholderError::AlreadyInstalled`] when a source was installed
/// earlier; the earlier source stays in place.
pub fn install_placeholder_source(
    source: Arc<dyn PlaceholderSource>,
) -> Result<(), PlaceholderError> {
    INSTALLED_SOURCE.set(source).map_err(|_| PlaceholderError::AlreadyInstalled)
}

/// Returns the process-wide source, if installed.
#[must_use]
pub fn installed_placeholder_source() -> Option<Arc<dyn PlaceholderSource>> {
    INSTALLED_SOURCE.get().cloned()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Placeholder installation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    /// A process-wide source is already installed.
    #[error("a placeholder source is already installed")]
    AlreadyInstalled,
}
