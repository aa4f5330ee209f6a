// crates/parlance-placeholders/src/lib.rs
// ============================================================================
// Module: Parlance Placeholders Library
// Description: Placeholder-injecting argument policy for bound contracts.
// Purpose: Append a scoped placeholder resolver to marked message methods.
// Dependencies: parlance-core, thiserror
// ============================================================================

//! ## Overview
//! `parlance-placeholders` decorates any [`parlance_core::ArgumentPolicy`].
//! Methods marked with a [`PlaceholderScope`] receive one extra
//! [`parlance_core::FormattingInput::Resolver`] holding the placeholders of
//! that scope, supplied by a [`PlaceholderSource`]. Validation is forwarded to
//! the wrapped policy unchanged.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod policy;
pub mod probe;
pub mod scope;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use policy::PlaceholdersArgumentPolicy;
pub use probe::CapabilityProbe;
pub use probe::CapabilityState;
pub use scope::PlaceholderScope;
pub use source::PlaceholderError;
pub use source::PlaceholderSource;
pub use source::install_placeholder_source;
pub use source::installed_placeholder_source;
