// crates/parlance-placeholders/src/scope.rs
// ============================================================================
// Module: Placeholder Scope
// Description: Method marker selecting which placeholders are injected.
// Purpose: Let a method opt into placeholder injection declaratively.
// Dependencies: parlance-core
// ============================================================================

//! ## Overview
//! Attach a scope to a method with
//! [`parlance_core::MethodDescriptor::with_marker`]; unmarked methods are
//! adapted exactly as the wrapped policy adapts them.

use parlance_core::TagResolver;

use crate::source::installed_placeholder_source;

/// Placeholder family injected into a marked method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderScope {
    /// Placeholders that need no audience.
    Global,
    /// Placeholders resolved against one audience.
    Audience,
    /// Audience placeholders plus global ones.
    AudienceGlobal,
    /// Placeholders resolved between two audiences.
    Relational,
    /// Relational placeholders plus global ones.
    RelationalGlobal,
}

impl PlaceholderScope {
    /// All scopes.
    pub const ALL: [Self; 5] = [
        Self::Global,
        Self::Audience,
        Self::AudienceGlobal,
        Self::Relational,
        Self::RelationalGlobal,
    ];

    /// Returns the snake_case scope label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Audience => "audience",
            Self::AudienceGlobal => "audience_global",
            Self::Relational => "relational",
            Self::RelationalGlobal => "relational_global",
        }
    }

    /// Returns this scope's placeholders from the process-wide source, if one
    /// is installed.
    #[must_use]
    pub fn placeholders(self) -> Option<TagResolver> {
        installed_placeholder_source().map(|source| source.placeholders(self))
    }
}
