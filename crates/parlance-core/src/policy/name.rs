// crates/parlance-core/src/policy/name.rs
// ============================================================================
// Module: Name Resolvers
// Description: Template-facing names for named-style arguments.
// Purpose: Resolve names from explicit metadata or derived identifiers.
// Dependencies: crate::descriptor
// ============================================================================

//! ## Overview
//! Named-style adaptation needs one template name per ordinary argument. The
//! declared resolver only accepts explicit names; the fallback resolver also
//! derives a snake_case name from the parameter identifier when the
//! identifier survived compilation into the descriptor.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::descriptor::ParameterDescriptor;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Custom name resolution strategy.
pub trait NameResolution: Send + Sync {
    /// Returns the template-facing name, or `None` when none can be resolved.
    fn resolve(&self, parameter: &ParameterDescriptor) -> Option<String>;

    /// Returns true when [`NameResolution::resolve`] yields a name.
    fn supports(&self, parameter: &ParameterDescriptor) -> bool {
        self.resolve(parameter).is_some()
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Name resolver used by the named argument policy.
#[derive(Clone, Default)]
pub enum NameResolver {
    /// Requires an explicit name on the parameter.
    #[default]
    Declared,
    /// Prefers an explicit name, else snake_cases the parameter identifier.
    DeclaredOrIdentifier,
    /// Delegates to a custom strategy.
    Custom(Arc<dyn NameResolution>),
}

impl NameResolver {
    /// Wraps a custom strategy.
    #[must_use]
    pub fn custom(resolution: impl NameResolution + 'static) -> Self {
        Self::Custom(Arc::new(resolution))
    }

    /// Returns the template-facing name for `parameter`.
    #[must_use]
    pub fn resolve(&self, parameter: &ParameterDescriptor) -> Option<String> {
        match self {
            Self::Declared => explicit_name(parameter).map(str::to_string),
            Self::DeclaredOrIdentifier => {
                if parameter.name().is_some() {
                    return explicit_name(parameter).map(str::to_string);
                }
                parameter.identifier().filter(|id| !id.is_empty()).map(to_snake_case)
            }
            Self::Custom(resolution) => resolution.resolve(parameter),
        }
    }

    /// Returns true when a name can be resolved for `parameter`.
    #[must_use]
    pub fn supports(&self, parameter: &ParameterDescriptor) -> bool {
        match self {
            Self::Custom(resolution) => resolution.supports(parameter),
            Self::Declared | Self::DeclaredOrIdentifier => self.resolve(parameter).is_some(),
        }
    }
}

impl fmt::Debug for NameResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared => f.write_str("NameResolver::Declared"),
            Self::DeclaredOrIdentifier => f.write_str("NameResolver::DeclaredOrIdentifier"),
            Self::Custom(_) => f.write_str("NameResolver::Custom(..)"),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the explicit name when present and non-empty.
fn explicit_name(parameter: &ParameterDescriptor) -> Option<&str> {
    parameter.name().filter(|name| !name.is_empty())
}

/// Converts a camelCase identifier to snake_case.
///
/// An underscore is inserted between an ASCII lowercase letter and the ASCII
/// uppercase letter that follows it; the result is then lowercased.
#[must_use]
pub fn to_snake_case(identifier: &str) -> String {
    let mut output = String::with_capacity(identifier.len() + 4);
    let mut previous_lower = false;
    for ch in identifier.chars() {
        if previous_lower && ch.is_ascii_uppercase() {
            output.push('_');
        }
        previous_lower = ch.is_ascii_lowercase();
        output.extend(ch.to_lowercase());
    }
    output
}
