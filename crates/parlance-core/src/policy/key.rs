// crates/parlance-core/src/policy/key.rs
// ============================================================================
// Module: Key Resolution Policy
// Description: Derives the translation key for a call.
// Purpose: Read declared keys, or delegate to a custom strategy.
// Dependencies: crate::{context, descriptor, error}
// ============================================================================

//! ## Overview
//! The declared policy reads the key attached to the method descriptor.
//! Validation rejects methods without one, so resolving an unvalidated method
//! is a programming error reported as [`InvocationError::MissingKey`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::context::InvocationContext;
use crate::descriptor::MethodDescriptor;
use crate::error::InvocationError;
use crate::error::ValidationError;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Custom key resolution strategy.
///
/// Implementations must validate against the same metadata they read when
/// resolving.
pub trait KeyResolution: Send + Sync {
    /// Returns the translation key for a call.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError`] when no key can be derived.
    fn resolve_key(&self, context: &InvocationContext<'_>) -> Result<String, InvocationError>;

    /// Checks that keys can be derived for `method`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `method` is incompatible.
    fn validate(&self, method: &MethodDescriptor) -> Result<(), ValidationError>;
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Key resolution policy.
#[derive(Clone, Default)]
pub enum KeyPolicy {
    /// Uses the key declared on the method descriptor.
    #[default]
    Declared,
    /// Delegates to a custom strategy.
    Custom(Arc<dyn KeyResolution>),
}

impl KeyPolicy {
    /// Wraps a custom strategy.
    #[must_use]
    pub fn custom(resolution: impl KeyResolution + 'static) -> Self {
        Self::Custom(Arc::new(resolution))
    }

    /// Returns the translation key for a call.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::MissingKey`] when the declared key is absent,
    /// or the custom strategy's failure.
    pub fn resolve_key(&self, context: &InvocationContext<'_>) -> Result<String, InvocationError> {
        match self {
            Self::Declared => context.method().key().map(str::to_string).ok_or_else(|| {
                InvocationError::MissingKey {
                    method: context.method_name().to_string(),
                }
            }),
            Self::Custom(resolution) => resolution.resolve_key(context),
        }
    }

    /// Checks that keys can be derived for `method`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingKey`] when no key is declared, or the
    /// custom strategy's failure.
    pub fn validate(&self, method: &MethodDescriptor) -> Result<(), ValidationError> {
        match self {
            Self::Declared => match method.key() {
                Some(key) if !key.trim().is_empty() => Ok(()),
                _ => Err(ValidationError::MissingKey {
                    method: method.name().to_string(),
                }),
            },
            Self::Custom(resolution) => resolution.validate(method),
        }
    }
}

impl fmt::Debug for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared => f.write_str("KeyPolicy::Declared"),
            Self::Custom(_) => f.write_str("KeyPolicy::Custom(..)"),
        }
    }
}
