// crates/parlance-core/src/configuration.rs
// ============================================================================
// Module: Invocation Configuration
// Description: The policy set a contract is bound against.
// Purpose: Bundle key, argument, and result policies with style presets.
// Dependencies: crate::{adapter, policy}
// ============================================================================

//! ## Overview
//! An [`InvocationConfiguration`] is immutable once handed to a dispatcher.
//! The `with_*` helpers return a modified copy, which keeps preset
//! configurations shareable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::adapter::ArgumentAdapter;
use crate::policy::ArgumentPolicy;
use crate::policy::KeyPolicy;
use crate::policy::NameResolver;
use crate::policy::ResultPolicy;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Placeholder addressing convention of the target template engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatStyle {
    /// Placeholders addressed by position (`{0}`, `{1}`).
    Positional,
    /// Placeholders addressed by name (`<player_name>`).
    Named,
}

/// Policy set applied to every method of a bound contract.
#[derive(Debug, Clone, Default)]
pub struct InvocationConfiguration {
    /// Key resolution policy.
    key_policy: KeyPolicy,
    /// Argument adaptation policy.
    argument_policy: ArgumentPolicy,
    /// Result transformation policy.
    result_policy: ResultPolicy,
}

impl InvocationConfiguration {
    /// Creates a configuration from explicit policies.
    #[must_use]
    pub const fn new(
        key_policy: KeyPolicy,
        argument_policy: ArgumentPolicy,
        result_policy: ResultPolicy,
    ) -> Self {
        Self {
            key_policy,
            argument_policy,
            result_policy,
        }
    }

    /// Returns the preset for `style`: declared keys, the standard adapter,
    /// declared names, and unchanged nodes.
    #[must_use]
    pub fn for_style(style: FormatStyle) -> Self {
        let adapter = ArgumentAdapter::standard();
        let argument_policy = match style {
            FormatStyle::Positional => ArgumentPolicy::positional(adapter),
            FormatStyle::Named => ArgumentPolicy::named(adapter, NameResolver::Declared),
        };
        Self::new(KeyPolicy::Declared, argument_policy, ResultPolicy::NoOperation)
    }

    /// Returns a copy using `key_policy`.
    #[must_use]
    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    /// Returns a copy using `argument_policy`.
    #[must_use]
    pub fn with_argument_policy(mut self, argument_policy: ArgumentPolicy) -> Self {
        self.argument_policy = argument_policy;
        self
    }

    /// Returns a copy using `result_policy`.
    #[must_use]
    pub fn with_result_policy(mut self, result_policy: ResultPolicy) -> Self {
        self.result_policy = result_policy;
        self
    }

    /// Returns the key resolution policy.
    #[must_use]
    pub const fn key_policy(&self) -> &KeyPolicy {
        &self.key_policy
    }

    /// Returns the argument adaptation policy.
    #[must_use]
    pub const fn argument_policy(&self) -> &ArgumentPolicy {
        &self.argument_policy
    }

    /// Returns the result transformation policy.
    #[must_use]
    pub const fn result_policy(&self) -> &ResultPolicy {
        &self.result_policy
    }
}
