// crates/parlance-placeholders/src/policy.rs
// ============================================================================
// Module: Placeholders Argument Policy
// Description: Decorator appending scoped placeholders to adapted arguments.
// Purpose: Add placeholder injection to any argument policy without changing
//          what that policy accepts.
// Dependencies: parlance-core
// ============================================================================

//! ## Overview
//! [`PlaceholdersArgumentPolicy`] adapts through its base policy first. When
//! the method carries a [`PlaceholderScope`] marker and a source is available,
//! it appends exactly one resolver input after the base inputs. Validation is
//! the base policy's validation; the extra input never fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parlance_core::ArgumentAdaptation;
use parlance_core::ArgumentAdapter;
use parlance_core::ArgumentPolicy;
use parlance_core::FormattingInput;
use parlance_core::InvocationContext;
use parlance_core::InvocationError;
use parlance_core::MethodDescriptor;
use parlance_core::NameResolver;
use parlance_core::ValidationError;

use crate::probe::CapabilityProbe;
use crate::scope::PlaceholderScope;
use crate::source::PlaceholderSource;
use crate::source::installed_placeholder_source;

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Memoized check for a process-wide source.
static PROCESS_SOURCE: CapabilityProbe = CapabilityProbe::new(process_source_installed);

/// Returns true when a process-wide source is installed.
fn process_source_installed() -> bool {
    installed_placeholder_source().is_some()
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Where the decorator obtains placeholders.
#[derive(Clone)]
enum SourceBinding {
    /// The process-wide source, gated by [`PROCESS_SOURCE`].
    ProcessWide,
    /// A source supplied at construction.
    Explicit(Arc<dyn PlaceholderSource>),
}

/// Argument policy that injects scoped placeholders.
#[derive(Clone)]
pub struct PlaceholdersArgumentPolicy {
    /// Wrapped policy.
    base: ArgumentPolicy,
    /// Placeholder provider.
    source: SourceBinding,
}

impl PlaceholdersArgumentPolicy {
    /// Wraps `base`, reading placeholders from the process-wide source.
    ///
    /// Availability is probed once per process; a source installed after the
    /// first marked call is not picked up.
    #[must_use]
    pub const fn new(base: ArgumentPolicy) -> Self {
        Self {
            base,
            source: SourceBinding::ProcessWide,
        }
    }

    /// Wraps a named policy over `adapter` and `names`.
    #[must_use]
    pub const fn named(adapter: ArgumentAdapter, names: NameResolver) -> Self {
        Self::new(ArgumentPolicy::named(adapter, names))
    }

    /// Wraps `base`, reading placeholders from `source`.
    #[must_use]
    pub fn with_source(base: ArgumentPolicy, source: Arc<dyn PlaceholderSource>) -> Self {
        Self {
            base,
            source: SourceBinding::Explicit(source),
        }
    }

    /// Returns the wrapped policy.
    #[must_use]
    pub const fn base(&self) -> &ArgumentPolicy {
        &self.base
    }

    /// Returns the source to consult, if one is available.
    fn source(&self) -> Option<Arc<dyn PlaceholderSource>> {
        match &self.source {
            SourceBinding::ProcessWide => {
                if PROCESS_SOURCE.is_available() { installed_placeholder_source() } else { None }
            }
            SourceBinding::Explicit(source) => Some(Arc::clone(source)),
        }
    }
}

impl ArgumentAdaptation for PlaceholdersArgumentPolicy {
    fn adapt(
        &self,
        context: &InvocationContext<'_>,
    ) -> Result<Vec<FormattingInput>, InvocationError> {
        let mut inputs = self.base.adapt(context)?;
        if let Some(scope) = context.method().marker::<PlaceholderScope>()
            && let Some(source) = self.source()
        {
            inputs.push(FormattingInput::Resolver(source.placeholders(*scope)));
        }
        Ok(inputs)
    }

    fn validate(&self, method: &MethodDescriptor) -> Result<(), ValidationError> {
        self.base.validate(method)
    }
}

impl From<PlaceholdersArgumentPolicy> for ArgumentPolicy {
    fn from(policy: PlaceholdersArgumentPolicy) -> Self {
        Self::custom(policy)
    }
}

impl fmt::Debug for PlaceholdersArgumentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            SourceBinding::ProcessWide => "process_wide",
            SourceBinding::Explicit(_) => "explicit",
        };
        f.debug_struct("PlaceholdersArgumentPolicy")
            .field("base", &self.base)
            .field("source", &source)
            .finish()
    }
}
