// crates/parlance-core/src/policy/argument.rs
// ============================================================================
// Module: Argument Adaptation Policies
// Description: Positional and named conversion of call arguments.
// Purpose: Turn caller values into formatting inputs, and prove at binding
//          time that every parameter can be converted.
// Dependencies: crate::{adapter, argument, context, descriptor, error, text}
// ============================================================================

//! ## Overview
//! The positional policy adapts every argument through the registry and keeps
//! declaration order. The named policy tries the registry first and then
//! three pass-through kinds, in this order: raw [`Tag`]s (named by the name
//! resolver), [`TagResolver`] bundles (unnamed), and at most one format
//! target.
//!
//! Both policies route a parameter with a single function that validation and
//! adaptation share, so a validated method never reaches an unsupported-type
//! failure at call time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::adapter::ArgumentAdapter;
use crate::argument::FormattingInput;
use crate::argument::TranslationArgument;
use crate::context::InvocationArgument;
use crate::context::InvocationContext;
use crate::descriptor::MethodDescriptor;
use crate::descriptor::ParameterDescriptor;
use crate::error::InvocationError;
use crate::error::ValidationError;
use crate::policy::name::NameResolver;
use crate::text::Tag;
use crate::text::TagResolver;
use crate::text::TextNode;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Argument adaptation contract shared by built-in, custom, and decorating
/// policies.
pub trait ArgumentAdaptation: Send + Sync {
    /// Converts the call's arguments into formatting inputs.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError`] when an argument cannot be adapted.
    fn adapt(
        &self,
        context: &InvocationContext<'_>,
    ) -> Result<Vec<FormattingInput>, InvocationError>;

    /// Checks that every parameter of `method` can be adapted.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first incompatible parameter.
    fn validate(&self, method: &MethodDescriptor) -> Result<(), ValidationError>;
}

// ============================================================================
// SECTION: Positional Policy
// ============================================================================

/// Adapts every argument through the registry, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PositionalArgumentPolicy {
    /// Registry backing the conversion.
    adapter: ArgumentAdapter,
}

impl PositionalArgumentPolicy {
    /// Creates a positional policy over `adapter`.
    #[must_use]
    pub const fn new(adapter: ArgumentAdapter) -> Self {
        Self {
            adapter,
        }
    }

    /// Returns the backing registry.
    #[must_use]
    pub const fn adapter(&self) -> &ArgumentAdapter {
        &self.adapter
    }
}

impl ArgumentAdaptation for PositionalArgumentPolicy {
    fn adapt(
        &self,
        context: &InvocationContext<'_>,
    ) -> Result<Vec<FormattingInput>, InvocationError> {
        let method = context.method_name();
        let mut inputs = Vec::with_capacity(context.arguments().len());
        for argument in context.arguments() {
            let parameter = argument.parameter();
            let value = match non_null(method, argument)? {
                Some(value) => self
                    .adapter
                    .adapt(parameter.ty(), value)
                    .map_err(|err| InvocationError::from_adapter(method, argument.index(), err))?,
                None => TranslationArgument::Component(TextNode::empty()),
            };
            inputs.push(FormattingInput::Positional(value));
        }
        Ok(inputs)
    }

    fn validate(&self, method: &MethodDescriptor) -> Result<(), ValidationError> {
        for (position, parameter) in method.parameters().iter().enumerate() {
            if !self.adapter.supports(parameter.ty()) {
                return Err(ValidationError::UnsupportedParameter {
                    method: method.name().to_string(),
                    position,
                    type_name: parameter.ty().name(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Named Policy
// ============================================================================

/// How the named policy treats one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Registry conversion, named by the resolver.
    Registry,
    /// Raw tag, named by the resolver.
    Tag,
    /// Tag bundle, unnamed.
    Resolver,
    /// Format target, unnamed and unique.
    Target,
}

/// Adapts arguments into named inputs plus pass-through kinds.
#[derive(Debug, Clone, Default)]
pub struct NamedArgumentPolicy {
    /// Registry backing ordinary conversions.
    adapter: ArgumentAdapter,
    /// Resolver for template-facing names.
    names: NameResolver,
}

impl NamedArgumentPolicy {
    /// Creates a named policy.
    #[must_use]
    pub const fn new(adapter: ArgumentAdapter, names: NameResolver) -> Self {
        Self {
            adapter,
            names,
        }
    }

    /// Returns the backing registry.
    #[must_use]
    pub const fn adapter(&self) -> &ArgumentAdapter {
        &self.adapter
    }

    /// Returns the name resolver.
    #[must_use]
    pub const fn names(&self) -> &NameResolver {
        &self.names
    }

    /// Decides how a parameter is adapted; `None` means unsupported.
    fn route(&self, parameter: &ParameterDescriptor) -> Option<Route> {
        let ty = parameter.ty();
        if self.adapter.supports(ty) {
            Some(Route::Registry)
        } else if ty.is::<Tag>() {
            Some(Route::Tag)
        } else if ty.is::<TagResolver>() {
            Some(Route::Resolver)
        } else if parameter.is_target() {
            Some(Route::Target)
        } else {
            None
        }
    }

    /// Resolves and records a unique name for an invocation argument.
    fn claim_name(
        &self,
        method: &str,
        argument: &InvocationArgument<'_>,
        claimed: &mut HashSet<String>,
    ) -> Result<String, InvocationError> {
        let name = self.names.resolve(argument.parameter()).ok_or_else(|| {
            InvocationError::UnresolvableName {
                method: method.to_string(),
                position: argument.index(),
            }
        })?;
        if !claimed.insert(name.clone()) {
            return Err(InvocationError::DuplicateName {
                method: method.to_string(),
                name,
            });
        }
        Ok(name)
    }
}

impl ArgumentAdaptation for NamedArgumentPolicy {
    fn adapt(
        &self,
        context: &InvocationContext<'_>,
    ) -> Result<Vec<FormattingInput>, InvocationError> {
        let method = context.method_name();
        let mut inputs = Vec::with_capacity(context.arguments().len());
        let mut claimed = HashSet::new();
        let mut target_seen = false;
        for argument in context.arguments() {
            let parameter = argument.parameter();
            let position = argument.index();
            let value = non_null(method, argument)?;
            let route = self.route(parameter).ok_or_else(|| {
                InvocationError::UnsupportedParameter {
                    method: method.to_string(),
                    position,
                    type_name: parameter.ty().name(),
                }
            })?;
            match route {
                Route::Registry => {
                    let name = self.claim_name(method, argument, &mut claimed)?;
                    let adapted = match value {
                        Some(value) => self
                            .adapter
                            .adapt(parameter.ty(), value)
                            .map_err(|err| InvocationError::from_adapter(method, position, err))?,
                        None => TranslationArgument::Component(TextNode::empty()),
                    };
                    inputs.push(FormattingInput::named(name, adapted));
                }
                Route::Tag => {
                    let name = self.claim_name(method, argument, &mut claimed)?;
                    if let Some(value) = value {
                        let tag = downcast::<Tag>(method, argument, value)?.clone();
                        inputs.push(FormattingInput::Tag {
                            name,
                            tag,
                        });
                    }
                }
                Route::Resolver => {
                    if let Some(value) = value {
                        let resolver = downcast::<TagResolver>(method, argument, value)?.clone();
                        inputs.push(FormattingInput::Resolver(resolver));
                    }
                }
                Route::Target => {
                    if let Some(value) = value {
                        if target_seen {
                            return Err(InvocationError::MultipleTargets {
                                method: method.to_string(),
                            });
                        }
                        target_seen = true;
                        let target = parameter.to_target(value).ok_or_else(|| {
                            InvocationError::TypeMismatch {
                                method: method.to_string(),
                                position,
                                expected: parameter.ty().name(),
                            }
                        })?;
                        inputs.push(FormattingInput::Target(target));
                    }
                }
            }
        }
        Ok(inputs)
    }

    fn validate(&self, method: &MethodDescriptor) -> Result<(), ValidationError> {
        let mut claimed = HashSet::new();
        let mut target_seen = false;
        for (position, parameter) in method.parameters().iter().enumerate() {
            match self.route(parameter) {
                Some(Route::Registry | Route::Tag) => {
                    let name = self.names.resolve(parameter).ok_or_else(|| {
                        ValidationError::UnresolvableName {
                            method: method.name().to_string(),
                            position,
                            parameter: parameter.label().to_string(),
                        }
                    })?;
                    if !claimed.insert(name.clone()) {
                        return Err(ValidationError::DuplicateName {
                            method: method.name().to_string(),
                            name,
                        });
                    }
                }
                Some(Route::Resolver) => {}
                Some(Route::Target) => {
                    if target_seen {
                        return Err(ValidationError::MultipleTargets {
                            method: method.name().to_string(),
                        });
                    }
                    target_seen = true;
                }
                None => {
                    return Err(ValidationError::UnsupportedParameter {
                        method: method.name().to_string(),
                        position,
                        type_name: parameter.ty().name(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Argument adaptation policy.
#[derive(Clone)]
pub enum ArgumentPolicy {
    /// Positional-style adaptation.
    Positional(PositionalArgumentPolicy),
    /// Named-style adaptation.
    Named(NamedArgumentPolicy),
    /// Custom or decorating strategy.
    Custom(Arc<dyn ArgumentAdaptation>),
}

impl ArgumentPolicy {
    /// Creates a positional policy over `adapter`.
    #[must_use]
    pub const fn positional(adapter: ArgumentAdapter) -> Self {
        Self::Positional(PositionalArgumentPolicy::new(adapter))
    }

    /// Creates a named policy over `adapter` and `names`.
    #[must_use]
    pub const fn named(adapter: ArgumentAdapter, names: NameResolver) -> Self {
        Self::Named(NamedArgumentPolicy::new(adapter, names))
    }

    /// Wraps a custom strategy.
    #[must_use]
    pub fn custom(adaptation: impl ArgumentAdaptation + 'static) -> Self {
        Self::Custom(Arc::new(adaptation))
    }
}

impl Default for ArgumentPolicy {
    fn default() -> Self {
        Self::Named(NamedArgumentPolicy::default())
    }
}

impl ArgumentAdaptation for ArgumentPolicy {
    fn adapt(
        &self,
        context: &InvocationContext<'_>,
    ) -> Result<Vec<FormattingInput>, InvocationError> {
        match self {
            Self::Positional(policy) => policy.adapt(context),
            Self::Named(policy) => policy.adapt(context),
            Self::Custom(policy) => policy.adapt(context),
        }
    }

    fn validate(&self, method: &MethodDescriptor) -> Result<(), ValidationError> {
        match self {
            Self::Positional(policy) => policy.validate(method),
            Self::Named(policy) => policy.validate(method),
            Self::Custom(policy) => policy.validate(method),
        }
    }
}

impl fmt::Debug for ArgumentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional(policy) => {
                f.debug_tuple("ArgumentPolicy::Positional").field(policy).finish()
            }
            Self::Named(policy) => f.debug_tuple("ArgumentPolicy::Named").field(policy).finish(),
            Self::Custom(_) => f.write_str("ArgumentPolicy::Custom(..)"),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the argument value, rejecting null for non-nullable parameters.
fn non_null<'a>(
    method: &str,
    argument: &InvocationArgument<'a>,
) -> Result<Option<&'a dyn Any>, InvocationError> {
    match argument.value().get() {
        Some(value) => Ok(Some(value)),
        None if argument.parameter().is_nullable() => Ok(None),
        None => Err(InvocationError::NullArgument {
            method: method.to_string(),
            parameter: argument.parameter().label().to_string(),
        }),
    }
}

/// Downcasts a pass-through value to its declared kind.
fn downcast<'a, T: Any>(
    method: &str,
    argument: &InvocationArgument<'_>,
    value: &'a dyn Any,
) -> Result<&'a T, InvocationError> {
    value.downcast_ref::<T>().ok_or_else(|| InvocationError::TypeMismatch {
        method: method.to_string(),
        position: argument.index(),
        expected: argument.parameter().ty().name(),
    })
}
