// crates/parlance-core/src/error.rs
// ============================================================================
// Module: Pipeline Errors
// Description: Validation, invocation, registry, and dispatch failures.
// Purpose: Give every failure a stable code and a message naming the method.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Failures come in two classes. [`ValidationError`]s surface once, when a
//! contract is bound, and are fatal to the binding. [`InvocationError`]s
//! surface during one call and are fatal to that call only; the dispatcher
//! wraps them in a [`DispatchError`] recording how far the call got.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Contract binding failures.
///
/// # Invariants
/// - Every variant names the offending method (or contract for duplicates).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Method declares no translation key.
    #[error("missing key declaration on method '{method}'")]
    MissingKey {
        /// Method name.
        method: String,
    },
    /// Parameter type is neither adaptable nor a special argument kind.
    #[error(
        "unsupported parameter type '{type_name}' at position {position} in method '{method}'; \
         register an adapter for this type"
    )]
    UnsupportedParameter {
        /// Method name.
        method: String,
        /// Zero-based parameter position.
        position: usize,
        /// Declared parameter type.
        type_name: &'static str,
    },
    /// Parameter needs a template-facing name but none can be resolved.
    #[error(
        "cannot resolve a name for parameter '{parameter}' at position {position} in method \
         '{method}'"
    )]
    UnresolvableName {
        /// Method name.
        method: String,
        /// Zero-based parameter position.
        position: usize,
        /// Parameter label.
        parameter: String,
    },
    /// Two parameters resolve to the same template-facing name.
    #[error("duplicate argument name '{name}' in method '{method}'")]
    DuplicateName {
        /// Method name.
        method: String,
        /// Repeated name.
        name: String,
    },
    /// More than one parameter may designate the format target.
    #[error("multiple target arguments declared on method '{method}'")]
    MultipleTargets {
        /// Method name.
        method: String,
    },
    /// Return type has no transformer and cannot hold a node.
    #[error(
        "unsupported return type '{type_name}' from method '{method}'; register a transformer \
         for this type"
    )]
    UnsupportedReturnType {
        /// Method name.
        method: String,
        /// Declared return type.
        type_name: &'static str,
    },
    /// Return type cannot hold a translatable node unchanged.
    #[error(
        "return type '{type_name}' of method '{method}' is not a supertype of \
         TranslatableNode"
    )]
    NotNodeSupertype {
        /// Method name.
        method: String,
        /// Declared return type.
        type_name: &'static str,
    },
    /// Two methods in one contract share a name.
    #[error("duplicate method '{method}' in contract '{contract}'")]
    DuplicateMethod {
        /// Contract name.
        contract: String,
        /// Repeated method name.
        method: String,
    },
    /// Failure reported by a custom policy.
    #[error("method '{method}' rejected: {message}")]
    Custom {
        /// Method name.
        method: String,
        /// Policy-supplied reason.
        message: String,
    },
}

impl ValidationError {
    /// Returns a stable error code for audit records.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingKey {
                ..
            } => "missing_key",
            Self::UnsupportedParameter {
                ..
            } => "unsupported_parameter",
            Self::UnresolvableName {
                ..
            } => "unresolvable_name",
            Self::DuplicateName {
                ..
            } => "duplicate_name",
            Self::MultipleTargets {
                ..
            } => "multiple_targets",
            Self::UnsupportedReturnType {
                ..
            } => "unsupported_return_type",
            Self::NotNodeSupertype {
                ..
            } => "not_node_supertype",
            Self::DuplicateMethod {
                ..
            } => "duplicate_method",
            Self::Custom {
                ..
            } => "custom",
        }
    }
}

// ============================================================================
// SECTION: Registry Errors
// ============================================================================

/// Adapter and transformer registry failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No adapter is registered for the type.
    #[error("no adapter registered for type: {type_name}")]
    MissingAdapter {
        /// Requested type.
        type_name: &'static str,
    },
    /// No transformer is registered for the type.
    #[error("no transformer registered for type: {type_name}")]
    MissingTransformer {
        /// Requested type.
        type_name: &'static str,
    },
    /// The value handed in is not of the requested type.
    #[error("value is not a '{type_name}'")]
    ValueMismatch {
        /// Requested type.
        type_name: &'static str,
    },
}

// ============================================================================
// SECTION: Invocation Errors
// ============================================================================

/// Single-call failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// The contract has no method with this name.
    #[error("contract '{contract}' has no method '{method}'")]
    UnknownMethod {
        /// Contract name.
        contract: String,
        /// Requested method name.
        method: String,
    },
    /// Value count differs from the declared parameter count.
    #[error("method '{method}' expects {expected} arguments, got {actual}")]
    ArityMismatch {
        /// Method name.
        method: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied value count.
        actual: usize,
    },
    /// Key resolution reached a method without a declared key.
    #[error("method '{method}' has no key declaration")]
    MissingKey {
        /// Method name.
        method: String,
    },
    /// A null value reached a parameter that does not accept null.
    #[error("argument '{parameter}' of method '{method}' must not be null")]
    NullArgument {
        /// Method name.
        method: String,
        /// Parameter label.
        parameter: String,
    },
    /// A value reached adaptation with no adapter or special case for its type.
    #[error("unsupported parameter type '{type_name}' at position {position} in method '{method}'")]
    UnsupportedParameter {
        /// Method name.
        method: String,
        /// Zero-based parameter position.
        position: usize,
        /// Declared parameter type.
        type_name: &'static str,
    },
    /// A value is not of its parameter's declared type.
    #[error("argument at position {position} in method '{method}' is not a '{expected}'")]
    TypeMismatch {
        /// Method name.
        method: String,
        /// Zero-based parameter position.
        position: usize,
        /// Declared parameter type.
        expected: &'static str,
    },
    /// No template-facing name could be resolved for a parameter.
    #[error("cannot resolve a name for parameter at position {position} in method '{method}'")]
    UnresolvableName {
        /// Method name.
        method: String,
        /// Zero-based parameter position.
        position: usize,
    },
    /// Two inputs of one call resolved to the same name.
    #[error("duplicate argument name '{name}' in method '{method}'")]
    DuplicateName {
        /// Method name.
        method: String,
        /// Repeated name.
        name: String,
    },
    /// More than one target value was supplied in one call.
    #[error("multiple target arguments supplied to method '{method}'")]
    MultipleTargets {
        /// Method name.
        method: String,
    },
    /// Transformation reached a return type it cannot produce.
    #[error("unsupported return type '{type_name}' from method '{method}'")]
    UnsupportedReturnType {
        /// Method name.
        method: String,
        /// Declared return type.
        type_name: &'static str,
    },
    /// Caller requested a different type than the method declares.
    #[error("method '{method}' returns '{declared}', not '{requested}'")]
    ReturnTypeMismatch {
        /// Method name.
        method: String,
        /// Declared return type.
        declared: &'static str,
        /// Requested return type.
        requested: &'static str,
    },
    /// Failure reported by a custom policy or a provided method body.
    #[error("method '{method}' failed: {message}")]
    Custom {
        /// Method name.
        method: String,
        /// Policy-supplied reason.
        message: String,
    },
}

impl InvocationError {
    /// Maps an adapter registry failure for the parameter at `position`.
    #[must_use]
    pub fn from_adapter(method: &str, position: usize, error: RegistryError) -> Self {
        match error {
            RegistryError::MissingAdapter {
                type_name,
            }
            | RegistryError::MissingTransformer {
                type_name,
            } => Self::UnsupportedParameter {
                method: method.to_string(),
                position,
                type_name,
            },
            RegistryError::ValueMismatch {
                type_name,
            } => Self::TypeMismatch {
                method: method.to_string(),
                position,
                expected: type_name,
            },
        }
    }

    /// Returns a stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownMethod {
                ..
            } => "unknown_method",
            Self::ArityMismatch {
                ..
            } => "arity_mismatch",
            Self::MissingKey {
                ..
            } => "missing_key",
            Self::NullArgument {
                ..
            } => "null_argument",
            Self::UnsupportedParameter {
                ..
            } => "unsupported_parameter",
            Self::TypeMismatch {
                ..
            } => "type_mismatch",
            Self::UnresolvableName {
                ..
            } => "unresolvable_name",
            Self::DuplicateName {
                ..
            } => "duplicate_name",
            Self::MultipleTargets {
                ..
            } => "multiple_targets",
            Self::UnsupportedReturnType {
                ..
            } => "unsupported_return_type",
            Self::ReturnTypeMismatch {
                ..
            } => "return_type_mismatch",
            Self::Custom {
                ..
            } => "custom",
        }
    }
}

// ============================================================================
// SECTION: Dispatch Errors
// ============================================================================

/// Pipeline states of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationStage {
    /// Invocation context assembled.
    Built,
    /// Translation key resolved.
    KeyResolved,
    /// Arguments adapted into formatting inputs.
    ArgumentsAdapted,
    /// Node transformed into the return value.
    ResultTransformed,
}

impl InvocationStage {
    /// Returns the stage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::KeyResolved => "key_resolved",
            Self::ArgumentsAdapted => "arguments_adapted",
            Self::ResultTransformed => "result_transformed",
        }
    }
}

impl fmt::Display for InvocationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one dispatched call.
///
/// # Invariants
/// - `stage` is the state the call was advancing to when it failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dispatch of '{method}' failed before reaching {stage}: {source}")]
pub struct DispatchError {
    /// Method name.
    pub method: String,
    /// State the call did not reach.
    pub stage: InvocationStage,
    /// Underlying failure.
    #[source]
    pub source: InvocationError,
}

impl DispatchError {
    /// Creates a dispatch error.
    #[must_use]
    pub fn new(method: impl Into<String>, stage: InvocationStage, source: InvocationError) -> Self {
        Self {
            method: method.into(),
            stage,
            source,
        }
    }
}
