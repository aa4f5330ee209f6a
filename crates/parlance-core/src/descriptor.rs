// crates/parlance-core/src/descriptor.rs
// ============================================================================
// Module: Contract Descriptors
// Description: Declarative metadata for contracts, methods, and parameters.
// Purpose: Describe message contracts explicitly instead of via reflection.
// Dependencies: crate::{context, dispatcher, error, text, types}
// ============================================================================

//! ## Overview
//! A [`ContractDescriptor`] lists the methods a dispatcher serves. Each
//! [`MethodDescriptor`] carries the metadata policies inspect: the declared
//! key, per-locale message declarations, ordered [`ParameterDescriptor`]s,
//! the declared return type, and typed markers that extension policies look
//! for. Descriptors are plain data; they are checked against a policy set when
//! the contract is bound.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::context::InvocationContext;
use crate::dispatcher::MessageDispatcher;
use crate::error::InvocationError;
use crate::error::ValidationError;
use crate::text::FormatTarget;
use crate::text::TextNode;
use crate::types::TypeKey;

// ============================================================================
// SECTION: Message Declarations
// ============================================================================

/// Locale-specific message content declared on a method.
///
/// The dispatcher never reads these; storage layers consume them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDeclaration {
    /// Locale tag (for example `en_US`).
    pub locale: String,
    /// Template content for the locale.
    pub content: String,
}

// ============================================================================
// SECTION: Method Kinds
// ============================================================================

/// Identity-style methods answered without running any policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityMethod {
    /// Reference equality against another dispatcher handle.
    Equals,
    /// Identity-based hash.
    Hash,
    /// Diagnostic string of the dispatcher.
    Display,
}

impl IdentityMethod {
    /// All identity methods, in the order contracts expose them.
    pub const ALL: [Self; 3] = [Self::Equals, Self::Hash, Self::Display];

    /// Returns the method name a contract uses for this identity method.
    #[must_use]
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Hash => "hash_code",
            Self::Display => "to_string",
        }
    }

    /// Returns the descriptor a contract carries for this identity method.
    #[must_use]
    pub fn descriptor(self) -> MethodDescriptor {
        let method = MethodDescriptor::with_kind(self.method_name(), MethodKind::Identity(self));
        match self {
            Self::Equals => method
                .with_parameter(
                    ParameterDescriptor::new::<MessageDispatcher>()
                        .with_identifier("other")
                        .nullable(),
                )
                .returning::<bool>(),
            Self::Hash => method.returning::<u64>(),
            Self::Display => method.returning::<String>(),
        }
    }
}

/// Boxed outcome of a provided method.
type ProvidedResult = Result<Box<dyn Any>, InvocationError>;

/// Type-erased body of a provided method.
type ProvidedFn =
    dyn Fn(&MessageDispatcher, &InvocationContext<'_>) -> ProvidedResult + Send + Sync;

/// Body the contract supplies for a provided method.
///
/// The body receives the dispatcher handle, so it can call the contract's
/// message methods the way a default method calls its siblings.
///
/// # Invariants
/// - Equality is identity of the shared closure.
#[derive(Clone)]
pub struct ProvidedBody(Arc<ProvidedFn>);

impl ProvidedBody {
    /// Runs the body for one call.
    ///
    /// # Errors
    ///
    /// Returns whatever [`InvocationError`] the body reports.
    pub fn call(
        &self,
        dispatcher: &MessageDispatcher,
        context: &InvocationContext<'_>,
    ) -> ProvidedResult {
        (self.0)(dispatcher, context)
    }
}

impl PartialEq for ProvidedBody {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ProvidedBody {}

impl fmt::Debug for ProvidedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProvidedBody")
    }
}

/// How the dispatcher treats a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodKind {
    /// Message method dispatched through the policy pipeline.
    Message,
    /// Identity-style method answered directly.
    Identity(IdentityMethod),
    /// Method the contract implements itself; skipped by validation and run
    /// as-is when dispatched.
    Provided(ProvidedBody),
}

// ============================================================================
// SECTION: Parameters
// ============================================================================

/// Converts a caller value into a format target.
type TargetConversion = fn(&dyn Any) -> Option<FormatTarget>;

/// Clones a `T` out of a caller value into a format target.
fn convert_target<T: Any + Clone + Send + Sync>(value: &dyn Any) -> Option<FormatTarget> {
    value.downcast_ref::<T>().map(|target| FormatTarget::new(target.clone()))
}

/// Metadata for one method parameter.
///
/// # Invariants
/// - `identifier` is `None` when the source identifier was not preserved.
/// - A parameter is target-eligible when it declares a target conversion or
///   its type is [`FormatTarget`].
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    /// Declared source identifier, when recoverable.
    identifier: Option<String>,
    /// Explicit template-facing name.
    name: Option<String>,
    /// Declared parameter type.
    ty: TypeKey,
    /// Whether the caller may pass a null value.
    nullable: bool,
    /// Conversion used when the parameter is passed as a format target.
    target: Option<TargetConversion>,
}

impl ParameterDescriptor {
    /// Creates a non-nullable parameter of type `T`.
    #[must_use]
    pub fn new<T: Any>() -> Self {
        Self {
            identifier: None,
            name: None,
            ty: TypeKey::of::<T>(),
            nullable: false,
            target: None,
        }
    }

    /// Creates a target-eligible parameter of type `T`.
    #[must_use]
    pub fn target<T: Any + Clone + Send + Sync>() -> Self {
        Self {
            target: Some(convert_target::<T>),
            ..Self::new::<T>()
        }
    }

    /// Sets the explicit template-facing name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the declared source identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Marks the parameter as accepting null values.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns the declared source identifier.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Returns the explicit template-facing name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn ty(&self) -> TypeKey {
        self.ty
    }

    /// Returns true when null values are accepted.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns true when the parameter may designate the format target.
    #[must_use]
    pub fn is_target(&self) -> bool {
        self.target.is_some() || self.ty.is::<FormatTarget>()
    }

    /// Converts a caller value into a format target.
    ///
    /// Returns `None` when the parameter is not target-eligible or the value
    /// is not of the declared type.
    #[must_use]
    pub fn to_target(&self, value: &dyn Any) -> Option<FormatTarget> {
        if let Some(target) = value.downcast_ref::<FormatTarget>() {
            return Some(target.clone());
        }
        self.target.and_then(|convert| convert(value))
    }

    /// Returns the identifier or explicit name for diagnostics.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().or(self.identifier.as_deref()).unwrap_or("<unnamed>")
    }
}

// ============================================================================
// SECTION: Methods
// ============================================================================

/// Metadata for one contract method.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// Method name, unique within its contract.
    name: String,
    /// Dispatch treatment.
    kind: MethodKind,
    /// Declared translation key.
    key: Option<String>,
    /// Declared per-locale message content.
    messages: Vec<MessageDeclaration>,
    /// Parameters in declaration order.
    parameters: Vec<ParameterDescriptor>,
    /// Declared return type.
    return_type: TypeKey,
    /// Typed markers keyed by marker type.
    markers: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl MethodDescriptor {
    /// Creates a descriptor with the given kind returning [`TextNode`].
    fn with_kind(name: impl Into<String>, kind: MethodKind) -> Self {
        Self {
            name: name.into(),
            kind,
            key: None,
            messages: Vec::new(),
            parameters: Vec::new(),
            return_type: TypeKey::of::<TextNode>(),
            markers: HashMap::new(),
        }
    }

    /// Creates a message method returning [`TextNode`].
    #[must_use]
    pub fn message(name: impl Into<String>) -> Self {
        Self::with_kind(name, MethodKind::Message)
    }

    /// Creates a method the contract implements itself, returning `R`.
    ///
    /// Calls bypass every policy and run `body` directly.
    #[must_use]
    pub fn provided<R, F>(name: impl Into<String>, body: F) -> Self
    where
        R: Any,
        F: Fn(&MessageDispatcher, &InvocationContext<'_>) -> Result<R, InvocationError>
            + Send
            + Sync
            + 'static,
    {
        let erased = move |dispatcher: &MessageDispatcher,
                           context: &InvocationContext<'_>|
              -> ProvidedResult {
            body(dispatcher, context).map(|value| Box::new(value) as Box<dyn Any>)
        };
        let body = ProvidedBody(Arc::new(erased));
        Self::with_kind(name, MethodKind::Provided(body)).returning::<R>()
    }

    /// Sets the declared translation key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Adds a per-locale message declaration.
    #[must_use]
    pub fn with_message(mut self, locale: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(MessageDeclaration {
            locale: locale.into(),
            content: content.into(),
        });
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the declared return type to `R`.
    #[must_use]
    pub fn returning<R: Any>(mut self) -> Self {
        self.return_type = TypeKey::of::<R>();
        self
    }

    /// Attaches a typed marker, replacing any marker of the same type.
    #[must_use]
    pub fn with_marker<M: Any + Send + Sync>(mut self, marker: M) -> Self {
        self.markers.insert(TypeId::of::<M>(), Arc::new(marker));
        self
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dispatch treatment.
    #[must_use]
    pub const fn kind(&self) -> &MethodKind {
        &self.kind
    }

    /// Returns the declared translation key.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the per-locale message declarations.
    #[must_use]
    pub fn messages(&self) -> &[MessageDeclaration] {
        &self.messages
    }

    /// Returns the parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Returns the declared return type.
    #[must_use]
    pub const fn return_type(&self) -> TypeKey {
        self.return_type
    }

    /// Returns the marker of type `M`, if attached.
    #[must_use]
    pub fn marker<M: Any>(&self) -> Option<&M> {
        self.markers.get(&TypeId::of::<M>()).and_then(|marker| marker.downcast_ref::<M>())
    }

    /// Returns true when the method runs through the policy pipeline.
    #[must_use]
    pub const fn is_message(&self) -> bool {
        matches!(self.kind, MethodKind::Message)
    }
}

// ============================================================================
// SECTION: Contracts
// ============================================================================

/// Named set of methods served by one dispatcher.
///
/// # Invariants
/// - Method names are unique.
/// - Every identity method is present exactly once.
#[derive(Debug, Clone)]
pub struct ContractDescriptor {
    /// Contract name.
    name: String,
    /// Methods in declaration order, identity methods last.
    methods: Vec<MethodDescriptor>,
}

impl ContractDescriptor {
    /// Starts building a contract.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ContractDescriptorBuilder {
        ContractDescriptorBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Returns the contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all methods.
    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// Builder for [`ContractDescriptor`].
#[derive(Debug, Clone)]
pub struct ContractDescriptorBuilder {
    /// Contract name.
    name: String,
    /// Methods collected so far.
    methods: Vec<MethodDescriptor>,
}

impl ContractDescriptorBuilder {
    /// Adds a method.
    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Finishes the contract, adding identity methods that were not declared.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateMethod`] when two methods share a name.
    pub fn build(self) -> Result<ContractDescriptor, ValidationError> {
        let mut methods = self.methods;
        for identity in IdentityMethod::ALL {
            let declared =
                methods.iter().any(|method| method.kind == MethodKind::Identity(identity));
            if !declared {
                methods.push(identity.descriptor());
            }
        }
        let mut seen = HashSet::new();
        for method in &methods {
            if !seen.insert(method.name.as_str()) {
                return Err(ValidationError::DuplicateMethod {
                    contract: self.name,
                    method: method.name.clone(),
                });
            }
        }
        Ok(ContractDescriptor {
            name: self.name,
            methods,
        })
    }
}
