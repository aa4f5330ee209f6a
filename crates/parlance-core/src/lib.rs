// crates/parlance-core/src/lib.rs
// ============================================================================
// Module: Parlance Core Root
// Description: Public API surface for the message dispatch pipeline.
// Purpose: Wire together the text model, registries, policies, and dispatcher.
// Dependencies: crate::{adapter, argument, audit, configuration, context, descriptor,
//              dispatcher, error, policy, text, transformer, types, validation}
// ============================================================================

//! ## Overview
//! Parlance turns a strongly-typed contract method call into a translatable
//! text node. Each call runs three policies in order: key resolution, argument
//! adaptation, and result transformation. Contracts are validated against the
//! chosen policy set once, when they are bound to a [`MessageDispatcher`], so a
//! misconfigured contract fails at setup instead of on first use.
//!
//! The core performs no I/O during a call. Binding may emit a structured audit
//! event through a [`BindingAuditSink`].

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod adapter;
pub mod argument;
pub mod audit;
pub mod configuration;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod policy;
pub mod text;
pub mod transformer;
pub mod types;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use adapter::ArgumentAdapter;
pub use adapter::ArgumentAdapterBuilder;
pub use argument::FormattingInput;
pub use argument::Number;
pub use argument::RawValue;
pub use argument::TranslationArgument;
pub use audit::BindingAuditEvent;
pub use audit::BindingAuditSink;
pub use audit::BindingOutcome;
pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use configuration::FormatStyle;
pub use configuration::InvocationConfiguration;
pub use context::InvocationArgument;
pub use context::InvocationContext;
pub use context::InvocationValue;
pub use descriptor::ContractDescriptor;
pub use descriptor::ContractDescriptorBuilder;
pub use descriptor::IdentityMethod;
pub use descriptor::MessageDeclaration;
pub use descriptor::MethodDescriptor;
pub use descriptor::MethodKind;
pub use descriptor::ParameterDescriptor;
pub use descriptor::ProvidedBody;
pub use dispatcher::MessageDispatcher;
pub use dispatcher::MethodId;
pub use error::DispatchError;
pub use error::InvocationError;
pub use error::InvocationStage;
pub use error::RegistryError;
pub use error::ValidationError;
pub use policy::ArgumentAdaptation;
pub use policy::ArgumentPolicy;
pub use policy::KeyPolicy;
pub use policy::KeyResolution;
pub use policy::NameResolution;
pub use policy::NameResolver;
pub use policy::NamedArgumentPolicy;
pub use policy::PositionalArgumentPolicy;
pub use policy::ResultPolicy;
pub use policy::ResultTransformation;
pub use text::FormatTarget;
pub use text::Tag;
pub use text::TagResolver;
pub use text::TextNode;
pub use text::TranslatableNode;
pub use transformer::ComponentTransformer;
pub use transformer::ComponentTransformerBuilder;
pub use types::TypeKey;
pub use validation::ValidationReport;
pub use validation::validate_contract;
