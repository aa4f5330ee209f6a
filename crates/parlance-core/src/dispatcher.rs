// crates/parlance-core/src/dispatcher.rs
// ============================================================================
// Module: Message Dispatcher
// Description: Per-contract dispatch table and the per-call pipeline.
// Purpose: Validate once at binding, then run key, argument, and result
//          policies for every call without runtime introspection.
// Dependencies: crate::{audit, configuration, context, descriptor, error, policy,
//              text, types, validation}
// ============================================================================

//! ## Overview
//! [`MessageDispatcher::bind`] validates a contract against a policy set and
//! compiles one table entry per method. Calls then move through four states:
//! Built, KeyResolved, ArgumentsAdapted, ResultTransformed. Nothing is retried;
//! the first failure is returned as a [`DispatchError`] naming the state the
//! call was advancing to.
//!
//! Identity methods (equality, hash, display) are answered by the dispatcher
//! handle itself and never reach a policy. Provided methods run the body the
//! contract supplied, also without any policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use crate::audit::BindingAuditEvent;
use crate::audit::BindingAuditSink;
use crate::audit::NoopAuditSink;
use crate::configuration::InvocationConfiguration;
use crate::context::InvocationContext;
use crate::context::InvocationValue;
use crate::descriptor::ContractDescriptor;
use crate::descriptor::IdentityMethod;
use crate::descriptor::MethodDescriptor;
use crate::descriptor::MethodKind;
use crate::descriptor::ProvidedBody;
use crate::error::DispatchError;
use crate::error::InvocationError;
use crate::error::InvocationStage;
use crate::error::ValidationError;
use crate::policy::ArgumentAdaptation;
use crate::policy::ArgumentPolicy;
use crate::policy::KeyPolicy;
use crate::policy::ResultPolicy;
use crate::text::TranslatableNode;
use crate::types::TypeKey;
use crate::validation::check_contract;

// ============================================================================
// SECTION: Dispatch Table
// ============================================================================

/// Index of a method in a bound contract's dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(usize);

impl MethodId {
    /// Returns the table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Policies compiled for one message method.
#[derive(Debug, Clone)]
struct CompiledPipeline {
    /// Key resolution policy.
    key: KeyPolicy,
    /// Argument adaptation policy.
    argument: ArgumentPolicy,
    /// Result transformation policy.
    result: ResultPolicy,
}

impl CompiledPipeline {
    /// Runs the pipeline for one call.
    fn run(
        &self,
        method: &MethodDescriptor,
        values: &[InvocationValue<'_>],
    ) -> Result<Box<dyn Any>, DispatchError> {
        let name = method.name();
        let context = InvocationContext::new(method, values)
            .map_err(failed_before(name, InvocationStage::Built))?;
        let key = self
            .key
            .resolve_key(&context)
            .map_err(failed_before(name, InvocationStage::KeyResolved))?;
        let arguments = self
            .argument
            .adapt(&context)
            .map_err(failed_before(name, InvocationStage::ArgumentsAdapted))?;
        let node = TranslatableNode::new(key, arguments);
        self.result
            .transform(node, &context)
            .map_err(failed_before(name, InvocationStage::ResultTransformed))
    }
}

/// Compiled treatment of one method.
#[derive(Debug, Clone)]
enum Route {
    /// Runs the policy pipeline.
    Message(CompiledPipeline),
    /// Answered by the dispatcher handle.
    Identity(IdentityMethod),
    /// Runs the contract-supplied body.
    Provided(ProvidedBody),
}

/// Shared state behind a dispatcher handle.
#[derive(Debug)]
struct DispatcherCore {
    /// Bound contract.
    contract: ContractDescriptor,
    /// Routes aligned with `contract.methods()`.
    routes: Vec<Route>,
    /// Method name to table index.
    index: HashMap<String, MethodId>,
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Handle to a bound contract.
///
/// Clones share the same table and compare equal; handles from separate
/// binds never do.
///
/// # Invariants
/// - Every message method in the table passed validation against the
///   policies compiled for it.
#[derive(Clone)]
pub struct MessageDispatcher {
    /// Shared dispatch table.
    core: Arc<DispatcherCore>,
}

impl MessageDispatcher {
    /// Validates `contract` against `configuration` and builds a dispatcher.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found; no dispatcher is produced.
    pub fn bind(
        contract: ContractDescriptor,
        configuration: &InvocationConfiguration,
    ) -> Result<Self, ValidationError> {
        Self::bind_with_audit(contract, configuration, &NoopAuditSink)
    }

    /// Same as [`MessageDispatcher::bind`], recording the outcome to `audit`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found; no dispatcher is produced.
    pub fn bind_with_audit(
        contract: ContractDescriptor,
        configuration: &InvocationConfiguration,
        audit: &dyn BindingAuditSink,
    ) -> Result<Self, ValidationError> {
        let (report, outcome) = check_contract(&contract, configuration);
        if let Err(err) = outcome {
            audit.record(&BindingAuditEvent::rejected(contract.name(), report, &err));
            return Err(err);
        }
        audit.record(&BindingAuditEvent::bound(contract.name(), report));
        let routes = contract
            .methods()
            .iter()
            .map(|method| match method.kind() {
                MethodKind::Message => Route::Message(CompiledPipeline {
                    key: configuration.key_policy().clone(),
                    argument: configuration.argument_policy().clone(),
                    result: configuration.result_policy().clone(),
                }),
                MethodKind::Identity(identity) => Route::Identity(*identity),
                MethodKind::Provided(body) => Route::Provided(body.clone()),
            })
            .collect();
        let index = contract
            .methods()
            .iter()
            .enumerate()
            .map(|(position, method)| (method.name().to_string(), MethodId(position)))
            .collect();
        Ok(Self {
            core: Arc::new(DispatcherCore {
                contract,
                routes,
                index,
            }),
        })
    }

    /// Returns the bound contract.
    #[must_use]
    pub fn contract(&self) -> &ContractDescriptor {
        &self.core.contract
    }

    /// Looks up the table index of a method.
    #[must_use]
    pub fn method_id(&self, name: &str) -> Option<MethodId> {
        self.core.index.get(name).copied()
    }

    /// Dispatches a call by method name.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the method is unknown, `R` differs from
    /// the declared return type, or any pipeline state fails.
    pub fn invoke<R: Any>(
        &self,
        method: &str,
        values: &[InvocationValue<'_>],
    ) -> Result<R, DispatchError> {
        let id = self.method_id(method).ok_or_else(|| {
            DispatchError::new(
                method,
                InvocationStage::Built,
                InvocationError::UnknownMethod {
                    contract: self.core.contract.name().to_string(),
                    method: method.to_string(),
                },
            )
        })?;
        self.invoke_id(id, values)
    }

    /// Dispatches a call by table index.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the index is not in this table, `R`
    /// differs from the declared return type, or any pipeline state fails.
    pub fn invoke_id<R: Any>(
        &self,
        id: MethodId,
        values: &[InvocationValue<'_>],
    ) -> Result<R, DispatchError> {
        let methods = self.core.contract.methods();
        let (Some(method), Some(route)) = (methods.get(id.0), self.core.routes.get(id.0)) else {
            let label = format!("#{}", id.0);
            return Err(DispatchError::new(
                label.clone(),
                InvocationStage::Built,
                InvocationError::UnknownMethod {
                    contract: self.core.contract.name().to_string(),
                    method: label,
                },
            ));
        };
        let requested = TypeKey::of::<R>();
        let mismatch = || InvocationError::ReturnTypeMismatch {
            method: method.name().to_string(),
            declared: method.return_type().name(),
            requested: requested.name(),
        };
        if requested != method.return_type() {
            return Err(DispatchError::new(method.name(), InvocationStage::Built, mismatch()));
        }
        let value = match route {
            Route::Message(pipeline) => pipeline.run(method, values)?,
            Route::Identity(identity) => self.answer_identity(*identity, method, values)?,
            Route::Provided(body) => self.run_provided(body, method, values)?,
        };
        value.downcast::<R>().map(|value| *value).map_err(|_| {
            DispatchError::new(method.name(), InvocationStage::ResultTransformed, mismatch())
        })
    }

    /// Returns the identity hash of the shared table.
    #[must_use]
    pub fn identity_hash(&self) -> u64 {
        u64::try_from(Arc::as_ptr(&self.core).addr()).unwrap_or(u64::MAX)
    }

    /// Runs a provided method's body without running any policy.
    ///
    /// A body failure is reported against the result stage, since no value
    /// was produced.
    fn run_provided(
        &self,
        body: &ProvidedBody,
        method: &MethodDescriptor,
        values: &[InvocationValue<'_>],
    ) -> Result<Box<dyn Any>, DispatchError> {
        let context = InvocationContext::new(method, values)
            .map_err(failed_before(method.name(), InvocationStage::Built))?;
        body.call(self, &context)
            .map_err(failed_before(method.name(), InvocationStage::ResultTransformed))
    }

    /// Answers an identity-style method without running any policy.
    fn answer_identity(
        &self,
        identity: IdentityMethod,
        method: &MethodDescriptor,
        values: &[InvocationValue<'_>],
    ) -> Result<Box<dyn Any>, DispatchError> {
        let context = InvocationContext::new(method, values)
            .map_err(failed_before(method.name(), InvocationStage::Built))?;
        let answer: Box<dyn Any> = match identity {
            IdentityMethod::Equals => {
                let equal = context
                    .arguments()
                    .first()
                    .and_then(|argument| argument.value().get())
                    .and_then(|value| value.downcast_ref::<Self>())
                    .is_some_and(|other| self == other);
                Box::new(equal)
            }
            IdentityMethod::Hash => Box::new(self.identity_hash()),
            IdentityMethod::Display => Box::new(self.to_string()),
        };
        Ok(answer)
    }
}

impl PartialEq for MessageDispatcher {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl Eq for MessageDispatcher {}

impl Hash for MessageDispatcher {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity_hash().hash(state);
    }
}

impl fmt::Display for MessageDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Impl@{:x}", self.core.contract.name(), self.identity_hash())
    }
}

impl fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDispatcher")
            .field("contract", &self.core.contract.name())
            .field("methods", &self.core.routes.len())
            .finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Wraps an invocation error with the method name and the unreached stage.
fn failed_before(
    method: &str,
    stage: InvocationStage,
) -> impl FnOnce(InvocationError) -> DispatchError + '_ {
    move |source| DispatchError::new(method, stage, source)
}
